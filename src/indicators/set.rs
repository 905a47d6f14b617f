// =============================================================================
// Indicator Set — every series for one candle batch
// =============================================================================
//
// `IndicatorSet::compute` runs each indicator once over the batch and keeps
// the full output sequences.  `latest` reduces them to the most recent
// element of each, which is all the scorer looks at.
// =============================================================================

use serde::{Deserialize, Serialize};

use crate::config::IndicatorConfig;
use crate::error::{IndicatorError, Result};
use crate::market_data::{closes, Candle};

use super::adx::{calculate_adx, AdxSeries};
use super::atr::calculate_atr;
use super::bollinger::{calculate_bollinger, BollingerBand};
use super::ema::{calculate_ema_pair, EmaPair};
use super::fibonacci::{fibonacci_levels, swing_range, FibonacciLevel};
use super::ichimoku::{calculate_ichimoku, IchimokuCloud};
use super::keltner::{calculate_keltner, KeltnerChannel};
use super::macd::{calculate_macd, MacdPoint};
use super::parabolic_sar::{calculate_parabolic_sar, SarPoint};
use super::rsi::calculate_rsi;
use super::stoch_rsi::{calculate_stoch_rsi, StochRsi};
use super::supertrend::{calculate_supertrend, SupertrendPoint};
use super::vsa::{calculate_vsa, VsaBar};
use super::vwap::calculate_vwap;
use super::williams_r::calculate_williams_r;

/// Full output of every indicator for one batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSet {
    pub vwap: Vec<f64>,
    pub ema: EmaPair,
    pub rsi: Vec<f64>,
    pub bollinger: Vec<BollingerBand>,
    pub macd: Vec<MacdPoint>,
    pub atr: Vec<f64>,
    pub keltner: Vec<KeltnerChannel>,
    pub supertrend: Vec<SupertrendPoint>,
    pub ichimoku: IchimokuCloud,
    pub parabolic_sar: Vec<SarPoint>,
    pub fibonacci: Vec<FibonacciLevel>,
    pub adx: AdxSeries,
    pub stoch_rsi: StochRsi,
    pub williams_r: Vec<f64>,
    pub vsa: Vec<VsaBar>,
}

/// Latest Ichimoku values.  The leading spans may not exist yet for short
/// batches with a large displacement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IchimokuReading {
    pub conversion_line: f64,
    pub base_line: f64,
    pub leading_span_a: Option<f64>,
    pub leading_span_b: f64,
    /// Most recent close that still has a candle `displacement` bars later.
    pub lagging_span: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdxReading {
    pub adx: f64,
    pub plus_di: f64,
    pub minus_di: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StochRsiReading {
    pub k: f64,
    pub d: f64,
}

/// The most recent element of every indicator series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorReadings {
    pub vwap: f64,
    pub ema_short: f64,
    pub ema_long: f64,
    pub rsi: f64,
    pub bollinger: BollingerBand,
    pub macd: MacdPoint,
    pub atr: f64,
    pub keltner: KeltnerChannel,
    pub supertrend: SupertrendPoint,
    pub ichimoku: IchimokuReading,
    pub parabolic_sar: SarPoint,
    pub fibonacci: Vec<FibonacciLevel>,
    pub adx: AdxReading,
    pub stoch_rsi: StochRsiReading,
    pub williams_r: f64,
    pub vsa: VsaBar,
}

impl IndicatorSet {
    /// Run every indicator over `candles` with the given parameters.
    ///
    /// The first precondition failure aborts the whole set.
    pub fn compute(candles: &[Candle], config: &IndicatorConfig) -> Result<Self> {
        let closes = closes(candles);
        let (swing_high, swing_low) = swing_range(candles)?;

        Ok(Self {
            vwap: calculate_vwap(candles)?,
            ema: calculate_ema_pair(&closes, config.ema.short, config.ema.long)?,
            rsi: calculate_rsi(&closes, config.rsi.period)?,
            bollinger: calculate_bollinger(&closes, config.bollinger.period, config.bollinger.std_dev)?,
            macd: calculate_macd(
                &closes,
                config.macd.fast_period,
                config.macd.slow_period,
                config.macd.signal_period,
            )?,
            atr: calculate_atr(candles, config.atr.period)?,
            keltner: calculate_keltner(
                candles,
                config.keltner.period,
                config.atr.period,
                config.keltner.atr_multiplier,
            )?,
            supertrend: calculate_supertrend(
                candles,
                config.supertrend.period,
                config.atr.period,
                config.supertrend.multiplier,
            )?,
            ichimoku: calculate_ichimoku(
                candles,
                config.ichimoku.conversion_period,
                config.ichimoku.base_period,
                config.ichimoku.span_period,
                config.ichimoku.displacement,
            )?,
            parabolic_sar: calculate_parabolic_sar(
                candles,
                config.parabolic_sar.step,
                config.parabolic_sar.max,
            )?,
            fibonacci: fibonacci_levels(swing_high, swing_low, &config.fibonacci.levels),
            adx: calculate_adx(candles, config.adx.period)?,
            stoch_rsi: calculate_stoch_rsi(
                &closes,
                config.stoch_rsi.rsi_period,
                config.stoch_rsi.stoch_period,
                config.stoch_rsi.k_period,
                config.stoch_rsi.d_period,
            )?,
            williams_r: calculate_williams_r(candles, config.williams_r.period)?,
            vsa: calculate_vsa(candles, config.vsa.volume_period)?,
        })
    }

    /// Reduce every series to its latest element.
    pub fn latest(&self) -> Result<IndicatorReadings> {
        let ichimoku = &self.ichimoku;

        Ok(IndicatorReadings {
            vwap: last("vwap", &self.vwap)?,
            ema_short: last("ema", &self.ema.short)?,
            ema_long: last("ema", &self.ema.long)?,
            rsi: last("rsi", &self.rsi)?,
            bollinger: last("bollinger", &self.bollinger)?,
            macd: last("macd", &self.macd)?,
            atr: last("atr", &self.atr)?,
            keltner: last("keltner", &self.keltner)?,
            supertrend: last("supertrend", &self.supertrend)?,
            ichimoku: IchimokuReading {
                conversion_line: last("ichimoku", &ichimoku.conversion_line)?,
                base_line: last("ichimoku", &ichimoku.base_line)?,
                leading_span_a: ichimoku.leading_span_a.last().copied(),
                leading_span_b: last("ichimoku", &ichimoku.leading_span_b)?,
                lagging_span: ichimoku.lagging_span.iter().rev().find_map(|v| *v),
            },
            parabolic_sar: last("parabolic_sar", &self.parabolic_sar)?,
            fibonacci: self.fibonacci.clone(),
            adx: AdxReading {
                adx: last("adx", &self.adx.adx)?,
                plus_di: last("adx", &self.adx.plus_di)?,
                minus_di: last("adx", &self.adx.minus_di)?,
            },
            stoch_rsi: StochRsiReading {
                k: last("stoch_rsi", &self.stoch_rsi.k)?,
                d: last("stoch_rsi", &self.stoch_rsi.d)?,
            },
            williams_r: last("williams_r", &self.williams_r)?,
            vsa: last("vsa", &self.vsa)?,
        })
    }
}

fn last<T: Copy>(indicator: &'static str, series: &[T]) -> Result<T> {
    series
        .last()
        .copied()
        .ok_or(IndicatorError::EmptyInput { indicator })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn trending(n: usize) -> Vec<Candle> {
        (0..n)
            .map(|i| {
                let ts = DateTime::from_timestamp(i as i64 * 60, 0).unwrap();
                let base = 100.0 + i as f64 * 0.8 + (i as f64 * 0.5).sin() * 2.0;
                Candle::new(ts, base - 0.3, base + 1.0, base - 1.0, base + 0.3, 100.0 + (i % 7) as f64 * 10.0)
            })
            .collect()
    }

    #[test]
    fn compute_default_config_on_minimum_batch() {
        let config = IndicatorConfig::default();
        let candles = trending(config.min_candles());
        let set = IndicatorSet::compute(&candles, &config).unwrap();

        assert_eq!(set.vwap.len(), 52);
        assert_eq!(set.ema.short.len(), 48);
        assert_eq!(set.ema.long.len(), 33);
        assert_eq!(set.rsi.len(), 38);
        assert_eq!(set.bollinger.len(), 33);
        assert_eq!(set.atr.len(), 47);
        assert_eq!(set.supertrend.len(), 42);
        assert_eq!(set.parabolic_sar.len(), 52);
        assert_eq!(set.fibonacci.len(), 3);
        assert_eq!(set.ichimoku.leading_span_b.len(), 1);
    }

    #[test]
    fn short_batch_is_rejected() {
        let config = IndicatorConfig::default();
        let candles = trending(config.min_candles() - 1);
        assert!(matches!(
            IndicatorSet::compute(&candles, &config),
            Err(IndicatorError::InsufficientData { .. })
        ));
    }

    #[test]
    fn latest_takes_last_elements() {
        let config = IndicatorConfig::default();
        let candles = trending(80);
        let set = IndicatorSet::compute(&candles, &config).unwrap();
        let readings = set.latest().unwrap();

        assert_eq!(readings.vwap, *set.vwap.last().unwrap());
        assert_eq!(readings.ema_short, *set.ema.short.last().unwrap());
        assert_eq!(readings.atr, *set.atr.last().unwrap());
        assert_eq!(readings.supertrend, *set.supertrend.last().unwrap());
        assert_eq!(readings.stoch_rsi.d, *set.stoch_rsi.d.last().unwrap());
        // 80 candles, displacement 26: close 53 is the last with a bar 26 later.
        assert_eq!(readings.ichimoku.lagging_span, Some(candles[53].close));
        assert!(readings.ichimoku.leading_span_a.is_some());
    }

    #[test]
    fn fibonacci_spans_batch_extremes() {
        let config = IndicatorConfig::default();
        let candles = trending(60);
        let set = IndicatorSet::compute(&candles, &config).unwrap();
        let high = candles.iter().map(|c| c.high).fold(f64::NEG_INFINITY, f64::max);
        let low = candles.iter().map(|c| c.low).fold(f64::INFINITY, f64::min);
        let level = set.fibonacci[0];
        assert!((level.price - (high - (high - low) * 0.236)).abs() < 1e-10);
    }
}
