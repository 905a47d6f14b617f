// =============================================================================
// Signal Strategy — batch analysis and trade decision
// =============================================================================
//
// Stateless per call: every `analyze` recomputes all indicators from the
// supplied batch, so the same batch always produces the same snapshot.
//
// Pipeline:
//   1. Reject empty or out-of-order batches
//   2. Compute every indicator series, keep the latest element of each
//   3. Score bullish / bearish confluence with the weighted scorer
//   4. Derive stop-loss / take-profit from the latest ATR
//   5. `generate_signal` applies the threshold rule to the snapshot
//
// Stop-loss sits below and take-profit above the current price whatever the
// eventual signal side.
// =============================================================================

use tracing::debug;

use crate::config::{AppConfig, IndicatorConfig, StrategyParams};
use crate::error::{IndicatorError, Result};
use crate::indicators::{IndicatorSet, Thresholds};
use crate::market_data::{ensure_chronological, Candle};
use crate::signals::WeightedScorer;
use crate::types::{AnalysisSnapshot, OscillatorZones, TradeSignal};

/// Turns candle batches into analysis snapshots and trade signals.
#[derive(Debug, Clone)]
pub struct SignalStrategy {
    indicators: IndicatorConfig,
    scorer: WeightedScorer,
    stop_loss_atr_multiplier: f64,
    take_profit_atr_multiplier: f64,
    rsi_thresholds: Thresholds,
    stoch_thresholds: Thresholds,
    williams_thresholds: Thresholds,
}

impl SignalStrategy {
    pub fn new(indicators: IndicatorConfig, params: StrategyParams) -> Self {
        let rsi_thresholds = indicators.rsi.thresholds();
        let stoch_thresholds = indicators.stoch_rsi.thresholds();
        let williams_thresholds = indicators.williams_r.thresholds();
        let scorer = WeightedScorer::new(params.weights, params.min_weight_ratio)
            .with_thresholds(rsi_thresholds, stoch_thresholds);

        Self {
            indicators,
            scorer,
            stop_loss_atr_multiplier: params.stop_loss_atr_multiplier,
            take_profit_atr_multiplier: params.take_profit_atr_multiplier,
            rsi_thresholds,
            stoch_thresholds,
            williams_thresholds,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.indicators.clone(), config.strategy.clone())
    }

    /// Shortest batch `analyze` accepts.
    pub fn min_candles(&self) -> usize {
        self.indicators.min_candles()
    }

    /// Compute every indicator over `candles` and score the latest bar.
    pub fn analyze(&self, candles: &[Candle]) -> Result<AnalysisSnapshot> {
        let latest = candles
            .last()
            .ok_or(IndicatorError::EmptyInput { indicator: "strategy" })?;
        ensure_chronological(candles)?;

        let set = IndicatorSet::compute(candles, &self.indicators)?;
        let readings = set.latest()?;
        let price = latest.close;

        let scoring = self.scorer.score(&readings, price);
        let stop_loss = price - self.stop_loss_atr_multiplier * readings.atr;
        let take_profit = price + self.take_profit_atr_multiplier * readings.atr;

        let zones = OscillatorZones {
            rsi: self.rsi_thresholds.classify(readings.rsi),
            stoch_rsi: self.stoch_thresholds.classify(readings.stoch_rsi.k),
            williams_r: self.williams_thresholds.classify(readings.williams_r),
        };

        debug!(
            candles = candles.len(),
            price,
            bullish = scoring.scores.bullish,
            bearish = scoring.scores.bearish,
            atr = readings.atr,
            rsi = readings.rsi,
            "batch analysed"
        );

        Ok(AnalysisSnapshot {
            timestamp: latest.timestamp,
            current_price: price,
            readings,
            zones,
            scores: scoring.scores,
            contributions: scoring.contributions,
            stop_loss,
            take_profit,
        })
    }

    /// Apply the decision rule to a snapshot.  `None` when neither side
    /// clears the threshold or the scores tie.
    pub fn generate_signal(&self, snapshot: &AnalysisSnapshot) -> Option<TradeSignal> {
        let decision = self.scorer.decide(snapshot.scores)?;

        debug!(
            side = %decision.side,
            confidence = decision.confidence,
            min_weight = self.scorer.min_weight(),
            "signal decided"
        );

        Some(TradeSignal {
            side: decision.side,
            entry: snapshot.current_price,
            stop_loss: snapshot.stop_loss,
            take_profit: snapshot.take_profit,
            confidence: decision.confidence,
            timestamp: snapshot.timestamp,
        })
    }
}

impl Default for SignalStrategy {
    fn default() -> Self {
        Self::new(IndicatorConfig::default(), StrategyParams::default())
    }
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::atr::calculate_atr;
    use crate::types::{ScorePair, SignalSide};
    use chrono::DateTime;

    fn bar(i: usize, close: f64) -> Candle {
        let ts = DateTime::from_timestamp(1_700_000_000 + i as i64 * 300, 0).unwrap();
        Candle::new(ts, close - 0.3, close + 0.5, close - 0.5, close, 1_000.0)
    }

    fn uptrend(n: usize) -> Vec<Candle> {
        (0..n).map(|i| bar(i, 100.0 + i as f64)).collect()
    }

    fn choppy(n: usize) -> Vec<Candle> {
        (0..n)
            .map(|i| bar(i, 1_900.0 + (i as f64 * 0.4).sin() * 12.0 + (i as f64 * 0.13).cos() * 5.0))
            .collect()
    }

    /// Wobbling trend, a three-bar pullback, then two bars resuming the
    /// trend.  `rising == false` mirrors the batch into a downtrend.
    fn pullback_trend(rising: bool) -> Vec<Candle> {
        let mut closes: Vec<f64> = (0..60)
            .map(|i| 100.0 + i as f64 * 0.5 + (i as f64 * 0.3).sin() * 3.0)
            .collect();
        let mut close = closes[59];
        for step in [-0.8, -0.8, -0.8, 0.8, 0.8] {
            close += step;
            closes.push(close);
        }
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| bar(i, if rising { c } else { 250.0 - c }))
            .collect()
    }

    #[test]
    fn same_batch_gives_identical_snapshots() {
        let strategy = SignalStrategy::default();
        let candles = choppy(120);
        let first = strategy.analyze(&candles).unwrap();
        let second = strategy.analyze(&candles).unwrap();
        // Debug output compares NaN fields too.
        assert_eq!(format!("{first:?}"), format!("{second:?}"));
    }

    #[test]
    fn empty_batch_is_rejected() {
        let strategy = SignalStrategy::default();
        assert_eq!(
            strategy.analyze(&[]).unwrap_err(),
            IndicatorError::EmptyInput { indicator: "strategy" }
        );
    }

    #[test]
    fn short_batch_is_rejected() {
        let strategy = SignalStrategy::default();
        let candles = choppy(strategy.min_candles() - 1);
        assert!(matches!(
            strategy.analyze(&candles),
            Err(IndicatorError::InsufficientData { .. })
        ));
        assert!(strategy.analyze(&choppy(strategy.min_candles())).is_ok());
    }

    #[test]
    fn unordered_batch_is_rejected() {
        let strategy = SignalStrategy::default();
        let mut candles = choppy(80);
        candles.swap(40, 41);
        assert_eq!(
            strategy.analyze(&candles).unwrap_err(),
            IndicatorError::UnorderedCandles { index: 41 }
        );
    }

    #[test]
    fn exits_derive_from_latest_atr() {
        let strategy = SignalStrategy::default();
        let snapshot = strategy.analyze(&choppy(100)).unwrap();
        let atr = snapshot.readings.atr;
        let price = snapshot.current_price;
        assert!((snapshot.stop_loss - (price - 2.0 * atr)).abs() < 1e-9);
        assert!((snapshot.take_profit - (price + 3.0 * atr)).abs() < 1e-9);
        assert_eq!(snapshot.contributions.len(), 8);
    }

    #[test]
    fn steady_uptrend_leans_bullish_without_signal() {
        let strategy = SignalStrategy::default();
        let candles = uptrend(80);
        let snapshot = strategy.analyze(&candles).unwrap();

        assert_eq!(snapshot.current_price, 179.0);
        assert_eq!(snapshot.timestamp, candles[79].timestamp);
        assert!((snapshot.readings.rsi - 100.0).abs() < 1e-9);
        assert_eq!(snapshot.zones.rsi, crate::indicators::Zone::Overbought);
        // Supertrend+VWAP, VWAP+RSI and EMA crossover at least.
        assert!(snapshot.scores.bullish >= 9.0);
        assert!(snapshot.scores.bearish <= 6.0);
        // Oversold-only factors cannot fire, so 12.6 is out of reach.
        assert!(strategy.generate_signal(&snapshot).is_none());
    }

    #[test]
    fn pullback_in_uptrend_emits_buy() {
        let strategy = SignalStrategy::default();
        let candles = pullback_trend(true);
        let snapshot = strategy.analyze(&candles).unwrap();

        // Supertrend+VWAP, VWAP+RSI, EMA crossover, MACD and Stochastic RSI.
        assert_eq!(snapshot.scores.bullish, 13.0);
        assert_eq!(snapshot.scores.bearish, 0.0);
        let stoch = snapshot.readings.stoch_rsi;
        assert!(stoch.k < 20.0 && stoch.k > stoch.d);

        let atr = *calculate_atr(&candles, 5).unwrap().last().unwrap();
        assert_eq!(snapshot.readings.atr, atr);

        let signal = strategy.generate_signal(&snapshot).unwrap();
        assert_eq!(signal.side, SignalSide::Buy);
        assert_eq!(signal.entry, candles[64].close);
        assert!((signal.confidence - 13.0 / 21.0).abs() < 1e-12);
        assert!((signal.stop_loss - (signal.entry - 2.0 * atr)).abs() < 1e-9);
        assert!((signal.take_profit - (signal.entry + 3.0 * atr)).abs() < 1e-9);
        assert_eq!(signal.timestamp, candles[64].timestamp);
    }

    #[test]
    fn bounce_in_downtrend_emits_sell() {
        let strategy = SignalStrategy::default();
        let candles = pullback_trend(false);
        let snapshot = strategy.analyze(&candles).unwrap();

        assert_eq!(snapshot.scores.bullish, 0.0);
        assert_eq!(snapshot.scores.bearish, 13.0);
        let stoch = snapshot.readings.stoch_rsi;
        assert!(stoch.k > 80.0 && stoch.k < stoch.d);

        let atr = snapshot.readings.atr;
        let signal = strategy.generate_signal(&snapshot).unwrap();
        assert_eq!(signal.side, SignalSide::Sell);
        assert!((signal.confidence - 13.0 / 21.0).abs() < 1e-12);
        // Exits keep the same orientation for both sides.
        assert!((signal.stop_loss - (signal.entry - 2.0 * atr)).abs() < 1e-9);
        assert!((signal.take_profit - (signal.entry + 3.0 * atr)).abs() < 1e-9);
    }

    #[test]
    fn signal_mirrors_snapshot() {
        let strategy = SignalStrategy::default();
        let mut snapshot = strategy.analyze(&choppy(90)).unwrap();
        snapshot.scores = ScorePair {
            bullish: 14.0,
            bearish: 3.0,
        };

        let signal = strategy.generate_signal(&snapshot).unwrap();
        assert_eq!(signal.side, SignalSide::Buy);
        assert!((signal.confidence - 14.0 / 21.0).abs() < 1e-12);
        assert_eq!(signal.entry, snapshot.current_price);
        assert_eq!(signal.stop_loss, snapshot.stop_loss);
        assert_eq!(signal.take_profit, snapshot.take_profit);
        assert_eq!(signal.timestamp, snapshot.timestamp);

        snapshot.scores = ScorePair {
            bullish: 3.0,
            bearish: 13.0,
        };
        assert_eq!(strategy.generate_signal(&snapshot).unwrap().side, SignalSide::Sell);

        snapshot.scores = ScorePair {
            bullish: 15.0,
            bearish: 15.0,
        };
        assert!(strategy.generate_signal(&snapshot).is_none());
    }

    #[test]
    fn from_config_uses_custom_weights() {
        let mut config = AppConfig::default();
        config.strategy.weights.ema = 10.0;
        let strategy = SignalStrategy::from_config(&config);
        let snapshot = strategy.analyze(&uptrend(80)).unwrap();
        let ema = snapshot
            .contributions
            .iter()
            .find(|c| c.factor == crate::signals::Factor::EmaCrossover)
            .unwrap();
        assert!(ema.bullish);
        assert_eq!(ema.weight, 10.0);
    }
}
