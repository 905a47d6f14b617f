// =============================================================================
// Volume Spread Analysis (VSA)
// =============================================================================
//
// Per bar, against a rolling average of volume over `volume_period` bars:
//
//   volume_ratio   = volume / volume_ma
//   spread         = high - low
//   is_high_volume = volume > 1.5 * volume_ma
//   is_wide_spread = spread > 1.5 * spread
//
// The wide-spread flag is measured against the bar's own spread, so it only
// trips for a negative spread.  There is no rolling spread average to compare
// against yet.
// =============================================================================

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::market_data::Candle;

use super::{require_len, require_period};

const HIGH_VOLUME_FACTOR: f64 = 1.5;
const WIDE_SPREAD_FACTOR: f64 = 1.5;

/// One step of the VSA series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VsaBar {
    /// NaN when the rolling volume average is zero.
    pub volume_ratio: f64,
    pub spread: f64,
    pub close: f64,
    pub is_wide_spread: bool,
    pub is_high_volume: bool,
}

/// Compute VSA for every full volume window.  Output length
/// `candles.len() - volume_period + 1`.
pub fn calculate_vsa(candles: &[Candle], volume_period: usize) -> Result<Vec<VsaBar>> {
    require_period("vsa", "volume_period", volume_period)?;
    require_len("vsa", candles.len(), volume_period)?;

    let bars = candles
        .windows(volume_period)
        .map(|window| {
            let volume_ma = window.iter().map(|c| c.volume).sum::<f64>() / volume_period as f64;
            let bar = &window[window.len() - 1];
            let spread = bar.spread();

            VsaBar {
                volume_ratio: if volume_ma == 0.0 {
                    f64::NAN
                } else {
                    bar.volume / volume_ma
                },
                spread,
                close: bar.close,
                is_wide_spread: spread > spread * WIDE_SPREAD_FACTOR,
                is_high_volume: bar.volume > volume_ma * HIGH_VOLUME_FACTOR,
            }
        })
        .collect();

    Ok(bars)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn bar(i: usize, spread: f64, volume: f64) -> Candle {
        let ts = DateTime::from_timestamp(i as i64 * 60, 0).unwrap();
        Candle::new(ts, 100.0, 100.0 + spread, 100.0, 100.0, volume)
    }

    #[test]
    fn volume_spike_flags_high_volume() {
        let mut candles: Vec<Candle> = (0..19).map(|i| bar(i, 1.0, 100.0)).collect();
        candles.push(bar(19, 1.0, 500.0));
        let vsa = calculate_vsa(&candles, 20).unwrap();
        assert_eq!(vsa.len(), 1);
        // MA = (19 * 100 + 500) / 20 = 120
        assert!((vsa[0].volume_ratio - 500.0 / 120.0).abs() < 1e-12);
        assert!(vsa[0].is_high_volume);
    }

    #[test]
    fn steady_volume_is_not_high() {
        let candles: Vec<Candle> = (0..25).map(|i| bar(i, 2.0, 100.0)).collect();
        let vsa = calculate_vsa(&candles, 20).unwrap();
        assert_eq!(vsa.len(), 6);
        for step in &vsa {
            assert!((step.volume_ratio - 1.0).abs() < 1e-12);
            assert!(!step.is_high_volume);
            assert!((step.spread - 2.0).abs() < 1e-12);
        }
    }

    #[test]
    fn wide_spread_never_trips_for_positive_spread() {
        let mut candles: Vec<Candle> = (0..19).map(|i| bar(i, 1.0, 100.0)).collect();
        candles.push(bar(19, 50.0, 100.0));
        let vsa = calculate_vsa(&candles, 20).unwrap();
        assert!(!vsa[0].is_wide_spread);
    }

    #[test]
    fn zero_volume_ratio_is_nan() {
        let candles: Vec<Candle> = (0..5).map(|i| bar(i, 1.0, 0.0)).collect();
        let vsa = calculate_vsa(&candles, 3).unwrap();
        assert!(vsa.iter().all(|s| s.volume_ratio.is_nan() && !s.is_high_volume));
    }
}
