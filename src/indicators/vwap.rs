// =============================================================================
// Volume-Weighted Average Price (VWAP) — running, anchored at batch start
// =============================================================================
//
//   VWAP_t = Σ(typical_price_i * volume_i) / Σ(volume_i),   i = 0..=t
//
// Not a rolling window: the anchor is always the first candle of the batch,
// so changing the batch start changes every value.

use crate::error::Result;
use crate::market_data::Candle;

use super::require_len;

/// Running VWAP, one value per candle.  NaN while cumulative volume is zero.
pub fn calculate_vwap(candles: &[Candle]) -> Result<Vec<f64>> {
    require_len("vwap", candles.len(), 1)?;

    let mut cumulative_pv = 0.0;
    let mut cumulative_volume = 0.0;

    let vwap = candles
        .iter()
        .map(|candle| {
            cumulative_pv += candle.typical_price() * candle.volume;
            cumulative_volume += candle.volume;
            if cumulative_volume == 0.0 {
                f64::NAN
            } else {
                cumulative_pv / cumulative_volume
            }
        })
        .collect();

    Ok(vwap)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IndicatorError;
    use chrono::DateTime;

    fn bar(i: usize, high: f64, low: f64, close: f64, volume: f64) -> Candle {
        let ts = DateTime::from_timestamp(i as i64 * 60, 0).unwrap();
        Candle::new(ts, close, high, low, close, volume)
    }

    #[test]
    fn one_value_per_candle() {
        let candles: Vec<Candle> = (0..7).map(|i| bar(i, 11.0, 9.0, 10.0, 1.0)).collect();
        assert_eq!(calculate_vwap(&candles).unwrap().len(), 7);
    }

    #[test]
    fn known_values() {
        // Typical prices 10 and 20, volumes 1 and 3 => (10 + 60) / 4 = 17.5
        let candles = vec![bar(0, 10.0, 10.0, 10.0, 1.0), bar(1, 20.0, 20.0, 20.0, 3.0)];
        let vwap = calculate_vwap(&candles).unwrap();
        assert!((vwap[0] - 10.0).abs() < 1e-12);
        assert!((vwap[1] - 17.5).abs() < 1e-12);
    }

    #[test]
    fn anchor_moves_with_batch_start() {
        let candles = vec![
            bar(0, 10.0, 10.0, 10.0, 5.0),
            bar(1, 20.0, 20.0, 20.0, 1.0),
            bar(2, 30.0, 30.0, 30.0, 1.0),
        ];
        let full = calculate_vwap(&candles).unwrap();
        let trimmed = calculate_vwap(&candles[1..]).unwrap();
        assert!((full[2] - trimmed[1]).abs() > 1.0);
        assert!((trimmed[1] - 25.0).abs() < 1e-12);
    }

    #[test]
    fn zero_volume_prefix_is_nan() {
        let candles = vec![bar(0, 10.0, 10.0, 10.0, 0.0), bar(1, 12.0, 12.0, 12.0, 2.0)];
        let vwap = calculate_vwap(&candles).unwrap();
        assert!(vwap[0].is_nan());
        assert!((vwap[1] - 12.0).abs() < 1e-12);
    }

    #[test]
    fn empty_batch_rejected() {
        assert_eq!(
            calculate_vwap(&[]),
            Err(IndicatorError::EmptyInput { indicator: "vwap" })
        );
    }
}
