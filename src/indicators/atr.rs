// =============================================================================
// Average True Range (ATR) — Wilder's Smoothing Method
// =============================================================================
//
// ATR measures market volatility by decomposing the entire range of a bar.
//
// True Range (TR) for each bar:
//   TR = max(H - L, |H - prevClose|, |L - prevClose|)
//
// ATR is then the smoothed average of TR using Wilder's method:
//   ATR_0   = SMA of first `period` TR values
//   ATR_t   = (ATR_{t-1} * (period - 1) + TR_t) / period
// =============================================================================

use crate::error::Result;
use crate::market_data::Candle;

use super::wilder::wilder_step;
use super::{require_len, require_period};

/// True range of every bar that has a predecessor.
///
/// The output has `candles.len() - 1` elements; element `i` belongs to
/// candle `i + 1`.
pub fn true_range(candles: &[Candle]) -> Vec<f64> {
    candles
        .windows(2)
        .map(|pair| bar_true_range(&pair[1], pair[0].close))
        .collect()
}

/// `max(H - L, |H - prevClose|, |L - prevClose|)`, NaN if any input is NaN.
pub(crate) fn bar_true_range(bar: &Candle, prev_close: f64) -> f64 {
    let hl = bar.high - bar.low;
    let hc = (bar.high - prev_close).abs();
    let lc = (bar.low - prev_close).abs();
    // f64::max drops NaN operands, so check explicitly.
    if hl.is_nan() || hc.is_nan() || lc.is_nan() {
        return f64::NAN;
    }
    hl.max(hc).max(lc)
}

/// Compute the ATR series from a slice of OHLCV candles (oldest first).
///
/// Needs `period + 1` candles: `period` TR values, each requiring a previous
/// candle.  The output length is `candles.len() - period`; element `i` lines
/// up with candle `i + period`.
pub fn calculate_atr(candles: &[Candle], period: usize) -> Result<Vec<f64>> {
    require_period("atr", "period", period)?;
    require_len("atr", candles.len(), period + 1)?;

    // --- Step 1: True Range for each consecutive pair ------------------------
    let tr_values = true_range(candles);

    // --- Step 2: Seed ATR with SMA of first `period` TR values ---------------
    let seed: f64 = tr_values[..period].iter().sum::<f64>() / period as f64;

    // --- Step 3: Wilder's smoothing for remaining TR values ------------------
    let mut result = Vec::with_capacity(tr_values.len() - period + 1);
    result.push(seed);
    let mut atr = seed;
    for &tr in &tr_values[period..] {
        atr = wilder_step(atr, tr, period);
        result.push(atr);
    }

    Ok(result)
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IndicatorError;
    use chrono::DateTime;

    /// Build a test candle with the given OHLC values.
    fn candle(open: f64, high: f64, low: f64, close: f64) -> Candle {
        Candle::new(DateTime::from_timestamp(0, 0).unwrap(), open, high, low, close, 100.0)
    }

    #[test]
    fn atr_period_zero() {
        let candles = vec![candle(100.0, 105.0, 95.0, 102.0); 20];
        assert!(calculate_atr(&candles, 0).is_err());
    }

    #[test]
    fn atr_insufficient_data() {
        // Need period + 1 = 15 candles for period=14, only have 10.
        let candles = vec![candle(100.0, 105.0, 95.0, 102.0); 10];
        assert!(matches!(
            calculate_atr(&candles, 14),
            Err(IndicatorError::InsufficientData { required: 15, actual: 10, .. })
        ));
    }

    #[test]
    fn atr_exact_minimum_data() {
        // period=3, need 4 candles to get 3 TR values.
        let candles = vec![
            candle(100.0, 102.0, 98.0, 101.0),
            candle(101.0, 104.0, 99.0, 103.0),
            candle(103.0, 106.0, 100.0, 105.0),
            candle(105.0, 108.0, 102.0, 107.0),
        ];
        let atr = calculate_atr(&candles, 3).unwrap();
        assert_eq!(atr.len(), 1);
        // TRs: 5, 6, 6 => seed 17/3
        assert!((atr[0] - 17.0 / 3.0).abs() < 1e-10);
    }

    #[test]
    fn atr_constant_range() {
        // All candles have the same range (H-L=10), close at midpoint.
        // TR should be constant and ATR should converge to 10.
        let candles: Vec<Candle> = (0..30)
            .map(|i| {
                let base = 100.0 + i as f64 * 0.1; // slight drift
                candle(base, base + 5.0, base - 5.0, base)
            })
            .collect();
        let atr = calculate_atr(&candles, 14).unwrap();
        assert_eq!(atr.len(), 16);
        let last = *atr.last().unwrap();
        assert!((last - 10.0).abs() < 1.0, "expected ATR near 10.0, got {last}");
    }

    #[test]
    fn atr_increasing_volatility() {
        let mut candles = vec![candle(100.0, 101.0, 99.0, 100.0)];
        for i in 1..30 {
            let spread = 1.0 + i as f64 * 0.5;
            candles.push(candle(100.0, 100.0 + spread, 100.0 - spread, 100.0));
        }
        let last = *calculate_atr(&candles, 5).unwrap().last().unwrap();
        assert!(last > 5.0, "expected ATR > 5.0 for increasing vol, got {last}");
    }

    #[test]
    fn atr_true_range_uses_prev_close() {
        // Gap scenario: |H - prevClose| > H - L
        let candles = vec![
            candle(100.0, 105.0, 95.0, 95.0),   // close at low
            candle(110.0, 115.0, 108.0, 112.0), // gap up: |115-95|=20 > 115-108=7
        ];
        assert_eq!(true_range(&candles), vec![20.0]);
    }

    #[test]
    fn atr_nan_propagates() {
        let candles = vec![
            candle(100.0, 105.0, 95.0, 100.0),
            candle(100.0, 105.0, 95.0, 100.0),
            candle(100.0, f64::NAN, 95.0, 100.0),
            candle(100.0, 105.0, 95.0, 100.0),
        ];
        let atr = calculate_atr(&candles, 2).unwrap();
        assert!(atr[0].is_nan());
        assert!(atr[1].is_nan());
    }
}
