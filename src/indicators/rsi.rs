// =============================================================================
// Relative Strength Index (RSI)
// =============================================================================
//
//   RS  = average gain / average loss
//   RSI = 100 - 100 / (1 + RS)
//
// Both averages are seeded with the mean of the first `period` close-to-close
// moves and then carried forward with the Wilder step, one delta at a time.
// Zone classification lives in `zones`; the strategy reads 30 / 70 by default.
// =============================================================================

use crate::error::Result;

use super::wilder::wilder_step;
use super::{require_len, require_period};

/// Compute the full RSI series for the given `closes` and `period`.
///
/// The returned vector has one RSI value for each close starting at index
/// `period` (the first `period` closes are consumed to seed the averages), so
/// its length is `closes.len() - period`.
///
/// # Errors
/// - `period == 0`
/// - fewer than `period + 1` closes
///
/// If average loss is zero (no down moves, including no movement at all)
/// RSI is 100.
pub fn calculate_rsi(closes: &[f64], period: usize) -> Result<Vec<f64>> {
    require_period("rsi", "period", period)?;
    require_len("rsi", closes.len(), period + 1)?;

    let moves: Vec<(f64, f64)> = closes.windows(2).map(|w| split_move(w[1] - w[0])).collect();
    let (seed, rest) = moves.split_at(period);

    let period_f = period as f64;
    let mut avg_gain = seed.iter().map(|m| m.0).sum::<f64>() / period_f;
    let mut avg_loss = seed.iter().map(|m| m.1).sum::<f64>() / period_f;

    let mut result = Vec::with_capacity(rest.len() + 1);
    result.push(rsi_from_averages(avg_gain, avg_loss));

    for &(gain, loss) in rest {
        avg_gain = wilder_step(avg_gain, gain, period);
        avg_loss = wilder_step(avg_loss, loss, period);
        result.push(rsi_from_averages(avg_gain, avg_loss));
    }

    Ok(result)
}

// =============================================================================
// Internal helpers
// =============================================================================

/// Split a close-to-close move into `(gain, loss)`.  A NaN move poisons both.
fn split_move(delta: f64) -> (f64, f64) {
    if delta.is_nan() {
        (f64::NAN, f64::NAN)
    } else {
        (delta.max(0.0), (-delta).max(0.0))
    }
}

/// Convert average gain / average loss into an RSI value in [0, 100].
///
/// - If average loss is zero, RSI is 100.0, even when there was no movement.
/// - NaN averages give NaN.
fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        100.0
    } else {
        let rs = avg_gain / avg_loss;
        100.0 - 100.0 / (1.0 + rs)
    }
}
