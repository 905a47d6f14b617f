// =============================================================================
// Wilder Smoothing
// =============================================================================
//
// Exponential smoothing with weight 1/period on the newest value:
//   result_0 = values_0
//   result_t = values_t / period + result_{t-1} * (period - 1) / period
//
// evaluated as `prev + (value - prev) / period`, which keeps every step
// within the range of its two inputs.
//
// ATR seeds its recurrence differently (SMA of the first window) but shares
// the same step function.
// =============================================================================

use crate::error::Result;

use super::{require_len, require_period};

/// One step of Wilder's recurrence.
#[inline]
pub fn wilder_step(prev: f64, value: f64, period: usize) -> f64 {
    let period_f = period as f64;
    prev + (value - prev) / period_f
}

/// Wilder-smooth `values`, seeding with the first element.
///
/// The output has the same length as the input.  A NaN entry poisons every
/// later element.
pub fn wilder_smooth(values: &[f64], period: usize) -> Result<Vec<f64>> {
    require_period("wilder", "period", period)?;
    require_len("wilder", values.len(), 1)?;

    let mut result = Vec::with_capacity(values.len());
    let mut prev = values[0];
    result.push(prev);
    for &value in &values[1..] {
        prev = wilder_step(prev, value, period);
        result.push(prev);
    }
    Ok(result)
}
