// =============================================================================
// Exponential Moving Average (EMA)
// =============================================================================
//
// EMA gives more weight to recent prices, making it more responsive to new
// information than the Simple Moving Average (SMA).
//
// Formula:
//   multiplier = 2 / (period + 1)
//   EMA_t      = close_t * multiplier + EMA_{t-1} * (1 - multiplier)
//
// The very first EMA value is seeded with the SMA of the first `period` closes.
// =============================================================================

use serde::{Deserialize, Serialize};

use crate::error::{IndicatorError, Result};

use super::{require_len, require_period};

/// Compute the EMA series for the given `values` slice and look-back `period`.
///
/// Each output element corresponds to an input starting at index
/// `period - 1`, so the output length is `values.len() - period + 1`.
///
/// # Errors
/// - `period == 0`
/// - `values` is empty or shorter than `period`
///
/// Non-finite inputs are not skipped: a NaN carries forward through every
/// later element so the series stays aligned.
pub fn calculate_ema(values: &[f64], period: usize) -> Result<Vec<f64>> {
    require_period("ema", "period", period)?;
    require_len("ema", values.len(), period)?;

    let multiplier = 2.0 / (period + 1) as f64;

    // Seed: SMA of the first `period` values.
    let sma: f64 = values[..period].iter().sum::<f64>() / period as f64;

    let mut result = Vec::with_capacity(values.len() - period + 1);
    result.push(sma);

    let mut prev_ema = sma;
    for &value in &values[period..] {
        prev_ema = value * multiplier + prev_ema * (1.0 - multiplier);
        result.push(prev_ema);
    }

    Ok(result)
}

/// Short and long EMA series over the same closes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmaPair {
    pub short: Vec<f64>,
    pub long: Vec<f64>,
}

/// Compute the short/long EMA pair used for the crossover rule.
///
/// Returns an error when `short >= long` since the pair would not describe a
/// crossover.
pub fn calculate_ema_pair(closes: &[f64], short: usize, long: usize) -> Result<EmaPair> {
    if short >= long {
        return Err(IndicatorError::InvalidParameter {
            indicator: "ema",
            name: "short",
            reason: format!("short period {short} must be below long period {long}"),
        });
    }
    Ok(EmaPair {
        short: calculate_ema(closes, short)?,
        long: calculate_ema(closes, long)?,
    })
}
