// =============================================================================
// Stochastic RSI
// =============================================================================
//
// Stochastic oscillator applied to RSI instead of price:
//
//   raw_k = 100 * (RSI - min(RSI window)) / (max(RSI window) - min(RSI window))
//   %K    = EMA(raw_k, k_period)
//   %D    = EMA(%K, d_period)
//
// A flat RSI window (max == min) makes raw_k NaN, which then carries through
// both smoothing EMAs.
// =============================================================================

use serde::{Deserialize, Serialize};

use crate::error::Result;

use super::ema::calculate_ema;
use super::rsi::calculate_rsi;
use super::{highest, lowest, require_len, require_period};

/// Smoothed %K and %D series.  `d` is shorter than `k` by `d_period - 1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StochRsi {
    pub k: Vec<f64>,
    pub d: Vec<f64>,
}

/// Compute Stochastic RSI over `closes`.
///
/// Needs `rsi_period + stoch_period + k_period + d_period - 2` closes so that
/// %D has at least one value.
pub fn calculate_stoch_rsi(
    closes: &[f64],
    rsi_period: usize,
    stoch_period: usize,
    k_period: usize,
    d_period: usize,
) -> Result<StochRsi> {
    require_period("stoch_rsi", "rsi_period", rsi_period)?;
    require_period("stoch_rsi", "stoch_period", stoch_period)?;
    require_period("stoch_rsi", "k_period", k_period)?;
    require_period("stoch_rsi", "d_period", d_period)?;
    require_len(
        "stoch_rsi",
        closes.len(),
        rsi_period + stoch_period + k_period + d_period - 2,
    )?;

    let rsi = calculate_rsi(closes, rsi_period)?;
    let raw_k: Vec<f64> = rsi
        .windows(stoch_period)
        .map(|window| {
            let high = highest(window);
            let low = lowest(window);
            let current = window[window.len() - 1];
            if high == low {
                f64::NAN
            } else {
                100.0 * (current - low) / (high - low)
            }
        })
        .collect();

    let k = calculate_ema(&raw_k, k_period)?;
    let d = calculate_ema(&k, d_period)?;
    Ok(StochRsi { k, d })
}
