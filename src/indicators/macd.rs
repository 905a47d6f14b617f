// =============================================================================
// Moving Average Convergence Divergence (MACD)
// =============================================================================
//
//   MACD line = EMA(fast) - EMA(slow)
//   signal    = EMA(signal_period) of the MACD line
//   histogram = MACD line - signal
//
// The line starts once the slow EMA is seeded.  The signal (and therefore the
// histogram) stays absent for the first `signal_period - 1` line values.
// =============================================================================

use serde::{Deserialize, Serialize};

use crate::error::{IndicatorError, Result};

use super::ema::calculate_ema;
use super::{require_len, require_period};

/// One step of the MACD series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacdPoint {
    pub macd: f64,
    pub signal: Option<f64>,
    pub histogram: Option<f64>,
}

impl MacdPoint {
    /// MACD line above its signal.  False while the signal is still warming up.
    pub fn is_above_signal(&self) -> bool {
        self.signal.map_or(false, |s| self.macd > s)
    }

    /// MACD line below its signal.  False while the signal is still warming up.
    pub fn is_below_signal(&self) -> bool {
        self.signal.map_or(false, |s| self.macd < s)
    }
}

/// Compute the MACD series.
///
/// Output length is `closes.len() - slow + 1`; element `i` lines up with close
/// `i + slow - 1`.
pub fn calculate_macd(closes: &[f64], fast: usize, slow: usize, signal_period: usize) -> Result<Vec<MacdPoint>> {
    require_period("macd", "fast_period", fast)?;
    require_period("macd", "slow_period", slow)?;
    require_period("macd", "signal_period", signal_period)?;
    if fast >= slow {
        return Err(IndicatorError::InvalidParameter {
            indicator: "macd",
            name: "fast_period",
            reason: format!("fast period {fast} must be below slow period {slow}"),
        });
    }
    require_len("macd", closes.len(), slow)?;

    let fast_ema = calculate_ema(closes, fast)?;
    let slow_ema = calculate_ema(closes, slow)?;

    // fast_ema[k] lines up with close k + fast - 1, slow_ema[k] with k + slow - 1.
    let offset = slow - fast;
    let line: Vec<f64> = slow_ema
        .iter()
        .enumerate()
        .map(|(i, &s)| fast_ema[i + offset] - s)
        .collect();

    let signal = if line.len() >= signal_period {
        calculate_ema(&line, signal_period)?
    } else {
        Vec::new()
    };

    let points = line
        .iter()
        .enumerate()
        .map(|(i, &macd)| {
            let signal = (i + 1)
                .checked_sub(signal_period)
                .and_then(|j| signal.get(j).copied());
            MacdPoint {
                macd,
                signal,
                histogram: signal.map(|s| macd - s),
            }
        })
        .collect();

    Ok(points)
}
