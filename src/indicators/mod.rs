// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free implementations of every indicator the strategy
// consumes.  Each public function validates its window up front and returns
// `Result`, so an empty or too-short batch fails fast.  Arithmetic that
// degenerates inside a valid window (zero range, zero volume) yields NaN for
// that step instead of an error.

pub mod adx;
pub mod atr;
pub mod bollinger;
pub mod ema;
pub mod fibonacci;
pub mod ichimoku;
pub mod keltner;
pub mod macd;
pub mod parabolic_sar;
pub mod rsi;
pub mod set;
pub mod stoch_rsi;
pub mod supertrend;
pub mod vsa;
pub mod vwap;
pub mod wilder;
pub mod williams_r;
pub mod zones;

pub use set::{IndicatorReadings, IndicatorSet};
pub use zones::{Thresholds, Zone};

use serde::{Deserialize, Serialize};

use crate::error::{IndicatorError, Result};

/// Trend polarity shared by Supertrend and Parabolic SAR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendDirection {
    Up,
    Down,
}

impl TrendDirection {
    /// `+1` for an up-trend, `-1` for a down-trend.
    pub fn sign(self) -> i8 {
        match self {
            Self::Up => 1,
            Self::Down => -1,
        }
    }
}

// =============================================================================
// Internal helpers
// =============================================================================

pub(crate) fn require_period(indicator: &'static str, name: &'static str, period: usize) -> Result<()> {
    if period == 0 {
        return Err(IndicatorError::InvalidParameter {
            indicator,
            name,
            reason: "must be at least 1".to_string(),
        });
    }
    Ok(())
}

pub(crate) fn require_positive(indicator: &'static str, name: &'static str, value: f64) -> Result<()> {
    if !(value.is_finite() && value > 0.0) {
        return Err(IndicatorError::InvalidParameter {
            indicator,
            name,
            reason: format!("must be a positive finite number, got {value}"),
        });
    }
    Ok(())
}

pub(crate) fn require_len(indicator: &'static str, actual: usize, required: usize) -> Result<()> {
    if actual == 0 {
        return Err(IndicatorError::EmptyInput { indicator });
    }
    if actual < required {
        return Err(IndicatorError::InsufficientData {
            indicator,
            required,
            actual,
        });
    }
    Ok(())
}

/// Largest value in `window`.  NaN entries are ignored.
pub(crate) fn highest(window: &[f64]) -> f64 {
    window.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

/// Smallest value in `window`.  NaN entries are ignored.
pub(crate) fn lowest(window: &[f64]) -> f64 {
    window.iter().copied().fold(f64::INFINITY, f64::min)
}
