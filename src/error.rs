// =============================================================================
// Indicator Errors
// =============================================================================
//
// Structural failures only.  Degenerate arithmetic (zero ranges, zero
// denominators) never surfaces here: it is folded into `f64::NAN` for the
// affected step so one bad bar cannot abort a whole batch.

use thiserror::Error;

/// Result type for indicator and strategy operations.
pub type Result<T> = std::result::Result<T, IndicatorError>;

/// Precondition violations raised by the indicator engine and the strategy.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IndicatorError {
    /// The input sequence was empty.
    #[error("{indicator}: input sequence is empty")]
    EmptyInput { indicator: &'static str },

    /// The input sequence is shorter than the indicator's minimum window.
    #[error("{indicator}: need at least {required} values, got {actual}")]
    InsufficientData {
        indicator: &'static str,
        required: usize,
        actual: usize,
    },

    /// A period or multiplier is out of its valid range.
    #[error("{indicator}: invalid parameter '{name}': {reason}")]
    InvalidParameter {
        indicator: &'static str,
        name: &'static str,
        reason: String,
    },

    /// Candle timestamps are not strictly increasing.
    #[error("candle {index} is not later than the candle before it")]
    UnorderedCandles { index: usize },
}
