use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{IndicatorError, Result};

// ---------------------------------------------------------------------------
// Data types
// ---------------------------------------------------------------------------

/// A single OHLCV bar.
///
/// On the wire the timestamp is epoch milliseconds.  The market-data
/// provider's short keys (`t`, `o`, `h`, `l`, `c`, `v`) are accepted as
/// aliases so raw provider dumps deserialize without a mapping step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    #[serde(with = "chrono::serde::ts_milliseconds", alias = "t")]
    pub timestamp: DateTime<Utc>,
    #[serde(alias = "o")]
    pub open: f64,
    #[serde(alias = "h")]
    pub high: f64,
    #[serde(alias = "l")]
    pub low: f64,
    #[serde(alias = "c")]
    pub close: f64,
    #[serde(alias = "v")]
    pub volume: f64,
}

impl Candle {
    pub fn new(
        timestamp: DateTime<Utc>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// `(high + low + close) / 3`.
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }

    /// `(high + low) / 2`.
    pub fn midpoint(&self) -> f64 {
        (self.high + self.low) / 2.0
    }

    /// `high - low`.
    pub fn spread(&self) -> f64 {
        self.high - self.low
    }
}

// ---------------------------------------------------------------------------
// Series helpers
// ---------------------------------------------------------------------------

/// Close prices in candle order.
pub fn closes(candles: &[Candle]) -> Vec<f64> {
    candles.iter().map(|c| c.close).collect()
}

/// High prices in candle order.
pub fn highs(candles: &[Candle]) -> Vec<f64> {
    candles.iter().map(|c| c.high).collect()
}

/// Low prices in candle order.
pub fn lows(candles: &[Candle]) -> Vec<f64> {
    candles.iter().map(|c| c.low).collect()
}

/// Reject batches whose timestamps are not strictly increasing.
pub fn ensure_chronological(candles: &[Candle]) -> Result<()> {
    match candles
        .windows(2)
        .position(|pair| pair[1].timestamp <= pair[0].timestamp)
    {
        Some(i) => Err(IndicatorError::UnorderedCandles { index: i + 1 }),
        None => Ok(()),
    }
}
