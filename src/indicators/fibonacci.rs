// Fibonacci retracement levels measured down from a swing high.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::market_data::Candle;

use super::{highest, lowest, require_len};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FibonacciLevel {
    pub level: f64,
    pub price: f64,
}

/// `price = high - (high - low) * level` for each configured ratio.
pub fn fibonacci_levels(high: f64, low: f64, levels: &[f64]) -> Vec<FibonacciLevel> {
    let diff = high - low;
    levels
        .iter()
        .map(|&level| FibonacciLevel {
            level,
            price: high - diff * level,
        })
        .collect()
}

/// Highest high and lowest low across the batch.
pub fn swing_range(candles: &[Candle]) -> Result<(f64, f64)> {
    require_len("fibonacci", candles.len(), 1)?;
    let high = highest(&candles.iter().map(|c| c.high).collect::<Vec<_>>());
    let low = lowest(&candles.iter().map(|c| c.low).collect::<Vec<_>>());
    Ok((high, low))
}
