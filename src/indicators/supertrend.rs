// =============================================================================
// Supertrend
// =============================================================================
//
// Single left-to-right pass over the candles:
//
//   basic_upper = (H + L) / 2 + multiplier * ATR
//   basic_lower = (H + L) / 2 - multiplier * ATR
//
// The final bands ratchet: the upper band may only move down and the lower
// band only up, unless the previous close broke through the previous band,
// in which case the basic band is taken as-is.  The active line flips to the
// other band when the close crosses it.  Direction is Up while the lower band
// is active.
//
// ATR is read at the candle index, falling back to the last ATR value past
// the end of the ATR series.  Candles before `period` produce no entry.
// =============================================================================

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::market_data::Candle;

use super::atr::calculate_atr;
use super::{require_len, require_period, require_positive, TrendDirection};

/// One step of the Supertrend series.  Also the carry for the next step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SupertrendPoint {
    pub upper: f64,
    pub lower: f64,
    /// The active band.
    pub value: f64,
    pub direction: TrendDirection,
}

impl SupertrendPoint {
    fn seed(close: f64, basic_upper: f64, basic_lower: f64) -> Self {
        let direction = if close > basic_upper {
            TrendDirection::Up
        } else {
            TrendDirection::Down
        };
        Self::with_active(basic_upper, basic_lower, direction)
    }

    fn advance(&self, close: f64, prev_close: f64, basic_upper: f64, basic_lower: f64) -> Self {
        let upper = if basic_upper < self.upper || prev_close > self.upper {
            basic_upper
        } else {
            self.upper
        };
        let lower = if basic_lower > self.lower || prev_close < self.lower {
            basic_lower
        } else {
            self.lower
        };

        let direction = match self.direction {
            TrendDirection::Down if close < upper => TrendDirection::Down,
            TrendDirection::Down => TrendDirection::Up,
            TrendDirection::Up if close > lower => TrendDirection::Up,
            TrendDirection::Up => TrendDirection::Down,
        };
        Self::with_active(upper, lower, direction)
    }

    fn with_active(upper: f64, lower: f64, direction: TrendDirection) -> Self {
        let value = match direction {
            TrendDirection::Up => lower,
            TrendDirection::Down => upper,
        };
        Self {
            upper,
            lower,
            value,
            direction,
        }
    }
}

/// Compute the Supertrend series.
///
/// Output length is `candles.len() - period`; element `i` belongs to candle
/// `i + period`.
pub fn calculate_supertrend(
    candles: &[Candle],
    period: usize,
    atr_period: usize,
    multiplier: f64,
) -> Result<Vec<SupertrendPoint>> {
    require_period("supertrend", "period", period)?;
    require_period("supertrend", "atr_period", atr_period)?;
    require_positive("supertrend", "multiplier", multiplier)?;
    require_len("supertrend", candles.len(), period.max(atr_period) + 1)?;

    let atr = calculate_atr(candles, atr_period)?;
    let last_atr = atr.last().copied().unwrap_or(f64::NAN);

    let mut result: Vec<SupertrendPoint> = Vec::with_capacity(candles.len() - period);
    for i in period..candles.len() {
        let bar = &candles[i];
        let band = multiplier * atr.get(i).copied().unwrap_or(last_atr);
        let basic_upper = bar.midpoint() + band;
        let basic_lower = bar.midpoint() - band;

        let point = match result.last() {
            None => SupertrendPoint::seed(bar.close, basic_upper, basic_lower),
            Some(prev) => prev.advance(bar.close, candles[i - 1].close, basic_upper, basic_lower),
        };
        result.push(point);
    }

    Ok(result)
}
