// =============================================================================
// Williams %R
// =============================================================================
//
//   %R = (highest_high - close) / (highest_high - lowest_low) * -100
//
// over a rolling `period` window.  Lives in [-100, 0]; NaN when the window
// has no range.

use crate::error::Result;
use crate::market_data::{highs, lows, Candle};

use super::{highest, lowest, require_len, require_period};

/// Williams %R for every full window.  Output length `candles.len() - period + 1`.
pub fn calculate_williams_r(candles: &[Candle], period: usize) -> Result<Vec<f64>> {
    require_period("williams_r", "period", period)?;
    require_len("williams_r", candles.len(), period)?;

    let highs = highs(candles);
    let lows = lows(candles);

    let values = (period - 1..candles.len())
        .map(|end| {
            let start = end + 1 - period;
            let highest_high = highest(&highs[start..=end]);
            let lowest_low = lowest(&lows[start..=end]);
            let close = candles[end].close;
            if highest_high == lowest_low {
                f64::NAN
            } else {
                (highest_high - close) / (highest_high - lowest_low) * -100.0
            }
        })
        .collect();

    Ok(values)
}
