// =============================================================================
// Keltner Channels
// =============================================================================
//
//   middle = EMA(close, period)
//   upper  = middle + ATR * multiplier
//   lower  = middle - ATR * multiplier
//
// EMA and ATR are paired by position in their own output sequences, not by
// candle.  The EMA series sets the output length; past the end of the ATR
// series the last ATR value is reused.
// =============================================================================

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::market_data::{closes, Candle};

use super::atr::calculate_atr;
use super::ema::calculate_ema;
use super::{require_len, require_period, require_positive};

/// One step of the Keltner series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KeltnerChannel {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

/// Compute Keltner channels over `candles`.
pub fn calculate_keltner(
    candles: &[Candle],
    period: usize,
    atr_period: usize,
    multiplier: f64,
) -> Result<Vec<KeltnerChannel>> {
    require_period("keltner", "period", period)?;
    require_period("keltner", "atr_period", atr_period)?;
    require_positive("keltner", "atr_multiplier", multiplier)?;
    require_len("keltner", candles.len(), period.max(atr_period + 1))?;

    let ema = calculate_ema(&closes(candles), period)?;
    let atr = calculate_atr(candles, atr_period)?;
    // calculate_atr never returns an empty series on success.
    let last_atr = atr.last().copied().unwrap_or(f64::NAN);

    let channels = ema
        .iter()
        .enumerate()
        .map(|(i, &middle)| {
            let band = atr.get(i).copied().unwrap_or(last_atr) * multiplier;
            KeltnerChannel {
                upper: middle + band,
                middle,
                lower: middle - band,
            }
        })
        .collect();

    Ok(channels)
}
