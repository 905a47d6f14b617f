// =============================================================================
// Average Directional Index (ADX)
// =============================================================================
//
// ADX quantifies trend **strength** regardless of direction.
//
// Calculation pipeline:
//   1. Compute +DM (positive directional movement) and -DM per bar.
//   2. Compute True Range (TR) per bar.
//   3. Apply Wilder's smoothing (period) to +DM, -DM, and TR.
//   4. Derive +DI = smoothed(+DM) / smoothed(TR) * 100
//            -DI = smoothed(-DM) / smoothed(TR) * 100
//   5. DX  = |+DI - -DI| / (+DI + -DI) * 100
//   6. ADX = Wilder's smoothed DX.
//
// Every series starts at the second candle (the first has no predecessor).
// A zero smoothed TR or a zero DI sum makes that step NaN, and the NaN then
// carries through the ADX smoothing.
//
// Interpretation:
//   ADX > 25  => trending market
//   ADX < 20  => ranging / choppy market
// =============================================================================

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::market_data::Candle;

use super::atr::bar_true_range;
use super::wilder::wilder_smooth;
use super::{require_len, require_period};

/// ADX together with the directional indicators it is built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdxSeries {
    pub adx: Vec<f64>,
    pub plus_di: Vec<f64>,
    pub minus_di: Vec<f64>,
}

/// Compute ADX, +DI and -DI.
///
/// Needs `period + 1` candles.  Each output series has `candles.len() - 1`
/// elements; element `i` belongs to candle `i + 1`.
pub fn calculate_adx(candles: &[Candle], period: usize) -> Result<AdxSeries> {
    require_period("adx", "period", period)?;
    require_len("adx", candles.len(), period + 1)?;

    // ------------------------------------------------------------------
    // Step 1 & 2: Raw +DM, -DM, and True Range for each consecutive pair
    // ------------------------------------------------------------------
    let bar_count = candles.len() - 1;
    let mut plus_dm = Vec::with_capacity(bar_count);
    let mut minus_dm = Vec::with_capacity(bar_count);
    let mut tr_vals = Vec::with_capacity(bar_count);

    for pair in candles.windows(2) {
        let (prev, bar) = (&pair[0], &pair[1]);

        let up_move = bar.high - prev.high;
        let down_move = prev.low - bar.low;

        plus_dm.push(if up_move > down_move && up_move > 0.0 { up_move } else { 0.0 });
        minus_dm.push(if down_move > up_move && down_move > 0.0 { down_move } else { 0.0 });
        tr_vals.push(bar_true_range(bar, prev.close));
    }

    // ------------------------------------------------------------------
    // Step 3 & 4: Wilder's smoothing, then directional indicators
    // ------------------------------------------------------------------
    let smooth_tr = wilder_smooth(&tr_vals, period)?;
    let smooth_plus_dm = wilder_smooth(&plus_dm, period)?;
    let smooth_minus_dm = wilder_smooth(&minus_dm, period)?;

    let plus_di: Vec<f64> = smooth_plus_dm
        .iter()
        .zip(&smooth_tr)
        .map(|(&dm, &tr)| directional_index(dm, tr))
        .collect();
    let minus_di: Vec<f64> = smooth_minus_dm
        .iter()
        .zip(&smooth_tr)
        .map(|(&dm, &tr)| directional_index(dm, tr))
        .collect();

    // ------------------------------------------------------------------
    // Step 5 & 6: DX, then ADX
    // ------------------------------------------------------------------
    let dx: Vec<f64> = plus_di
        .iter()
        .zip(&minus_di)
        .map(|(&plus, &minus)| compute_dx(plus, minus))
        .collect();
    let adx = wilder_smooth(&dx, period)?;

    Ok(AdxSeries {
        adx,
        plus_di,
        minus_di,
    })
}

// =============================================================================
// Internal helpers
// =============================================================================

/// `100 * dm / tr`, NaN when the smoothed true range is zero.
fn directional_index(smooth_dm: f64, smooth_tr: f64) -> f64 {
    if smooth_tr == 0.0 {
        return f64::NAN;
    }
    100.0 * smooth_dm / smooth_tr
}

/// DX from +DI and -DI, NaN when both are zero (no directional movement).
fn compute_dx(plus_di: f64, minus_di: f64) -> f64 {
    let di_sum = plus_di + minus_di;
    if di_sum == 0.0 {
        return f64::NAN;
    }
    100.0 * (plus_di - minus_di).abs() / di_sum
}
