// =============================================================================
// Parabolic SAR (Stop And Reverse)
// =============================================================================
//
// Recurrence over {SAR, extreme point, acceleration factor, trend}:
//
//   SAR_t = SAR_{t-1} + AF * (EP - SAR_{t-1})
//
// While long, a new high extends EP and bumps AF by `step` (capped at `max`);
// a low below SAR reverses to short.  Mirror rules apply while short.  On a
// reversal SAR jumps to the extreme of the current bar and up to five bars
// before it (highest high when turning short, lowest low when turning long),
// EP becomes the current bar's extreme and AF resets to `step`.
//
// The series starts long with SAR at the first low and EP at the first high.
// =============================================================================

use serde::{Deserialize, Serialize};

use crate::error::{IndicatorError, Result};
use crate::market_data::{highs, lows, Candle};

use super::{highest, lowest, require_len, require_positive, TrendDirection};

/// Bars before the reversal bar included in the SAR reset.
const REVERSAL_LOOKBACK: usize = 5;

/// One step of the Parabolic SAR series.  Also the carry for the next step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SarPoint {
    pub value: f64,
    pub trend: TrendDirection,
    pub acceleration: f64,
    pub extreme_point: f64,
}

/// Compute the Parabolic SAR, one point per candle.
pub fn calculate_parabolic_sar(candles: &[Candle], step: f64, max: f64) -> Result<Vec<SarPoint>> {
    require_positive("parabolic_sar", "step", step)?;
    require_positive("parabolic_sar", "max", max)?;
    if step > max {
        return Err(IndicatorError::InvalidParameter {
            indicator: "parabolic_sar",
            name: "step",
            reason: format!("step {step} exceeds max {max}"),
        });
    }
    require_len("parabolic_sar", candles.len(), 1)?;

    let highs = highs(candles);
    let lows = lows(candles);

    let mut state = SarPoint {
        value: lows[0],
        trend: TrendDirection::Up,
        acceleration: step,
        extreme_point: highs[0],
    };
    let mut result = Vec::with_capacity(candles.len());
    result.push(state);

    for i in 1..candles.len() {
        let lookback = i.saturating_sub(REVERSAL_LOOKBACK)..=i;
        state.value += state.acceleration * (state.extreme_point - state.value);

        match state.trend {
            TrendDirection::Up if lows[i] < state.value => {
                state.trend = TrendDirection::Down;
                state.value = highest(&highs[lookback]);
                state.extreme_point = lows[i];
                state.acceleration = step;
            }
            TrendDirection::Up => {
                if highs[i] > state.extreme_point {
                    state.extreme_point = highs[i];
                    state.acceleration = (state.acceleration + step).min(max);
                }
            }
            TrendDirection::Down if highs[i] > state.value => {
                state.trend = TrendDirection::Up;
                state.value = lowest(&lows[lookback]);
                state.extreme_point = highs[i];
                state.acceleration = step;
            }
            TrendDirection::Down => {
                if lows[i] < state.extreme_point {
                    state.extreme_point = lows[i];
                    state.acceleration = (state.acceleration + step).min(max);
                }
            }
        }

        result.push(state);
    }

    Ok(result)
}
