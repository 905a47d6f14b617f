// =============================================================================
// Bollinger Bands
// =============================================================================
//
// Bollinger Bands consist of a middle band (SMA), an upper band (SMA + k*σ),
// and a lower band (SMA - k*σ), σ being the population standard deviation of
// the window.  The Band Width (BBW) is the normalised distance:
// BBW = (upper - lower) / middle * 100.

use serde::{Deserialize, Serialize};

use crate::error::Result;

use super::{require_len, require_period, require_positive};

/// One step of the Bollinger series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BollingerBand {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
    /// NaN when the middle band is zero.
    pub width: f64,
}

/// Calculate Bollinger Bands for every full window of `closes`.
///
/// The output length is `closes.len() - period + 1`; element `i` describes
/// the window ending at close `i + period - 1`.
pub fn calculate_bollinger(closes: &[f64], period: usize, num_std: f64) -> Result<Vec<BollingerBand>> {
    require_period("bollinger", "period", period)?;
    require_positive("bollinger", "std_dev", num_std)?;
    require_len("bollinger", closes.len(), period)?;

    let period_f = period as f64;
    let bands = closes
        .windows(period)
        .map(|window| {
            let middle = window.iter().sum::<f64>() / period_f;
            let variance = window.iter().map(|x| (x - middle).powi(2)).sum::<f64>() / period_f;
            let std_dev = variance.sqrt();

            let upper = middle + num_std * std_dev;
            let lower = middle - num_std * std_dev;
            let width = if middle == 0.0 {
                f64::NAN
            } else {
                (upper - lower) / middle * 100.0
            };

            BollingerBand {
                upper,
                middle,
                lower,
                width,
            }
        })
        .collect();

    Ok(bands)
}
