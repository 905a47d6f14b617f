// =============================================================================
// Ichimoku Kinko Hyo
// =============================================================================
//
// Five components, each its own sequence:
//
//   conversion line (tenkan)  = midpoint of the `conversion_period` high/low
//   base line (kijun)         = midpoint of the `base_period` high/low
//   leading span A (senkou A) = (conversion + base) / 2, both read
//                               `displacement` entries back in their own
//                               sequences
//   leading span B (senkou B) = midpoint of the `span_period` high/low
//   lagging span (chikou)     = close, present only while a close exists
//                               `displacement` bars later
//
// The sequences start at different candles and have different lengths.
// =============================================================================

use serde::{Deserialize, Serialize};

use crate::error::{IndicatorError, Result};
use crate::market_data::{highs, lows, Candle};

use super::{highest, lowest, require_len, require_period};

/// All five Ichimoku components for one batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IchimokuCloud {
    pub conversion_line: Vec<f64>,
    pub base_line: Vec<f64>,
    pub leading_span_a: Vec<f64>,
    pub leading_span_b: Vec<f64>,
    /// One entry per candle; `None` beyond the displacement horizon.
    pub lagging_span: Vec<Option<f64>>,
}

/// Compute the Ichimoku components.
///
/// Requires `conversion_period <= base_period <= span_period` and at least
/// `span_period` candles.
pub fn calculate_ichimoku(
    candles: &[Candle],
    conversion_period: usize,
    base_period: usize,
    span_period: usize,
    displacement: usize,
) -> Result<IchimokuCloud> {
    require_period("ichimoku", "conversion_period", conversion_period)?;
    require_period("ichimoku", "base_period", base_period)?;
    require_period("ichimoku", "span_period", span_period)?;
    require_period("ichimoku", "displacement", displacement)?;
    if conversion_period > base_period || base_period > span_period {
        return Err(IndicatorError::InvalidParameter {
            indicator: "ichimoku",
            name: "base_period",
            reason: format!(
                "periods must satisfy conversion <= base <= span, got {conversion_period}/{base_period}/{span_period}"
            ),
        });
    }
    require_len("ichimoku", candles.len(), span_period)?;

    let highs = highs(candles);
    let lows = lows(candles);
    let midpoint = |end: usize, period: usize| {
        let start = end + 1 - period;
        (highest(&highs[start..=end]) + lowest(&lows[start..=end])) / 2.0
    };

    let mut conversion_line = Vec::with_capacity(candles.len() - conversion_period + 1);
    let mut base_line = Vec::with_capacity(candles.len() - base_period + 1);
    let mut leading_span_a = Vec::new();
    let mut leading_span_b = Vec::with_capacity(candles.len() - span_period + 1);

    for i in conversion_period - 1..candles.len() {
        conversion_line.push(midpoint(i, conversion_period));

        if i + 1 >= base_period {
            base_line.push(midpoint(i, base_period));

            if conversion_line.len() >= displacement && base_line.len() >= displacement {
                let conversion = conversion_line[conversion_line.len() - displacement];
                let base = base_line[base_line.len() - displacement];
                leading_span_a.push((conversion + base) / 2.0);
            }
        }

        if i + 1 >= span_period {
            leading_span_b.push(midpoint(i, span_period));
        }
    }

    let len = candles.len();
    let lagging_span = candles
        .iter()
        .enumerate()
        .map(|(i, c)| (i + displacement < len).then_some(c.close))
        .collect();

    Ok(IchimokuCloud {
        conversion_line,
        base_line,
        leading_span_a,
        leading_span_b,
        lagging_span,
    })
}
