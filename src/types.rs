// =============================================================================
// Shared types produced by the signal strategy
// =============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::indicators::{IndicatorReadings, Zone};
use crate::signals::FactorContribution;

/// Direction of an emitted trade signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SignalSide {
    Buy,
    Sell,
}

impl std::fmt::Display for SignalSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
        }
    }
}

/// Weighted bullish and bearish totals for one batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScorePair {
    pub bullish: f64,
    pub bearish: f64,
}

/// Zone classification of the bounded oscillators at the latest bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OscillatorZones {
    pub rsi: Zone,
    pub stoch_rsi: Zone,
    pub williams_r: Zone,
}

/// Everything the strategy derived from one candle batch.
///
/// Built once per `analyze` call and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSnapshot {
    /// Timestamp of the latest candle in the batch.
    pub timestamp: DateTime<Utc>,
    /// Close of the latest candle.
    pub current_price: f64,
    pub readings: IndicatorReadings,
    pub zones: OscillatorZones,
    pub scores: ScorePair,
    /// Per-factor breakdown of `scores`.
    pub contributions: Vec<FactorContribution>,
    pub stop_loss: f64,
    pub take_profit: f64,
}

/// A directional decision derived from an [`AnalysisSnapshot`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TradeSignal {
    pub side: SignalSide,
    pub entry: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
    /// Winning score divided by the total weight, in `[0, 1]`.
    pub confidence: f64,
    pub timestamp: DateTime<Utc>,
}
