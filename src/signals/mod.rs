// =============================================================================
// Signals Module
// =============================================================================
//
// Fuses the latest indicator readings into bullish / bearish scores and a
// threshold decision.

pub mod weighted_score;

pub use weighted_score::{
    Decision, Factor, FactorContribution, ScoringResult, WeightTable, WeightedScorer,
};
