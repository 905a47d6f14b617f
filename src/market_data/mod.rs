// =============================================================================
// Market Data Module
// =============================================================================

pub mod candle;
pub mod source;

pub use candle::{closes, ensure_chronological, highs, lows, Candle};
pub use source::{CandleSource, JsonCandleSource};
