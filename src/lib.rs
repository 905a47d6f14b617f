// =============================================================================
// Confluence Signals — technical indicator engine and weighted signal strategy
// =============================================================================
//
// Computes a battery of indicators over one ordered candle batch, scores the
// latest readings for bullish / bearish confluence and turns the scores into
// an optional BUY / SELL signal with ATR-based exits.
// =============================================================================

pub mod config;
pub mod error;
pub mod indicators;
pub mod market_data;
pub mod signals;
pub mod strategy;
pub mod types;

pub use config::AppConfig;
pub use error::{IndicatorError, Result};
pub use market_data::{Candle, CandleSource, JsonCandleSource};
pub use strategy::SignalStrategy;
pub use types::{AnalysisSnapshot, SignalSide, TradeSignal};
