// =============================================================================
// Candle Sources
// =============================================================================
//
// The market-data provider sits outside the engine.  Anything that can hand
// over a complete, chronologically ordered batch for a (pair, timeframe) can
// implement `CandleSource`; the engine never sees partial batches.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use super::candle::Candle;

/// Supplies one complete candle batch per (pair, timeframe).
pub trait CandleSource {
    fn fetch(&self, pair: &str, timeframe: &str) -> Result<Vec<Candle>>;
}

/// Reads batches from `<dir>/<pair>_<timeframe>.json`, each file holding a
/// JSON array of candles.
#[derive(Debug, Clone)]
pub struct JsonCandleSource {
    dir: PathBuf,
}

impl JsonCandleSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the batch file for the given pair and timeframe.
    pub fn batch_path(&self, pair: &str, timeframe: &str) -> PathBuf {
        self.dir.join(format!("{pair}_{timeframe}.json"))
    }

    fn read_batch(path: &Path) -> Result<Vec<Candle>> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read candles from {}", path.display()))?;
        let candles: Vec<Candle> = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse candles from {}", path.display()))?;
        Ok(candles)
    }
}

impl CandleSource for JsonCandleSource {
    fn fetch(&self, pair: &str, timeframe: &str) -> Result<Vec<Candle>> {
        let path = self.batch_path(pair, timeframe);
        let candles = Self::read_batch(&path)?;
        if candles.is_empty() {
            anyhow::bail!("no candles for {pair}@{timeframe} in {}", path.display());
        }
        debug!(pair, timeframe, count = candles.len(), "candle batch loaded");
        Ok(candles)
    }
}
