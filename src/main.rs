// =============================================================================
// Confluence Signals — Main Entry Point
// =============================================================================
//
// One-shot runner: loads the configuration, pulls one candle batch per
// configured timeframe from the candle source, analyses each batch and logs
// the outcome.  A failing timeframe is reported and skipped; the others still
// run.
// =============================================================================

use anyhow::Context;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use confluence_signals::{
    AnalysisSnapshot, AppConfig, CandleSource, JsonCandleSource, SignalStrategy, TradeSignal,
};

fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Confluence Signals — starting");

    let config_path =
        std::env::var("SIGNAL_CONFIG").unwrap_or_else(|_| "signal_config.json".to_string());
    let mut config = AppConfig::load(&config_path).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    });

    // Override timeframes from env if available.
    if let Ok(timeframes) = std::env::var("SIGNAL_TIMEFRAMES") {
        config.timeframes = timeframes
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
    }

    config.validate().context("invalid configuration")?;

    let candles_dir = std::env::var("SIGNAL_CANDLES_DIR").unwrap_or_else(|_| "candles".to_string());
    let source = JsonCandleSource::new(&candles_dir);
    let strategy = SignalStrategy::from_config(&config);

    info!(
        pair = %config.pair,
        timeframes = ?config.timeframes,
        candles_dir = %candles_dir,
        min_candles = strategy.min_candles(),
        "configuration ready"
    );

    // ── 2. Evaluate every timeframe independently ────────────────────────
    let mut failed = 0usize;
    let mut signals = 0usize;

    for timeframe in &config.timeframes {
        match run_timeframe(&source, &strategy, &config.pair, timeframe) {
            Ok((snapshot, signal)) => {
                info!(
                    pair = %config.pair,
                    timeframe = %timeframe,
                    price = snapshot.current_price,
                    bullish = snapshot.scores.bullish,
                    bearish = snapshot.scores.bearish,
                    rsi = snapshot.readings.rsi,
                    rsi_zone = %snapshot.zones.rsi,
                    atr = snapshot.readings.atr,
                    "timeframe analysed"
                );

                if let Some(signal) = signal {
                    signals += 1;
                    info!(
                        pair = %config.pair,
                        timeframe = %timeframe,
                        side = %signal.side,
                        entry = signal.entry,
                        stop_loss = signal.stop_loss,
                        take_profit = signal.take_profit,
                        confidence = signal.confidence,
                        "trade signal generated"
                    );
                }
            }
            Err(e) => {
                failed += 1;
                let message = format!("{e:#}");
                error!(pair = %config.pair, timeframe = %timeframe, error = %message, "timeframe failed");
            }
        }
    }

    info!(
        timeframes = config.timeframes.len(),
        signals,
        failed,
        "run complete"
    );

    Ok(())
}

/// Fetch, analyse and decide for a single timeframe.
fn run_timeframe(
    source: &impl CandleSource,
    strategy: &SignalStrategy,
    pair: &str,
    timeframe: &str,
) -> anyhow::Result<(AnalysisSnapshot, Option<TradeSignal>)> {
    let candles = source
        .fetch(pair, timeframe)
        .with_context(|| format!("failed to fetch candles for {pair}@{timeframe}"))?;

    let snapshot = strategy
        .analyze(&candles)
        .with_context(|| format!("failed to analyse {} candles for {pair}@{timeframe}", candles.len()))?;

    if let Ok(json) = serde_json::to_string(&snapshot) {
        debug!(timeframe, snapshot = %json, "analysis snapshot");
    }

    let signal = strategy.generate_signal(&snapshot);
    Ok((snapshot, signal))
}
