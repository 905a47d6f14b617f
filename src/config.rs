// =============================================================================
// Configuration — per-indicator parameters and strategy settings
// =============================================================================
//
// Read once at startup and handed to the strategy by value; nothing in the
// engine mutates it afterwards.
//
// All fields carry serde defaults so that a partial (or empty) JSON file
// loads cleanly, with missing values falling back to the stock settings.
// =============================================================================

use std::path::Path;

use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::indicators::Thresholds;
use crate::signals::WeightTable;

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_pair() -> String {
    "XAUUSD".to_string()
}

fn default_timeframes() -> Vec<String> {
    ["1", "2", "5", "10", "15"].iter().map(|s| s.to_string()).collect()
}

fn default_min_weight_ratio() -> f64 {
    0.6
}

fn default_stop_loss_atr_multiplier() -> f64 {
    2.0
}

fn default_take_profit_atr_multiplier() -> f64 {
    3.0
}

// =============================================================================
// Indicator parameters
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmaConfig {
    pub short: usize,
    pub long: usize,
}

impl Default for EmaConfig {
    fn default() -> Self {
        Self { short: 5, long: 20 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RsiConfig {
    pub period: usize,
    pub overbought: f64,
    pub oversold: f64,
}

impl Default for RsiConfig {
    fn default() -> Self {
        Self {
            period: 14,
            overbought: 70.0,
            oversold: 30.0,
        }
    }
}

impl RsiConfig {
    pub fn thresholds(&self) -> Thresholds {
        Thresholds::new(self.oversold, self.overbought)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BollingerConfig {
    pub period: usize,
    pub std_dev: f64,
}

impl Default for BollingerConfig {
    fn default() -> Self {
        Self {
            period: 20,
            std_dev: 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MacdConfig {
    pub fast_period: usize,
    pub slow_period: usize,
    pub signal_period: usize,
}

impl Default for MacdConfig {
    fn default() -> Self {
        Self {
            fast_period: 3,
            slow_period: 8,
            signal_period: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AtrConfig {
    pub period: usize,
}

impl Default for AtrConfig {
    fn default() -> Self {
        Self { period: 5 }
    }
}

/// Keltner's ATR comes from [`AtrConfig`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeltnerConfig {
    pub period: usize,
    pub atr_multiplier: f64,
}

impl Default for KeltnerConfig {
    fn default() -> Self {
        Self {
            period: 20,
            atr_multiplier: 2.0,
        }
    }
}

/// Supertrend's ATR comes from [`AtrConfig`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SupertrendConfig {
    pub period: usize,
    pub multiplier: f64,
}

impl Default for SupertrendConfig {
    fn default() -> Self {
        Self {
            period: 10,
            multiplier: 3.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IchimokuConfig {
    pub conversion_period: usize,
    pub base_period: usize,
    pub span_period: usize,
    pub displacement: usize,
}

impl Default for IchimokuConfig {
    fn default() -> Self {
        Self {
            conversion_period: 9,
            base_period: 26,
            span_period: 52,
            displacement: 26,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParabolicSarConfig {
    pub step: f64,
    pub max: f64,
}

impl Default for ParabolicSarConfig {
    fn default() -> Self {
        Self {
            step: 0.02,
            max: 0.2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FibonacciConfig {
    pub levels: Vec<f64>,
}

impl Default for FibonacciConfig {
    fn default() -> Self {
        Self {
            levels: vec![0.236, 0.382, 0.618],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdxConfig {
    pub period: usize,
}

impl Default for AdxConfig {
    fn default() -> Self {
        Self { period: 14 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StochRsiConfig {
    pub rsi_period: usize,
    pub stoch_period: usize,
    pub k_period: usize,
    pub d_period: usize,
    pub overbought: f64,
    pub oversold: f64,
}

impl Default for StochRsiConfig {
    fn default() -> Self {
        Self {
            rsi_period: 14,
            stoch_period: 14,
            k_period: 3,
            d_period: 3,
            overbought: 80.0,
            oversold: 20.0,
        }
    }
}

impl StochRsiConfig {
    pub fn thresholds(&self) -> Thresholds {
        Thresholds::new(self.oversold, self.overbought)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WilliamsRConfig {
    pub period: usize,
    pub overbought: f64,
    pub oversold: f64,
}

impl Default for WilliamsRConfig {
    fn default() -> Self {
        Self {
            period: 14,
            overbought: -20.0,
            oversold: -80.0,
        }
    }
}

impl WilliamsRConfig {
    pub fn thresholds(&self) -> Thresholds {
        Thresholds::new(self.oversold, self.overbought)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VsaConfig {
    pub volume_period: usize,
}

impl Default for VsaConfig {
    fn default() -> Self {
        Self { volume_period: 20 }
    }
}

/// Parameters for every indicator the engine computes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorConfig {
    pub ema: EmaConfig,
    pub rsi: RsiConfig,
    pub bollinger: BollingerConfig,
    pub macd: MacdConfig,
    pub atr: AtrConfig,
    pub keltner: KeltnerConfig,
    pub supertrend: SupertrendConfig,
    pub ichimoku: IchimokuConfig,
    pub parabolic_sar: ParabolicSarConfig,
    pub fibonacci: FibonacciConfig,
    pub adx: AdxConfig,
    pub stoch_rsi: StochRsiConfig,
    pub williams_r: WilliamsRConfig,
    pub vsa: VsaConfig,
}

impl IndicatorConfig {
    /// Shortest batch that satisfies every indicator's warm-up.
    pub fn min_candles(&self) -> usize {
        let stoch = &self.stoch_rsi;
        [
            self.ema.long,
            self.rsi.period + 1,
            self.bollinger.period,
            self.macd.slow_period,
            self.atr.period + 1,
            self.keltner.period.max(self.atr.period + 1),
            self.supertrend.period.max(self.atr.period) + 1,
            self.ichimoku.span_period,
            self.adx.period + 1,
            (stoch.rsi_period + stoch.stoch_period + stoch.k_period + stoch.d_period).saturating_sub(2),
            self.williams_r.period,
            self.vsa.volume_period,
        ]
        .into_iter()
        .max()
        .unwrap_or(1)
    }

    pub fn validate(&self) -> Result<()> {
        let periods = [
            ("ema.short", self.ema.short),
            ("rsi.period", self.rsi.period),
            ("bollinger.period", self.bollinger.period),
            ("macd.fast_period", self.macd.fast_period),
            ("macd.signal_period", self.macd.signal_period),
            ("atr.period", self.atr.period),
            ("keltner.period", self.keltner.period),
            ("supertrend.period", self.supertrend.period),
            ("ichimoku.conversion_period", self.ichimoku.conversion_period),
            ("ichimoku.displacement", self.ichimoku.displacement),
            ("adx.period", self.adx.period),
            ("stoch_rsi.rsi_period", self.stoch_rsi.rsi_period),
            ("stoch_rsi.stoch_period", self.stoch_rsi.stoch_period),
            ("stoch_rsi.k_period", self.stoch_rsi.k_period),
            ("stoch_rsi.d_period", self.stoch_rsi.d_period),
            ("williams_r.period", self.williams_r.period),
            ("vsa.volume_period", self.vsa.volume_period),
        ];
        for (name, period) in periods {
            ensure!(period > 0, "{name} must be at least 1");
        }

        ensure!(
            self.ema.short < self.ema.long,
            "ema.short ({}) must be below ema.long ({})",
            self.ema.short,
            self.ema.long
        );
        ensure!(
            self.macd.fast_period < self.macd.slow_period,
            "macd.fast_period ({}) must be below macd.slow_period ({})",
            self.macd.fast_period,
            self.macd.slow_period
        );
        let ichimoku = &self.ichimoku;
        ensure!(
            ichimoku.conversion_period <= ichimoku.base_period
                && ichimoku.base_period <= ichimoku.span_period,
            "ichimoku periods must satisfy conversion <= base <= span"
        );
        ensure!(
            self.parabolic_sar.step > 0.0 && self.parabolic_sar.step <= self.parabolic_sar.max,
            "parabolic_sar.step must be in (0, max]"
        );
        ensure!(self.bollinger.std_dev > 0.0, "bollinger.std_dev must be positive");
        ensure!(self.keltner.atr_multiplier > 0.0, "keltner.atr_multiplier must be positive");
        ensure!(self.supertrend.multiplier > 0.0, "supertrend.multiplier must be positive");
        ensure!(
            self.rsi.oversold < self.rsi.overbought,
            "rsi.oversold must be below rsi.overbought"
        );
        Ok(())
    }
}

// =============================================================================
// StrategyParams
// =============================================================================

/// Scoring weights, decision threshold and ATR-based exit distances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyParams {
    #[serde(default)]
    pub weights: WeightTable,

    /// Fraction of the total weight a side must reach to emit a signal.
    #[serde(default = "default_min_weight_ratio")]
    pub min_weight_ratio: f64,

    /// Stop-loss distance below the current price, in ATRs.
    #[serde(default = "default_stop_loss_atr_multiplier")]
    pub stop_loss_atr_multiplier: f64,

    /// Take-profit distance above the current price, in ATRs.
    #[serde(default = "default_take_profit_atr_multiplier")]
    pub take_profit_atr_multiplier: f64,
}

impl Default for StrategyParams {
    fn default() -> Self {
        Self {
            weights: WeightTable::default(),
            min_weight_ratio: default_min_weight_ratio(),
            stop_loss_atr_multiplier: default_stop_loss_atr_multiplier(),
            take_profit_atr_multiplier: default_take_profit_atr_multiplier(),
        }
    }
}

impl StrategyParams {
    pub fn validate(&self) -> Result<()> {
        self.weights.validate()?;
        ensure!(
            self.min_weight_ratio > 0.0 && self.min_weight_ratio <= 1.0,
            "min_weight_ratio must be in (0, 1], got {}",
            self.min_weight_ratio
        );
        ensure!(
            self.stop_loss_atr_multiplier >= 0.0 && self.take_profit_atr_multiplier >= 0.0,
            "ATR multipliers must be non-negative"
        );
        Ok(())
    }
}

// =============================================================================
// AppConfig
// =============================================================================

/// Top-level configuration: which instrument and timeframes to evaluate and
/// how to evaluate them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Instrument symbol passed to the candle source.
    #[serde(default = "default_pair")]
    pub pair: String,

    /// Timeframes (minutes) evaluated independently on every run.
    #[serde(default = "default_timeframes")]
    pub timeframes: Vec<String>,

    #[serde(default)]
    pub indicators: IndicatorConfig,

    #[serde(default)]
    pub strategy: StrategyParams,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            pair: default_pair(),
            timeframes: default_timeframes(),
            indicators: IndicatorConfig::default(),
            strategy: StrategyParams::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// If the file does not exist, returns an error so the caller can fall
    /// back to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config from {}", path.display()))?;

        info!(
            path = %path.display(),
            pair = %config.pair,
            timeframes = ?config.timeframes,
            "config loaded"
        );

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(!self.pair.trim().is_empty(), "pair must not be empty");
        ensure!(!self.timeframes.is_empty(), "at least one timeframe is required");
        self.indicators.validate().context("invalid indicator config")?;
        self.strategy.validate().context("invalid strategy config")?;
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_expected_values() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.pair, "XAUUSD");
        assert_eq!(cfg.timeframes, vec!["1", "2", "5", "10", "15"]);
        assert_eq!(cfg.indicators.ema, EmaConfig { short: 5, long: 20 });
        assert_eq!(cfg.indicators.macd.slow_period, 8);
        assert_eq!(cfg.indicators.atr.period, 5);
        assert_eq!(cfg.indicators.ichimoku.span_period, 52);
        assert_eq!(cfg.indicators.fibonacci.levels, vec![0.236, 0.382, 0.618]);
        assert!((cfg.strategy.min_weight_ratio - 0.6).abs() < f64::EPSILON);
        assert!((cfg.strategy.stop_loss_atr_multiplier - 2.0).abs() < f64::EPSILON);
        assert!((cfg.strategy.take_profit_atr_multiplier - 3.0).abs() < f64::EPSILON);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn deserialise_empty_json_uses_defaults() {
        let cfg: AppConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg, AppConfig::default());
    }

    #[test]
    fn deserialise_partial_json_fills_defaults() {
        let json = r#"{
            "pair": "EURUSD",
            "indicators": { "rsi": { "period": 9 }, "supertrend": { "multiplier": 2.5 } },
            "strategy": { "min_weight_ratio": 0.5 }
        }"#;
        let cfg: AppConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.pair, "EURUSD");
        assert_eq!(cfg.timeframes.len(), 5);
        assert_eq!(cfg.indicators.rsi.period, 9);
        assert!((cfg.indicators.rsi.overbought - 70.0).abs() < f64::EPSILON);
        assert_eq!(cfg.indicators.supertrend.period, 10);
        assert!((cfg.indicators.supertrend.multiplier - 2.5).abs() < f64::EPSILON);
        assert!((cfg.strategy.min_weight_ratio - 0.5).abs() < f64::EPSILON);
        assert!((cfg.strategy.weights.total() - 21.0).abs() < f64::EPSILON);
    }

    #[test]
    fn roundtrip_serialisation() {
        let cfg = AppConfig::default();
        let json = serde_json::to_string(&cfg).unwrap();
        let cfg2: AppConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(cfg, cfg2);
    }

    #[test]
    fn default_min_candles_is_ichimoku_span() {
        assert_eq!(IndicatorConfig::default().min_candles(), 52);
    }

    #[test]
    fn validate_rejects_inverted_ema() {
        let mut cfg = AppConfig::default();
        cfg.indicators.ema = EmaConfig { short: 20, long: 5 };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_period() {
        let mut cfg = AppConfig::default();
        cfg.indicators.adx.period = 0;
        let err = cfg.validate().unwrap_err();
        assert!(format!("{err:#}").contains("adx.period"));
    }

    #[test]
    fn validate_rejects_sar_step_above_max() {
        let mut cfg = AppConfig::default();
        cfg.indicators.parabolic_sar.step = 0.5;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_weight_ratio() {
        let mut cfg = AppConfig::default();
        cfg.strategy.min_weight_ratio = 1.5;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn load_missing_file_errors() {
        assert!(AppConfig::load("/nonexistent/confluence/config.json").is_err());
    }

    #[test]
    fn load_reads_file() {
        let path = std::env::temp_dir().join(format!("confluence-config-{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "timeframes": ["5"] }"#).unwrap();
        let cfg = AppConfig::load(&path).unwrap();
        assert_eq!(cfg.timeframes, vec!["5"]);
        std::fs::remove_file(&path).ok();
    }
}
