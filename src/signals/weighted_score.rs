// =============================================================================
// Weighted Confluence Scorer — fixed rule table over the latest readings
// =============================================================================
//
// Every factor is evaluated for both directions independently and adds its
// weight to each side whose condition holds.  A NaN reading fails every
// comparison, so a degenerate indicator simply contributes nothing.
//
// Decision rule:
//   min_weight = min_weight_ratio * total_weight
//   BUY   if bullish >= min_weight AND bullish > bearish
//   SELL  if bearish >= min_weight AND bearish > bullish
//   none  otherwise (ties included)
// =============================================================================

use anyhow::ensure;
use serde::{Deserialize, Serialize};

use crate::indicators::{IndicatorReadings, Thresholds, TrendDirection};
use crate::types::{ScorePair, SignalSide};

/// RSI level separating bullish from bearish momentum.
const RSI_MIDLINE: f64 = 50.0;

/// Weight granted to each indicator.  Bollinger and ATR are granted jointly
/// by one rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightTable {
    pub supertrend: f64,
    pub vwap: f64,
    pub ema: f64,
    pub atr: f64,
    pub bollinger: f64,
    pub keltner: f64,
    pub rsi: f64,
    pub macd: f64,
    pub stoch_rsi: f64,
}

impl Default for WeightTable {
    fn default() -> Self {
        Self {
            supertrend: 3.0,
            vwap: 3.0,
            ema: 3.0,
            atr: 2.0,
            bollinger: 2.0,
            keltner: 2.0,
            rsi: 2.0,
            macd: 2.0,
            stoch_rsi: 2.0,
        }
    }
}

impl WeightTable {
    /// Sum of every weight in the table.
    pub fn total(&self) -> f64 {
        self.supertrend
            + self.vwap
            + self.ema
            + self.atr
            + self.bollinger
            + self.keltner
            + self.rsi
            + self.macd
            + self.stoch_rsi
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        for factor in Factor::ALL {
            let weight = factor.weight(self);
            ensure!(
                weight.is_finite() && weight >= 0.0,
                "weight for {factor} must be a non-negative number, got {weight}"
            );
        }
        Ok(())
    }
}

/// One row of the scoring table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Factor {
    SupertrendVwap,
    VwapRsi,
    EmaCrossover,
    BollingerAtr,
    Keltner,
    RsiExtreme,
    Macd,
    StochRsi,
}

impl Factor {
    pub const ALL: [Factor; 8] = [
        Factor::SupertrendVwap,
        Factor::VwapRsi,
        Factor::EmaCrossover,
        Factor::BollingerAtr,
        Factor::Keltner,
        Factor::RsiExtreme,
        Factor::Macd,
        Factor::StochRsi,
    ];

    pub fn weight(self, weights: &WeightTable) -> f64 {
        match self {
            Self::SupertrendVwap => weights.supertrend,
            Self::VwapRsi => weights.vwap,
            Self::EmaCrossover => weights.ema,
            Self::BollingerAtr => weights.bollinger + weights.atr,
            Self::Keltner => weights.keltner,
            Self::RsiExtreme => weights.rsi,
            Self::Macd => weights.macd,
            Self::StochRsi => weights.stoch_rsi,
        }
    }
}

impl std::fmt::Display for Factor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::SupertrendVwap => "supertrend_vwap",
            Self::VwapRsi => "vwap_rsi",
            Self::EmaCrossover => "ema_crossover",
            Self::BollingerAtr => "bollinger_atr",
            Self::Keltner => "keltner",
            Self::RsiExtreme => "rsi_extreme",
            Self::Macd => "macd",
            Self::StochRsi => "stoch_rsi",
        };
        write!(f, "{name}")
    }
}

/// How a single factor voted on the latest bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FactorContribution {
    pub factor: Factor,
    pub weight: f64,
    pub bullish: bool,
    pub bearish: bool,
}

/// Result of the weighted scoring pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringResult {
    pub scores: ScorePair,
    pub contributions: Vec<FactorContribution>,
}

/// Winning side and its confidence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub side: SignalSide,
    pub confidence: f64,
}

/// The main weighted scoring engine.
#[derive(Debug, Clone)]
pub struct WeightedScorer {
    weights: WeightTable,
    /// Fraction of the total weight the winning side must reach.
    min_weight_ratio: f64,
    rsi_thresholds: Thresholds,
    stoch_thresholds: Thresholds,
}

impl WeightedScorer {
    /// Scorer with the stock oscillator thresholds (RSI 30/70, Stochastic
    /// RSI 20/80).
    pub fn new(weights: WeightTable, min_weight_ratio: f64) -> Self {
        Self {
            weights,
            min_weight_ratio,
            rsi_thresholds: Thresholds::new(30.0, 70.0),
            stoch_thresholds: Thresholds::new(20.0, 80.0),
        }
    }

    pub fn with_thresholds(mut self, rsi: Thresholds, stoch_rsi: Thresholds) -> Self {
        self.rsi_thresholds = rsi;
        self.stoch_thresholds = stoch_rsi;
        self
    }

    pub fn total_weight(&self) -> f64 {
        self.weights.total()
    }

    pub fn min_weight(&self) -> f64 {
        self.min_weight_ratio * self.total_weight()
    }

    /// Evaluate every factor against the latest readings at `price`.
    pub fn score(&self, readings: &IndicatorReadings, price: f64) -> ScoringResult {
        let mut scores = ScorePair::default();
        let mut contributions = Vec::with_capacity(Factor::ALL.len());

        for factor in Factor::ALL {
            let (bullish, bearish) = self.evaluate(factor, readings, price);
            let weight = factor.weight(&self.weights);

            if bullish {
                scores.bullish += weight;
            }
            if bearish {
                scores.bearish += weight;
            }

            contributions.push(FactorContribution {
                factor,
                weight,
                bullish,
                bearish,
            });
        }

        ScoringResult {
            scores,
            contributions,
        }
    }

    /// Apply the threshold rule.  `None` when neither side qualifies or the
    /// scores tie.
    pub fn decide(&self, scores: ScorePair) -> Option<Decision> {
        let min_weight = self.min_weight();
        let total = self.total_weight();

        let (side, winning) = if scores.bullish >= min_weight && scores.bullish > scores.bearish {
            (SignalSide::Buy, scores.bullish)
        } else if scores.bearish >= min_weight && scores.bearish > scores.bullish {
            (SignalSide::Sell, scores.bearish)
        } else {
            return None;
        };

        Some(Decision {
            side,
            confidence: winning / total,
        })
    }

    /// `(bullish, bearish)` condition pair for one factor.
    fn evaluate(&self, factor: Factor, r: &IndicatorReadings, price: f64) -> (bool, bool) {
        let rsi = &self.rsi_thresholds;
        let stoch = &self.stoch_thresholds;

        match factor {
            Factor::SupertrendVwap => (
                r.supertrend.direction == TrendDirection::Up && price > r.vwap,
                r.supertrend.direction == TrendDirection::Down && price < r.vwap,
            ),
            Factor::VwapRsi => (
                price > r.vwap && r.rsi > RSI_MIDLINE,
                price < r.vwap && r.rsi < RSI_MIDLINE,
            ),
            Factor::EmaCrossover => (r.ema_short > r.ema_long, r.ema_short < r.ema_long),
            Factor::BollingerAtr => (
                price <= r.bollinger.lower && rsi.is_oversold(r.rsi),
                price >= r.bollinger.upper && rsi.is_overbought(r.rsi),
            ),
            Factor::Keltner => (
                price <= r.keltner.lower && rsi.is_oversold(r.rsi),
                price >= r.keltner.upper && rsi.is_overbought(r.rsi),
            ),
            Factor::RsiExtreme => (rsi.is_oversold(r.rsi), rsi.is_overbought(r.rsi)),
            Factor::Macd => (r.macd.is_above_signal(), r.macd.is_below_signal()),
            Factor::StochRsi => {
                let (k, d) = (r.stoch_rsi.k, r.stoch_rsi.d);
                (
                    stoch.is_oversold(k) && k > d,
                    stoch.is_overbought(k) && k < d,
                )
            }
        }
    }
}

impl Default for WeightedScorer {
    fn default() -> Self {
        Self::new(WeightTable::default(), 0.6)
    }
}
