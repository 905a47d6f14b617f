// =============================================================================
// Oscillator Zones
// =============================================================================
//
// Bounded oscillators (RSI, Stochastic RSI, Williams %R) are read against an
// oversold / overbought pair.  Both comparisons are strict: a reading sitting
// exactly on a threshold is still neutral.

use serde::{Deserialize, Serialize};

/// Where an oscillator reading falls relative to its thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Zone {
    Oversold,
    Neutral,
    Overbought,
}

impl std::fmt::Display for Zone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Oversold => write!(f, "OVERSOLD"),
            Self::Neutral => write!(f, "NEUTRAL"),
            Self::Overbought => write!(f, "OVERBOUGHT"),
        }
    }
}

/// Oversold / overbought pair for one oscillator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub oversold: f64,
    pub overbought: f64,
}

impl Thresholds {
    pub const fn new(oversold: f64, overbought: f64) -> Self {
        Self {
            oversold,
            overbought,
        }
    }

    pub fn is_oversold(&self, value: f64) -> bool {
        value < self.oversold
    }

    pub fn is_overbought(&self, value: f64) -> bool {
        value > self.overbought
    }

    /// NaN readings classify as neutral.
    pub fn classify(&self, value: f64) -> Zone {
        if self.is_oversold(value) {
            Zone::Oversold
        } else if self.is_overbought(value) {
            Zone::Overbought
        } else {
            Zone::Neutral
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rsi_series_zones() {
        let rsi = [25.0, 28.0, 32.0, 45.0, 60.0, 75.0];
        let thresholds = Thresholds::new(30.0, 70.0);
        let zones: Vec<Zone> = rsi.iter().map(|&v| thresholds.classify(v)).collect();
        assert_eq!(
            zones,
            vec![
                Zone::Oversold,
                Zone::Oversold,
                Zone::Neutral,
                Zone::Neutral,
                Zone::Neutral,
                Zone::Overbought,
            ]
        );
    }

    #[test]
    fn boundaries_are_neutral() {
        let t = Thresholds::new(30.0, 70.0);
        assert_eq!(t.classify(30.0), Zone::Neutral);
        assert_eq!(t.classify(70.0), Zone::Neutral);
    }

    #[test]
    fn negative_scale_thresholds() {
        // Williams %R lives in [-100, 0].
        let t = Thresholds::new(-80.0, -20.0);
        assert_eq!(t.classify(-95.0), Zone::Oversold);
        assert_eq!(t.classify(-5.0), Zone::Overbought);
        assert_eq!(t.classify(-50.0), Zone::Neutral);
    }

    #[test]
    fn nan_is_neutral() {
        assert_eq!(Thresholds::new(20.0, 80.0).classify(f64::NAN), Zone::Neutral);
    }

    #[test]
    fn zone_labels() {
        assert_eq!(Zone::Overbought.to_string(), "OVERBOUGHT");
        assert_eq!(Zone::Oversold.to_string(), "OVERSOLD");
    }
}
