use serde::{Deserialize, Serialize};

use super::domain::RiskLevel;

pub const DEFAULT_HIGH_RISK_THRESHOLD: f64 = 0.70;

/// Scoring policy knobs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub high_risk_threshold: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            high_risk_threshold: DEFAULT_HIGH_RISK_THRESHOLD,
        }
    }
}

/// Strictly above the threshold is high risk; landing on it is not.
pub fn classify(final_probability: f64, config: &ScoringConfig) -> RiskLevel {
    if final_probability > config.high_risk_threshold {
        RiskLevel::HighRisk
    } else {
        RiskLevel::NotHighRisk
    }
}
