use super::domain::{Priority, Recommendation};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Relative weight of the three utility signals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UtilityWeights {
    pub money: f64,
    pub impact: f64,
    pub time: f64,
}

impl UtilityWeights {
    pub const fn new(money: f64, impact: f64, time: f64) -> Self {
        Self {
            money,
            impact,
            time,
        }
    }

    fn is_valid(&self) -> bool {
        [self.money, self.impact, self.time]
            .iter()
            .all(|weight| weight.is_finite() && *weight >= 0.0)
    }
}

/// Weighting per user priority. `None` priority uses `save_money`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriorityWeights {
    pub save_money: UtilityWeights,
    pub save_time: UtilityWeights,
    pub save_impact: UtilityWeights,
    pub balanced: UtilityWeights,
}

impl Default for PriorityWeights {
    fn default() -> Self {
        Self {
            save_money: UtilityWeights::new(0.45, 0.35, 0.20),
            save_time: UtilityWeights::new(0.25, 0.25, 0.50),
            save_impact: UtilityWeights::new(0.25, 0.50, 0.25),
            balanced: UtilityWeights::new(0.34, 0.33, 0.33),
        }
    }
}

impl PriorityWeights {
    pub fn for_priority(&self, priority: Option<Priority>) -> UtilityWeights {
        match priority.unwrap_or(Priority::SaveMoney) {
            Priority::SaveMoney => self.save_money,
            Priority::SaveTime => self.save_time,
            Priority::SaveImpact => self.save_impact,
            Priority::Balanced => self.balanced,
        }
    }

    fn all(&self) -> [(Priority, UtilityWeights); 4] {
        [
            (Priority::SaveMoney, self.save_money),
            (Priority::SaveTime, self.save_time),
            (Priority::SaveImpact, self.save_impact),
            (Priority::Balanced, self.balanced),
        ]
    }
}

/// Soft right-to-repair preference added to each option's utility.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyBias {
    pub repair: f64,
    pub buy_used: f64,
    pub donate: f64,
    pub recycle: f64,
}

impl Default for PolicyBias {
    fn default() -> Self {
        Self {
            repair: 0.06,
            buy_used: 0.03,
            donate: 0.02,
            recycle: -0.04,
        }
    }
}

impl PolicyBias {
    pub fn for_kind(&self, kind: Recommendation) -> f64 {
        match kind {
            Recommendation::Repair => self.repair,
            Recommendation::BuyUsed => self.buy_used,
            Recommendation::Donate => self.donate,
            Recommendation::Recycle => self.recycle,
        }
    }
}

/// Repair success model: `clamp(base - risk)` then the repairability nudge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuccessModel {
    pub base: f64,
    pub floor: f64,
    pub ceiling: f64,
    pub repairability_span: f64,
    pub adjusted_floor: f64,
    pub adjusted_ceiling: f64,
}

impl Default for SuccessModel {
    fn default() -> Self {
        Self {
            base: 0.95,
            floor: 0.5,
            ceiling: 0.95,
            repairability_span: 0.2,
            adjusted_floor: 0.4,
            adjusted_ceiling: 0.98,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidenceModel {
    pub exact_base: f64,
    pub category_base: f64,
    pub global_base: f64,
    pub high_risk_penalty: f64,
    pub low_success_threshold: f64,
    pub low_success_penalty: f64,
    pub repairability_high: f64,
    pub repairability_low: f64,
    pub repairability_adjustment: f64,
    pub clear_winner_gap: f64,
    pub clear_winner_bonus: f64,
    pub ambiguous_gap: f64,
    pub ambiguous_penalty: f64,
    pub infeasible_penalty: f64,
}

impl Default for ConfidenceModel {
    fn default() -> Self {
        Self {
            exact_base: 0.75,
            category_base: 0.60,
            global_base: 0.50,
            high_risk_penalty: 0.10,
            low_success_threshold: 0.7,
            low_success_penalty: 0.05,
            repairability_high: 7.0,
            repairability_low: 3.0,
            repairability_adjustment: 0.05,
            clear_winner_gap: 0.15,
            clear_winner_bonus: 0.10,
            ambiguous_gap: 0.05,
            ambiguous_penalty: 0.10,
            infeasible_penalty: 0.10,
        }
    }
}

/// Every tuning constant the engine consults. `Default` is the shipped model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub weights: PriorityWeights,
    pub policy_bias: PolicyBias,
    pub success: SuccessModel,
    pub confidence: ConfidenceModel,
    pub both_short_penalty: f64,
    pub single_short_penalty: f64,
    pub switching_penalty: f64,
    /// Relative gap between repair and buy-used expected cost medians.
    pub switching_threshold: f64,
    pub high_impact_threshold: f64,
    pub high_risk_threshold: f64,
    pub right_to_repair_score: f64,
    pub repair_risk_impact_penalty: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            weights: PriorityWeights::default(),
            policy_bias: PolicyBias::default(),
            success: SuccessModel::default(),
            confidence: ConfidenceModel::default(),
            both_short_penalty: 0.35,
            single_short_penalty: 0.20,
            switching_penalty: 0.05,
            switching_threshold: 0.10,
            high_impact_threshold: 70.0,
            high_risk_threshold: 0.3,
            right_to_repair_score: 7.0,
            repair_risk_impact_penalty: 15.0,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EngineConfigError {
    #[error("unable to read engine config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("engine config {path} is not valid JSON: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("weights for {0:?} must be finite and non-negative")]
    InvalidWeights(Priority),
    #[error("{field} must lie within [0, 1], found {value}")]
    OutOfUnitRange { field: &'static str, value: f64 },
    #[error("{field} floor {floor} exceeds ceiling {ceiling}")]
    InvertedClamp {
        field: &'static str,
        floor: f64,
        ceiling: f64,
    },
}

impl EngineConfig {
    pub fn from_json_path(path: impl AsRef<Path>) -> Result<Self, EngineConfigError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let raw = fs::read_to_string(path).map_err(|source| EngineConfigError::Read {
            path: display.clone(),
            source,
        })?;
        let config: EngineConfig =
            serde_json::from_str(&raw).map_err(|source| EngineConfigError::Parse {
                path: display,
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), EngineConfigError> {
        for (priority, weights) in self.weights.all() {
            if !weights.is_valid() {
                return Err(EngineConfigError::InvalidWeights(priority));
            }
        }

        let unit_fields = [
            ("both_short_penalty", self.both_short_penalty),
            ("single_short_penalty", self.single_short_penalty),
            ("switching_penalty", self.switching_penalty),
            ("switching_threshold", self.switching_threshold),
            ("high_risk_threshold", self.high_risk_threshold),
            ("success.base", self.success.base),
        ];
        for (field, value) in unit_fields {
            if !(0.0..=1.0).contains(&value) {
                return Err(EngineConfigError::OutOfUnitRange { field, value });
            }
        }

        let clamps = [
            ("success", self.success.floor, self.success.ceiling),
            (
                "success.adjusted",
                self.success.adjusted_floor,
                self.success.adjusted_ceiling,
            ),
        ];
        for (field, floor, ceiling) in clamps {
            if floor.is_nan() || ceiling.is_nan() || floor > ceiling {
                return Err(EngineConfigError::InvertedClamp {
                    field,
                    floor,
                    ceiling,
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_validates() {
        EngineConfig::default().validate().expect("defaults are valid");
    }

    #[test]
    fn missing_priority_uses_save_money_weights() {
        let weights = PriorityWeights::default();
        assert_eq!(weights.for_priority(None), weights.save_money);
        assert_eq!(weights.for_priority(None), UtilityWeights::new(0.45, 0.35, 0.20));
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{ "switching_penalty": 0.1, "policy_bias": { "recycle": 0.0 } }"#)
                .expect("partial config parses");
        assert_eq!(config.switching_penalty, 0.1);
        assert_eq!(config.policy_bias.recycle, 0.0);
        assert_eq!(config.policy_bias.repair, 0.06);
        assert_eq!(config.weights, PriorityWeights::default());
    }

    #[test]
    fn rejects_negative_weights() {
        let mut config = EngineConfig::default();
        config.weights.save_time.time = -0.5;
        match config.validate() {
            Err(EngineConfigError::InvalidWeights(Priority::SaveTime)) => {}
            other => panic!("expected invalid weights, got {other:?}"),
        }
    }

    #[test]
    fn rejects_inverted_success_clamp() {
        let mut config = EngineConfig::default();
        config.success.floor = 0.99;
        assert!(matches!(
            config.validate(),
            Err(EngineConfigError::InvertedClamp { field: "success", .. })
        ));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = EngineConfig::from_json_path("/nonexistent/engine.json")
            .expect_err("file is missing");
        assert!(err.to_string().contains("/nonexistent/engine.json"));
    }
}
