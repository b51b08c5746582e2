//! Disposition decision engine: repair, buy used, donate or recycle.
//!
//! Evaluation is a pure function of the input, the reference table and the
//! engine configuration, so one engine can be shared across threads freely.

pub mod batch;
mod carbon;
pub mod config;
pub mod domain;
mod policy;
pub mod reference;
mod rules;
mod scoring;

#[cfg(test)]
mod tests;

pub use batch::{evaluate_csv, BatchError, BatchRow};
pub use carbon::CarbonProfile;
pub use config::{EngineConfig, EngineConfigError, PolicyBias, PriorityWeights, UtilityWeights};
pub use domain::{
    ConfidenceLevel, CostRange, DecisionInput, DecisionOption, DecisionOutput, DecisionStatus,
    FeasibilityStatus, ItemType, ParseTagError, PlanB, Priority, ProblemType, ReasonKey,
    Recommendation,
};
pub use reference::{MatchLevel, ReferenceEntry, ReferenceMatch, ReferenceTable};

use policy::{assemble_output, confidence_score, no_data_output, overall_status, ConfidenceSignals};
use std::borrow::Cow;
use tracing::{debug, info, warn};

/// Evaluates with the standard reference table and default tuning.
pub fn evaluate(input: &DecisionInput) -> DecisionOutput {
    DecisionEngine::default().evaluate(input)
}

/// Stateless evaluator bound to a reference table and tuning constants.
#[derive(Debug, Clone)]
pub struct DecisionEngine {
    table: Cow<'static, ReferenceTable>,
    config: EngineConfig,
}

impl Default for DecisionEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl DecisionEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            table: Cow::Borrowed(ReferenceTable::standard()),
            config,
        }
    }

    pub fn with_table(table: ReferenceTable, config: EngineConfig) -> Self {
        Self {
            table: Cow::Owned(table),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn table(&self) -> &ReferenceTable {
        &self.table
    }

    pub fn evaluate(&self, input: &DecisionInput) -> DecisionOutput {
        let Some(found) = self.table.lookup(input.item_type, input.problem_type) else {
            warn!(
                item = input.item_type.as_str(),
                problem = input.problem_type.as_str(),
                "no reference data; returning low-confidence default"
            );
            return no_data_output(input);
        };

        let entry = found.entry;
        debug!(
            item = input.item_type.as_str(),
            problem = input.problem_type.as_str(),
            level = ?found.level,
            risk = entry.risk,
            "resolved reference entry"
        );

        let config = &self.config;
        let budget = input.sanitized_budget();
        let time = input.sanitized_time();
        let repairability = input.sanitized_repairability();

        let success = rules::success_probability(&config.success, entry.risk, repairability);
        let carbon = CarbonProfile::for_item(input.item_type);
        let candidates = rules::build_candidates(&entry, &carbon, success, config);
        let feasibility: Vec<_> = candidates
            .iter()
            .map(|candidate| rules::assess_feasibility(candidate, budget, time))
            .collect();

        let weights = config.weights.for_priority(input.priority);
        let utilities =
            scoring::score_candidates(&candidates, &feasibility, entry.new_price, weights, config);

        let mut options: Vec<DecisionOption> = candidates
            .iter()
            .zip(&feasibility)
            .zip(&utilities)
            .map(|((candidate, feasibility), utility)| {
                debug!(
                    kind = candidate.kind.as_str(),
                    money = utility.money,
                    impact = utility.impact,
                    time = utility.time,
                    penalty = utility.penalty,
                    bias = utility.bias,
                    utility = utility.total,
                    "scored option"
                );
                DecisionOption {
                    kind: candidate.kind,
                    cost: candidate.cost,
                    time_days: candidate.time_days,
                    savings: candidate.savings,
                    impact_score: candidate.impact_score,
                    co2e_saved_kg: candidate.co2e_saved_kg,
                    feasible: feasibility.status == FeasibilityStatus::Ok,
                    feasibility_status: feasibility.status,
                    budget_shortfall_nok: feasibility.budget_shortfall_nok,
                    time_shortfall_days: feasibility.time_shortfall_days,
                    success_probability: candidate.success_probability,
                    expected_cost: candidate.expected_cost,
                    expected_time_days: candidate.expected_time_days,
                    reasons: rules::tag_reasons(candidate, &entry, input, config),
                    utility: utility.total,
                }
            })
            .collect();

        scoring::rank(&mut options);

        let status = overall_status(&options);
        let utility_gap = match options.as_slice() {
            [first, second, ..] => Some(first.utility - second.utility),
            _ => None,
        };
        let score = confidence_score(
            &config.confidence,
            &ConfidenceSignals {
                match_level: found.level,
                risk: entry.risk,
                high_risk_threshold: config.high_risk_threshold,
                repair_success: Some(success),
                repairability,
                utility_gap,
                status,
            },
        );

        let output = assemble_output(options, status, score);
        info!(
            item = input.item_type.as_str(),
            problem = input.problem_type.as_str(),
            recommendation = output.recommendation.as_str(),
            status = output.status.as_str(),
            confidence = output.confidence.as_str(),
            "decision evaluated"
        );
        output
    }
}
