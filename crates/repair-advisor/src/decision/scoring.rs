use super::config::{EngineConfig, UtilityWeights};
use super::domain::{DecisionOption, FeasibilityStatus, Recommendation};
use super::rules::{Candidate, Feasibility};

/// Per-signal contributions, kept for debug logging.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct UtilityBreakdown {
    pub money: f64,
    pub impact: f64,
    pub time: f64,
    pub penalty: f64,
    pub bias: f64,
    pub total: f64,
}

pub(crate) fn score_candidates(
    candidates: &[Candidate],
    feasibility: &[Feasibility],
    new_price: f64,
    weights: UtilityWeights,
    config: &EngineConfig,
) -> Vec<UtilityBreakdown> {
    let max_expected_time = candidates
        .iter()
        .map(|candidate| candidate.expected_time_days)
        .fold(0.0_f64, f64::max);
    let marginal_swap = is_marginal_swap(candidates, config.switching_threshold);

    candidates
        .iter()
        .zip(feasibility)
        .map(|(candidate, feasibility)| {
            let money = money_score(candidate, new_price);
            let impact = candidate.impact_score / 100.0;
            let time = if max_expected_time > 0.0 {
                (1.0 - candidate.expected_time_days / max_expected_time).clamp(0.0, 1.0)
            } else {
                1.0
            };

            let mut penalty = match feasibility.status {
                FeasibilityStatus::Ok => 0.0,
                FeasibilityStatus::BothShort => config.both_short_penalty,
                FeasibilityStatus::BudgetShort | FeasibilityStatus::TimeShort => {
                    config.single_short_penalty
                }
            };
            if marginal_swap && candidate.kind == Recommendation::BuyUsed {
                penalty += config.switching_penalty;
            }
            let bias = config.policy_bias.for_kind(candidate.kind);

            let raw = weights.money * money + weights.impact * impact + weights.time * time
                - penalty
                + bias;
            let total = if raw.is_nan() { 0.0 } else { raw.clamp(0.0, 1.0) };

            UtilityBreakdown {
                money,
                impact,
                time,
                penalty,
                bias,
                total,
            }
        })
        .collect()
}

fn money_score(candidate: &Candidate, new_price: f64) -> f64 {
    if new_price <= 0.0 {
        return 0.0;
    }
    ((new_price - candidate.expected_cost.median()) / new_price).clamp(0.0, 1.0)
}

/// True when repair costs about the same as buying used, in expectation.
fn is_marginal_swap(candidates: &[Candidate], threshold: f64) -> bool {
    let median_of = |kind: Recommendation| {
        candidates
            .iter()
            .find(|candidate| candidate.kind == kind)
            .map(|candidate| candidate.expected_cost.median())
    };

    match (
        median_of(Recommendation::Repair),
        median_of(Recommendation::BuyUsed),
    ) {
        (Some(repair), Some(used)) => (repair - used).abs() <= threshold * used,
        _ => false,
    }
}

/// Stable descending sort; ties keep construction order.
pub(crate) fn rank(options: &mut [DecisionOption]) {
    options.sort_by(|a, b| b.utility.total_cmp(&a.utility));
}
