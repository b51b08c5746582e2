use super::carbon::CarbonProfile;
use super::config::{EngineConfig, SuccessModel};
use super::domain::{CostRange, DecisionInput, FeasibilityStatus, ReasonKey, Recommendation};
use super::reference::ReferenceEntry;

/// Probability that a repair attempt succeeds, nudged by model repairability.
pub(crate) fn success_probability(
    model: &SuccessModel,
    risk: f64,
    repairability: Option<f64>,
) -> f64 {
    let base = within(model.base - risk, model.floor, model.ceiling);
    match repairability {
        Some(score) => {
            let normalized = (score / 10.0).clamp(0.0, 1.0);
            let adjustment = (normalized - 0.5) * model.repairability_span;
            within(
                base + adjustment,
                model.adjusted_floor,
                model.adjusted_ceiling,
            )
        }
        None => base,
    }
}

/// Clamp that accepts inverted or NaN bounds, which a hand-built
/// `SuccessModel` can carry without passing through `validate`.
fn within(value: f64, floor: f64, ceiling: f64) -> f64 {
    let (low, high) = if floor <= ceiling {
        (floor, ceiling)
    } else {
        (ceiling, floor)
    };
    value.max(low).min(high)
}

/// Raw figures for one option before feasibility and scoring.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Candidate {
    pub kind: Recommendation,
    pub cost: CostRange,
    pub time_days: f64,
    pub savings: CostRange,
    pub co2e_saved_kg: CostRange,
    pub impact_score: f64,
    pub success_probability: Option<f64>,
    pub expected_cost: CostRange,
    pub expected_time_days: f64,
}

pub(crate) fn build_candidates(
    entry: &ReferenceEntry,
    carbon: &CarbonProfile,
    success: f64,
    config: &EngineConfig,
) -> Vec<Candidate> {
    Recommendation::ordered()
        .into_iter()
        .map(|kind| {
            let (cost, time_days) = match kind {
                Recommendation::Repair => (entry.repair_cost(), entry.repair_days),
                Recommendation::BuyUsed => (entry.used_price(), 1.0),
                Recommendation::Donate | Recommendation::Recycle => (CostRange::zero(), 1.0),
            };

            let savings = match kind {
                Recommendation::Repair | Recommendation::BuyUsed => {
                    CostRange::new(entry.new_price - cost.max, entry.new_price - cost.min)
                }
                Recommendation::Donate | Recommendation::Recycle => CostRange::zero(),
            };

            let co2e_saved_kg = carbon.co2e_saved(kind);
            let risk_penalty = match kind {
                Recommendation::Repair => entry.risk * config.repair_risk_impact_penalty,
                _ => 0.0,
            };
            let impact_score = carbon.impact_score(&co2e_saved_kg, risk_penalty);

            let (success_probability, expected_cost, expected_time_days) = match kind {
                Recommendation::Repair => (
                    Some(success),
                    cost.scale(1.0 / success),
                    time_days / success,
                ),
                _ => (None, cost, time_days),
            };

            Candidate {
                kind,
                cost,
                time_days,
                savings,
                co2e_saved_kg,
                impact_score,
                success_probability,
                expected_cost,
                expected_time_days,
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Feasibility {
    pub status: FeasibilityStatus,
    pub budget_shortfall_nok: Option<u32>,
    pub time_shortfall_days: Option<u32>,
}

/// Compares expected cost ceiling and expected time against the constraints.
pub(crate) fn assess_feasibility(candidate: &Candidate, budget: f64, time: f64) -> Feasibility {
    let cost_ceiling = candidate.expected_cost.max;
    let needed_time = candidate.expected_time_days;

    let budget_short = cost_ceiling > budget;
    let time_short = needed_time > time;

    Feasibility {
        status: FeasibilityStatus::from_shortfalls(budget_short, time_short),
        budget_shortfall_nok: budget_short.then(|| shortfall(cost_ceiling, budget)),
        time_shortfall_days: time_short.then(|| shortfall(needed_time, time)),
    }
}

fn shortfall(needed: f64, available: f64) -> u32 {
    (needed - available).ceil().max(0.0) as u32
}

pub(crate) fn tag_reasons(
    candidate: &Candidate,
    entry: &ReferenceEntry,
    input: &DecisionInput,
    config: &EngineConfig,
) -> Vec<ReasonKey> {
    let mut reasons = Vec::new();

    if candidate.cost.max <= input.sanitized_budget() {
        reasons.push(ReasonKey::BudgetOk);
    }
    if candidate.time_days <= input.sanitized_time() {
        reasons.push(ReasonKey::FastEnough);
    }
    if candidate.impact_score >= config.high_impact_threshold {
        reasons.push(ReasonKey::HighImpact);
    }

    if candidate.kind == Recommendation::Repair {
        if entry.risk >= config.high_risk_threshold {
            reasons.push(ReasonKey::HighRisk);
        }
        let repairable_model = input
            .sanitized_repairability()
            .is_some_and(|score| score >= config.right_to_repair_score);
        if input.item_type.is_electronics() || repairable_model {
            reasons.push(ReasonKey::PolicyRightToRepair);
        }
    }

    reasons
}
