use super::config::ConfidenceModel;
use super::domain::{
    ConfidenceLevel, DecisionInput, DecisionOption, DecisionOutput, DecisionStatus, PlanB,
    ReasonKey, Recommendation,
};
use super::reference::MatchLevel;

/// Signals feeding the confidence estimate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ConfidenceSignals {
    pub match_level: MatchLevel,
    pub risk: f64,
    pub high_risk_threshold: f64,
    pub repair_success: Option<f64>,
    pub repairability: Option<f64>,
    /// Utility of rank 1 minus rank 2.
    pub utility_gap: Option<f64>,
    pub status: DecisionStatus,
}

pub(crate) fn confidence_score(model: &ConfidenceModel, signals: &ConfidenceSignals) -> f64 {
    let mut score = match signals.match_level {
        MatchLevel::Exact => model.exact_base,
        MatchLevel::CategoryFallback => model.category_base,
        MatchLevel::GlobalFallback => model.global_base,
    };

    if signals.risk >= signals.high_risk_threshold {
        score -= model.high_risk_penalty;
    }
    if signals
        .repair_success
        .is_some_and(|success| success < model.low_success_threshold)
    {
        score -= model.low_success_penalty;
    }

    match signals.repairability {
        Some(value) if value >= model.repairability_high => score += model.repairability_adjustment,
        Some(value) if value <= model.repairability_low => score -= model.repairability_adjustment,
        _ => {}
    }

    if let Some(gap) = signals.utility_gap {
        if gap > model.clear_winner_gap {
            score += model.clear_winner_bonus;
        } else if gap < model.ambiguous_gap {
            score -= model.ambiguous_penalty;
        }
    }

    if signals.status == DecisionStatus::NotFullyFeasible {
        score -= model.infeasible_penalty;
    }

    score.clamp(0.0, 1.0)
}

pub(crate) fn overall_status(options: &[DecisionOption]) -> DecisionStatus {
    if options.iter().any(|option| option.feasible) {
        DecisionStatus::Feasible
    } else {
        DecisionStatus::NotFullyFeasible
    }
}

/// Fallback built from the top-ranked option when nothing is feasible.
pub(crate) fn plan_b(options: &[DecisionOption], status: DecisionStatus) -> Option<PlanB> {
    if status == DecisionStatus::Feasible {
        return None;
    }

    options.first().map(|top| PlanB {
        option: top.kind,
        budget_short: top.feasibility_status.is_budget_short(),
        time_short: top.feasibility_status.is_time_short(),
        budget_shortfall_nok: top.budget_shortfall_nok,
        time_shortfall_days: top.time_shortfall_days,
    })
}

/// Output returned when the reference table has no usable row.
pub(crate) fn no_data_output(input: &DecisionInput) -> DecisionOutput {
    DecisionOutput {
        recommendation: Recommendation::BuyUsed,
        reasons: vec![ReasonKey::BestOverall],
        options: Vec::new(),
        status: DecisionStatus::NotFullyFeasible,
        recommended_feasible: false,
        best_feasible_option: None,
        confidence: ConfidenceLevel::Low,
        confidence_score: 0.0,
        plan_b: Some(PlanB {
            option: Recommendation::BuyUsed,
            budget_short: input.sanitized_budget() < 1.0,
            time_short: input.sanitized_time() < 1.0,
            budget_shortfall_nok: None,
            time_shortfall_days: None,
        }),
    }
}

/// Assembles the final output from options already sorted by utility.
pub(crate) fn assemble_output(
    ranked: Vec<DecisionOption>,
    status: DecisionStatus,
    confidence_score: f64,
) -> DecisionOutput {
    let plan_b = plan_b(&ranked, status);
    let best_feasible_option = ranked
        .iter()
        .find(|option| option.feasible)
        .map(|option| option.kind);

    let (recommendation, reasons, recommended_feasible) = match ranked.first() {
        Some(top) => {
            let reasons = if top.reasons.is_empty() {
                vec![ReasonKey::BestOverall]
            } else {
                top.reasons.clone()
            };
            (top.kind, reasons, top.feasible)
        }
        None => (Recommendation::BuyUsed, vec![ReasonKey::BestOverall], false),
    };

    DecisionOutput {
        recommendation,
        reasons,
        options: ranked,
        status,
        recommended_feasible,
        best_feasible_option,
        confidence: ConfidenceLevel::from_score(confidence_score),
        confidence_score,
        plan_b,
    }
}
