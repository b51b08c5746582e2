use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Category of the item the user wants to get rid of or fix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    Phone,
    Laptop,
    Clothing,
    Other,
}

impl ItemType {
    pub const fn ordered() -> [Self; 4] {
        [Self::Phone, Self::Laptop, Self::Clothing, Self::Other]
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Phone => "phone",
            Self::Laptop => "laptop",
            Self::Clothing => "clothing",
            Self::Other => "other",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Phone => "Phone",
            Self::Laptop => "Laptop",
            Self::Clothing => "Clothing",
            Self::Other => "Other item",
        }
    }

    /// Electronics fall under right-to-repair policy regardless of model data.
    pub const fn is_electronics(self) -> bool {
        matches!(self, Self::Phone | Self::Laptop)
    }
}

/// What is wrong with the item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProblemType {
    Screen,
    Battery,
    Slow,
    NoPower,
    Water,
    Zipper,
    Seam,
    Other,
}

impl ProblemType {
    pub const fn ordered() -> [Self; 8] {
        [
            Self::Screen,
            Self::Battery,
            Self::Slow,
            Self::NoPower,
            Self::Water,
            Self::Zipper,
            Self::Seam,
            Self::Other,
        ]
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Screen => "screen",
            Self::Battery => "battery",
            Self::Slow => "slow",
            Self::NoPower => "no_power",
            Self::Water => "water",
            Self::Zipper => "zipper",
            Self::Seam => "seam",
            Self::Other => "other",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Screen => "Broken screen",
            Self::Battery => "Weak battery",
            Self::Slow => "Slow performance",
            Self::NoPower => "Does not power on",
            Self::Water => "Water damage",
            Self::Zipper => "Broken zipper",
            Self::Seam => "Torn seam",
            Self::Other => "Other problem",
        }
    }
}

/// User priority selecting the utility weighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    SaveMoney,
    SaveTime,
    SaveImpact,
    Balanced,
}

impl Priority {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::SaveMoney,
            Self::SaveTime,
            Self::SaveImpact,
            Self::Balanced,
        ]
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SaveMoney => "save_money",
            Self::SaveTime => "save_time",
            Self::SaveImpact => "save_impact",
            Self::Balanced => "balanced",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::SaveMoney => "Save money",
            Self::SaveTime => "Save time",
            Self::SaveImpact => "Save impact",
            Self::Balanced => "Balanced",
        }
    }
}

/// Disposition option kind. Declaration order is the construction order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    Repair,
    BuyUsed,
    Donate,
    Recycle,
}

impl Recommendation {
    pub const fn ordered() -> [Self; 4] {
        [Self::Repair, Self::BuyUsed, Self::Donate, Self::Recycle]
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Repair => "repair",
            Self::BuyUsed => "buy_used",
            Self::Donate => "donate",
            Self::Recycle => "recycle",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Repair => "Repair",
            Self::BuyUsed => "Buy used",
            Self::Donate => "Donate",
            Self::Recycle => "Recycle",
        }
    }
}

/// Explainability tags attached to an option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonKey {
    BudgetOk,
    FastEnough,
    HighImpact,
    HighRisk,
    PolicyRightToRepair,
    BestOverall,
}

impl ReasonKey {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BudgetOk => "budget_ok",
            Self::FastEnough => "fast_enough",
            Self::HighImpact => "high_impact",
            Self::HighRisk => "high_risk",
            Self::PolicyRightToRepair => "policy_right_to_repair",
            Self::BestOverall => "best_overall",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::BudgetOk => "Fits your budget",
            Self::FastEnough => "Done within your time frame",
            Self::HighImpact => "Large climate benefit",
            Self::HighRisk => "Repair may fail",
            Self::PolicyRightToRepair => "Supported by right-to-repair policy",
            Self::BestOverall => "Best overall trade-off",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeasibilityStatus {
    Ok,
    BudgetShort,
    TimeShort,
    BothShort,
}

impl FeasibilityStatus {
    pub const fn from_shortfalls(budget_short: bool, time_short: bool) -> Self {
        match (budget_short, time_short) {
            (false, false) => Self::Ok,
            (true, false) => Self::BudgetShort,
            (false, true) => Self::TimeShort,
            (true, true) => Self::BothShort,
        }
    }

    pub const fn is_budget_short(self) -> bool {
        matches!(self, Self::BudgetShort | Self::BothShort)
    }

    pub const fn is_time_short(self) -> bool {
        matches!(self, Self::TimeShort | Self::BothShort)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Ok => "Feasible",
            Self::BudgetShort => "Over budget",
            Self::TimeShort => "Takes too long",
            Self::BothShort => "Over budget and too slow",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLevel {
    Low,
    Medium,
    High,
}

impl ConfidenceLevel {
    pub fn from_score(score: f64) -> Self {
        if score < 0.5 {
            Self::Low
        } else if score < 0.75 {
            Self::Medium
        } else {
            Self::High
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// Whether at least one option fits the user's constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionStatus {
    Feasible,
    NotFullyFeasible,
}

impl DecisionStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Feasible => "feasible",
            Self::NotFullyFeasible => "not_fully_feasible",
        }
    }
}

/// Error returned when a textual tag does not name a known variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct ParseTagError {
    pub kind: &'static str,
    pub value: String,
}

fn parse_tag<T: Copy>(
    raw: &str,
    kind: &'static str,
    variants: &[T],
    as_str: fn(T) -> &'static str,
) -> Result<T, ParseTagError> {
    let normalized = raw.trim().to_ascii_lowercase().replace('-', "_");
    variants
        .iter()
        .copied()
        .find(|variant| as_str(*variant) == normalized)
        .ok_or_else(|| ParseTagError {
            kind,
            value: raw.to_string(),
        })
}

impl FromStr for ItemType {
    type Err = ParseTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_tag(s, "item type", &Self::ordered(), Self::as_str)
    }
}

impl FromStr for ProblemType {
    type Err = ParseTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_tag(s, "problem type", &Self::ordered(), Self::as_str)
    }
}

impl FromStr for Priority {
    type Err = ParseTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_tag(s, "priority", &Self::ordered(), Self::as_str)
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Closed numeric interval, used for money (NOK) and kg CO2e alike.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CostRange {
    pub min: f64,
    pub max: f64,
}

impl CostRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub const fn zero() -> Self {
        Self { min: 0.0, max: 0.0 }
    }

    pub fn median(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    pub fn scale(&self, factor: f64) -> Self {
        Self::new(self.min * factor, self.max * factor)
    }

    pub fn scale_each(&self, min_factor: f64, max_factor: f64) -> Self {
        Self::new(self.min * min_factor, self.max * max_factor)
    }

    pub fn floor_at_zero(&self) -> Self {
        Self::new(self.min.max(0.0), self.max.max(0.0))
    }
}

/// Constraints and context supplied by the user for one evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionInput {
    pub item_type: ItemType,
    pub problem_type: ProblemType,
    pub budget_nok: f64,
    pub time_days: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_repairability_score: Option<f64>,
}

impl DecisionInput {
    pub fn new(
        item_type: ItemType,
        problem_type: ProblemType,
        budget_nok: f64,
        time_days: f64,
    ) -> Self {
        Self {
            item_type,
            problem_type,
            budget_nok,
            time_days,
            priority: None,
            model_repairability_score: None,
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_repairability(mut self, score: f64) -> Self {
        self.model_repairability_score = Some(score);
        self
    }

    /// Budget with NaN or negative values collapsed to zero.
    pub fn sanitized_budget(&self) -> f64 {
        non_negative(self.budget_nok)
    }

    pub fn sanitized_time(&self) -> f64 {
        non_negative(self.time_days)
    }

    /// Repairability score clamped into the 0-10 scale, ignoring NaN.
    pub fn sanitized_repairability(&self) -> Option<f64> {
        self.model_repairability_score
            .filter(|score| !score.is_nan())
            .map(|score| score.clamp(0.0, 10.0))
    }
}

/// NaN and negatives collapse to zero; an unbounded budget or deadline
/// saturates at `f64::MAX`.
fn non_negative(value: f64) -> f64 {
    if value.is_nan() || value <= 0.0 {
        0.0
    } else {
        value.min(f64::MAX)
    }
}

/// Fully scored disposition candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionOption {
    pub kind: Recommendation,
    pub cost: CostRange,
    pub time_days: f64,
    pub savings: CostRange,
    pub impact_score: f64,
    pub co2e_saved_kg: CostRange,
    pub feasible: bool,
    pub feasibility_status: FeasibilityStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_shortfall_nok: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_shortfall_days: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success_probability: Option<f64>,
    pub expected_cost: CostRange,
    pub expected_time_days: f64,
    pub reasons: Vec<ReasonKey>,
    pub utility: f64,
}

/// Fallback descriptor returned when no option fits the constraints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanB {
    pub option: Recommendation,
    pub budget_short: bool,
    pub time_short: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_shortfall_nok: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_shortfall_days: Option<u32>,
}

impl PlanB {
    pub fn summary(&self) -> String {
        let mut constraints = Vec::new();
        if self.budget_short {
            match self.budget_shortfall_nok {
                Some(delta) => constraints.push(format!("raise budget by {delta} NOK")),
                None => constraints.push("raise budget".to_string()),
            }
        }
        if self.time_short {
            match self.time_shortfall_days {
                Some(delta) => constraints.push(format!("allow {delta} more day(s)")),
                None => constraints.push("allow more time".to_string()),
            }
        }

        if constraints.is_empty() {
            format!("plan B: {}", self.option.label())
        } else {
            format!("plan B: {} ({})", self.option.label(), constraints.join(", "))
        }
    }
}

/// Ranked recommendation with explainability and confidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionOutput {
    pub recommendation: Recommendation,
    pub reasons: Vec<ReasonKey>,
    pub options: Vec<DecisionOption>,
    pub status: DecisionStatus,
    pub recommended_feasible: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_feasible_option: Option<Recommendation>,
    pub confidence: ConfidenceLevel,
    pub confidence_score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_b: Option<PlanB>,
}

impl DecisionOutput {
    pub fn summary(&self) -> String {
        format!(
            "recommend {} ({}, {} confidence)",
            self.recommendation.as_str(),
            self.status.as_str(),
            self.confidence.as_str()
        )
    }

    pub fn option(&self, kind: Recommendation) -> Option<&DecisionOption> {
        self.options.iter().find(|option| option.kind == kind)
    }

    pub fn rank_of(&self, kind: Recommendation) -> Option<usize> {
        self.options.iter().position(|option| option.kind == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_parse_case_insensitively_with_dashes() {
        assert_eq!("No-Power".parse::<ProblemType>(), Ok(ProblemType::NoPower));
        assert_eq!(" laptop ".parse::<ItemType>(), Ok(ItemType::Laptop));
        assert_eq!("save-time".parse::<Priority>(), Ok(Priority::SaveTime));
    }

    #[test]
    fn unknown_tag_reports_kind_and_value() {
        let err = "toaster".parse::<ItemType>().expect_err("unknown item");
        assert_eq!(err.kind, "item type");
        assert_eq!(err.to_string(), "unknown item type 'toaster'");
    }

    #[test]
    fn confidence_level_boundaries() {
        assert_eq!(ConfidenceLevel::from_score(0.49), ConfidenceLevel::Low);
        assert_eq!(ConfidenceLevel::from_score(0.5), ConfidenceLevel::Medium);
        assert_eq!(ConfidenceLevel::from_score(0.749), ConfidenceLevel::Medium);
        assert_eq!(ConfidenceLevel::from_score(0.75), ConfidenceLevel::High);
    }

    #[test]
    fn sanitizes_out_of_range_inputs() {
        let input = DecisionInput::new(ItemType::Phone, ProblemType::Screen, -10.0, f64::NAN)
            .with_repairability(14.0);
        assert_eq!(input.sanitized_budget(), 0.0);
        assert_eq!(input.sanitized_time(), 0.0);
        assert_eq!(input.sanitized_repairability(), Some(10.0));
    }

    #[test]
    fn unbounded_constraints_stay_unbounded() {
        let input = DecisionInput::new(
            ItemType::Laptop,
            ProblemType::Water,
            f64::INFINITY,
            f64::INFINITY,
        );
        assert_eq!(input.sanitized_budget(), f64::MAX);
        assert_eq!(input.sanitized_time(), f64::MAX);

        let drained =
            DecisionInput::new(ItemType::Laptop, ProblemType::Water, f64::NEG_INFINITY, 0.0);
        assert_eq!(drained.sanitized_budget(), 0.0);
    }

    #[test]
    fn enums_serialize_as_snake_case() {
        let json = serde_json::to_string(&Recommendation::BuyUsed).expect("serializes");
        assert_eq!(json, "\"buy_used\"");
        let status = serde_json::to_string(&DecisionStatus::NotFullyFeasible).expect("serializes");
        assert_eq!(status, "\"not_fully_feasible\"");
    }

    #[test]
    fn plan_b_summary_lists_constraints() {
        let plan = PlanB {
            option: Recommendation::Repair,
            budget_short: true,
            time_short: true,
            budget_shortfall_nok: Some(250),
            time_shortfall_days: None,
        };
        assert_eq!(
            plan.summary(),
            "plan B: Repair (raise budget by 250 NOK, allow more time)"
        );
    }
}
