use crate::decision::{
    DecisionEngine, DecisionInput, DecisionOutput, EngineConfig, ItemType, Priority, ProblemType,
    ReferenceEntry, ReferenceTable,
};

pub(super) fn engine() -> DecisionEngine {
    DecisionEngine::default()
}

pub(super) fn input(
    item: ItemType,
    problem: ProblemType,
    budget_nok: f64,
    time_days: f64,
) -> DecisionInput {
    DecisionInput::new(item, problem, budget_nok, time_days)
}

pub(super) fn phone_screen() -> DecisionInput {
    input(ItemType::Phone, ProblemType::Screen, 3000.0, 5.0)
}

pub(super) fn standard_entry(item: ItemType, problem: ProblemType) -> ReferenceEntry {
    *ReferenceTable::standard()
        .get(item, problem)
        .expect("standard row present")
}

/// Standard table with one row's risk overridden.
pub(super) fn engine_with_risk(item: ItemType, problem: ProblemType, risk: f64) -> DecisionEngine {
    let mut entry = standard_entry(item, problem);
    entry.risk = risk;
    let rows = ReferenceTable::standard()
        .keys()
        .map(|key| {
            let row = if key == (item, problem) {
                entry
            } else {
                standard_entry(key.0, key.1)
            };
            (key, row)
        })
        .collect::<Vec<_>>();
    DecisionEngine::with_table(ReferenceTable::from_entries(rows), EngineConfig::default())
}

/// Inputs spanning every standard row and a spread of constraints.
pub(super) fn input_grid() -> Vec<DecisionInput> {
    let constraints = [(0.0, 0.0), (500.0, 2.0), (3000.0, 5.0), (50000.0, 60.0)];
    let priorities = [
        None,
        Some(Priority::SaveMoney),
        Some(Priority::SaveTime),
        Some(Priority::SaveImpact),
        Some(Priority::Balanced),
    ];

    let mut inputs = Vec::new();
    for (item, problem) in ReferenceTable::standard().keys() {
        for (budget, time) in constraints {
            for priority in priorities {
                let mut base = input(item, problem, budget, time);
                base.priority = priority;
                inputs.push(base.clone());
                inputs.push(base.with_repairability(8.5));
            }
        }
    }
    inputs
}

pub(super) fn ranked_kinds(output: &DecisionOutput) -> Vec<crate::decision::Recommendation> {
    output.options.iter().map(|option| option.kind).collect()
}
