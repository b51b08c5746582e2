use super::common::*;
use crate::decision::{
    DecisionEngine, EngineConfig, ItemType, ProblemType, Recommendation, ReferenceEntry,
    ReferenceTable,
};

fn marginal_swap_table() -> ReferenceTable {
    ReferenceTable::from_entries([(
        (ItemType::Other, ProblemType::Other),
        ReferenceEntry {
            repair_cost_min: 1900.0,
            repair_cost_max: 2100.0,
            repair_days: 1.0,
            used_price_min: 1950.0,
            used_price_max: 2050.0,
            new_price: 10000.0,
            risk: 0.0,
        },
    )])
}

fn buy_used_utility(config: EngineConfig) -> f64 {
    let engine = DecisionEngine::with_table(marginal_swap_table(), config);
    let output = engine.evaluate(&input(ItemType::Other, ProblemType::Other, 5000.0, 5.0));
    output
        .option(Recommendation::BuyUsed)
        .expect("buy used option")
        .utility
}

#[test]
fn switching_penalty_applies_when_repair_costs_the_same() {
    let default = buy_used_utility(EngineConfig::default());
    let without_penalty = buy_used_utility(EngineConfig {
        switching_penalty: 0.0,
        ..EngineConfig::default()
    });

    assert!((without_penalty - default - 0.05).abs() < 1e-9);
}

#[test]
fn policy_bias_is_configurable() {
    let mut config = EngineConfig::default();
    config.policy_bias.recycle = 1.0;
    let engine = DecisionEngine::new(config);

    let output = engine.evaluate(&phone_screen());

    assert_eq!(output.recommendation, Recommendation::Recycle);
    assert_eq!(output.options[0].utility, 1.0);
}

#[test]
fn priority_changes_the_weighting() {
    let money = engine().evaluate(&phone_screen());
    let impact = engine().evaluate(
        &phone_screen().with_priority(crate::decision::Priority::SaveImpact),
    );

    let repair_utility = |output: &crate::decision::DecisionOutput| {
        output
            .option(Recommendation::Repair)
            .expect("repair option")
            .utility
    };
    assert_ne!(repair_utility(&money), repair_utility(&impact));
}

#[test]
fn free_function_matches_default_engine() {
    let input = phone_screen();
    assert_eq!(crate::decision::evaluate(&input), engine().evaluate(&input));
}

#[test]
fn hand_built_config_with_inverted_success_clamp_still_evaluates() {
    let mut config = EngineConfig::default();
    config.success.floor = 0.99;
    let engine = DecisionEngine::new(config);

    let output = engine.evaluate(&phone_screen());

    assert_eq!(output.options.len(), 4);
    let success = output
        .option(Recommendation::Repair)
        .and_then(|option| option.success_probability)
        .expect("repair success");
    assert!((0.95..=0.99).contains(&success));
}
