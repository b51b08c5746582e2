use repair_advisor::decision::{
    evaluate_csv, ConfidenceLevel, DecisionEngine, DecisionInput, DecisionStatus, EngineConfig,
    FeasibilityStatus, ItemType, ProblemType, ReasonKey, Recommendation, ReferenceEntry,
    ReferenceTable,
};
use serde_json::{json, Value};

fn phone(problem: ProblemType, budget: f64, days: f64) -> DecisionInput {
    DecisionInput::new(ItemType::Phone, problem, budget, days)
}

#[test]
fn cracked_screen_within_budget_favors_repair_over_buying_used() {
    let output = repair_advisor::evaluate(&phone(ProblemType::Screen, 3000.0, 5.0));

    assert_eq!(output.options.len(), 4);
    assert_eq!(output.recommendation, output.options[0].kind);

    let repair = output
        .option(Recommendation::Repair)
        .expect("repair option present");
    assert!(repair.feasible);
    assert_eq!(repair.cost.min, 800.0);
    assert_eq!(repair.cost.max, 2000.0);
    assert!(repair.reasons.contains(&ReasonKey::BudgetOk));
    assert!(repair.reasons.contains(&ReasonKey::FastEnough));
    assert!(repair.reasons.contains(&ReasonKey::PolicyRightToRepair));

    assert!(
        output.rank_of(Recommendation::Repair) < output.rank_of(Recommendation::BuyUsed),
        "repair should outrank buying used"
    );
}

#[test]
fn water_damage_on_small_budget_rules_out_repair_and_buying_used() {
    let output = repair_advisor::evaluate(&phone(ProblemType::Water, 500.0, 2.0));

    let repair = output.option(Recommendation::Repair).expect("repair");
    assert_ne!(repair.feasibility_status, FeasibilityStatus::Ok);
    let used = output.option(Recommendation::BuyUsed).expect("buy used");
    assert!(!used.feasible);

    assert_eq!(output.status, DecisionStatus::Feasible);
    assert!(output.plan_b.is_none());
    assert_ne!(output.best_feasible_option, Some(Recommendation::Repair));
    assert_ne!(output.best_feasible_option, Some(Recommendation::BuyUsed));
}

#[test]
fn no_time_at_all_produces_plan_b() {
    let output = repair_advisor::evaluate(&phone(ProblemType::Water, 500.0, 0.0));

    assert_eq!(output.status, DecisionStatus::NotFullyFeasible);
    let plan = output.plan_b.expect("plan b present");
    assert_eq!(plan.option, output.recommendation);
    assert!(plan.time_short);
    assert!(plan.time_shortfall_days.is_some());
}

#[test]
fn unmodeled_combination_without_fallback_refuses_to_guess() {
    let table = ReferenceTable::from_entries([(
        (ItemType::Clothing, ProblemType::Zipper),
        ReferenceEntry {
            repair_cost_min: 150.0,
            repair_cost_max: 400.0,
            repair_days: 3.0,
            used_price_min: 200.0,
            used_price_max: 800.0,
            new_price: 1200.0,
            risk: 0.05,
        },
    )]);
    let engine = DecisionEngine::with_table(table, EngineConfig::default());

    let output = engine.evaluate(&DecisionInput::new(
        ItemType::Other,
        ProblemType::Battery,
        1000.0,
        3.0,
    ));

    assert_eq!(output.recommendation, Recommendation::BuyUsed);
    assert!(output.options.is_empty());
    assert_eq!(output.confidence, ConfidenceLevel::Low);
    assert_eq!(output.reasons, vec![ReasonKey::BestOverall]);
}

#[test]
fn input_and_output_use_snake_case_json() {
    let input: DecisionInput = serde_json::from_value(json!({
        "item_type": "laptop",
        "problem_type": "no_power",
        "budget_nok": 6000,
        "time_days": 10,
        "priority": "save_impact",
        "model_repairability_score": 7.5
    }))
    .expect("input deserializes");

    let output = repair_advisor::evaluate(&input);
    let value: Value = serde_json::to_value(&output).expect("output serializes");

    let recommendation = value["recommendation"].as_str().expect("tag string");
    assert!(["repair", "buy_used", "donate", "recycle"].contains(&recommendation));
    assert!(matches!(
        value["status"].as_str(),
        Some("feasible") | Some("not_fully_feasible")
    ));
    assert_eq!(value["options"].as_array().map(Vec::len), Some(4));
    let repair = value["options"]
        .as_array()
        .and_then(|options| options.iter().find(|option| option["kind"] == "repair"))
        .expect("repair serialized");
    assert!(repair["success_probability"].is_f64());
    assert!(repair["expected_cost"]["max"].is_f64());
}

#[test]
fn csv_batch_matches_single_evaluations() {
    let engine = DecisionEngine::default();
    let csv = "item_type,problem_type,budget_nok,time_days,priority,repairability_score\n\
phone,screen,3000,5,,\n\
laptop,water,500,2,save_time,\n";

    let rows = evaluate_csv(&engine, csv.as_bytes()).expect("batch evaluates");

    assert_eq!(rows.len(), 2);
    for row in rows {
        assert_eq!(row.output, engine.evaluate(&row.input));
    }
}
