use crate::infra::engine_from_config;
use clap::Args;
use repair_advisor::config::AppConfig;
use repair_advisor::decision::{
    evaluate_csv, BatchRow, DecisionInput, DecisionOption, DecisionOutput, ItemType, Priority,
    ProblemType,
};
use repair_advisor::error::AppError;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct DecideArgs {
    /// Item category (phone, laptop, clothing, other)
    #[arg(long)]
    pub(crate) item: ItemType,
    /// Observed problem (screen, battery, water, no_power, slow, zipper, seam, other)
    #[arg(long)]
    pub(crate) problem: ProblemType,
    /// Available budget in NOK
    #[arg(long)]
    pub(crate) budget: f64,
    /// Days the user can wait
    #[arg(long)]
    pub(crate) days: f64,
    /// save_money, save_time, save_impact or balanced
    #[arg(long)]
    pub(crate) priority: Option<Priority>,
    /// Model repairability score on a 0-10 scale
    #[arg(long)]
    pub(crate) repairability: Option<f64>,
    /// Print the decision as JSON instead of a table
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct BatchArgs {
    /// CSV file with item_type,problem_type,budget_nok,time_days[,priority][,repairability_score]
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Print all rows as a JSON array
    #[arg(long)]
    pub(crate) json: bool,
}

impl DecideArgs {
    fn to_input(&self) -> DecisionInput {
        DecisionInput {
            item_type: self.item,
            problem_type: self.problem,
            budget_nok: self.budget,
            time_days: self.days,
            priority: self.priority,
            model_repairability_score: self.repairability,
        }
    }
}

pub(crate) fn run_decide(args: DecideArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let engine = engine_from_config(&config)?;
    let input = args.to_input();
    let output = engine.evaluate(&input);

    if args.json {
        println!("{}", to_json(&output)?);
    } else {
        print_decision(&input, &output);
    }
    Ok(())
}

pub(crate) fn run_batch(args: BatchArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let engine = engine_from_config(&config)?;
    let file = File::open(&args.input)?;
    let rows = evaluate_csv(&engine, BufReader::new(file))?;

    if args.json {
        println!("{}", to_json(&rows)?);
        return Ok(());
    }

    println!("{} row(s) from {}", rows.len(), args.input.display());
    for row in &rows {
        println!("{}", batch_line(row));
    }
    Ok(())
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, AppError> {
    serde_json::to_string_pretty(value).map_err(|err| AppError::Io(err.into()))
}

fn print_decision(input: &DecisionInput, output: &DecisionOutput) {
    println!(
        "{} / {} with {:.0} NOK and {} day(s)",
        input.item_type.label(),
        input.problem_type.label(),
        input.budget_nok,
        input.time_days
    );
    println!("{}", output.summary());
    println!("Confidence score: {:.2}", output.confidence_score);

    if output.options.is_empty() {
        println!("No reference data for this combination.");
    } else {
        println!("\nRanked options:");
        for (rank, option) in output.options.iter().enumerate() {
            println!("{}", option_line(rank + 1, option));
        }
    }

    let reasons: Vec<&str> = output.reasons.iter().map(|reason| reason.label()).collect();
    println!("\nWhy: {}", reasons.join("; "));

    if let Some(best) = output.best_feasible_option {
        if best != output.recommendation {
            println!("Best option within constraints: {}", best.label());
        }
    }
    if let Some(plan_b) = &output.plan_b {
        println!("{}", plan_b.summary());
    }
}

fn option_line(rank: usize, option: &DecisionOption) -> String {
    let mut line = format!(
        "  {rank}. {:<10} utility {:.3} | cost {:.0}-{:.0} NOK | {:.1} day(s) | impact {:.1} | {}",
        option.kind.label(),
        option.utility,
        option.expected_cost.min,
        option.expected_cost.max,
        option.expected_time_days,
        option.impact_score,
        option.feasibility_status.label()
    );
    if let Some(success) = option.success_probability {
        line.push_str(&format!(" | success {:.0}%", success * 100.0));
    }
    line
}

fn batch_line(row: &BatchRow) -> String {
    format!(
        "  line {}: {} / {} -> {}",
        row.line,
        row.input.item_type.as_str(),
        row.input.problem_type.as_str(),
        row.output.summary()
    )
}
