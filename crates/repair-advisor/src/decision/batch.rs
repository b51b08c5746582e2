use super::domain::{DecisionInput, DecisionOutput, ItemType, Priority, ProblemType};
use super::DecisionEngine;
use serde::{Deserialize, Deserializer, Serialize};
use std::io::Read;
use std::str::FromStr;

/// One evaluated CSV line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchRow {
    /// 1-based data line, excluding the header.
    pub line: usize,
    pub input: DecisionInput,
    pub output: DecisionOutput,
}

#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("line {line}: invalid {field} '{value}'")]
    InvalidField {
        line: usize,
        field: &'static str,
        value: String,
    },
}

/// Evaluates every row of a CSV document with headers
/// `item_type,problem_type,budget_nok,time_days[,priority][,repairability_score]`.
pub fn evaluate_csv<R: Read>(
    engine: &DecisionEngine,
    reader: R,
) -> Result<Vec<BatchRow>, BatchError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let mut rows = Vec::new();

    for (index, record) in csv_reader.deserialize::<CsvRow>().enumerate() {
        let line = index + 1;
        let input = record?.into_input(line)?;
        let output = engine.evaluate(&input);
        rows.push(BatchRow {
            line,
            input,
            output,
        });
    }

    Ok(rows)
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    item_type: String,
    problem_type: String,
    budget_nok: f64,
    time_days: f64,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    priority: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    repairability_score: Option<String>,
}

impl CsvRow {
    fn into_input(self, line: usize) -> Result<DecisionInput, BatchError> {
        let item_type = parse_field::<ItemType>(line, "item_type", &self.item_type)?;
        let problem_type = parse_field::<ProblemType>(line, "problem_type", &self.problem_type)?;
        let priority = self
            .priority
            .as_deref()
            .map(|raw| parse_field::<Priority>(line, "priority", raw))
            .transpose()?;
        let model_repairability_score = self
            .repairability_score
            .as_deref()
            .map(|raw| parse_field::<f64>(line, "repairability_score", raw))
            .transpose()?;

        Ok(DecisionInput {
            item_type,
            problem_type,
            budget_nok: self.budget_nok,
            time_days: self.time_days,
            priority,
            model_repairability_score,
        })
    }
}

fn parse_field<T: FromStr>(line: usize, field: &'static str, raw: &str) -> Result<T, BatchError> {
    raw.trim().parse().map_err(|_| BatchError::InvalidField {
        line,
        field,
        value: raw.to_string(),
    })
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decision::Recommendation;

    #[test]
    fn evaluates_each_row_in_order() {
        let csv = "item_type,problem_type,budget_nok,time_days,priority,repairability_score\n\
phone,screen,3000,5,,\n\
clothing,zipper,500,7,save_impact,8\n";

        let rows = evaluate_csv(&DecisionEngine::default(), csv.as_bytes()).expect("batch runs");

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].line, 1);
        assert_eq!(rows[0].input.priority, None);
        assert_eq!(rows[0].output.options.len(), 4);
        assert_eq!(rows[1].input.priority, Some(Priority::SaveImpact));
        assert_eq!(rows[1].input.model_repairability_score, Some(8.0));
    }

    #[test]
    fn batch_json_reads_back_into_rows() {
        let csv = "item_type,problem_type,budget_nok,time_days,priority\n\
laptop,screen,5000,7,balanced\n";
        let rows = evaluate_csv(&DecisionEngine::default(), csv.as_bytes()).expect("batch runs");

        let json = serde_json::to_string(&rows).expect("rows serialize");
        let parsed: Vec<BatchRow> = serde_json::from_str(&json).expect("rows deserialize");

        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].line, 1);
        assert_eq!(parsed[0].input, rows[0].input);
        assert_eq!(parsed[0].output.recommendation, rows[0].output.recommendation);
        assert_eq!(parsed[0].output.options.len(), 4);
    }

    #[test]
    fn optional_columns_may_be_omitted() {
        let csv = "item_type,problem_type,budget_nok,time_days\nlaptop,slow,2000,3\n";

        let rows = evaluate_csv(&DecisionEngine::default(), csv.as_bytes()).expect("batch runs");

        assert_eq!(rows.len(), 1);
        assert!(rows[0]
            .output
            .options
            .iter()
            .any(|option| option.kind == Recommendation::Repair));
    }

    #[test]
    fn unknown_item_reports_line_and_field() {
        let csv = "item_type,problem_type,budget_nok,time_days\n\
phone,screen,3000,5\n\
toaster,screen,300,2\n";

        match evaluate_csv(&DecisionEngine::default(), csv.as_bytes()) {
            Err(BatchError::InvalidField { line, field, value }) => {
                assert_eq!(line, 2);
                assert_eq!(field, "item_type");
                assert_eq!(value, "toaster");
            }
            other => panic!("expected invalid field, got {other:?}"),
        }
    }

    #[test]
    fn non_numeric_budget_is_a_csv_error() {
        let csv = "item_type,problem_type,budget_nok,time_days\nphone,screen,lots,5\n";

        let err = evaluate_csv(&DecisionEngine::default(), csv.as_bytes())
            .expect_err("budget must be numeric");
        assert!(matches!(err, BatchError::Csv(_)));
    }
}
