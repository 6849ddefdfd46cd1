//! Scores many locations from a CSV export whose headers are the request field names.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde_json::{Map, Number, Value};

use super::domain::RiskAssessment;
use super::service::{AssessmentError, RiskAssessmentService};

#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("failed to open batch file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid batch CSV data: {0}")]
    Csv(#[from] csv::Error),
}

/// Outcome for one data row. `line` is 1-based and counts the header.
#[derive(Debug)]
pub struct BatchRow {
    pub line: u64,
    pub input_data: Map<String, Value>,
    pub outcome: Result<RiskAssessment, AssessmentError>,
}

/// Blank cells are treated as absent fields; numeric cells become JSON numbers.
fn cell_value(raw: &str) -> Option<Value> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let value = trimmed
        .parse::<f64>()
        .ok()
        .and_then(|number| {
            if number.fract() == 0.0 && number.abs() <= f64::from(u32::MAX) {
                Some(Number::from(number as i64))
            } else {
                Number::from_f64(number)
            }
        })
        .map(Value::Number)
        .unwrap_or_else(|| Value::String(trimmed.to_string()));

    Some(value)
}

pub fn assess_reader<R: Read>(
    service: &RiskAssessmentService,
    reader: R,
) -> Result<Vec<BatchRow>, BatchError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .flexible(true)
        .from_reader(reader);
    let headers = csv_reader.headers()?.clone();

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        let line = record.position().map(|pos| pos.line()).unwrap_or_default();

        let mut input_data = Map::new();
        for (header, cell) in headers.iter().zip(record.iter()) {
            if let Some(value) = cell_value(cell) {
                input_data.insert(header.to_string(), value);
            }
        }

        let outcome = service.assess_object(&input_data);
        rows.push(BatchRow {
            line,
            input_data,
            outcome,
        });
    }

    Ok(rows)
}

pub fn assess_path(
    service: &RiskAssessmentService,
    path: impl AsRef<Path>,
) -> Result<Vec<BatchRow>, BatchError> {
    let file = File::open(path)?;
    assess_reader(service, file)
}
