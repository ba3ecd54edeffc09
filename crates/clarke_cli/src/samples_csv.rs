//! Paired sample CSV ingestion
//!
//! Reads two named columns (reference, prediction) from a headed CSV file.
//! Rows whose values do not parse to finite numbers are skipped with a warning and counted in
//! [`ParseStats`]; a missing column is an error.

use anyhow::{bail, Context, Result};
use std::io::Read;
use std::path::Path;
use tracing::warn;

/// Default column names
pub const REFERENCE_COLUMN: &str = "reference";
pub const PREDICTION_COLUMN: &str = "prediction";

/// Reference and prediction columns of equal length
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PairedColumns {
    pub reference: Vec<f64>,
    pub prediction: Vec<f64>,
}

impl PairedColumns {
    pub fn len(&self) -> usize {
        self.reference.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reference.is_empty()
    }
}

/// CSV parsing statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseStats {
    pub total_rows: u32,
    pub parsed: u32,
    pub failed: u32,
}

/// Parse paired columns from a CSV file on disk
///
/// # Arguments
///
/// * `csv_path` - Headed CSV file
/// * `reference_column` - Header of the reference column
/// * `prediction_column` - Header of the prediction column
pub fn read_paired_csv(
    csv_path: &Path,
    reference_column: &str,
    prediction_column: &str,
) -> Result<(PairedColumns, ParseStats)> {
    let file = std::fs::File::open(csv_path)
        .with_context(|| format!("Failed to open CSV file: {}", csv_path.display()))?;
    parse_paired_csv(file, reference_column, prediction_column)
        .with_context(|| format!("Failed to read samples from {}", csv_path.display()))
}

/// Parse paired columns from any reader
pub fn parse_paired_csv<R: Read>(
    input: R,
    reference_column: &str,
    prediction_column: &str,
) -> Result<(PairedColumns, ParseStats)> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = reader.headers().context("Failed to read CSV header")?.clone();
    let find = |name: &str| headers.iter().position(|h| h == name);
    let (ref_idx, pred_idx) = match (find(reference_column), find(prediction_column)) {
        (Some(r), Some(p)) => (r, p),
        (None, _) => bail!("Column '{}' not found in CSV header", reference_column),
        (_, None) => bail!("Column '{}' not found in CSV header", prediction_column),
    };

    let mut columns = PairedColumns::default();
    let mut stats = ParseStats::default();

    for (i, record) in reader.records().enumerate() {
        // Header is line 1
        let line = i + 2;
        stats.total_rows += 1;

        let record = match record {
            Ok(r) => r,
            Err(err) => {
                stats.failed += 1;
                warn!(line, error = %err, "Skipping malformed CSV row");
                continue;
            }
        };

        let value = |idx: usize| {
            record
                .get(idx)
                .and_then(|v| v.parse::<f64>().ok())
                .filter(|v| v.is_finite())
        };
        match (value(ref_idx), value(pred_idx)) {
            (Some(r), Some(p)) => {
                columns.reference.push(r);
                columns.prediction.push(p);
                stats.parsed += 1;
            }
            _ => {
                stats.failed += 1;
                warn!(
                    line,
                    reference = record.get(ref_idx).unwrap_or(""),
                    prediction = record.get(pred_idx).unwrap_or(""),
                    "Skipping row with non-numeric or non-finite values"
                );
            }
        }
    }

    Ok((columns, stats))
}
