//! Output artifacts for a run: CSV for spreadsheets, JSON for tooling.

pub mod csv;
pub mod json;

pub use csv::{CsvConfig, CsvFormatter, records_to_csv};
pub use json::{JsonConfig, JsonFormatter, records_to_json, report_to_json};

use crate::Result;
use crate::pipeline::RunReport;

/// Output format for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
}

/// Renders a run in the requested format.
///
/// CSV gets a Confidence column when `with_confidence` is set; JSON always
/// carries the confidence field.
pub fn format_report(report: &RunReport, format: OutputFormat, with_confidence: bool, pretty: bool) -> Result<String> {
    match format {
        OutputFormat::Csv => Ok(records_to_csv(&report.records, &CsvConfig { include_confidence: with_confidence })),
        OutputFormat::Json => report_to_json(report, &JsonConfig { include_report: false, pretty }),
    }
}
