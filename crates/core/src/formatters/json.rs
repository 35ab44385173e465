use serde::Serialize;

use crate::Result;
use crate::pipeline::RunReport;
use crate::record::ExtractionRecord;

/// Configuration for JSON output
#[derive(Debug, Clone, Default)]
pub struct JsonConfig {
    /// Wrap records in the full run report (failure tally, counters)
    pub include_report: bool,
    /// Pretty print JSON output
    pub pretty: bool,
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    if pretty { Ok(serde_json::to_string_pretty(value)?) } else { Ok(serde_json::to_string(value)?) }
}

/// Convert records to a JSON array
pub fn records_to_json(records: &[ExtractionRecord], config: &JsonConfig) -> Result<String> {
    to_json(&records, config.pretty)
}

/// Convert a run to JSON, either the record array or the whole report
pub fn report_to_json(report: &RunReport, config: &JsonConfig) -> Result<String> {
    if config.include_report { to_json(report, config.pretty) } else { records_to_json(&report.records, config) }
}

/// JSON formatter for extraction records
pub struct JsonFormatter {
    config: JsonConfig,
}

impl JsonFormatter {
    pub fn new(config: JsonConfig) -> Self {
        Self { config }
    }

    pub fn format(&self, report: &RunReport) -> Result<String> {
        report_to_json(report, &self.config)
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new(JsonConfig::default())
    }
}
