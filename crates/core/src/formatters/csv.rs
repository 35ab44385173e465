use crate::record::ExtractionRecord;

/// Column headers, in output order.
pub const COLUMNS: [&str; 9] = ["Type", "Model", "Modality", "Date", "Facility", "Brand", "Source", "Title", "Link"];

/// Header for the optional confidence column.
pub const CONFIDENCE_COLUMN: &str = "Confidence";

/// Configuration for CSV output
#[derive(Debug, Clone, Default)]
pub struct CsvConfig {
    /// Append a Confidence column (quality runs)
    pub include_confidence: bool,
}

/// Convert records to CSV, one row per record, with a header line.
///
/// Manual RFC 4180 quoting to avoid adding a csv crate dependency. Missing
/// fields are written as empty strings.
pub fn records_to_csv(records: &[ExtractionRecord], config: &CsvConfig) -> String {
    let mut csv = String::new();

    let mut header: Vec<&str> = COLUMNS.to_vec();
    if config.include_confidence {
        header.push(CONFIDENCE_COLUMN);
    }
    push_row(&mut csv, header.into_iter().map(str::to_string));

    for record in records {
        let mut row = vec![
            opt(&record.equipment_type),
            opt(&record.model),
            opt(&record.modality),
            record.date.to_string(),
            opt(&record.facility),
            opt(&record.brand),
            record.source.clone(),
            record.title.clone(),
            record.url.clone(),
        ];
        if config.include_confidence {
            row.push(record.confidence.to_string());
        }
        push_row(&mut csv, row.into_iter());
    }

    csv
}

fn opt(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn push_row(csv: &mut String, fields: impl Iterator<Item = String>) {
    let line: Vec<String> = fields.map(|f| csv_escape_field(&f)).collect();
    csv.push_str(&line.join(","));
    csv.push_str("\r\n");
}

/// Quote a field if it contains a delimiter, quote or line break
fn csv_escape_field(s: &str) -> String {
    let needs_quotes = s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r');
    if needs_quotes { format!("\"{}\"", s.replace('"', "\"\"")) } else { s.to_string() }
}

/// CSV formatter for extraction records
pub struct CsvFormatter {
    config: CsvConfig,
}

impl CsvFormatter {
    pub fn new(config: CsvConfig) -> Self {
        Self { config }
    }

    pub fn format(&self, records: &[ExtractionRecord]) -> String {
        records_to_csv(records, &self.config)
    }
}

impl Default for CsvFormatter {
    fn default() -> Self {
        Self::new(CsvConfig::default())
    }
}
