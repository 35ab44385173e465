//! Candidate links and extraction records.

use std::cmp::Ordering;
use std::fmt;

use serde::{Serialize, Serializer};
use time::Date;
use time::macros::format_description;

use crate::confidence::score_fields;

/// A link discovered on a source page, not yet fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateLink {
    /// Label of the source the link was found on.
    pub source: String,
    /// Absolute URL.
    pub url: String,
    /// Trimmed anchor text.
    pub anchor_text: String,
    /// Text of the block surrounding the anchor, truncated.
    pub snippet: Option<String>,
}

/// Best available date evidence for a record.
///
/// `ScrapeTime` marks a placeholder: no date could be read from the page or its
/// snippet, so the date of the run was used instead. It renders wrapped in
/// asterisks and sorts as "no date".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordDate {
    Published(Date),
    ScrapeTime(Date),
}

impl RecordDate {
    pub fn is_sentinel(&self) -> bool {
        matches!(self, Self::ScrapeTime(_))
    }

    /// The underlying calendar date, sentinel or not.
    pub fn date(&self) -> Date {
        match self {
            Self::Published(date) | Self::ScrapeTime(date) => *date,
        }
    }

    /// The verified date, or `None` for the scrape-time sentinel.
    pub fn verified(&self) -> Option<Date> {
        match self {
            Self::Published(date) => Some(*date),
            Self::ScrapeTime(_) => None,
        }
    }

    /// Newest verified date first; sentinels last.
    pub fn cmp_desc(&self, other: &Self) -> Ordering {
        match (self.verified(), other.verified()) {
            (Some(a), Some(b)) => b.cmp(&a),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}

impl fmt::Display for RecordDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let iso = self.date().format(format_description!("[year]-[month]-[day]")).map_err(|_| fmt::Error)?;
        if self.is_sentinel() { write!(f, "*{}*", iso) } else { f.write_str(&iso) }
    }
}

impl Serialize for RecordDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Field values produced by the extractors for one page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedFields {
    pub equipment_type: Option<String>,
    pub model: Option<String>,
    pub modality: Option<String>,
    pub facility: Option<String>,
    pub brand: Option<String>,
}

/// One structured record about an equipment installation, built from a single candidate link.
///
/// The URL is the record's identity; the confidence is derived from the fields at
/// construction time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractionRecord {
    pub equipment_type: Option<String>,
    pub model: Option<String>,
    pub modality: Option<String>,
    pub date: RecordDate,
    pub facility: Option<String>,
    pub brand: Option<String>,
    pub source: String,
    pub title: String,
    pub url: String,
    pub confidence: u8,
}

impl ExtractionRecord {
    pub fn new(fields: ExtractedFields, date: RecordDate, link: &CandidateLink) -> Self {
        let confidence = score_fields(
            fields.facility.is_some(),
            fields.brand.is_some(),
            fields.model.is_some(),
            !date.is_sentinel(),
        );

        Self {
            equipment_type: fields.equipment_type,
            model: fields.model,
            modality: fields.modality,
            date,
            facility: fields.facility,
            brand: fields.brand,
            source: link.source.clone(),
            title: link.anchor_text.clone(),
            url: link.url.clone(),
            confidence,
        }
    }

    /// Whether the record has both a facility and an equipment type.
    pub fn is_complete(&self) -> bool {
        self.facility.is_some() && self.equipment_type.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn link() -> CandidateLink {
        CandidateLink {
            source: "Clarín Salud".to_string(),
            url: "https://www.clarin.com/salud/nota.html".to_string(),
            anchor_text: "Nuevo resonador".to_string(),
            snippet: None,
        }
    }

    #[test]
    fn test_record_date_display() {
        assert_eq!(RecordDate::Published(date!(2024 - 03 - 05)).to_string(), "2024-03-05");
        assert_eq!(RecordDate::ScrapeTime(date!(2026 - 01 - 09)).to_string(), "*2026-01-09*");
        assert_eq!(RecordDate::ScrapeTime(date!(2026 - 01 - 09)).date(), date!(2026 - 01 - 09));
    }

    #[test]
    fn test_sentinel_sorts_last() {
        let mut dates = vec![
            RecordDate::ScrapeTime(date!(2030 - 01 - 01)),
            RecordDate::Published(date!(2023 - 06 - 01)),
            RecordDate::Published(date!(2024 - 03 - 05)),
        ];
        dates.sort_by(|a, b| a.cmp_desc(b));

        assert_eq!(dates[0], RecordDate::Published(date!(2024 - 03 - 05)));
        assert_eq!(dates[1], RecordDate::Published(date!(2023 - 06 - 01)));
        assert!(dates[2].is_sentinel());
    }

    #[test]
    fn test_record_takes_identity_from_link() {
        let fields = ExtractedFields { equipment_type: Some("resonador".to_string()), ..Default::default() };
        let record = ExtractionRecord::new(fields, RecordDate::ScrapeTime(date!(2024 - 01 - 01)), &link());

        assert_eq!(record.url, "https://www.clarin.com/salud/nota.html");
        assert_eq!(record.title, "Nuevo resonador");
        assert_eq!(record.confidence, 0);
        assert!(!record.is_complete());
    }

    #[test]
    fn test_record_date_serializes_as_string() {
        let value = serde_json::to_value(RecordDate::ScrapeTime(date!(2024 - 01 - 01))).unwrap();
        assert_eq!(value, serde_json::json!("*2024-01-01*"));
    }
}
