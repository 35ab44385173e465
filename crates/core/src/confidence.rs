//! Completeness scoring for extraction records.
//!
//! The score rewards evidence, not correctness: a record with a wrong facility
//! scores the same as one with the right facility.

use crate::record::ExtractionRecord;

pub const FACILITY_WEIGHT: u8 = 35;
pub const BRAND_WEIGHT: u8 = 25;
pub const MODEL_WEIGHT: u8 = 20;
/// Only awarded for dates read from the page, never for the scrape-time sentinel.
pub const DATE_WEIGHT: u8 = 20;
pub const MAX_CONFIDENCE: u8 = 100;

/// Sums the weights of the present indicators, capped at [`MAX_CONFIDENCE`].
pub fn score_fields(has_facility: bool, has_brand: bool, has_model: bool, has_verified_date: bool) -> u8 {
    let total: u16 = [
        (has_facility, FACILITY_WEIGHT),
        (has_brand, BRAND_WEIGHT),
        (has_model, MODEL_WEIGHT),
        (has_verified_date, DATE_WEIGHT),
    ]
    .iter()
    .filter(|(present, _)| *present)
    .map(|(_, weight)| u16::from(*weight))
    .sum();

    total.min(u16::from(MAX_CONFIDENCE)) as u8
}

/// Re-derives the confidence of a record from its own fields.
pub fn score(record: &ExtractionRecord) -> u8 {
    score_fields(
        record.facility.is_some(),
        record.brand.is_some(),
        record.model.is_some(),
        !record.date.is_sentinel(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{CandidateLink, ExtractedFields, RecordDate};
    use rstest::rstest;
    use time::macros::date;

    #[rstest]
    #[case(false, false, false, false, 0)]
    #[case(true, false, false, false, 35)]
    #[case(false, true, false, false, 25)]
    #[case(false, false, true, false, 20)]
    #[case(false, false, false, true, 20)]
    #[case(true, true, false, false, 60)]
    #[case(true, true, true, true, 100)]
    fn test_score_fields(
        #[case] facility: bool, #[case] brand: bool, #[case] model: bool, #[case] date: bool, #[case] expected: u8,
    ) {
        assert_eq!(score_fields(facility, brand, model, date), expected);
    }

    #[test]
    fn test_stored_score_matches_rederived_score() {
        let link = CandidateLink {
            source: "Infobae Salud".to_string(),
            url: "https://www.infobae.com/salud/x".to_string(),
            anchor_text: "x".to_string(),
            snippet: None,
        };
        let variants = [
            (ExtractedFields::default(), RecordDate::ScrapeTime(date!(2024 - 01 - 01))),
            (
                ExtractedFields {
                    facility: Some("Hospital Garrahan".to_string()),
                    brand: Some("Siemens".to_string()),
                    ..Default::default()
                },
                RecordDate::Published(date!(2024 - 02 - 02)),
            ),
            (
                ExtractedFields {
                    model: Some("Philips Ingenia 1.5T".to_string()),
                    brand: Some("Philips".to_string()),
                    ..Default::default()
                },
                RecordDate::ScrapeTime(date!(2024 - 01 - 01)),
            ),
        ];

        for (fields, date) in variants {
            let record = ExtractionRecord::new(fields, date, &link);
            assert!(record.confidence <= MAX_CONFIDENCE);
            assert_eq!(record.confidence, score(&record));
        }
    }

    #[test]
    fn test_sentinel_date_earns_nothing() {
        assert_eq!(score_fields(true, false, false, false), FACILITY_WEIGHT);
        let sentinel = RecordDate::ScrapeTime(date!(2024 - 01 - 01));
        assert_eq!(score_fields(true, false, false, !sentinel.is_sentinel()), FACILITY_WEIGHT);
    }
}
