//! Field extractors.
//!
//! Each field is extracted by an ordered chain of named strategies; the first
//! strategy returning a match wins. Every strategy can also be run on its own,
//! which is how the tests exercise them.
//!
//! # Example
//!
//! ```rust
//! use medscout_core::{Catalog, EvidenceText, Extractors};
//!
//! let extractors = Extractors::new(&Catalog::default()).unwrap();
//! let evidence = EvidenceText::resolve(
//!     "El Sanatorio Güemes incorporó un resonador Siemens MAGNETOM Sola",
//!     &[],
//!     None,
//!     0,
//! );
//! let fields = extractors.extract_text_fields(&evidence);
//! assert_eq!(fields.brand.unwrap().value, "Siemens");
//! assert_eq!(fields.modality.unwrap().value, "MR");
//! ```

pub mod brand;
pub mod date;
pub mod equipment;
pub mod facility;
pub mod modality;
pub mod model;

use std::ops::Range;

use crate::Result;
use crate::catalog::Catalog;
use crate::evidence::EvidenceText;
use crate::record::ExtractedFields;

pub use brand::BrandExtractor;
pub use date::{DateExtractor, DateMatch, DateStrategy};
pub use equipment::{EquipmentExtractor, EquipmentStrategy};
pub use facility::FacilityExtractor;
pub use modality::ModalityExtractor;
pub use model::{ModelExtractor, ModelStrategy};

/// Which string a [`FieldMatch`] span points into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Haystack {
    /// [`EvidenceText::text`], original casing.
    Text,
    /// [`EvidenceText::lower`].
    Lower,
    /// [`EvidenceText::page_title`], lower-cased.
    PageTitle,
}

/// A successful extraction: the field value plus the evidence it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMatch {
    /// Normalized field value (catalog form for catalog lookups).
    pub value: String,
    /// The matched text.
    pub evidence: String,
    /// Byte range of `evidence` within the searched string.
    pub span: Range<usize>,
    pub haystack: Haystack,
    /// Name of the strategy that produced the match.
    pub strategy: &'static str,
}

impl FieldMatch {
    pub(crate) fn new(
        value: impl Into<String>, haystack_str: &str, span: Range<usize>, haystack: Haystack, strategy: &'static str,
    ) -> Self {
        Self { value: value.into(), evidence: haystack_str[span.clone()].to_string(), span, haystack, strategy }
    }
}

/// Matches for every text-derived field of one page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMatches {
    pub equipment_type: Option<FieldMatch>,
    pub modality: Option<FieldMatch>,
    pub brand: Option<FieldMatch>,
    pub model: Option<FieldMatch>,
    pub facility: Option<FieldMatch>,
}

impl FieldMatches {
    pub fn into_fields(self) -> ExtractedFields {
        ExtractedFields {
            equipment_type: self.equipment_type.map(|m| m.value),
            model: self.model.map(|m| m.value),
            modality: self.modality.map(|m| m.value),
            facility: self.facility.map(|m| m.value),
            brand: self.brand.map(|m| m.value),
        }
    }
}

/// All field extractors, compiled once from a catalog.
#[derive(Debug, Clone)]
pub struct Extractors {
    pub equipment: EquipmentExtractor,
    pub modality: ModalityExtractor,
    pub brand: BrandExtractor,
    pub model: ModelExtractor,
    pub facility: FacilityExtractor,
    pub date: DateExtractor,
}

impl Extractors {
    /// Compiles the catalog's terms into patterns.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ScoutError::InvalidPattern`] if a term yields an unusable pattern.
    pub fn new(catalog: &Catalog) -> Result<Self> {
        Ok(Self {
            equipment: EquipmentExtractor::new(catalog),
            modality: ModalityExtractor::new(catalog),
            brand: BrandExtractor::new(catalog)?,
            model: ModelExtractor::new(catalog)?,
            facility: FacilityExtractor::new(catalog)?,
            date: DateExtractor::new()?,
        })
    }

    /// Runs every text-based extractor. Model extraction sees the brand found first.
    pub fn extract_text_fields(&self, evidence: &EvidenceText) -> FieldMatches {
        let equipment_type = self.equipment.extract(evidence);
        let modality = self.modality.extract(evidence);
        let brand = self.brand.extract(evidence);
        let model = self.model.extract(evidence, brand.as_ref().map(|b| b.value.as_str()));
        let facility = self.facility.extract(evidence);

        FieldMatches { equipment_type, modality, brand, model, facility }
    }
}

/// Finds the first occurrence of `needle` in `haystack`, returning its byte range.
pub(crate) fn find_span(haystack: &str, needle: &str) -> Option<Range<usize>> {
    if needle.is_empty() {
        return None;
    }
    haystack.find(needle).map(|start| start..start + needle.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_text_fields_full_sentence() {
        let extractors = Extractors::new(&Catalog::default()).unwrap();
        let evidence = EvidenceText::resolve(
            "Nuevo tomógrafo en Hospital Central",
            &["El equipo Philips Incisive CT permite estudios de 128 cortes.".to_string()],
            None,
            0,
        );

        let fields = extractors.extract_text_fields(&evidence).into_fields();
        assert_eq!(fields.equipment_type.as_deref(), Some("tomógrafo"));
        assert_eq!(fields.modality.as_deref(), Some("CT"));
        assert_eq!(fields.brand.as_deref(), Some("Philips"));
        assert_eq!(fields.model.as_deref(), Some("Philips Incisive CT"));
        assert_eq!(fields.facility.as_deref(), Some("Hospital Central"));
    }

    #[test]
    fn test_extract_text_fields_nothing_found() {
        let extractors = Extractors::new(&Catalog::default()).unwrap();
        let evidence = EvidenceText::resolve("Campaña de vacunación antigripal", &[], None, 0);
        let matches = extractors.extract_text_fields(&evidence);
        assert_eq!(matches, FieldMatches::default());
    }

    #[test]
    fn test_find_span() {
        assert_eq!(find_span("un tomógrafo", "tomógrafo"), Some(3..13));
        assert_eq!(find_span("abc", ""), None);
    }
}
