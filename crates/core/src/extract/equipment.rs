//! Equipment type: first catalog term, in catalog order, found in the text.

use super::{FieldMatch, Haystack, find_span};
use crate::catalog::Catalog;
use crate::evidence::EvidenceText;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EquipmentStrategy {
    /// Substring search over the whole evidence text.
    EvidenceText,
    /// Substring search over the page `<title>` only.
    PageTitle,
}

impl EquipmentStrategy {
    pub const ORDER: [EquipmentStrategy; 2] = [Self::EvidenceText, Self::PageTitle];

    pub fn name(&self) -> &'static str {
        match self {
            Self::EvidenceText => "evidence_text",
            Self::PageTitle => "page_title",
        }
    }
}

#[derive(Debug, Clone)]
pub struct EquipmentExtractor {
    /// (catalog form, lower-cased form)
    terms: Vec<(String, String)>,
}

impl EquipmentExtractor {
    pub fn new(catalog: &Catalog) -> Self {
        let terms = catalog.equipment_terms.iter().map(|t| (t.clone(), t.to_lowercase())).collect();
        Self { terms }
    }

    pub fn extract(&self, evidence: &EvidenceText) -> Option<FieldMatch> {
        EquipmentStrategy::ORDER.iter().find_map(|s| self.apply(*s, evidence))
    }

    pub fn apply(&self, strategy: EquipmentStrategy, evidence: &EvidenceText) -> Option<FieldMatch> {
        let (haystack, kind) = match strategy {
            EquipmentStrategy::EvidenceText => (evidence.lower().to_string(), Haystack::Lower),
            EquipmentStrategy::PageTitle => (evidence.page_title()?.to_lowercase(), Haystack::PageTitle),
        };
        self.first_term_in(&haystack, kind, strategy.name())
    }

    /// Whether any equipment term occurs in `text`, case-insensitively.
    pub fn mentions_any(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        self.terms.iter().any(|(_, term)| lower.contains(term.as_str()))
    }

    fn first_term_in(&self, haystack: &str, kind: Haystack, strategy: &'static str) -> Option<FieldMatch> {
        self.terms.iter().find_map(|(term, lower)| {
            find_span(haystack, lower).map(|span| FieldMatch::new(term.clone(), haystack, span, kind, strategy))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> EquipmentExtractor {
        EquipmentExtractor::new(&Catalog::default())
    }

    #[test]
    fn test_catalog_order_wins_over_text_order() {
        let evidence = EvidenceText::resolve("Compraron un tomógrafo y un resonador", &[], None, 0);
        let found = extractor().extract(&evidence).unwrap();
        assert_eq!(found.value, "resonador");
        assert_eq!(found.strategy, "evidence_text");
        assert_eq!(found.haystack, Haystack::Lower);
    }

    #[test]
    fn test_match_is_case_insensitive_and_keeps_catalog_form() {
        let evidence = EvidenceText::resolve("Llegaron los equipos de RAYOS X digitales", &[], None, 0);
        let found = extractor().extract(&evidence).unwrap();
        assert_eq!(found.value, "rayos X");
        assert_eq!(found.evidence, "rayos x");
    }

    #[test]
    fn test_page_title_fallback() {
        let evidence = EvidenceText::resolve("Inauguración del nuevo servicio", &[], None, 0)
            .with_page_title(Some("Mamógrafo digital para el hospital".to_string()));
        assert!(extractor().apply(EquipmentStrategy::EvidenceText, &evidence).is_none());

        let found = extractor().extract(&evidence).unwrap();
        assert_eq!(found.value, "mamógrafo");
        assert_eq!(found.strategy, "page_title");
    }

    #[test]
    fn test_no_match() {
        let evidence = EvidenceText::resolve("Vacunación", &[], None, 0);
        assert!(extractor().extract(&evidence).is_none());
    }

    #[test]
    fn test_mentions_any() {
        assert!(extractor().mentions_any("Nuevo TOMÓGRAFO en Hospital Central"));
        assert!(!extractor().mentions_any("Dengue: casos en aumento"));
    }
}
