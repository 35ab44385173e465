//! Modality code: first code in the modality table with a synonym in the text.

use super::{FieldMatch, Haystack, find_span};
use crate::catalog::Catalog;
use crate::evidence::EvidenceText;

const STRATEGY: &str = "modality_synonym";

#[derive(Debug, Clone)]
pub struct ModalityExtractor {
    /// (code, lower-cased synonyms) in table order
    table: Vec<(String, Vec<String>)>,
}

impl ModalityExtractor {
    pub fn new(catalog: &Catalog) -> Self {
        let table = catalog
            .modality_map
            .iter()
            .map(|entry| (entry.code.clone(), entry.terms.iter().map(|t| t.to_lowercase()).collect()))
            .collect();
        Self { table }
    }

    pub fn extract(&self, evidence: &EvidenceText) -> Option<FieldMatch> {
        let haystack = evidence.lower();
        self.table.iter().find_map(|(code, terms)| {
            terms
                .iter()
                .find_map(|term| find_span(haystack, term))
                .map(|span| FieldMatch::new(code.clone(), haystack, span, Haystack::Lower, STRATEGY))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(text: &str) -> Option<FieldMatch> {
        ModalityExtractor::new(&Catalog::default()).extract(&EvidenceText::resolve(text, &[], None, 0))
    }

    #[test]
    fn test_modality_codes() {
        assert_eq!(extract("Nuevo tomógrafo").unwrap().value, "CT");
        assert_eq!(extract("Resonancia magnética de 3T").unwrap().value, "MR");
        assert_eq!(extract("Equipo de Rayos X portátil").unwrap().value, "DXR");
        assert_eq!(extract("Sala de hemodinamia").unwrap().value, "IGT");
        assert_eq!(extract("Ecógrafo de última generación").unwrap().value, "US");
        assert_eq!(extract("Campaña de mamografía").unwrap().value, "MG");
    }

    #[test]
    fn test_table_order_wins() {
        let found = extract("Tomografía y resonancia en el mismo centro").unwrap();
        assert_eq!(found.value, "MR");
        assert_eq!(found.evidence, "resonancia");
    }

    #[test]
    fn test_no_modality() {
        assert!(extract("Campaña de vacunación").is_none());
    }
}
