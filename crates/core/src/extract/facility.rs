//! Facility name: a facility-type term followed by a capitalized name.
//!
//! Names may embed a `de`/`del`/`de la` connector ("Hospital de Clínicas José de
//! San Martín"). Terms are tried in catalog order; the first term with a match wins.

use regex::Regex;

use super::{FieldMatch, Haystack};
use crate::Result;
use crate::catalog::Catalog;
use crate::evidence::EvidenceText;

const STRATEGY: &str = "term_then_proper_name";

const NAME_WORD: &str = r"\p{Lu}[\p{L}\p{N}'’\-]*\.?";
const CONNECTOR: &str = r"(?:de las|de los|de la|del|de) ";

#[derive(Debug, Clone)]
pub struct FacilityExtractor {
    patterns: Vec<Regex>,
}

impl FacilityExtractor {
    pub fn new(catalog: &Catalog) -> Result<Self> {
        let name = format!("(?:{CONNECTOR})?{NAME_WORD}(?: (?:{CONNECTOR})?{NAME_WORD}){{0,5}}");
        let patterns = catalog
            .facility_terms
            .iter()
            .map(|term| Ok(Regex::new(&format!(r"\b(?i:{}) {}", regex::escape(term), name))?))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    pub fn extract(&self, evidence: &EvidenceText) -> Option<FieldMatch> {
        let text = evidence.text();
        self.patterns.iter().find_map(|pattern| {
            let m = pattern.find(text)?;
            let trimmed = m.as_str().trim_end_matches(['.', ',', ';', ':']);
            let span = m.start()..m.start() + trimmed.len();
            Some(FieldMatch::new(trimmed, text, span, Haystack::Text, STRATEGY))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn extract(text: &str) -> Option<String> {
        FacilityExtractor::new(&Catalog::default())
            .unwrap()
            .extract(&EvidenceText::resolve(text, &[], None, 0))
            .map(|m| m.value)
    }

    #[rstest]
    #[case("Nuevo tomógrafo en Hospital Central", "Hospital Central")]
    #[case("El Hospital de Clínicas José de San Martín sumó equipos", "Hospital de Clínicas José de San Martín")]
    #[case("llegó a la Fundación Favaloro.", "Fundación Favaloro")]
    #[case("en el Sanatorio Güemes, el equipo", "Sanatorio Güemes")]
    #[case("Instituto Alexander Fleming de la ciudad", "Instituto Alexander Fleming")]
    fn test_facility_names(#[case] text: &str, #[case] expected: &str) {
        assert_eq!(extract(text).as_deref(), Some(expected));
    }

    #[test]
    fn test_catalog_order_wins() {
        assert_eq!(
            extract("La Clínica Olivos y el Hospital Austral firmaron").as_deref(),
            Some("Hospital Austral")
        );
    }

    #[test]
    fn test_name_must_be_capitalized() {
        assert_eq!(extract("el hospital público de la zona"), None);
    }

    #[test]
    fn test_does_not_cross_paragraphs() {
        let evidence = EvidenceText::resolve("Obras en el Hospital Posadas", &["Nuevo equipamiento".to_string()], None, 0);
        let found = FacilityExtractor::new(&Catalog::default()).unwrap().extract(&evidence).unwrap();
        assert_eq!(found.value, "Hospital Posadas");
    }
}
