//! Brand: first catalog brand occurring as a whole word, case-insensitively.

use regex::Regex;

use super::{FieldMatch, Haystack};
use crate::Result;
use crate::catalog::Catalog;
use crate::evidence::EvidenceText;

const STRATEGY: &str = "catalog_word";

#[derive(Debug, Clone)]
pub struct BrandExtractor {
    patterns: Vec<(String, Regex)>,
}

/// Builds a case-insensitive whole-word pattern for a literal term.
pub(crate) fn word_pattern(term: &str) -> Result<Regex> {
    Ok(Regex::new(&format!(r"(?i)\b{}\b", regex::escape(term)))?)
}

impl BrandExtractor {
    pub fn new(catalog: &Catalog) -> Result<Self> {
        let patterns = catalog
            .brand_terms
            .iter()
            .map(|term| Ok((term.clone(), word_pattern(term)?)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    pub fn extract(&self, evidence: &EvidenceText) -> Option<FieldMatch> {
        let haystack = evidence.text();
        self.patterns.iter().find_map(|(brand, pattern)| {
            pattern
                .find(haystack)
                .map(|m| FieldMatch::new(brand.clone(), haystack, m.range(), Haystack::Text, STRATEGY))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn extract(text: &str) -> Option<FieldMatch> {
        BrandExtractor::new(&Catalog::default()).unwrap().extract(&EvidenceText::resolve(text, &[], None, 0))
    }

    #[rstest]
    #[case("Equipo PHILIPS de alta gama", "Philips")]
    #[case("un resonador siemens", "Siemens")]
    #[case("Tomógrafo GE Revolution", "GE")]
    #[case("el angiógrafo (Canon) llegó", "Canon")]
    fn test_whole_word_brand(#[case] text: &str, #[case] expected: &str) {
        assert_eq!(extract(text).unwrap().value, expected);
    }

    #[test]
    fn test_substrings_do_not_match() {
        assert!(extract("La agenda general del gerente").is_none());
        assert!(extract("Philipsburg").is_none());
    }

    #[test]
    fn test_catalog_order_wins() {
        let found = extract("Canon y Philips compitieron en la licitación").unwrap();
        assert_eq!(found.value, "Philips");
        assert_eq!(found.evidence, "Philips");
        assert_eq!(found.span, 8..15);
    }
}
