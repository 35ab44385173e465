//! Model name heuristics.
//!
//! Approximate by nature: the result is evidence of a model designation, not a
//! verified product name. Strategies, in order:
//!
//! 1. the detected brand followed by one to four model-like tokens ("Philips Ingenia 1.5T")
//! 2. a capitalized name followed by a field strength or slice count ("Aquilion 64 cortes")
//! 3. an equipment term followed by a short capitalized token ("tomógrafo Revolution")

use regex::Regex;

use super::{FieldMatch, Haystack};
use crate::Result;
use crate::catalog::Catalog;
use crate::evidence::EvidenceText;

/// A model-like token: starts upper-case or with a digit; dots only inside numbers.
const TOKEN: &str = r"[A-Z0-9](?:[A-Za-z0-9\-/+]|\.[0-9])*";

/// Capitalized Spanish function words that end a model designation.
const STOP_TOKENS: &[&str] =
    &["El", "La", "Los", "Las", "Un", "Una", "En", "De", "Del", "Y", "Con", "Para", "Por", "Que", "Se", "Al"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelStrategy {
    BrandFollowedByTokens,
    NameWithStrength,
    EquipmentWithToken,
}

impl ModelStrategy {
    pub const ORDER: [ModelStrategy; 3] = [Self::BrandFollowedByTokens, Self::NameWithStrength, Self::EquipmentWithToken];

    pub fn name(&self) -> &'static str {
        match self {
            Self::BrandFollowedByTokens => "brand_tokens",
            Self::NameWithStrength => "name_with_strength",
            Self::EquipmentWithToken => "equipment_token",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ModelExtractor {
    brand_patterns: Vec<(String, Regex)>,
    strength: Regex,
    equipment: Regex,
    /// Lower-cased words that must not be taken as a model token.
    excluded: Vec<String>,
}

impl ModelExtractor {
    pub fn new(catalog: &Catalog) -> Result<Self> {
        let brand_patterns = catalog
            .brand_terms
            .iter()
            .map(|brand| {
                let pattern = format!(r"(?i:\b{})\b((?: {}){{1,4}})", regex::escape(brand), TOKEN);
                Ok((brand.clone(), Regex::new(&pattern)?))
            })
            .collect::<Result<Vec<_>>>()?;

        let strength = Regex::new(
            r"\b([A-Z][A-Za-z]+(?: [A-Z][A-Za-z0-9]+)?) (\d+(?:[.,]\d+)? ?(?:T|[Tt]esla|[Tt]eslas|cortes|slices|canales))\b",
        )?;

        let terms: Vec<String> = catalog.equipment_terms.iter().map(|t| regex::escape(t)).collect();
        let equipment = Regex::new(&format!(r"\b(?i:{}) ([A-Z][A-Za-z0-9\-]{{1,19}})\b", terms.join("|")))?;

        let excluded = catalog
            .brand_terms
            .iter()
            .chain(&catalog.facility_terms)
            .filter_map(|t| t.split_whitespace().next())
            .map(|t| t.to_lowercase())
            .collect();

        Ok(Self { brand_patterns, strength, equipment, excluded })
    }

    pub fn extract(&self, evidence: &EvidenceText, brand: Option<&str>) -> Option<FieldMatch> {
        ModelStrategy::ORDER.iter().find_map(|s| self.apply(*s, evidence, brand))
    }

    pub fn apply(&self, strategy: ModelStrategy, evidence: &EvidenceText, brand: Option<&str>) -> Option<FieldMatch> {
        let text = evidence.text();
        match strategy {
            ModelStrategy::BrandFollowedByTokens => {
                let (brand, pattern) = self.brand_patterns.iter().find(|(b, _)| Some(b.as_str()) == brand)?;
                pattern.captures_iter(text).find_map(|caps| {
                    let whole = caps.get(0)?;
                    let captured = caps.get(1)?;
                    let tokens = leading_model_tokens(captured.as_str());
                    if tokens.is_empty() {
                        return None;
                    }
                    let value = format!("{} {}", brand, tokens.join(" "));
                    // tokens are single-space separated in collapsed evidence text
                    let kept: usize = tokens.iter().map(|t| t.len() + 1).sum();
                    let span = whole.start()..captured.start() + kept;
                    Some(FieldMatch::new(value, text, span, Haystack::Text, strategy.name()))
                })
            }
            ModelStrategy::NameWithStrength => self.strength.captures_iter(text).find_map(|caps| {
                let whole = caps.get(0)?;
                let name = caps.get(1)?;
                let mut start = name.start();
                let mut words = name.as_str().split(' ');
                let first = words.next()?;
                // "Con Ingenia 1.5T": the name proper starts at the second word
                if self.is_stop(first) {
                    let second = words.next()?;
                    if self.is_stop(second) {
                        return None;
                    }
                    start += first.len() + 1;
                }
                let span = start..whole.end();
                Some(FieldMatch::new(&text[span.clone()], text, span, Haystack::Text, strategy.name()))
            }),
            ModelStrategy::EquipmentWithToken => self.equipment.captures_iter(text).find_map(|caps| {
                let whole = caps.get(0)?;
                let token = caps.get(1)?.as_str();
                if self.is_stop(token) {
                    return None;
                }
                Some(FieldMatch::new(token, text, whole.range(), Haystack::Text, strategy.name()))
            }),
        }
    }

    /// Function words, brands and facility terms never start a model name.
    fn is_stop(&self, word: &str) -> bool {
        let lower = word.to_lowercase();
        STOP_TOKENS.contains(&word) || self.excluded.iter().any(|e| *e == lower)
    }
}

/// Tokens from the start of `captured` up to the first stop word.
fn leading_model_tokens(captured: &str) -> Vec<&str> {
    captured.split_whitespace().take_while(|t| !STOP_TOKENS.contains(t)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> ModelExtractor {
        ModelExtractor::new(&Catalog::default()).unwrap()
    }

    fn evidence(text: &str) -> EvidenceText {
        EvidenceText::resolve(text, &[], None, 0)
    }

    #[test]
    fn test_brand_followed_by_tokens() {
        let ev = evidence("Se instaló un resonador Philips Ingenia 1.5T en la sala nueva");
        let found = extractor().apply(ModelStrategy::BrandFollowedByTokens, &ev, Some("Philips")).unwrap();
        assert_eq!(found.value, "Philips Ingenia 1.5T");
        assert_eq!(found.evidence, "Philips Ingenia 1.5T");
        assert_eq!(found.strategy, "brand_tokens");
    }

    #[test]
    fn test_brand_tokens_capped_at_four() {
        let ev = evidence("equipo SIEMENS MAGNETOM Sola Fit XQ Extra");
        let found = extractor().apply(ModelStrategy::BrandFollowedByTokens, &ev, Some("Siemens")).unwrap();
        assert_eq!(found.value, "Siemens MAGNETOM Sola Fit XQ");
    }

    #[test]
    fn test_brand_tokens_stop_at_function_words() {
        let ev = evidence("Un equipo Canon Aquilion En el hospital");
        let found = extractor().apply(ModelStrategy::BrandFollowedByTokens, &ev, Some("Canon")).unwrap();
        assert_eq!(found.value, "Canon Aquilion");
        assert_eq!(found.evidence, "Canon Aquilion");

        let ev = evidence("la empresa Philips de Holanda");
        assert!(extractor().apply(ModelStrategy::BrandFollowedByTokens, &ev, Some("Philips")).is_none());
    }

    #[test]
    fn test_brand_strategy_needs_brand() {
        let ev = evidence("Philips Ingenia");
        assert!(extractor().apply(ModelStrategy::BrandFollowedByTokens, &ev, None).is_none());
    }

    #[test]
    fn test_name_with_strength() {
        let ev = evidence("El nuevo Ingenia 1.5T ya funciona");
        let found = extractor().apply(ModelStrategy::NameWithStrength, &ev, None).unwrap();
        assert_eq!(found.value, "Ingenia 1.5T");

        let ev = evidence("un tomógrafo Aquilion 64 cortes");
        let found = extractor().extract(&ev, None).unwrap();
        assert_eq!(found.value, "Aquilion 64 cortes");
        assert_eq!(found.strategy, "name_with_strength");
    }

    #[test]
    fn test_name_with_strength_skips_leading_function_word() {
        let ev = evidence("Con Ingenia 1.5T el servicio crece");
        let found = extractor().extract(&ev, None).unwrap();
        assert_eq!(found.value, "Ingenia 1.5T");
        assert_eq!(found.evidence, "Ingenia 1.5T");
        assert_eq!(found.strategy, "name_with_strength");

        assert!(extractor().apply(ModelStrategy::NameWithStrength, &evidence("Con Philips 3T"), None).is_none());
    }

    #[test]
    fn test_equipment_with_token() {
        let ev = evidence("Llegó el tomógrafo Revolution al centro");
        let found = extractor().extract(&ev, None).unwrap();
        assert_eq!(found.value, "Revolution");
        assert_eq!(found.evidence, "tomógrafo Revolution");
        assert_eq!(found.strategy, "equipment_token");
    }

    #[test]
    fn test_equipment_token_skips_facilities_and_brands() {
        assert!(extractor().extract(&evidence("un resonador Hospital Italiano"), None).is_none());
        assert!(extractor().extract(&evidence("un resonador Philips"), None).is_none());
    }

    #[test]
    fn test_no_model() {
        assert!(extractor().extract(&evidence("se compró un equipo nuevo"), None).is_none());
    }
}
