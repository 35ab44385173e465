//! Evidence text: the single searchable string every field extractor reads.
//!
//! Resolution happens once per page, before extraction, so extractors never
//! need to know whether their text came from the full article or from the
//! snippet captured next to the link.
//!
//! Fragments (headline, paragraphs, snippet) are joined with newlines. Patterns
//! that span words use literal spaces, so a match never runs from one
//! paragraph into the next.

use crate::parse::collapse_whitespace;

/// Default minimum length below which the snippet is appended.
pub const DEFAULT_MIN_TEXT_LEN: usize = 80;

/// Where the evidence text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvidenceOrigin {
    /// Title and article paragraphs were long enough on their own.
    FullPage,
    /// Page text was too short; the snippet was appended as a supplement.
    PageWithSnippet,
}

/// Normalized text for one candidate page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvidenceText {
    text: String,
    lower: String,
    title: String,
    title_lower: String,
    page_title: Option<String>,
    origin: EvidenceOrigin,
}

impl EvidenceText {
    /// Concatenates title then paragraphs; appends the snippet when the result is
    /// shorter than `min_len` characters.
    pub fn resolve(title: &str, paragraphs: &[String], snippet: Option<&str>, min_len: usize) -> Self {
        let title = collapse_whitespace(title);
        let mut parts = Vec::with_capacity(paragraphs.len() + 2);
        if !title.is_empty() {
            parts.push(title.clone());
        }
        parts.extend(paragraphs.iter().map(|p| collapse_whitespace(p)).filter(|p| !p.is_empty()));

        let mut text = parts.join("\n");
        let mut origin = EvidenceOrigin::FullPage;

        if text.chars().count() < min_len
            && let Some(snippet) = snippet.map(collapse_whitespace).filter(|s| !s.is_empty())
        {
            if !text.is_empty() {
                text.push('\n');
            }
            text.push_str(&snippet);
            origin = EvidenceOrigin::PageWithSnippet;
        }

        let lower = text.to_lowercase();
        let title_lower = title.to_lowercase();
        Self { text, lower, title, title_lower, page_title: None, origin }
    }

    /// Attaches the page's `<title>`, searched only as a fallback and never part of the text.
    pub fn with_page_title(mut self, page_title: Option<String>) -> Self {
        self.page_title = page_title.map(|t| collapse_whitespace(&t)).filter(|t| !t.is_empty());
        self
    }

    /// Evidence text with its original casing.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Lower-cased evidence text for case-insensitive term lookups.
    pub fn lower(&self) -> &str {
        &self.lower
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn title_lower(&self) -> &str {
        &self.title_lower
    }

    pub fn page_title(&self) -> Option<&str> {
        self.page_title.as_deref()
    }

    pub fn origin(&self) -> EvidenceOrigin {
        self.origin
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paragraphs(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_resolve_concatenates_title_then_paragraphs() {
        let body = paragraphs(&[
            "El Hospital El Cruce incorporó un nuevo resonador de 3 Tesla para diagnóstico.",
            "  La inversión   forma parte del plan provincial. ",
        ]);
        let evidence = EvidenceText::resolve("Nuevo Resonador", &body, Some("ignorado"), DEFAULT_MIN_TEXT_LEN);

        assert!(evidence.text().starts_with("Nuevo Resonador\nEl Hospital El Cruce"));
        assert!(evidence.text().ends_with("\nLa inversión forma parte del plan provincial."));
        assert!(evidence.lower().contains("nuevo resonador"));
        assert!(!evidence.text().contains("ignorado"));
        assert_eq!(evidence.origin(), EvidenceOrigin::FullPage);
    }

    #[test]
    fn test_resolve_appends_snippet_when_short() {
        let evidence = EvidenceText::resolve(
            "Tomógrafo",
            &[],
            Some("Hace 2 horas - La Clínica Bazterrica sumó un tomógrafo Canon"),
            DEFAULT_MIN_TEXT_LEN,
        );

        assert_eq!(evidence.origin(), EvidenceOrigin::PageWithSnippet);
        assert!(evidence.text().contains("Clínica Bazterrica"));
        assert_eq!(evidence.title_lower(), "tomógrafo");
    }

    #[test]
    fn test_resolve_without_snippet_stays_short() {
        let evidence = EvidenceText::resolve("Título", &[], None, DEFAULT_MIN_TEXT_LEN);
        assert_eq!(evidence.text(), "Título");
        assert_eq!(evidence.origin(), EvidenceOrigin::FullPage);
    }

    #[test]
    fn test_page_title_is_kept_apart() {
        let evidence =
            EvidenceText::resolve("Nota", &[], None, 0).with_page_title(Some(" Llega el  angiógrafo ".to_string()));
        assert_eq!(evidence.page_title(), Some("Llega el angiógrafo"));
        assert!(!evidence.text().contains("angiógrafo"));
    }

    #[test]
    fn test_resolve_empty() {
        let evidence = EvidenceText::resolve("", &[], Some("   "), DEFAULT_MIN_TEXT_LEN);
        assert!(evidence.is_empty());
    }
}
