//! HTML parsing and DOM querying.
//!
//! This module provides the [`Document`] and [`Element`] types used by link
//! discovery and the field extractors to query markup with CSS selectors.
//!
//! # Example
//!
//! ```rust
//! use medscout_core::parse::Document;
//!
//! let html = r#"
//!     <html>
//!         <head><title>Salud</title></head>
//!         <body><p>Nuevo resonador</p><p>en el Hospital Italiano</p></body>
//!     </html>
//! "#;
//!
//! let doc = Document::parse(html).unwrap();
//! assert_eq!(doc.title(), Some("Salud".to_string()));
//! assert_eq!(doc.paragraphs().len(), 2);
//! ```

use scraper::{ElementRef, Html, Selector};

use crate::preprocess::{PreprocessConfig, preprocess_html};
use crate::{Result, ScoutError};

/// Represents a parsed HTML document.
pub struct Document {
    html: Html,
}

impl Document {
    /// Parses HTML from a string without preprocessing.
    ///
    /// Source listing pages are parsed this way so that navigation anchors survive.
    pub fn parse(html: &str) -> Result<Self> {
        let html = Html::parse_document(html);
        Ok(Self { html })
    }

    /// Parses HTML after stripping scripts, styles, page chrome and hidden elements.
    ///
    /// Article pages are parsed this way before their paragraphs are harvested.
    pub fn parse_with_preprocessing(html: &str) -> Result<Self> {
        let cleaned = preprocess_html(html, &PreprocessConfig::default());
        Self::parse(&cleaned)
    }

    /// Selects elements using a CSS selector.
    ///
    /// # Errors
    ///
    /// Returns [`ScoutError::HtmlParseError`] if the selector is invalid.
    pub fn select(&'_ self, selector: &str) -> Result<Vec<Element<'_>>> {
        let sel = parse_selector(selector)?;
        Ok(self.html.select(&sel).map(|el| Element { element: el }).collect())
    }

    /// Gets the trimmed content of the `<title>` element, if present and non-empty.
    pub fn title(&self) -> Option<String> {
        let selector = Selector::parse("title").ok()?;
        self.html
            .select(&selector)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .filter(|t| !t.is_empty())
    }

    /// Gets the trimmed, non-empty text of every `<p>` element in document order.
    pub fn paragraphs(&self) -> Vec<String> {
        self.select("p")
            .unwrap_or_default()
            .iter()
            .map(|p| collapse_whitespace(&p.text()))
            .filter(|t| !t.is_empty())
            .collect()
    }

    /// Gets meta tag content by `name` or `property` attribute.
    pub fn meta_content(&self, attr: &str) -> Option<String> {
        for key in ["name", "property", "itemprop"] {
            let selector = format!("meta[{}=\"{}\"]", key, attr);
            if let Ok(elements) = self.select(&selector)
                && let Some(el) = elements.first()
                && let Some(content) = el.attr("content")
                && !content.trim().is_empty()
            {
                return Some(content.trim().to_string());
            }
        }
        None
    }
}

/// A wrapper around scraper's ElementRef.
#[derive(Clone, Debug)]
pub struct Element<'a> {
    element: ElementRef<'a>,
}

impl<'a> Element<'a> {
    /// Gets the text content of this element.
    pub fn text(&self) -> String {
        self.element.text().collect()
    }

    /// Gets the value of an attribute.
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.element.value().attr(name)
    }

    /// Gets the lowercase tag name of this element.
    pub fn tag_name(&self) -> String {
        self.element.value().name().to_lowercase()
    }

    /// Gets the closest ancestor element.
    pub fn parent(&self) -> Option<Element<'a>> {
        self.element
            .parent()
            .and_then(ElementRef::wrap)
            .map(|element| Element { element })
    }

    /// Selects descendant elements using a CSS selector.
    pub fn select(&'_ self, selector: &str) -> Result<Vec<Element<'_>>> {
        let sel = parse_selector(selector)?;
        Ok(self.element.select(&sel).map(|el| Element { element: el }).collect())
    }
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| ScoutError::HtmlParseError(format!("Invalid selector: {}", e)))
}

/// Collapses runs of whitespace into single spaces and trims the ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
