//! Source definitions: static listing pages and paginated search endpoints.
//!
//! # Example
//!
//! ```rust
//! use medscout_core::source::Source;
//!
//! let source = Source::search("Buscador", "https://buscador.test/?q={query}&p={page}", "resonador");
//! let urls = source.page_urls(2).unwrap();
//! assert_eq!(urls[1], "https://buscador.test/?q=resonador&p=2");
//! ```

use serde::{Deserialize, Serialize};
use url::Url;
use url::form_urlencoded::byte_serialize;

use crate::{Result, ScoutError};

/// Results per page assumed when expanding the `{offset}` placeholder.
pub const SEARCH_PAGE_SIZE: usize = 10;

/// Query sent to search sources by default.
pub const DEFAULT_QUERY: &str =
    "electromedicina OR resonador OR resonancia OR tomógrafo OR tomografía OR \"rayos X\" OR angiógrafo";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceKind {
    /// A single page listing articles.
    Static { url: String },
    /// A URL template with `{query}` and optionally `{page}` (1-based) or `{offset}` placeholders.
    Search { template: String, query: String },
}

/// A configured place to look for candidate links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub label: String,
    #[serde(flatten)]
    pub kind: SourceKind,
}

impl Source {
    pub fn static_page(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self { label: label.into(), kind: SourceKind::Static { url: url.into() } }
    }

    pub fn search(label: impl Into<String>, template: impl Into<String>, query: impl Into<String>) -> Self {
        Self { label: label.into(), kind: SourceKind::Search { template: template.into(), query: query.into() } }
    }

    /// Parses an ad-hoc `LABEL=URL` definition into a static source.
    pub fn parse_definition(definition: &str) -> Result<Self> {
        let (label, url) = definition
            .split_once('=')
            .ok_or_else(|| ScoutError::ConfigError(format!("expected LABEL=URL, got '{}'", definition)))?;
        let (label, url) = (label.trim(), url.trim());
        if label.is_empty() {
            return Err(ScoutError::ConfigError(format!("missing label in '{}'", definition)));
        }
        Url::parse(url).map_err(|e| ScoutError::InvalidUrl(format!("{}: {}", url, e)))?;
        Ok(Self::static_page(label, url))
    }

    /// Whether the source yields more than one page when asked.
    pub fn is_paginated(&self) -> bool {
        match &self.kind {
            SourceKind::Static { .. } => false,
            SourceKind::Search { template, .. } => template.contains("{page}") || template.contains("{offset}"),
        }
    }

    /// URLs to fetch for this source, at most `pages` of them for paginated sources.
    ///
    /// # Errors
    ///
    /// Returns [`ScoutError::InvalidUrl`] if a generated URL does not parse.
    pub fn page_urls(&self, pages: usize) -> Result<Vec<String>> {
        let urls = match &self.kind {
            SourceKind::Static { url } => vec![url.clone()],
            SourceKind::Search { template, query } => {
                let query: String = byte_serialize(query.as_bytes()).collect();
                let count = if self.is_paginated() { pages.max(1) } else { 1 };
                (1..=count)
                    .map(|page| {
                        template
                            .replace("{query}", &query)
                            .replace("{page}", &page.to_string())
                            .replace("{offset}", &((page - 1) * SEARCH_PAGE_SIZE).to_string())
                    })
                    .collect()
            }
        };

        for url in &urls {
            Url::parse(url).map_err(|e| ScoutError::InvalidUrl(format!("{}: {}", url, e)))?;
        }
        Ok(urls)
    }
}

/// Built-in sources for the Argentine market.
pub fn default_sources() -> Vec<Source> {
    vec![
        Source::search(
            "Google News",
            "https://www.google.com/search?q={query}&tbm=nws&hl=es-419&gl=ar&start={offset}",
            DEFAULT_QUERY,
        ),
        Source::static_page("Ministerio de Salud", "https://www.argentina.gob.ar/salud/noticias"),
        Source::static_page("Clarín Salud", "https://www.clarin.com/salud/"),
        Source::static_page("Cronista Salud", "https://www.cronista.com/category/salud/"),
        Source::static_page("Infobae Salud", "https://www.infobae.com/salud/"),
        Source::static_page("La Nación Salud", "https://www.lanacion.com.ar/salud/"),
    ]
}

/// Selects sources by label, case-insensitively, preserving the order of `labels`.
///
/// An empty selection keeps every source.
///
/// # Errors
///
/// Returns [`ScoutError::ConfigError`] naming the first unknown label.
pub fn select_sources(available: &[Source], labels: &[String]) -> Result<Vec<Source>> {
    if labels.is_empty() {
        return Ok(available.to_vec());
    }

    labels
        .iter()
        .map(|label| {
            available
                .iter()
                .find(|s| s.label.to_lowercase() == label.to_lowercase())
                .cloned()
                .ok_or_else(|| ScoutError::ConfigError(format!("unknown source '{}'", label)))
        })
        .collect()
}
