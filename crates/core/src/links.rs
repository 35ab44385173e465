//! Link discovery and normalization for source pages.
//!
//! # Example
//!
//! ```rust
//! use medscout_core::links::normalize_link;
//! use url::Url;
//!
//! let base = Url::parse("https://x.com/p").unwrap();
//! assert_eq!(normalize_link("/a/b", &base), Some("https://x.com/a/b".to_string()));
//! assert_eq!(normalize_link("//cdn.x.com/y", &base), Some("https://cdn.x.com/y".to_string()));
//! ```

use std::collections::HashSet;

use url::Url;

use crate::parse::{Document, Element, collapse_whitespace};
use crate::record::CandidateLink;
use crate::{Result, ScoutError};

/// Schemes that never lead to an article.
const SKIPPED_SCHEMES: &[&str] = &["javascript:", "mailto:", "tel:", "data:", "whatsapp:"];

/// Ancestors considered when capturing the text around an anchor.
const SNIPPET_BLOCKS: &[&str] = &["p", "li", "article", "section", "div", "td", "h1", "h2", "h3", "h4"];

/// Limits applied while discovering links on one page.
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    /// Maximum links returned for the page.
    pub max_links: usize,
    /// Maximum characters kept in a snippet.
    pub snippet_len: usize,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self { max_links: 40, snippet_len: 280 }
    }
}

/// Resolves an anchor `href` to an absolute URL against `base`.
///
/// Protocol-relative links get `https:`; root-relative and dot-relative links
/// are resolved against the base; absolute `http(s)` links are returned
/// unchanged. Fragments, script and mail links yield `None`.
pub fn normalize_link(href: &str, base: &Url) -> Option<String> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lower = href.to_lowercase();
    if SKIPPED_SCHEMES.iter().any(|s| lower.starts_with(s)) {
        return None;
    }

    if lower.starts_with("http://") || lower.starts_with("https://") {
        return Url::parse(href).ok().map(|_| href.to_string());
    }

    if let Some(rest) = href.strip_prefix("//") {
        let absolute = format!("https://{}", rest);
        return Url::parse(&absolute).ok().map(|_| absolute);
    }

    if lower.contains("://") {
        return None;
    }

    base.join(href).ok().map(|url| url.to_string())
}

/// Enumerates candidate links on a source page.
///
/// Anchors with empty text or empty `href` are discarded, URLs are made
/// absolute and deduplicated within the page, and at most
/// [`DiscoveryConfig::max_links`] links are returned.
///
/// # Errors
///
/// Returns [`ScoutError::InvalidUrl`] if `base_url` cannot be parsed.
pub fn discover_links(
    html: &str, base_url: &str, source: &str, config: &DiscoveryConfig,
) -> Result<Vec<CandidateLink>> {
    let base = Url::parse(base_url).map_err(|e| ScoutError::InvalidUrl(format!("{}: {}", base_url, e)))?;
    let doc = Document::parse(html)?;
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for anchor in doc.select("a[href]")? {
        if links.len() >= config.max_links {
            break;
        }

        let anchor_text = collapse_whitespace(&anchor.text());
        let Some(href) = anchor.attr("href") else {
            continue;
        };
        if anchor_text.is_empty() || href.trim().is_empty() {
            continue;
        }

        let Some(url) = normalize_link(href, &base) else {
            continue;
        };
        if url == base.as_str() || !seen.insert(url.clone()) {
            continue;
        }

        let snippet = snippet_for(&anchor, &anchor_text, config.snippet_len);
        links.push(CandidateLink { source: source.to_string(), url, anchor_text, snippet });
    }

    tracing::debug!(source, found = links.len(), "discovered links");
    Ok(links)
}

/// Text of the nearest block ancestor that says more than the anchor itself.
///
/// Only blocks that wrap this anchor alone qualify; a block holding other
/// links is a listing container and its text belongs to other stories.
fn snippet_for(anchor: &Element<'_>, anchor_text: &str, max_chars: usize) -> Option<String> {
    let mut current = anchor.parent();
    let mut depth = 0;

    while let Some(element) = current {
        if depth > 4 {
            break;
        }
        let anchors = element.select("a[href]").map_or(usize::MAX, |found| found.len());
        if anchors > 1 {
            return None;
        }
        if SNIPPET_BLOCKS.contains(&element.tag_name().as_str()) {
            let text = collapse_whitespace(&element.text());
            if text.chars().count() > anchor_text.chars().count() {
                return Some(truncate_chars(&text, max_chars));
            }
        }
        current = element.parent();
        depth += 1;
    }

    None
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => text[..idx].trim_end().to_string(),
        None => text.to_string(),
    }
}
