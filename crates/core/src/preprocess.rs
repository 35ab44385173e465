//! Markup cleaning applied to article pages before text is harvested.
//!
//! News pages carry a lot of text that is not the article: scripts, related
//! story rails, newsletter boxes, comment threads. Left in place those
//! paragraphs leak brands and facilities from unrelated stories into a record.

use std::sync::LazyLock;

use regex::Regex;

/// Class/id fragments marking page chrome on Spanish-language news sites.
static CHROME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(related|relacionad|recomendad|newsletter|suscri|comment|comentario|sidebar|share|compartir|banner|publicidad|advert|breadcrumb|menu|footer|tags?-list|most-read|mas-leidas)",
    )
    .expect("chrome pattern is valid")
});

static HIDDEN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(display\s*:\s*none|visibility\s*:\s*hidden)").expect("hidden pattern is valid")
});

static COMMENT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("comment pattern is valid"));

/// Configuration for HTML preprocessing
#[derive(Debug, Clone)]
pub struct PreprocessConfig {
    /// Remove script, style, noscript, iframe, svg and template tags
    pub remove_code: bool,
    /// Remove nav, aside, footer and form elements
    pub remove_structural_chrome: bool,
    /// Remove elements whose class or id looks like page chrome
    pub remove_chrome_classes: bool,
    /// Remove elements hidden with inline styles
    pub remove_hidden: bool,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self { remove_code: true, remove_structural_chrome: true, remove_chrome_classes: true, remove_hidden: true }
    }
}

/// Strips non-article markup, returning the input unchanged if rewriting fails.
pub fn preprocess_html(html: &str, config: &PreprocessConfig) -> String {
    let without_comments = COMMENT_PATTERN.replace_all(html, "");
    rewrite(&without_comments, config)
}

fn rewrite(html: &str, config: &PreprocessConfig) -> String {
    let mut handlers = Vec::new();

    if config.remove_code {
        handlers.push(lol_html::element!("script, style, noscript, iframe, svg, template", |el| {
            el.remove();
            Ok(())
        }));
    }

    if config.remove_structural_chrome {
        handlers.push(lol_html::element!("nav, aside, footer, form", |el| {
            el.remove();
            Ok(())
        }));
    }

    let remove_chrome_classes = config.remove_chrome_classes;
    let remove_hidden = config.remove_hidden;
    if remove_chrome_classes || remove_hidden {
        handlers.push(lol_html::element!("*", move |el| {
            if remove_hidden
                && let Some(style) = el.get_attribute("style")
                && HIDDEN_PATTERN.is_match(&style)
            {
                el.remove();
                return Ok(());
            }

            if remove_chrome_classes {
                let id = el.get_attribute("id").unwrap_or_default();
                let class = el.get_attribute("class").unwrap_or_default();
                let is_body_like = matches!(el.tag_name().as_str(), "html" | "body" | "main" | "article");
                if !is_body_like
                    && (CHROME_PATTERN.is_match(&id) || class.split_whitespace().any(|c| CHROME_PATTERN.is_match(c)))
                {
                    el.remove();
                }
            }
            Ok(())
        }));
    }

    if handlers.is_empty() {
        return html.to_string();
    }

    let mut output = String::new();
    let mut rewriter = lol_html::HtmlRewriter::new(
        lol_html::Settings { element_content_handlers: handlers, ..Default::default() },
        |c: &[u8]| {
            output.push_str(&String::from_utf8_lossy(c));
        },
    );

    if rewriter.write(html.as_bytes()).is_err() {
        tracing::debug!("markup rewrite failed, keeping original html");
        return html.to_string();
    }

    if rewriter.end().is_err() {
        tracing::debug!("markup rewrite failed, keeping original html");
        return html.to_string();
    }

    if output.is_empty() { html.to_string() } else { output }
}
