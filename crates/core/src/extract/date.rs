//! Date evidence, read in tiers from page markup down to the link snippet.
//!
//! Tiers, in order: `<time datetime>` attribute, `<time>` text (day-first),
//! publication-time meta tags, a date-shaped pattern in the snippet. When every
//! tier fails the run date is used, marked as a scrape-time sentinel. A parse
//! failure at one tier falls through to the next; nothing here returns an error.

use regex::Regex;
use time::{Date, Month};

use crate::Result;
use crate::parse::Document;
use crate::record::RecordDate;

/// Meta tags carrying a publication time, in lookup order.
const PUBLISHED_META: &[&str] = &[
    "article:published_time",
    "og:published_time",
    "datePublished",
    "pubdate",
    "publish-date",
    "DC.date.issued",
    "DC.date",
    "date",
];

const MIN_YEAR: i32 = 1990;
const MAX_YEAR: i32 = 2100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateStrategy {
    TimeDatetimeAttr,
    TimeElementText,
    PublishedMeta,
    SnippetPattern,
}

impl DateStrategy {
    pub const ORDER: [DateStrategy; 4] =
        [Self::TimeDatetimeAttr, Self::TimeElementText, Self::PublishedMeta, Self::SnippetPattern];

    pub fn name(&self) -> &'static str {
        match self {
            Self::TimeDatetimeAttr => "time_datetime_attr",
            Self::TimeElementText => "time_element_text",
            Self::PublishedMeta => "published_meta",
            Self::SnippetPattern => "snippet_pattern",
        }
    }
}

/// Outcome of date extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateMatch {
    pub date: RecordDate,
    /// Raw text the date was parsed from; empty for the sentinel.
    pub evidence: String,
    pub strategy: &'static str,
}

#[derive(Debug, Clone)]
pub struct DateExtractor {
    iso: Regex,
    numeric: Regex,
    long_form: Regex,
}

impl DateExtractor {
    pub fn new() -> Result<Self> {
        Ok(Self {
            iso: Regex::new(r"\b(\d{4})-(\d{1,2})-(\d{1,2})")?,
            numeric: Regex::new(r"\b(\d{1,2})[/.\-](\d{1,2})[/.\-](\d{4}|\d{2})\b")?,
            long_form: Regex::new(
                r"(?i)\b(\d{1,2})(?:º|°)? de (enero|febrero|marzo|abril|mayo|junio|julio|agosto|septiembre|setiembre|octubre|noviembre|diciembre)(?: de| del)? (\d{4})\b",
            )?,
        })
    }

    /// Runs every tier, falling back to `today` as a scrape-time sentinel.
    pub fn extract(&self, doc: Option<&Document>, snippet: Option<&str>, today: Date) -> DateMatch {
        DateStrategy::ORDER.iter().find_map(|s| self.apply(*s, doc, snippet)).unwrap_or(DateMatch {
            date: RecordDate::ScrapeTime(today),
            evidence: String::new(),
            strategy: "scrape_time",
        })
    }

    pub fn apply(&self, strategy: DateStrategy, doc: Option<&Document>, snippet: Option<&str>) -> Option<DateMatch> {
        let found = |date: Date, evidence: &str| DateMatch {
            date: RecordDate::Published(date),
            evidence: evidence.trim().to_string(),
            strategy: strategy.name(),
        };

        match strategy {
            DateStrategy::TimeDatetimeAttr => doc?.select("time[datetime]").ok()?.iter().find_map(|el| {
                let raw = el.attr("datetime")?;
                self.parse_iso_prefix(raw).map(|d| found(d, raw))
            }),
            DateStrategy::TimeElementText => doc?.select("time").ok()?.iter().find_map(|el| {
                let text = el.text();
                self.parse_day_first(&text).map(|d| found(d, &text))
            }),
            DateStrategy::PublishedMeta => {
                let doc = doc?;
                PUBLISHED_META.iter().find_map(|name| {
                    let raw = doc.meta_content(name)?;
                    self.parse_iso_prefix(&raw).or_else(|| self.parse_day_first(&raw)).map(|d| found(d, &raw))
                })
            }
            DateStrategy::SnippetPattern => {
                let snippet = snippet?;
                self.find_in_text(snippet).map(|(d, evidence)| found(d, evidence))
            }
        }
    }

    /// Parses a leading `YYYY-MM-DD` (the rest of an RFC 3339 timestamp is ignored).
    pub fn parse_iso_prefix(&self, raw: &str) -> Option<Date> {
        let caps = self.iso.captures(raw.trim())?;
        if caps.get(0)?.start() != 0 {
            return None;
        }
        calendar_date(caps[1].parse().ok()?, caps[2].parse().ok()?, caps[3].parse().ok()?)
    }

    /// Parses the first date in free text, reading numeric dates day-first.
    pub fn parse_day_first(&self, text: &str) -> Option<Date> {
        self.find_in_text(text).map(|(date, _)| date)
    }

    /// Finds the first recognizable date in `text`, returning it with the matched text.
    ///
    /// Long-form Spanish dates are preferred, then ISO dates, then `dd/mm/yyyy`.
    pub fn find_in_text<'t>(&self, text: &'t str) -> Option<(Date, &'t str)> {
        if let Some(caps) = self.long_form.captures(text)
            && let Some(month) = spanish_month(&caps[2])
            && let Some(date) = calendar_date(caps[3].parse().ok()?, month, caps[1].parse().ok()?)
        {
            return Some((date, caps.get(0)?.as_str()));
        }

        if let Some(caps) = self.iso.captures(text)
            && let Some(date) = calendar_date(caps[1].parse().ok()?, caps[2].parse().ok()?, caps[3].parse().ok()?)
        {
            return Some((date, caps.get(0)?.as_str()));
        }

        self.numeric.captures_iter(text).find_map(|caps| {
            let day: u8 = caps[1].parse().ok()?;
            let month: u8 = caps[2].parse().ok()?;
            let year = expand_year(&caps[3])?;
            calendar_date(year, month, day).map(|d| (d, caps.get(0).map_or("", |m| m.as_str())))
        })
    }
}

fn expand_year(raw: &str) -> Option<i32> {
    let year: i32 = raw.parse().ok()?;
    if raw.len() == 2 { Some(2000 + year) } else { Some(year) }
}

fn calendar_date(year: i32, month: u8, day: u8) -> Option<Date> {
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return None;
    }
    let month = Month::try_from(month).ok()?;
    Date::from_calendar_date(year, month, day).ok()
}

fn spanish_month(name: &str) -> Option<u8> {
    let month = match name.to_lowercase().as_str() {
        "enero" => 1,
        "febrero" => 2,
        "marzo" => 3,
        "abril" => 4,
        "mayo" => 5,
        "junio" => 6,
        "julio" => 7,
        "agosto" => 8,
        "septiembre" | "setiembre" => 9,
        "octubre" => 10,
        "noviembre" => 11,
        "diciembre" => 12,
        _ => return None,
    };
    Some(month)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    const TODAY: Date = date!(2026 - 10 - 19);

    fn extractor() -> DateExtractor {
        DateExtractor::new().unwrap()
    }

    fn doc(html: &str) -> Document {
        Document::parse(html).unwrap()
    }

    #[test]
    fn test_datetime_attribute_wins() {
        let page = doc(r#"
            <head><meta property="article:published_time" content="2023-01-01T00:00:00Z"></head>
            <body><time datetime="2024-03-05T08:30:00-03:00">5 de marzo de 2024</time></body>
        "#);
        let found = extractor().extract(Some(&page), None, TODAY);
        assert_eq!(found.date, RecordDate::Published(date!(2024 - 03 - 05)));
        assert_eq!(found.strategy, "time_datetime_attr");
    }

    #[test]
    fn test_time_text_is_day_first() {
        let page = doc("<body><time>Publicado el 05/03/2024 10:15</time></body>");
        let found = extractor().extract(Some(&page), None, TODAY);
        assert_eq!(found.date, RecordDate::Published(date!(2024 - 03 - 05)));
        assert_eq!(found.strategy, "time_element_text");
    }

    #[test]
    fn test_unparseable_attribute_falls_through() {
        let page = doc(r#"<body><time datetime="ayer">12 de septiembre de 2025</time></body>"#);
        let found = extractor().extract(Some(&page), None, TODAY);
        assert_eq!(found.date, RecordDate::Published(date!(2025 - 09 - 12)));
        assert_eq!(found.strategy, "time_element_text");
    }

    #[test]
    fn test_published_meta() {
        let page = doc(r#"<head><meta name="pubdate" content="2022-11-30"></head><body><p>x</p></body>"#);
        let found = extractor().apply(DateStrategy::PublishedMeta, Some(&page), None).unwrap();
        assert_eq!(found.date, RecordDate::Published(date!(2022 - 11 - 30)));
        assert_eq!(found.evidence, "2022-11-30");
    }

    #[test]
    fn test_snippet_pattern() {
        let found = extractor().extract(None, Some("Infobae · 14 de febrero de 2025 · Nuevo resonador"), TODAY);
        assert_eq!(found.date, RecordDate::Published(date!(2025 - 02 - 14)));
        assert_eq!(found.evidence, "14 de febrero de 2025");
        assert_eq!(found.strategy, "snippet_pattern");
    }

    #[test]
    fn test_sentinel_when_nothing_found() {
        let page = doc("<body><time>hace 3 horas</time><p>sin fecha</p></body>");
        let found = extractor().extract(Some(&page), Some("sin fecha"), TODAY);
        assert_eq!(found.date, RecordDate::ScrapeTime(TODAY));
        assert_eq!(found.date.to_string(), "*2026-10-19*");
    }

    #[test]
    fn test_invalid_calendar_dates_are_rejected() {
        let ex = extractor();
        assert_eq!(ex.parse_day_first("31/02/2024"), None);
        assert_eq!(ex.parse_iso_prefix("2024-13-01"), None);
        assert_eq!(ex.parse_day_first("1/1/1850"), None);
        assert_eq!(ex.parse_day_first("7.6.24"), Some(date!(2024 - 06 - 07)));
    }
}
