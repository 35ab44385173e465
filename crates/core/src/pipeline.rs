//! The candidate pipeline: discovery, per-link extraction, filtering, dedup and ranking.
//!
//! Sources are processed one at a time and links within a source one at a time,
//! with a politeness delay between fetches. A failing link or source is logged,
//! counted in the [`FailureTally`] and skipped; the run itself never errors.
//!
//! # Example
//!
//! ```rust,no_run
//! use medscout_core::{Catalog, HttpFetcher, Pipeline, PipelineConfig, default_sources};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let fetcher = HttpFetcher::new(Default::default())?;
//! let config = PipelineConfig::builder().quality_mode(true).pages(2).build();
//! let report = Pipeline::new(Catalog::default(), config, fetcher).run(&default_sources()).await;
//! println!("{} records, {} failures", report.records.len(), report.failures.total());
//! # Ok(())
//! # }
//! ```

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};
use std::time::Duration;

use serde::Serialize;
use time::{Date, OffsetDateTime};

use crate::catalog::Catalog;
use crate::error::FailureKind;
use crate::evidence::{DEFAULT_MIN_TEXT_LEN, EvidenceText};
use crate::extract::Extractors;
use crate::fetch::Fetcher;
use crate::links::{DiscoveryConfig, discover_links};
use crate::parse::Document;
use crate::record::{CandidateLink, ExtractionRecord};
use crate::source::Source;
use crate::{Result, ScoutError};

/// Final ordering of the result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Equipment type ascending, then date descending.
    TypeThenDate,
    /// Confidence descending, then date descending.
    ConfidenceThenDate,
}

impl SortOrder {
    pub fn compare(&self, a: &ExtractionRecord, b: &ExtractionRecord) -> Ordering {
        let primary = match self {
            Self::TypeThenDate => match (&a.equipment_type, &b.equipment_type) {
                (Some(x), Some(y)) => x.to_lowercase().cmp(&y.to_lowercase()),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
            Self::ConfidenceThenDate => b.confidence.cmp(&a.confidence),
        };
        primary.then_with(|| a.date.cmp_desc(&b.date))
    }
}

/// Configuration for a pipeline run.
///
/// # Example
///
/// ```rust
/// use medscout_core::{PipelineConfig, SortOrder};
///
/// let config = PipelineConfig::builder().quality_mode(true).max_links_per_source(10).build();
/// assert_eq!(config.sort_order(), SortOrder::ConfidenceThenDate);
/// ```
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Maximum candidate links taken from one source (default: 40).
    pub max_links_per_source: usize,

    /// Pages traversed for paginated sources (default: 1).
    pub pages: usize,

    /// Keep only records with both a facility and an equipment type (default: false).
    pub quality_mode: bool,

    /// Explicit ordering; `None` follows the quality mode.
    pub sort: Option<SortOrder>,

    /// Page text shorter than this gets the link snippet appended (default: 80).
    pub min_text_len: usize,

    /// Maximum snippet length in characters (default: 280).
    pub snippet_len: usize,

    /// Pause between successive fetches (default: 500 ms).
    pub politeness_delay: Duration,

    /// Only fetch links whose anchor or snippet mentions an equipment term (default: true).
    pub prefilter_anchors: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_links_per_source: 40,
            pages: 1,
            quality_mode: false,
            sort: None,
            min_text_len: DEFAULT_MIN_TEXT_LEN,
            snippet_len: 280,
            politeness_delay: Duration::from_millis(500),
            prefilter_anchors: true,
        }
    }
}

impl PipelineConfig {
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::new()
    }

    /// The effective ordering: quality runs rank by confidence, others group by type.
    pub fn sort_order(&self) -> SortOrder {
        self.sort.unwrap_or(if self.quality_mode { SortOrder::ConfidenceThenDate } else { SortOrder::TypeThenDate })
    }
}

/// Builder for PipelineConfig.
pub struct PipelineConfigBuilder {
    config: PipelineConfig,
}

impl PipelineConfigBuilder {
    pub fn new() -> Self {
        Self { config: PipelineConfig::default() }
    }

    pub fn max_links_per_source(mut self, value: usize) -> Self {
        self.config.max_links_per_source = value;
        self
    }

    pub fn pages(mut self, value: usize) -> Self {
        self.config.pages = value;
        self
    }

    pub fn quality_mode(mut self, value: bool) -> Self {
        self.config.quality_mode = value;
        self
    }

    pub fn sort(mut self, value: SortOrder) -> Self {
        self.config.sort = Some(value);
        self
    }

    pub fn min_text_len(mut self, value: usize) -> Self {
        self.config.min_text_len = value;
        self
    }

    pub fn snippet_len(mut self, value: usize) -> Self {
        self.config.snippet_len = value;
        self
    }

    pub fn politeness_delay(mut self, value: Duration) -> Self {
        self.config.politeness_delay = value;
        self
    }

    pub fn prefilter_anchors(mut self, value: bool) -> Self {
        self.config.prefilter_anchors = value;
        self
    }

    pub fn build(self) -> PipelineConfig {
        self.config
    }
}

impl Default for PipelineConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Count of recovered failures per kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FailureTally(BTreeMap<FailureKind, usize>);

impl FailureTally {
    pub fn record(&mut self, kind: FailureKind) {
        *self.0.entry(kind).or_insert(0) += 1;
    }

    pub fn count(&self, kind: FailureKind) -> usize {
        self.0.get(&kind).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.0.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FailureKind, usize)> + '_ {
        self.0.iter().map(|(k, v)| (*k, *v))
    }
}

/// Outcome of one pipeline run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    /// Accepted records, unique by URL, in final order.
    pub records: Vec<ExtractionRecord>,
    pub failures: FailureTally,
    /// Source pages successfully fetched.
    pub pages_fetched: usize,
    /// Distinct candidate links seen across all sources.
    pub links_considered: usize,
    /// Links skipped because neither anchor nor snippet mentioned equipment.
    pub skipped_irrelevant: usize,
    /// Records dropped by the quality filter.
    pub rejected_by_quality: usize,
    pub catalog_version: String,
    /// Set when the run aborted on a pipeline-level fault.
    pub fault: Option<String>,
}

impl RunReport {
    fn aborted(catalog_version: &str, err: &ScoutError) -> Self {
        let mut failures = FailureTally::default();
        failures.record(FailureKind::Pipeline);
        Self { failures, catalog_version: catalog_version.to_string(), fault: Some(err.to_string()), ..Default::default() }
    }
}

/// Runs discovery and extraction over a set of sources.
#[derive(Debug, Clone)]
pub struct Pipeline<F> {
    catalog: Catalog,
    config: PipelineConfig,
    fetcher: F,
}

impl<F: Fetcher> Pipeline<F> {
    pub fn new(catalog: Catalog, config: PipelineConfig, fetcher: F) -> Self {
        Self { catalog, config, fetcher }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Runs every source, dating undated records with today's UTC date.
    pub async fn run(&self, sources: &[Source]) -> RunReport {
        self.run_on(sources, OffsetDateTime::now_utc().date()).await
    }

    /// Runs every source with an explicit scrape date.
    pub async fn run_on(&self, sources: &[Source], today: Date) -> RunReport {
        let extractors = match self.catalog.validate().and_then(|_| Extractors::new(&self.catalog)) {
            Ok(extractors) => extractors,
            Err(err) => {
                tracing::error!(error = %err, "pipeline aborted");
                return RunReport::aborted(&self.catalog.version, &err);
            }
        };

        let mut run = Run {
            extractors: &extractors,
            today,
            seen: HashSet::new(),
            fetched_any: false,
            report: RunReport { catalog_version: self.catalog.version.clone(), ..Default::default() },
        };

        for source in sources {
            self.run_source(&mut run, source).await;
        }

        let mut report = run.report;
        let order = self.config.sort_order();
        report.records.sort_by(|a, b| order.compare(a, b));
        tracing::info!(
            records = report.records.len(),
            failures = report.failures.total(),
            links = report.links_considered,
            "run finished"
        );
        report
    }

    async fn run_source(&self, run: &mut Run<'_>, source: &Source) {
        let page_urls = match source.page_urls(self.config.pages) {
            Ok(urls) => urls,
            Err(err) => {
                run.fail(&source.label, &source.label, &err);
                return;
            }
        };

        let mut candidates: Vec<CandidateLink> = Vec::new();
        for page_url in &page_urls {
            let remaining = self.config.max_links_per_source.saturating_sub(candidates.len());
            if remaining == 0 {
                break;
            }

            let html = match self.polite_fetch(run, page_url).await {
                Ok(html) => html,
                Err(err) => {
                    run.fail(&source.label, page_url, &err);
                    continue;
                }
            };
            run.report.pages_fetched += 1;

            let discovery = DiscoveryConfig { max_links: remaining, snippet_len: self.config.snippet_len };
            match discover_links(&html, page_url, &source.label, &discovery) {
                Ok(links) => candidates.extend(links),
                Err(err) => run.fail(&source.label, page_url, &err),
            }
        }

        let before = run.report.records.len();
        for link in candidates {
            if !run.seen.insert(link.url.clone()) {
                continue;
            }
            run.report.links_considered += 1;

            if self.config.prefilter_anchors && !Self::looks_relevant(run.extractors, &link) {
                tracing::debug!(url = %link.url, "anchor does not mention equipment");
                run.report.skipped_irrelevant += 1;
                continue;
            }

            match self.process_link(run, &link).await {
                Ok(record) if self.config.quality_mode && !record.is_complete() => {
                    tracing::debug!(url = %link.url, "rejected by quality filter");
                    run.report.rejected_by_quality += 1;
                }
                Ok(record) => run.report.records.push(record),
                Err(err) => run.fail(&source.label, &link.url, &err),
            }
        }

        tracing::info!(
            source = %source.label,
            pages = page_urls.len(),
            records = run.report.records.len() - before,
            "source done"
        );
    }

    fn looks_relevant(extractors: &Extractors, link: &CandidateLink) -> bool {
        extractors.equipment.mentions_any(&link.anchor_text)
            || link.snippet.as_deref().is_some_and(|s| extractors.equipment.mentions_any(s))
    }

    /// Fetches one article and turns it into a record.
    async fn process_link(&self, run: &mut Run<'_>, link: &CandidateLink) -> Result<ExtractionRecord> {
        let html = self.polite_fetch(run, &link.url).await?;
        let doc = Document::parse_with_preprocessing(&html)?;

        let evidence =
            EvidenceText::resolve(&link.anchor_text, &doc.paragraphs(), link.snippet.as_deref(), self.config.min_text_len)
                .with_page_title(doc.title());
        let fields = run.extractors.extract_text_fields(&evidence).into_fields();

        // dates often sit in footers and share bars, which preprocessing strips
        let markup = Document::parse(&html)?;
        let date = run.extractors.date.extract(Some(&markup), link.snippet.as_deref(), run.today);

        tracing::debug!(url = %link.url, date_strategy = date.strategy, origin = ?evidence.origin(), "extracted");
        Ok(ExtractionRecord::new(fields, date.date, link))
    }

    async fn polite_fetch(&self, run: &mut Run<'_>, url: &str) -> Result<String> {
        if run.fetched_any && !self.config.politeness_delay.is_zero() {
            tokio::time::sleep(self.config.politeness_delay).await;
        }
        run.fetched_any = true;
        self.fetcher.fetch(url).await
    }
}

/// Run-scoped state, discarded when the run ends.
struct Run<'a> {
    extractors: &'a Extractors,
    today: Date,
    seen: HashSet<String>,
    fetched_any: bool,
    report: RunReport,
}

impl Run<'_> {
    fn fail(&mut self, source: &str, location: &str, err: &ScoutError) {
        let kind = err.kind();
        tracing::warn!(source, location, kind = %kind, error = %err, "skipped");
        self.report.failures.record(kind);
    }
}
