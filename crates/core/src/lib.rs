pub mod catalog;
pub mod confidence;
pub mod error;
pub mod evidence;
pub mod extract;
pub mod fetch;
pub mod formatters;
pub mod links;
pub mod parse;
pub mod pipeline;
pub mod preprocess;
pub mod record;
pub mod source;

pub use catalog::{Catalog, ModalityEntry};
pub use confidence::score;
pub use error::{FailureKind, Result, ScoutError};
pub use evidence::{EvidenceOrigin, EvidenceText};
#[doc(hidden)]
pub use extract::{FieldMatch, FieldMatches, Haystack};
pub use extract::{DateExtractor, Extractors};
#[cfg(feature = "fetch")]
pub use fetch::HttpFetcher;
pub use fetch::{FetchConfig, Fetcher, MemoryFetcher};
pub use formatters::{CsvConfig, CsvFormatter, JsonConfig, JsonFormatter, OutputFormat, format_report};
pub use links::{discover_links, normalize_link};
pub use parse::Document;
#[doc(hidden)]
pub use preprocess::PreprocessConfig;
pub use preprocess::preprocess_html;
pub use pipeline::{FailureTally, Pipeline, PipelineConfig, PipelineConfigBuilder, RunReport, SortOrder};
pub use record::{CandidateLink, ExtractedFields, ExtractionRecord, RecordDate};
pub use source::{Source, SourceKind, default_sources, select_sources};
