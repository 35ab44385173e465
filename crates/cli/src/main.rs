use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::{Duration, Instant};

use anyhow::{Context, bail};
use clap::Parser;
use medscout_core::{
    Catalog, FetchConfig, HttpFetcher, OutputFormat, Pipeline, PipelineConfig, SortOrder, Source, default_sources,
    format_report, select_sources,
};
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;

mod echo;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Output format for the result set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormatArg {
    Csv,
    Json,
}

impl FromStr for FormatArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid format: {}. Valid options: csv, json", s)),
        }
    }
}

impl From<FormatArg> for OutputFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Csv => OutputFormat::Csv,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

/// Result ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SortArg {
    Type,
    Confidence,
}

impl FromStr for SortArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "type" => Ok(Self::Type),
            "confidence" => Ok(Self::Confidence),
            _ => Err(format!("Invalid sort: {}. Valid options: type, confidence", s)),
        }
    }
}

impl From<SortArg> for SortOrder {
    fn from(value: SortArg) -> Self {
        match value {
            SortArg::Type => SortOrder::TypeThenDate,
            SortArg::Confidence => SortOrder::ConfidenceThenDate,
        }
    }
}

/// Collect medical-imaging equipment installations from news sources into CSV or JSON
#[derive(Parser, Debug)]
#[command(name = "medscout")]
#[command(author = "medscout contributors")]
#[command(version)]
#[command(about = "Collect medical-imaging equipment installations from news sources", long_about = None)]
struct Args {
    /// Built-in source to scan (repeatable; default: all)
    #[arg(short, long = "source", value_name = "LABEL")]
    sources: Vec<String>,

    /// List built-in sources and exit
    #[arg(long)]
    list_sources: bool,

    /// Ad-hoc static source as LABEL=URL (repeatable)
    #[arg(long = "url", value_name = "LABEL=URL")]
    urls: Vec<String>,

    /// Pages to traverse for paginated sources
    #[arg(long, default_value = "1", value_name = "NUM")]
    pages: usize,

    /// Maximum candidate links per source
    #[arg(long, default_value = "40", value_name = "NUM")]
    max_links: usize,

    /// Keep only records with both a facility and an equipment type
    #[arg(short, long)]
    quality: bool,

    /// Extra equipment keywords, comma separated
    #[arg(short, long, value_delimiter = ',', value_name = "TERMS")]
    keywords: Vec<String>,

    /// Result ordering (type, confidence; default follows --quality)
    #[arg(long, value_name = "ORDER")]
    sort: Option<SortArg>,

    /// Output format (csv, json)
    #[arg(short, long, default_value = "csv", value_name = "FORMAT")]
    format: FormatArg,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// HTTP timeout in seconds
    #[arg(long, default_value = "12", value_name = "SECS")]
    timeout: u64,

    /// Custom User-Agent for HTTP requests
    #[arg(long, value_name = "UA")]
    user_agent: Option<String>,

    /// Pause between fetches in milliseconds
    #[arg(long, default_value = "500", value_name = "MS")]
    delay_ms: u64,

    /// Fetch every discovered link, not only equipment-related anchors
    #[arg(long)]
    no_prefilter: bool,

    /// Keyword catalog JSON file (default: user config, then built-in)
    #[arg(long, value_name = "FILE")]
    catalog: Option<PathBuf>,

    /// Print the effective keyword catalog as JSON and exit
    #[arg(long)]
    print_catalog: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "medscout_core=debug,medscout=debug" } else { "warn" }));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).with_target(false).init();
}

fn load_catalog(args: &Args) -> anyhow::Result<Catalog> {
    let catalog = match &args.catalog {
        Some(path) => {
            Catalog::from_file(path).with_context(|| format!("Failed to load catalog: {}", path.display()))?
        }
        None => Catalog::discover().context("Failed to load user catalog")?,
    };
    tracing::debug!(version = %catalog.version, extra = args.keywords.len(), "catalog loaded");
    Ok(catalog.with_extra_equipment(&args.keywords))
}

/// Built-in selection plus ad-hoc URLs; ad-hoc URLs alone replace the built-in list.
fn resolve_sources(args: &Args) -> anyhow::Result<Vec<Source>> {
    let adhoc = args
        .urls
        .iter()
        .map(|def| Source::parse_definition(def).with_context(|| format!("Invalid --url '{}'", def)))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let mut sources = if args.sources.is_empty() && !adhoc.is_empty() {
        Vec::new()
    } else {
        select_sources(&default_sources(), &args.sources).context("Failed to select sources")?
    };
    sources.extend(adhoc);

    if sources.is_empty() {
        bail!("No sources selected");
    }
    Ok(sources)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    if args.list_sources {
        echo::print_sources(&default_sources());
        return Ok(());
    }

    let catalog = load_catalog(&args)?;

    if args.print_catalog {
        println!("{}", serde_json::to_string_pretty(&catalog).context("Failed to serialize catalog")?);
        return Ok(());
    }

    let sources = resolve_sources(&args)?;

    if args.verbose {
        echo::print_banner();
        echo::print_info("Debug logging enabled");
        eprintln!();
    }

    echo::print_step(1, 3, &format!("Scanning {} source(s)", sources.len()));
    if args.verbose {
        for source in &sources {
            eprintln!("  {} {}", "·".dimmed(), source.label.bright_white());
        }
        echo::print_catalog_summary(&catalog);
        eprintln!();
    }

    let mut fetch_config = FetchConfig { timeout: args.timeout, ..Default::default() };
    if let Some(user_agent) = &args.user_agent {
        fetch_config.user_agent = user_agent.clone();
    }
    let fetcher = HttpFetcher::new(fetch_config).context("Failed to build HTTP client")?;

    let mut builder = PipelineConfig::builder()
        .pages(args.pages)
        .max_links_per_source(args.max_links)
        .quality_mode(args.quality)
        .politeness_delay(Duration::from_millis(args.delay_ms))
        .prefilter_anchors(!args.no_prefilter);
    if let Some(sort) = args.sort {
        builder = builder.sort(sort.into());
    }

    let started = Instant::now();
    let report = Pipeline::new(catalog, builder.build(), fetcher).run(&sources).await;
    let elapsed = started.elapsed();

    if let Some(fault) = &report.fault {
        echo::print_error(&format!("Run aborted: {}", fault));
    } else if report.records.is_empty() {
        echo::print_warning("No records found");
    } else {
        echo::print_success(&format!("{} record(s) extracted", report.records.len()));
    }

    echo::print_step(2, 3, "Formatting output");
    let output = format_report(&report, args.format.into(), args.quality, true).context("Failed to format output")?;
    if args.verbose {
        eprintln!("  {} {:?}", "Format:".dimmed(), args.format);
        eprintln!("  {} {}", "Size:".dimmed(), echo::format_size(output.len()).bright_white());
        eprintln!();
    }

    echo::print_step(3, 3, "Writing output");
    match &args.output {
        Some(path) => {
            fs::write(path, &output).with_context(|| format!("Failed to write to file: {}", path.display()))?;
            echo::print_success(&format!("Output written to {}", path.display().bright_white()));
        }
        None => {
            print!("{}", output);
        }
    }

    echo::print_report_summary(&report, elapsed);
    Ok(())
}
