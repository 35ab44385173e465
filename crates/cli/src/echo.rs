use medscout_core::{Catalog, RunReport, Source, SourceKind};
use owo_colors::OwoColorize;

use crate::VERSION;

/// Print a styled banner for verbose mode
pub fn print_banner() {
    eprintln!("\n{} {} {}", "medscout".bold().bright_blue(), "v".dimmed(), VERSION.dimmed());
    eprintln!("{}", "Medical-imaging equipment installations from the news\n".dimmed());
}

/// Print a styled step message
pub fn print_step(step: usize, total: usize, message: &str) {
    eprintln!("{} {}", format!("[{}/{}]", step, total).dimmed(), message.bright_cyan());
}

/// Print a success message
pub fn print_success(message: &str) {
    eprintln!("{} {}", "✓".green(), message.bright_green());
}

/// Print an info message
pub fn print_info(message: &str) {
    eprintln!("{} {}", "ℹ".blue(), message.bright_blue());
}

/// Print a warning message
pub fn print_warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow(), message.bright_yellow());
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red(), message.bright_red());
}

/// Print the built-in sources, one per line, to stdout
pub fn print_sources(sources: &[Source]) {
    for source in sources {
        let (kind, target) = match &source.kind {
            SourceKind::Static { url } => ("static", url.as_str()),
            SourceKind::Search { template, .. } => ("search", template.as_str()),
        };
        println!("{:<20} {:<7} {}", source.label.bold(), kind.dimmed(), target);
    }
}

/// Print the catalog in use
pub fn print_catalog_summary(catalog: &Catalog) {
    eprintln!(
        "  {} {} ({} equipment terms, {} brands, {} facility terms)",
        "Catalog:".dimmed(),
        catalog.version.bright_white(),
        catalog.equipment_terms.len(),
        catalog.brand_terms.len(),
        catalog.facility_terms.len()
    );
}

/// Print the run summary
pub fn print_report_summary(report: &RunReport, elapsed: std::time::Duration) {
    eprintln!("\n{}", "═".repeat(60).dimmed());
    eprintln!("{}", "Run Summary".bold().cyan());
    eprintln!("{}", "═".repeat(60).dimmed());
    eprintln!("  {} {}", "Records:".dimmed(), report.records.len().to_string().bright_white());
    eprintln!("  {} {}", "Pages fetched:".dimmed(), report.pages_fetched.to_string().bright_white());
    eprintln!("  {} {}", "Links considered:".dimmed(), report.links_considered.to_string().bright_white());
    eprintln!("  {} {}", "Not equipment-related:".dimmed(), report.skipped_irrelevant.to_string().bright_white());
    if report.rejected_by_quality > 0 {
        eprintln!("  {} {}", "Quality rejections:".dimmed(), report.rejected_by_quality.to_string().bright_white());
    }
    let undated = report.records.iter().filter(|r| r.date.is_sentinel()).count();
    if undated > 0 {
        eprintln!("  {} {}", "Undated (scrape time):".dimmed(), undated.to_string().bright_yellow());
    }

    if report.failures.is_empty() {
        eprintln!("  {} {}", "Failures:".dimmed(), "0".bright_white());
    } else {
        eprintln!("  {} {}", "Failures:".dimmed(), report.failures.total().to_string().bright_yellow());
        for (kind, count) in report.failures.iter() {
            eprintln!("    {} {}", format!("{}:", kind).dimmed(), count);
        }
    }
    eprintln!("  {} {:.1}s\n", "Elapsed:".dimmed(), elapsed.as_secs_f64());
}

/// Format byte size for display
pub fn format_size(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = 1024 * KB;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
