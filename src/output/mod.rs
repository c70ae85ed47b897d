//! Output module for generating release reports
//!
//! This module handles:
//! - Rendering enriched records as HTML or markdown documents
//! - Writing reports to disk
//! - Recording and printing enrichment statistics

mod html;
mod markdown;
pub mod stats;
mod traits;

pub use html::{format_html_report, HtmlRenderer};
pub use markdown::{format_markdown_report, MarkdownRenderer};
pub use stats::{print_statistics, EnrichmentStats};
pub use traits::{OutputError, OutputResult, Report, ReportRenderer};

use crate::config::ReportFormat;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Returns the renderer for a report format
pub fn renderer_for(format: ReportFormat) -> Box<dyn ReportRenderer> {
    match format {
        ReportFormat::Html => Box::new(HtmlRenderer),
        ReportFormat::Markdown => Box::new(MarkdownRenderer),
    }
}

/// Returns the path a report should be written to
///
/// A missing `.html`/`.md` extension, or the one belonging to the other
/// format, is replaced by the renderer's. Any other extension is kept.
pub fn report_path(path: &Path, renderer: &dyn ReportRenderer) -> PathBuf {
    match path.extension().and_then(|ext| ext.to_str()) {
        None | Some("html") | Some("md") => path.with_extension(renderer.extension()),
        Some(_) => path.to_path_buf(),
    }
}

/// Renders a report and writes it to `output_path`
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote the report
/// * `Err(OutputError)` - Failed to create or write the file
pub fn write_report(
    report: &Report,
    renderer: &dyn ReportRenderer,
    output_path: &Path,
) -> OutputResult<()> {
    let document = renderer.render(report);
    let to_write_error = |source| OutputError::Write {
        path: output_path.display().to_string(),
        source,
    };

    let mut file = File::create(output_path).map_err(to_write_error)?;
    file.write_all(document.as_bytes()).map_err(to_write_error)?;

    tracing::debug!(
        "Wrote {} bytes to {}",
        document.len(),
        output_path.display()
    );

    Ok(())
}
