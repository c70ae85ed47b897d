//! Markdown report generation
//!
//! Produces a release table followed by run information and enrichment
//! statistics.

use crate::output::traits::{Report, ReportRenderer};
use crate::release::REPORT_COLUMNS;

/// Renders reports as GitHub-flavored markdown
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownRenderer;

impl ReportRenderer for MarkdownRenderer {
    fn render(&self, report: &Report) -> String {
        format_markdown_report(report)
    }

    fn extension(&self) -> &'static str {
        "md"
    }
}

/// Formats a report as markdown
pub fn format_markdown_report(report: &Report) -> String {
    let mut md = String::new();

    // Title
    md.push_str(&format!("# {}\n\n", escape_cell(&report.title)));

    // Releases
    md.push_str("## Releases\n\n");
    if report.records.is_empty() {
        md.push_str("No new releases found.\n\n");
    } else {
        md.push_str(&format!("| {} |\n", REPORT_COLUMNS.join(" | ")));
        md.push_str(&format!(
            "|{}\n",
            REPORT_COLUMNS.iter().map(|_| "---|").collect::<String>()
        ));
        for record in &report.records {
            let cells: Vec<String> = record.columns().iter().map(|c| escape_cell(c)).collect();
            md.push_str(&format!("| {} |\n", cells.join(" | ")));
        }
        md.push('\n');
    }

    // Run metadata
    md.push_str("## Run Information\n\n");
    md.push_str(&format!(
        "- **Generated**: {}\n",
        report.generated_at.format("%Y-%m-%d %H:%M:%S")
    ));
    if !report.genres.is_empty() {
        md.push_str(&format!("- **Genres**: {}\n", report.genres.join(", ")));
    }
    if !report.window.is_empty() {
        md.push_str(&format!("- **Window**: {}\n", report.window));
    }
    if let Some(hash) = &report.config_hash {
        md.push_str(&format!("- **Config Hash**: {}\n", hash));
    }
    md.push('\n');

    // Enrichment statistics
    let stats = &report.stats;
    md.push_str("## Enrichment Statistics\n\n");
    md.push_str("| Outcome | Count |\n");
    md.push_str("|---------|-------|\n");
    md.push_str(&format!("| Candidates | {} |\n", stats.candidates));
    md.push_str(&format!("| Resolved | {} |\n", stats.resolved));
    md.push_str(&format!("| Dated | {} |\n", stats.dated));
    md.push_str(&format!("| No Date On Page | {} |\n", stats.missing_date));
    md.push_str(&format!("| No Album Link | {} |\n", stats.without_link));
    md.push_str(&format!("| Rate Limited | {} |\n", stats.rate_limited));
    md.push_str(&format!("| Failed | {} |\n", stats.failed));
    md.push_str(&format!("| Dropped | {} |\n\n", stats.dropped()));

    if let Some(reason) = stats.stop_reason {
        md.push_str(&format!(
            "> Enrichment stopped early ({}); the list above is incomplete.\n",
            reason
        ));
    }

    md
}

/// Escapes characters that would break a table cell
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}
