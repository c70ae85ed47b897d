//! HTML report generation
//!
//! Produces a standalone dark-themed page with the release table and a short
//! run footer. All record text is escaped.

use crate::output::traits::{Report, ReportRenderer};
use crate::release::REPORT_COLUMNS;
use quick_xml::escape::escape;

const STYLE: &str = r#"        body {
            font-family: Arial, sans-serif;
            background-color: #121212;
            color: #fff;
            padding: 20px;
        }
        table {
            border-collapse: collapse;
            width: 100%;
            background-color: #1e1e1e;
        }
        th, td {
            border: 1px solid #444;
            padding: 8px;
            text-align: left;
        }
        th {
            background-color: #333;
            color: #ffcc00;
        }
        tr:nth-child(even) {
            background-color: #2a2a2a;
        }
        footer {
            margin-top: 16px;
            color: #888;
            font-size: 0.85em;
        }
"#;

/// Renders reports as a standalone HTML page
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlRenderer;

impl ReportRenderer for HtmlRenderer {
    fn render(&self, report: &Report) -> String {
        format_html_report(report)
    }

    fn extension(&self) -> &'static str {
        "html"
    }
}

/// Formats a report as an HTML document
pub fn format_html_report(report: &Report) -> String {
    let title = escape(report.title.as_str());
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("    <meta charset=\"UTF-8\">\n");
    html.push_str(&format!("    <title>{}</title>\n", title));
    html.push_str("    <style>\n");
    html.push_str(STYLE);
    html.push_str("    </style>\n</head>\n<body>\n");
    html.push_str(&format!("    <h1>{}</h1>\n", title));

    if report.records.is_empty() {
        html.push_str("    <p>No new releases found.</p>\n");
    } else {
        html.push_str("    <table>\n        <thead>\n            <tr>");
        for column in REPORT_COLUMNS {
            html.push_str(&format!("<th>{}</th>", column));
        }
        html.push_str("</tr>\n        </thead>\n        <tbody>\n");

        for record in &report.records {
            html.push_str("            <tr>");
            for cell in record.columns() {
                html.push_str(&format!("<td>{}</td>", escape(cell)));
            }
            html.push_str("</tr>\n");
        }

        html.push_str("        </tbody>\n    </table>\n");
    }

    html.push_str(&format_footer(report));
    html.push_str("</body>\n</html>\n");
    html
}

fn format_footer(report: &Report) -> String {
    let mut parts = vec![format!(
        "Generated {}",
        report.generated_at.format("%Y-%m-%d %H:%M")
    )];

    if !report.window.is_empty() {
        parts.push(format!("releases {}", escape(report.window.as_str())));
    }
    if !report.genres.is_empty() {
        parts.push(format!("genres: {}", escape(report.genres.join(", "))));
    }
    parts.push(format!(
        "{} of {} albums resolved",
        report.stats.resolved, report.stats.candidates
    ));
    if let Some(reason) = report.stats.stop_reason {
        parts.push(format!("stopped early: {}", reason));
    }
    if let Some(hash) = &report.config_hash {
        parts.push(format!("config {}", &hash[..hash.len().min(12)]));
    }

    format!("    <footer>{}</footer>\n", parts.join(" &middot; "))
}
