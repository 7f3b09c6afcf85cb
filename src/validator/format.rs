//! Rendering of validation results as a text report or JSON.

use crate::models::{DocStatus, PhaseReport};
use crate::Result;

pub const SCHEMA_REPORT_TITLE: &str = "SCHEMA VALIDATION REPORT";
pub const PROMPTS_REPORT_TITLE: &str = "PROMPTS VALIDATION REPORT";

const BANNER_WIDTH: usize = 70;
const MAX_LISTED_FINDINGS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Text,
    Json,
}

impl ReportFormat {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "text" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            _ => None,
        }
    }
}

pub fn render_report(
    title: &str,
    results: &[PhaseReport],
    format: ReportFormat,
) -> Result<String> {
    match format {
        ReportFormat::Text => Ok(render_text(title, results)),
        ReportFormat::Json => Ok(serde_json::to_string_pretty(results)?),
    }
}

pub fn render_text(title: &str, results: &[PhaseReport]) -> String {
    let banner = "=".repeat(BANNER_WIDTH);
    let mut lines = vec![
        banner.clone(),
        format!(" {}", title),
        banner.clone(),
        String::new(),
    ];
    for result in results {
        lines.push(format!(
            "{} {}: {}",
            result.status.tag(),
            result.phase,
            result.status.name()
        ));
        if let Some(message) = &result.message {
            lines.push(format!("  {}", message));
        }
        push_findings(&mut lines, "ERRORS", &result.errors);
        push_findings(&mut lines, "WARNINGS", &result.warnings);
    }
    lines.push(String::new());
    lines.push(banner.clone());
    let (passed, warned, failed) = tally(results);
    lines.push(format!(
        " SUMMARY: {} passed, {} warnings, {} failed",
        passed, warned, failed
    ));
    lines.push(banner);
    lines.join("\n")
}

/// Long finding lists are capped per phase so one broken file cannot drown
/// the rest of the report.
fn push_findings(lines: &mut Vec<String>, label: &str, findings: &[String]) {
    if findings.is_empty() {
        return;
    }
    lines.push(format!("  {} ({}):", label, findings.len()));
    for finding in findings.iter().take(MAX_LISTED_FINDINGS) {
        lines.push(format!("    - {}", finding));
    }
    if findings.len() > MAX_LISTED_FINDINGS {
        lines.push(format!(
            "    ... and {} more",
            findings.len() - MAX_LISTED_FINDINGS
        ));
    }
}

fn tally(results: &[PhaseReport]) -> (usize, usize, usize) {
    let mut passed = 0;
    let mut warned = 0;
    let mut failed = 0;
    for result in results {
        match result.status {
            DocStatus::Pass => passed += 1,
            DocStatus::Warn => warned += 1,
            DocStatus::Fail => failed += 1,
            // Load errors carry their own message line and stay out of the
            // pass/warn/fail tally.
            DocStatus::Error => {}
        }
    }
    (passed, warned, failed)
}
