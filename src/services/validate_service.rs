//! Orchestration of schema and prompts validation across phase directories.

use std::fs;
use std::path::Path;

use crate::models::PhaseReport;
use crate::services::store;
use crate::validator::{
    render_report, Check, PromptsValidator, ReportFormat, SchemaValidator, PROMPTS_REPORT_TITLE,
    SCHEMA_REPORT_TITLE,
};
use crate::{Context, Result};

/// What the command should print, and whether the run must exit nonzero.
#[derive(Debug)]
pub struct ValidationOutcome {
    pub output: String,
    pub failed: bool,
}

pub fn validate_schema(
    data_dir: &Path,
    phase: Option<&str>,
    checks: Option<&str>,
    strict: bool,
    format_name: &str,
    output: Option<&Path>,
) -> Result<ValidationOutcome> {
    let checks = parse_checks(checks)?;
    let format = parse_format(format_name)?;
    let phases = resolve_phases(data_dir, phase)?;

    let validator = SchemaValidator::with_checks(checks, strict);
    let results: Vec<PhaseReport> = phases
        .iter()
        .map(|p| validator.validate_file(p, &store::questions_path(data_dir, p)))
        .collect();
    finish(SCHEMA_REPORT_TITLE, &results, format, output)
}

pub fn validate_prompts(
    data_dir: &Path,
    phase: Option<&str>,
    strict: bool,
    format_name: &str,
    output: Option<&Path>,
) -> Result<ValidationOutcome> {
    let format = parse_format(format_name)?;
    let phases = resolve_phases(data_dir, phase)?;

    let validator = PromptsValidator::new(strict);
    let results: Vec<PhaseReport> = phases
        .iter()
        .map(|p| validator.validate_file(p, &store::prompts_path(data_dir, p)))
        .collect();
    finish(PROMPTS_REPORT_TITLE, &results, format, output)
}

fn parse_checks(arg: Option<&str>) -> Result<Vec<Check>> {
    let Some(csv) = arg else {
        return Ok(Check::ALL.to_vec());
    };
    let mut checks = Vec::new();
    let mut invalid = Vec::new();
    for name in csv.split(',').map(str::trim).filter(|n| !n.is_empty()) {
        match name.parse::<Check>() {
            Ok(check) => checks.push(check),
            Err(_) => invalid.push(name),
        }
    }
    if !invalid.is_empty() {
        anyhow::bail!(
            "Invalid check(s): {}. Available: {}",
            invalid.join(", "),
            Check::ALL
                .iter()
                .map(|c| c.name())
                .collect::<Vec<_>>()
                .join(", ")
        );
    }
    if checks.is_empty() {
        anyhow::bail!("No checks selected");
    }
    Ok(checks)
}

fn parse_format(name: &str) -> Result<ReportFormat> {
    match ReportFormat::from_name(name) {
        Some(format) => Ok(format),
        None => anyhow::bail!("Unknown format '{}'. Use text or json.", name),
    }
}

fn resolve_phases(data_dir: &Path, phase: Option<&str>) -> Result<Vec<String>> {
    match phase {
        Some(phase) => {
            store::require_phase(data_dir, phase)?;
            Ok(vec![phase.to_string()])
        }
        None => {
            let phases = store::discover_phases(data_dir)?;
            if phases.is_empty() {
                anyhow::bail!("No phase directories found in {}", data_dir.display());
            }
            Ok(phases)
        }
    }
}

fn finish(
    title: &str,
    results: &[PhaseReport],
    format: ReportFormat,
    output: Option<&Path>,
) -> Result<ValidationOutcome> {
    let report = render_report(title, results, format)?;
    let failed = results.iter().any(PhaseReport::is_failure);
    let output_text = match output {
        Some(path) => {
            fs::write(path, &report)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            format!("✓ Validation report saved to: {}", path.display())
        }
        None => report,
    };
    Ok(ValidationOutcome {
        output: output_text,
        failed,
    })
}
