use serde::{Deserialize, Serialize};

/// Aggregate outcome of validating one document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DocStatus {
    /// No errors, no warnings
    Pass,
    /// No errors, at least one warning
    Warn,
    /// At least one error
    Fail,
    /// File missing or unparseable; counts as failure for the exit code
    Error,
}

impl DocStatus {
    pub fn name(&self) -> &'static str {
        match self {
            DocStatus::Pass => "PASS",
            DocStatus::Warn => "WARN",
            DocStatus::Fail => "FAIL",
            DocStatus::Error => "ERROR",
        }
    }

    /// Bracketed tag used in text reports
    pub fn tag(&self) -> &'static str {
        match self {
            DocStatus::Pass => "[PASS]",
            DocStatus::Warn => "[WARN]",
            DocStatus::Fail => "[FAIL]",
            DocStatus::Error => "[ERROR]",
        }
    }
}

/// Validation result for one phase document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseReport {
    /// Phase directory name (e.g., "phase_0")
    pub phase: String,

    pub status: DocStatus,

    /// Load-level failure description, present only for ERROR results
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    pub errors: Vec<String>,

    pub warnings: Vec<String>,

    /// Names of the checks that ran
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub checks_run: Vec<String>,
}

impl PhaseReport {
    /// Build a report from accumulated findings; status follows from whether
    /// any errors or warnings were collected
    pub fn from_findings(
        phase: impl Into<String>,
        errors: Vec<String>,
        warnings: Vec<String>,
        checks_run: Vec<String>,
    ) -> Self {
        let status = if !errors.is_empty() {
            DocStatus::Fail
        } else if !warnings.is_empty() {
            DocStatus::Warn
        } else {
            DocStatus::Pass
        };
        Self {
            phase: phase.into(),
            status,
            message: None,
            errors,
            warnings,
            checks_run,
        }
    }

    /// Document could not be loaded at all. The failure lives in `message`
    /// rather than `errors`; no checks ran, so there are no findings.
    pub fn load_error(phase: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            phase: phase.into(),
            status: DocStatus::Error,
            message: Some(message.into()),
            errors: Vec::new(),
            warnings: Vec::new(),
            checks_run: Vec::new(),
        }
    }

    /// FAIL and ERROR both gate the process exit code
    pub fn is_failure(&self) -> bool {
        matches!(self.status, DocStatus::Fail | DocStatus::Error)
    }
}
