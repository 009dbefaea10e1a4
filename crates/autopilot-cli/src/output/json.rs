//! JSON output for programmatic integration
//!
//! `fix` prints the `{fixedCode, issuesFound}` payload or `{error}`;
//! `check` prints the diagnostics with a severity summary.

use autopilot_core::{Diagnostic, Language, Severity, TransformResult};
use serde::Serialize;
use serde_json::json;

#[derive(Serialize)]
pub struct CheckOutput<'a> {
    pub version: &'static str,
    pub file: &'a str,
    pub language: Language,
    pub summary: CheckSummary,
    pub diagnostics: &'a [Diagnostic],
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct CheckSummary {
    pub total: usize,
    pub warning: usize,
    pub info: usize,
}

impl CheckSummary {
    fn from_diagnostics(diagnostics: &[Diagnostic]) -> Self {
        let warning = diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count();
        Self {
            total: diagnostics.len(),
            warning,
            info: diagnostics.len() - warning,
        }
    }
}

pub fn format_check(file: &str, language: Language, diagnostics: &[Diagnostic]) -> String {
    let output = CheckOutput {
        version: env!("CARGO_PKG_VERSION"),
        file,
        language,
        summary: CheckSummary::from_diagnostics(diagnostics),
        diagnostics,
    };
    serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string())
}

pub fn format_fix(result: &TransformResult) -> String {
    serde_json::to_string_pretty(result).unwrap_or_else(|_| "{}".to_string())
}

pub fn format_error(message: &str) -> String {
    json!({ "error": message }).to_string()
}
