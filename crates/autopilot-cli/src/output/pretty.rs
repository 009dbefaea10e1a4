//! Pretty formatter for human-readable terminal output
//!
//! Displays diagnostics with colors, source context and a summary, plus the
//! scan report and per-file issue lists.

use autopilot_core::{Diagnostic, FileOutcome, IssueSet, ScanReport, Severity, registry};
use colored::{ColoredString, Colorize};

pub struct PrettyFormatter<'a> {
    file: &'a str,
    source: &'a str,
}

impl<'a> PrettyFormatter<'a> {
    pub fn new(file: &'a str, source: &'a str) -> Self {
        Self { file, source }
    }

    pub fn format(&self, diagnostics: &[Diagnostic]) -> String {
        let mut output = String::new();

        for diag in diagnostics {
            output.push_str(&self.format_diagnostic(diag));
            output.push('\n');
        }

        if !diagnostics.is_empty() {
            output.push_str(&format_summary(diagnostics));
        }

        output
    }

    fn format_diagnostic(&self, diag: &Diagnostic) -> String {
        let mut lines = Vec::new();

        lines.push(format!(
            "{}[{}]: {}",
            colorize_severity(diag.severity),
            diag.feature_id.dimmed(),
            diag.message
        ));
        lines.push(format!(
            "  {} {}:{}:{}",
            "-->".blue(),
            self.file,
            diag.line,
            diag.start_column
        ));

        if let Some(source_line) = self.source.lines().nth(diag.line.saturating_sub(1)) {
            let padding = " ".repeat(diag.line.to_string().len());

            lines.push(format!("{} {}", padding, "|".blue()));
            lines.push(format!(
                "{} {} {}",
                diag.line.to_string().blue(),
                "|".blue(),
                source_line
            ));
            lines.push(format!(
                "{} {} {}{}",
                padding,
                "|".blue(),
                " ".repeat(diag.start_column.saturating_sub(1)),
                "^".repeat(diag.len().max(1)).red()
            ));
        }

        lines.join("\n")
    }
}

pub fn colorize_severity(severity: Severity) -> ColoredString {
    match severity {
        Severity::Warning => "warning".yellow().bold(),
        Severity::Info => "info".blue().bold(),
    }
}

fn format_summary(diagnostics: &[Diagnostic]) -> String {
    let warning_count = diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Warning)
        .count();
    let info_count = diagnostics.len() - warning_count;

    let total = diagnostics.len();
    let features_str = if total == 1 { "feature" } else { "features" };

    format!(
        "\nFound {} non-Baseline {} ({}, {})\n",
        total.to_string().bold(),
        features_str,
        plural(warning_count, "warning").yellow(),
        plural(info_count, "info").blue()
    )
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 || noun == "info" {
        format!("{} {}", count, noun)
    } else {
        format!("{} {}s", count, noun)
    }
}

/// One line per issue id, with the rule's severity and message.
pub fn format_issues(issues: &IssueSet) -> String {
    let mut output = String::new();

    for id in issues {
        match registry().get(id) {
            Some(rule) => output.push_str(&format!(
                "{}[{}]: {}\n",
                colorize_severity(rule.severity),
                id.dimmed(),
                rule.message()
            )),
            None => output.push_str(&format!("[{}]\n", id)),
        }
    }

    output
}

fn colorize_outcome(outcome: &FileOutcome) -> ColoredString {
    let line = outcome.to_string();
    match outcome {
        FileOutcome::Fixed { .. } => line.green(),
        FileOutcome::Unchanged { .. } => line.normal(),
        _ => line.red(),
    }
}

/// Outcome lines followed by a one-line summary.
pub fn format_scan(report: &ScanReport) -> String {
    let mut output = String::new();

    for outcome in report.outcomes() {
        output.push_str(&colorize_outcome(outcome).to_string());
        output.push('\n');
    }

    let summary = report.summary();
    if summary.total() == 0 {
        output.push_str("No .js or .css files found.\n");
        return output;
    }

    output.push_str(&format!(
        "\nScanned {} {}: {} fixed, {} unchanged, {} failed\n",
        summary.total().to_string().bold(),
        if summary.total() == 1 { "file" } else { "files" },
        summary.fixed.to_string().green(),
        summary.unchanged,
        summary.failed.to_string().red()
    ));

    output
}
