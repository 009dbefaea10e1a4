//! Line-oriented diagnostics
//!
//! Applies each rule's detection pattern to source lines. Works on raw text,
//! so it tolerates input neither engine can parse.

use serde::Serialize;

use crate::registry::{Language, Severity, registry};

/// A finding on one line. Lines and columns are 1-based, columns count
/// characters, and `end_column` is exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub line: usize,
    pub start_column: usize,
    pub end_column: usize,
    pub feature_id: &'static str,
    pub severity: Severity,
    pub message: String,
}

impl Diagnostic {
    pub fn len(&self) -> usize {
        self.end_column - self.start_column
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub fn scan_line(line_text: &str, line_number: usize, language: Language) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    for rule in registry().rules_for(language) {
        for found in rule.detect_pattern().find_iter(line_text) {
            diagnostics.push(Diagnostic {
                line: line_number,
                start_column: char_column(line_text, found.start()),
                end_column: char_column(line_text, found.end()),
                feature_id: rule.id,
                severity: rule.severity,
                message: rule.message(),
            });
        }
    }

    diagnostics
}

/// Scans every line of `text`, numbering from 1.
pub fn scan_document(text: &str, language: Language) -> Vec<Diagnostic> {
    text.lines()
        .enumerate()
        .flat_map(|(index, line)| scan_line(line, index + 1, language))
        .collect()
}

fn char_column(line: &str, byte_offset: usize) -> usize {
    line[..byte_offset].chars().count() + 1
}
