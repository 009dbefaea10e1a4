//! Error types shared by both transform engines.

use crate::registry::Language;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} at {line}:{column}")]
pub struct ParseError {
    pub language: Language,
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl ParseError {
    pub fn new(language: Language, line: usize, column: usize, message: impl Into<String>) -> Self {
        Self {
            language,
            line,
            column,
            message: message.into(),
        }
    }

    /// Builds an error positioned at a byte offset of `source`.
    pub fn at_offset(
        language: Language,
        source: &str,
        offset: usize,
        message: impl Into<String>,
    ) -> Self {
        let (line, column) = offset_to_location(source, offset);
        Self::new(language, line, column, message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unsupported language '{0}'. Valid values: javascript, css")]
pub struct UnsupportedLanguage(pub String);

/// Converts a byte offset into a 1-based (line, column) pair.
pub(crate) fn offset_to_location(source: &str, offset: usize) -> (usize, usize) {
    let mut offset = offset.min(source.len());
    while !source.is_char_boundary(offset) {
        offset -= 1;
    }

    let prefix = &source[..offset];
    let line = prefix.matches('\n').count() + 1;
    let line_start = prefix.rfind('\n').map(|i| i + 1).unwrap_or(0);
    let column = prefix[line_start..].chars().count() + 1;

    (line, column)
}
