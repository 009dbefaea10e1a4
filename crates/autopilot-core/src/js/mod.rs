//! JavaScript transform engine.

pub mod fixer;
pub mod parser;

pub use parser::{Dialect, Parser, ParserBuilder, detect_dialect};

use crate::error::ParseError;
use crate::transform::TransformResult;

/// Parses `code` as a plain JavaScript module, rewrites non-Baseline
/// features and prints the result.
pub fn apply_js_autofix(code: &str) -> Result<TransformResult, ParseError> {
    apply_js_autofix_with(code, &Parser::new())
}

/// Same as [`apply_js_autofix`] with a caller-selected dialect.
pub fn apply_js_autofix_with(code: &str, parser: &Parser) -> Result<TransformResult, ParseError> {
    let mut parsed = parser.parse_module(code)?;
    let issues = fixer::fix_module(&mut parsed.module);
    let fixed_code = fixer::emit(&parsed);

    Ok(TransformResult::new(fixed_code, issues))
}
