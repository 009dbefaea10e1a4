//! CSS/SCSS transform engine.

pub mod ast;
pub mod fixer;
pub mod parser;

pub use ast::Stylesheet;
pub use parser::parse;

use crate::error::ParseError;
use crate::transform::TransformResult;

/// Parses `code`, rewrites non-Baseline features and prints the result.
/// A stylesheet without findings comes back byte-for-byte unchanged.
pub fn apply_css_autofix(code: &str) -> Result<TransformResult, ParseError> {
    let mut sheet = parse(code)?;
    let issues = fixer::fix_stylesheet(&mut sheet);

    Ok(TransformResult::new(sheet.to_string(), issues))
}
