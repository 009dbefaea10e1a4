//! CLI command implementations

pub mod check;
pub mod explain;
pub mod fix;
pub mod scan;

pub use check::CheckArgs;
pub use explain::ExplainArgs;
pub use fix::FixArgs;
pub use scan::ScanArgs;

use std::path::Path;

use anyhow::{Result, bail};
use autopilot_core::js::{Dialect, Parser};
use autopilot_core::{Language, ParseError, TransformResult, apply_css_autofix, apply_js_autofix_with};
use clap::Subcommand;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fix every .js and .css file under a directory in place
    Scan(ScanArgs),

    /// Fix a single file and print the result
    Fix(FixArgs),

    /// Report non-Baseline features in a file line by line
    Check(CheckArgs),

    /// Show the detection and fallback for a feature id
    Explain(ExplainArgs),
}

pub(crate) fn configure_colors(no_color: bool) {
    let no_color_env = std::env::var("NO_COLOR").is_ok();
    if no_color || no_color_env {
        colored::control::set_override(false);
    }
}

/// Transform engine chosen for a single input file.
#[derive(Debug, Clone)]
pub(crate) enum Engine {
    Script(Parser),
    Stylesheet,
}

impl Engine {
    /// Picks the engine from `--language` or, failing that, the extension.
    /// Script extensions also select the parser dialect.
    pub(crate) fn resolve(path: &Path, language: Option<Language>) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        let dialect = Dialect::from_extension(&ext);

        match language {
            Some(Language::JavaScript) => Ok(Engine::Script(Parser::for_dialect(
                dialect.unwrap_or(Dialect::JavaScript),
            ))),
            Some(Language::Css) => Ok(Engine::Stylesheet),
            None => match (dialect, ext.as_str()) {
                (Some(dialect), _) => Ok(Engine::Script(Parser::for_dialect(dialect))),
                (None, "css" | "scss") => Ok(Engine::Stylesheet),
                _ => bail!(
                    "Cannot infer the language of {}; pass --language javascript|css",
                    path.display()
                ),
            },
        }
    }

    pub(crate) fn language(&self) -> Language {
        match self {
            Engine::Script(_) => Language::JavaScript,
            Engine::Stylesheet => Language::Css,
        }
    }

    pub(crate) fn apply(&self, code: &str) -> Result<TransformResult, ParseError> {
        match self {
            Engine::Script(parser) => apply_js_autofix_with(code, parser),
            Engine::Stylesheet => apply_css_autofix(code),
        }
    }
}
