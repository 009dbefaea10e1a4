//! Fix command - rewrites a single file

use std::fs;
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use autopilot_core::{FileOutcome, Language, TransformResult};
use clap::{Args, ValueEnum};
use tracing::debug;

use super::{Engine, configure_colors};
use crate::output::{json, pretty};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FixFormat {
    Text,
    Json,
}

#[derive(Args, Debug)]
pub struct FixArgs {
    /// File to fix
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Source language (javascript, css); inferred from the extension when omitted
    #[arg(short, long, value_name = "LANGUAGE")]
    pub language: Option<Language>,

    /// Overwrite the file with the fixed code
    #[arg(short, long)]
    pub write: bool,

    /// Output format (text, json)
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: FixFormat,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

impl FixArgs {
    pub fn run(&self) -> Result<()> {
        configure_colors(self.no_color);

        let result = match self.execute() {
            Ok(result) => result,
            Err(err) if self.format == FixFormat::Json => {
                println!("{}", json::format_error(&format!("{:#}", err)));
                process::exit(1);
            }
            Err(err) => return Err(err),
        };

        match self.format {
            FixFormat::Json => println!("{}", json::format_fix(&result)),
            FixFormat::Text => {
                if !self.write {
                    print!("{}", result.fixed_code);
                }
                eprint!("{}", pretty::format_issues(&result.issues_found));
            }
        }

        Ok(())
    }

    fn execute(&self) -> Result<TransformResult> {
        let engine = Engine::resolve(&self.file, self.language)?;
        let source = fs::read_to_string(&self.file)
            .with_context(|| format!("Error reading file: {}", self.file.display()))?;

        let result = engine.apply(&source)?;
        debug!(
            path = %self.file.display(),
            issues = result.issues_found.len(),
            "applied autofix"
        );

        if self.write {
            let outcome = self.persist(&source, &result, engine.language())?;
            eprintln!("{}", outcome);
        }

        Ok(result)
    }

    /// Writes the fixed code only when it differs from `source`.
    fn persist(
        &self,
        source: &str,
        result: &TransformResult,
        language: Language,
    ) -> Result<FileOutcome> {
        let path = self.file.clone();
        if !result.changed(source) {
            return Ok(FileOutcome::Unchanged { path });
        }

        fs::write(&path, &result.fixed_code)
            .with_context(|| format!("Error writing file: {}", path.display()))?;
        Ok(FileOutcome::Fixed { path, language })
    }
}
