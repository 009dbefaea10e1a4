//! Check command - reports non-Baseline features line by line

use std::fs;
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use autopilot_core::{Diagnostic, Language, Severity, scan_document};
use clap::{Args, ValueEnum};

use super::{Engine, configure_colors};
use crate::output::json::format_check;
use crate::output::pretty::PrettyFormatter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CheckFormat {
    Pretty,
    Json,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// File to check
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Source language (javascript, css); inferred from the extension when omitted
    #[arg(short, long, value_name = "LANGUAGE")]
    pub language: Option<Language>,

    /// Output format for diagnostics (pretty, json)
    #[arg(short, long, value_enum, default_value = "pretty")]
    pub format: CheckFormat,

    /// Exit with code 1 when any warning is reported
    #[arg(long)]
    pub fail_on_warnings: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

impl CheckArgs {
    pub fn run(&self) -> Result<()> {
        configure_colors(self.no_color);

        let (language, source, diagnostics) = self.diagnose()?;
        let file = self.file.to_string_lossy();

        match self.format {
            CheckFormat::Json => println!("{}", format_check(&file, language, &diagnostics)),
            CheckFormat::Pretty if diagnostics.is_empty() => {
                println!("No non-Baseline features found.")
            }
            CheckFormat::Pretty => {
                print!("{}", PrettyFormatter::new(&file, &source).format(&diagnostics))
            }
        }

        if self.fail_on_warnings && has_warnings(&diagnostics) {
            process::exit(1);
        }

        Ok(())
    }

    fn diagnose(&self) -> Result<(Language, String, Vec<Diagnostic>)> {
        let language = Engine::resolve(&self.file, self.language)?.language();
        let source = fs::read_to_string(&self.file)
            .with_context(|| format!("Error reading file: {}", self.file.display()))?;
        let diagnostics = scan_document(&source, language);

        Ok((language, source, diagnostics))
    }
}

fn has_warnings(diagnostics: &[Diagnostic]) -> bool {
    diagnostics.iter().any(|d| d.severity == Severity::Warning)
}
