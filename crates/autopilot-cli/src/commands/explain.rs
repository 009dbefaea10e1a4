//! Explain command - describes a feature rule

use std::process;

use anyhow::Result;
use autopilot_core::{FeatureRule, registry};
use clap::Args;
use colored::Colorize;

use crate::output::pretty::colorize_severity;

#[derive(Args, Debug)]
pub struct ExplainArgs {
    #[arg(
        value_name = "FEATURE_ID",
        help = "Feature id to explain (e.g., \"css-has\", \"api-abortcontroller\")"
    )]
    pub feature_id: String,
}

impl ExplainArgs {
    pub fn run(&self) -> Result<()> {
        match registry().get(&self.feature_id) {
            Some(rule) => {
                print!("{}", describe_rule(rule));
                Ok(())
            }
            None => {
                eprintln!(
                    "{} unknown feature id '{}'",
                    "error:".red().bold(),
                    self.feature_id
                );
                eprintln!();
                eprintln!("Available features:");
                for rule in registry().all_rules() {
                    eprintln!("  {} ({})", rule.id, rule.name);
                }

                process::exit(1);
            }
        }
    }
}

fn describe_rule(rule: &FeatureRule) -> String {
    let fix = match rule.rewrite {
        Some(rewrite) => rewrite.describe(),
        None => "none, reported only".to_string(),
    };

    let mut out = String::new();
    out.push('\n');
    out.push_str(&format!("{}\n\n", rule.id.bold()));
    out.push_str(&format!("  {}: {}\n", "Name".cyan(), rule.name));
    out.push_str(&format!("  {}: {}\n", "Language".cyan(), rule.language));
    out.push_str(&format!(
        "  {}: {}\n",
        "Severity".cyan(),
        colorize_severity(rule.severity)
    ));
    out.push_str(&format!("  {}: {}\n", "Description".cyan(), rule.description));
    out.push_str(&format!(
        "  {}: {}\n",
        "Detection".cyan(),
        rule.detect_pattern().as_str()
    ));
    out.push_str(&format!("  {}: {}\n\n", "Fix".cyan(), fix));
    out
}
