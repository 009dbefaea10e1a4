//! Baseline Autopilot CLI
//!
//! Finds web platform features that are not yet Baseline in JavaScript and
//! CSS/SCSS and rewrites them to fallbacks.

mod cli;
mod commands;
mod logging;
mod output;

use clap::Parser;
use cli::Cli;
use commands::Commands;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _guard = logging::init_logging(&cli);

    match cli.command {
        Commands::Scan(args) => args.run(),
        Commands::Fix(args) => args.run(),
        Commands::Check(args) => args.run(),
        Commands::Explain(args) => args.run(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use autopilot_core::Language;
    use clap::CommandFactory;
    use commands::check::CheckFormat;
    use commands::fix::FixFormat;

    #[test]
    fn cli_parses_scan_command() {
        let cli = Cli::try_parse_from(["autopilot", "scan", "./src"]).unwrap();
        match cli.command {
            Commands::Scan(args) => {
                assert_eq!(args.path.to_str().unwrap(), "./src");
                assert!(!args.report);
            }
            _ => panic!("Expected Scan command"),
        }
    }

    #[test]
    fn cli_parses_scan_with_report() {
        let cli = Cli::try_parse_from(["autopilot", "scan", ".", "--report", "--no-color"]).unwrap();
        match cli.command {
            Commands::Scan(args) => {
                assert!(args.report);
                assert!(args.no_color);
            }
            _ => panic!("Expected Scan command"),
        }
    }

    #[test]
    fn scan_requires_a_path() {
        assert!(Cli::try_parse_from(["autopilot", "scan"]).is_err());
    }

    #[test]
    fn cli_parses_fix_defaults() {
        let cli = Cli::try_parse_from(["autopilot", "fix", "app.js"]).unwrap();
        match cli.command {
            Commands::Fix(args) => {
                assert_eq!(args.file.to_str().unwrap(), "app.js");
                assert!(args.language.is_none());
                assert!(!args.write);
                assert_eq!(args.format, FixFormat::Text);
            }
            _ => panic!("Expected Fix command"),
        }
    }

    #[test]
    fn cli_parses_fix_with_options() {
        let cli = Cli::try_parse_from([
            "autopilot",
            "fix",
            "styles.txt",
            "--language",
            "css",
            "--write",
            "--format",
            "json",
        ])
        .unwrap();
        match cli.command {
            Commands::Fix(args) => {
                assert_eq!(args.language, Some(Language::Css));
                assert!(args.write);
                assert_eq!(args.format, FixFormat::Json);
            }
            _ => panic!("Expected Fix command"),
        }
    }

    #[test]
    fn cli_rejects_unknown_language() {
        let result = Cli::try_parse_from(["autopilot", "fix", "a.js", "--language", "typescript"]);
        assert!(result.is_err());
    }

    #[test]
    fn cli_parses_check_with_format() {
        let cli = Cli::try_parse_from(["autopilot", "check", "a.css", "--format", "json"]).unwrap();
        match cli.command {
            Commands::Check(args) => {
                assert_eq!(args.format, CheckFormat::Json);
                assert!(!args.fail_on_warnings);
            }
            _ => panic!("Expected Check command"),
        }
    }

    #[test]
    fn cli_parses_explain_command() {
        let cli = Cli::try_parse_from(["autopilot", "explain", "css-has"]).unwrap();
        match cli.command {
            Commands::Explain(args) => {
                assert_eq!(args.feature_id, "css-has");
            }
            _ => panic!("Expected Explain command"),
        }
    }

    #[test]
    fn cli_version_is_set() {
        let cmd = Cli::command();
        assert_eq!(cmd.get_version(), Some(env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn cli_help_contains_commands() {
        let mut cmd = Cli::command();
        let help = cmd.render_help().to_string();
        assert!(help.contains("scan"));
        assert!(help.contains("fix"));
        assert!(help.contains("check"));
        assert!(help.contains("explain"));
    }

    #[test]
    fn fix_help_shows_options() {
        let mut cmd = Cli::command();
        let fix_cmd = cmd
            .get_subcommands_mut()
            .find(|c| c.get_name() == "fix")
            .unwrap();
        let help = fix_cmd.render_help().to_string();
        assert!(help.contains("FILE"));
        assert!(help.contains("--language"));
        assert!(help.contains("--write"));
        assert!(help.contains("--format"));
    }
}
