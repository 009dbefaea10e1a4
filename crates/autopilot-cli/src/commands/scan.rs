//! Scan command - fixes every supported file under a directory

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use autopilot_core::{REPORT_FILENAME, run_scan};
use clap::Args;
use tracing::info;

use super::configure_colors;
use crate::output::pretty::format_scan;

#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Directory (or single file) to scan
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Write scan-report.md to the current directory
    #[arg(long)]
    pub report: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

impl ScanArgs {
    pub fn run(&self) -> Result<()> {
        configure_colors(self.no_color);

        let report = run_scan(&self.path);
        print!("{}", format_scan(&report));

        if self.report {
            let cwd = env::current_dir()?;
            let written = report
                .write_markdown(&cwd)
                .with_context(|| format!("Failed to write {}", REPORT_FILENAME))?;
            info!(path = %written.display(), "wrote scan report");
            println!("Report written to {}", written.display());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;
    use tempfile::tempdir;

    struct CwdGuard(PathBuf);

    impl CwdGuard {
        fn enter(dir: &std::path::Path) -> Self {
            let previous = env::current_dir().unwrap();
            env::set_current_dir(dir).unwrap();
            Self(previous)
        }
    }

    impl Drop for CwdGuard {
        fn drop(&mut self) {
            let _ = env::set_current_dir(&self.0);
        }
    }

    fn args(path: PathBuf, report: bool) -> ScanArgs {
        ScanArgs {
            path,
            report,
            no_color: true,
        }
    }

    #[test]
    #[serial]
    fn report_flag_writes_markdown_to_current_directory() {
        let project = tempdir().unwrap();
        let out = tempdir().unwrap();
        let script = project.path().join("app.js");
        fs::write(&script, "const c = new AbortController();\n").unwrap();

        {
            let _cwd = CwdGuard::enter(out.path());
            args(project.path().to_path_buf(), true).run().unwrap();
        }

        let written = fs::read_to_string(out.path().join(REPORT_FILENAME)).unwrap();
        assert_eq!(
            written,
            format!("- ✅ JS autofix applied: {}", script.display())
        );
    }

    #[test]
    #[serial]
    fn no_report_without_flag() {
        let project = tempdir().unwrap();
        let out = tempdir().unwrap();
        fs::write(project.path().join("a.css"), "a { b: c; }").unwrap();

        {
            let _cwd = CwdGuard::enter(out.path());
            args(project.path().to_path_buf(), false).run().unwrap();
        }

        assert!(!out.path().join(REPORT_FILENAME).exists());
    }

    #[test]
    fn scan_fixes_files_in_place() {
        let project = tempdir().unwrap();
        let style = project.path().join("a.css");
        fs::write(&style, ".card:has(.badge) { color: red; }").unwrap();

        args(project.path().to_path_buf(), false).run().unwrap();

        assert_eq!(
            fs::read_to_string(&style).unwrap(),
            "/* fallback for :has() */\n.card.has-badge { color: red; }"
        );
    }
}
