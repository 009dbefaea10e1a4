//! Batch scanning of a directory tree
//!
//! Every `.js` and `.css` file under the root goes through its engine and is
//! rewritten in place when the output differs. Each file yields exactly one
//! [`FileOutcome`]; nothing short of a bug aborts the walk.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{debug, info, instrument, warn};
use walkdir::WalkDir;

use crate::error::ParseError;
use crate::registry::Language;
use crate::transform::analyze_and_fix;

pub const REPORT_FILENAME: &str = "scan-report.md";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    Fixed {
        path: PathBuf,
        language: Language,
    },
    Unchanged {
        path: PathBuf,
    },
    ReadError {
        path: PathBuf,
        message: String,
    },
    ParseError {
        path: PathBuf,
        error: ParseError,
    },
    WriteError {
        path: PathBuf,
        message: String,
    },
    FolderError {
        path: PathBuf,
        message: String,
    },
}

impl FileOutcome {
    pub fn path(&self) -> &Path {
        match self {
            FileOutcome::Fixed { path, .. }
            | FileOutcome::Unchanged { path }
            | FileOutcome::ReadError { path, .. }
            | FileOutcome::ParseError { path, .. }
            | FileOutcome::WriteError { path, .. }
            | FileOutcome::FolderError { path, .. } => path,
        }
    }

    pub fn is_failure(&self) -> bool {
        !matches!(
            self,
            FileOutcome::Fixed { .. } | FileOutcome::Unchanged { .. }
        )
    }
}

impl fmt::Display for FileOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileOutcome::Fixed { path, language } => {
                write!(f, "✅ {} autofix applied: {}", language.label(), path.display())
            }
            FileOutcome::Unchanged { path } => {
                write!(f, "ℹ️ No changes needed: {}", path.display())
            }
            FileOutcome::ReadError { path, .. } => {
                write!(f, "❌ Error reading file: {}", path.display())
            }
            FileOutcome::ParseError { path, error } => {
                write!(f, "❌ Could not parse file: {} ({})", path.display(), error)
            }
            FileOutcome::WriteError { path, .. } => {
                write!(f, "❌ Error writing file: {}", path.display())
            }
            FileOutcome::FolderError { path, .. } => {
                write!(f, "❌ Could not scan folder: {}", path.display())
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    pub fixed: usize,
    pub unchanged: usize,
    pub failed: usize,
}

impl ScanSummary {
    pub fn total(&self) -> usize {
        self.fixed + self.unchanged + self.failed
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    outcomes: Vec<FileOutcome>,
}

impl ScanReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, outcome: FileOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn outcomes(&self) -> &[FileOutcome] {
        &self.outcomes
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn lines(&self) -> Vec<String> {
        self.outcomes.iter().map(ToString::to_string).collect()
    }

    pub fn summary(&self) -> ScanSummary {
        self.outcomes
            .iter()
            .fold(ScanSummary::default(), |mut summary, outcome| {
                match outcome {
                    FileOutcome::Fixed { .. } => summary.fixed += 1,
                    FileOutcome::Unchanged { .. } => summary.unchanged += 1,
                    _ => summary.failed += 1,
                }
                summary
            })
    }

    /// One `- ` list item per outcome, newline separated.
    pub fn to_markdown(&self) -> String {
        self.outcomes
            .iter()
            .map(|outcome| format!("- {}", outcome))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Writes the Markdown report to [`REPORT_FILENAME`] inside `dir`.
    pub fn write_markdown(&self, dir: &Path) -> io::Result<PathBuf> {
        let path = dir.join(REPORT_FILENAME);
        fs::write(&path, self.to_markdown())?;
        Ok(path)
    }
}

impl Extend<FileOutcome> for ScanReport {
    fn extend<T: IntoIterator<Item = FileOutcome>>(&mut self, iter: T) {
        self.outcomes.extend(iter);
    }
}

/// Walks `root` and fixes every supported file found.
#[instrument(skip_all, fields(root = %root.display()))]
pub fn run_scan(root: &Path) -> ScanReport {
    let mut report = ScanReport::new();
    let files = discover_files(root, &mut report);
    debug!(root = %root.display(), files = files.len(), "discovered files");

    let outcomes: Vec<FileOutcome> = files
        .par_iter()
        .map(|(path, language)| process_file(path, *language))
        .collect();
    report.extend(outcomes);

    let summary = report.summary();
    info!(
        root = %root.display(),
        fixed = summary.fixed,
        unchanged = summary.unchanged,
        failed = summary.failed,
        "scan finished"
    );

    report
}

/// Collects supported files, recording unreadable directories in `report`.
fn discover_files(root: &Path, report: &mut ScanReport) -> Vec<(PathBuf, Language)> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root) {
        match entry {
            Ok(entry) => {
                if !entry.file_type().is_file() {
                    continue;
                }
                if let Some(language) = Language::from_path(entry.path()) {
                    files.push((entry.into_path(), language));
                }
            }
            Err(err) => {
                let path = err.path().unwrap_or(root).to_path_buf();
                warn!(path = %path.display(), error = %err, "could not scan folder");
                report.push(FileOutcome::FolderError {
                    path,
                    message: err.to_string(),
                });
            }
        }
    }

    files
}

#[instrument(skip_all, fields(path = %path.display(), %language))]
fn process_file(path: &Path, language: Language) -> FileOutcome {
    let path = path.to_path_buf();

    let source = match fs::read_to_string(&path) {
        Ok(source) => source,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "error reading file");
            return FileOutcome::ReadError {
                path,
                message: err.to_string(),
            };
        }
    };

    let result = match analyze_and_fix(&source, language) {
        Ok(result) => result,
        Err(error) => {
            warn!(path = %path.display(), %error, "could not parse file");
            return FileOutcome::ParseError { path, error };
        }
    };

    for id in &result.issues_found {
        debug!(path = %path.display(), feature = id, "found non-Baseline feature");
    }

    if !result.changed(&source) {
        return FileOutcome::Unchanged { path };
    }

    match fs::write(&path, &result.fixed_code) {
        Ok(()) => FileOutcome::Fixed { path, language },
        Err(err) => {
            warn!(path = %path.display(), error = %err, "error writing file");
            FileOutcome::WriteError {
                path,
                message: err.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn outcome_lines_match_report_format() {
        let path = PathBuf::from("src/app.js");

        let lines: Vec<String> = [
            FileOutcome::Fixed {
                path: path.clone(),
                language: Language::JavaScript,
            },
            FileOutcome::Fixed {
                path: PathBuf::from("a.css"),
                language: Language::Css,
            },
            FileOutcome::Unchanged { path: path.clone() },
            FileOutcome::ReadError {
                path: path.clone(),
                message: "denied".to_string(),
            },
            FileOutcome::WriteError {
                path: path.clone(),
                message: "denied".to_string(),
            },
            FileOutcome::FolderError {
                path: PathBuf::from("src"),
                message: "denied".to_string(),
            },
        ]
        .iter()
        .map(ToString::to_string)
        .collect();

        assert_eq!(
            lines,
            vec![
                "✅ JS autofix applied: src/app.js",
                "✅ CSS autofix applied: a.css",
                "ℹ️ No changes needed: src/app.js",
                "❌ Error reading file: src/app.js",
                "❌ Error writing file: src/app.js",
                "❌ Could not scan folder: src",
            ]
        );
    }

    #[test]
    fn parse_error_line_includes_message() {
        let outcome = FileOutcome::ParseError {
            path: PathBuf::from("bad.css"),
            error: ParseError::new(Language::Css, 1, 3, "Unclosed block"),
        };

        assert_eq!(
            outcome.to_string(),
            "❌ Could not parse file: bad.css (Unclosed block at 1:3)"
        );
        assert!(outcome.is_failure());
    }

    #[test]
    fn markdown_is_a_list() {
        let mut report = ScanReport::new();
        report.push(FileOutcome::Unchanged {
            path: PathBuf::from("a.css"),
        });
        report.push(FileOutcome::Fixed {
            path: PathBuf::from("b.js"),
            language: Language::JavaScript,
        });

        assert_eq!(
            report.to_markdown(),
            "- ℹ️ No changes needed: a.css\n- ✅ JS autofix applied: b.js"
        );
    }

    #[test]
    fn summary_counts_outcomes() {
        let mut report = ScanReport::new();
        report.push(FileOutcome::Unchanged {
            path: PathBuf::from("a.css"),
        });
        report.push(FileOutcome::ReadError {
            path: PathBuf::from("b.js"),
            message: String::new(),
        });

        let summary = report.summary();

        assert_eq!(
            summary,
            ScanSummary {
                fixed: 0,
                unchanged: 1,
                failed: 1
            }
        );
        assert_eq!(summary.total(), 2);
    }

    #[test]
    fn write_markdown_uses_fixed_filename() {
        let dir = tempdir().unwrap();
        let mut report = ScanReport::new();
        report.push(FileOutcome::Unchanged {
            path: PathBuf::from("a.css"),
        });

        let written = report.write_markdown(dir.path()).unwrap();

        assert_eq!(written, dir.path().join("scan-report.md"));
        assert_eq!(
            fs::read_to_string(written).unwrap(),
            "- ℹ️ No changes needed: a.css"
        );
    }

    #[test]
    fn missing_root_is_a_folder_error() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope");

        let report = run_scan(&missing);

        assert_eq!(report.len(), 1);
        assert!(matches!(
            &report.outcomes()[0],
            FileOutcome::FolderError { path, .. } if path == &missing
        ));
    }

    #[test]
    fn ignores_other_extensions() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("notes.md"), "new AbortController()").unwrap();
        fs::write(dir.path().join("app.ts"), "new AbortController()").unwrap();
        fs::write(dir.path().join("style.scss"), "a:has(.b) {}").unwrap();

        let report = run_scan(dir.path());

        assert!(report.is_empty());
    }

    #[test]
    fn plain_file_root_is_scanned() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("app.js");
        fs::write(&file, "const c = new AbortController();\n").unwrap();

        let report = run_scan(&file);

        assert_eq!(
            report.outcomes(),
            &[FileOutcome::Fixed {
                path: file.clone(),
                language: Language::JavaScript
            }]
        );
        assert!(
            fs::read_to_string(&file)
                .unwrap()
                .contains("ManualAbortController")
        );
    }
}
