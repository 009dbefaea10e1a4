//! Baseline Autopilot core
//!
//! Detects web platform features that are not yet Baseline in JavaScript and
//! CSS/SCSS and rewrites them to fallbacks.

pub mod batch;
pub mod css;
pub mod diagnostic;
pub mod error;
pub mod js;
pub mod registry;
pub mod transform;

pub use batch::{FileOutcome, REPORT_FILENAME, ScanReport, ScanSummary, run_scan};
pub use css::apply_css_autofix;
pub use diagnostic::{Diagnostic, scan_document, scan_line};
pub use error::{ParseError, UnsupportedLanguage};
pub use js::{apply_js_autofix, apply_js_autofix_with};
pub use registry::{FeatureRule, Language, Severity, registry};
pub use transform::{IssueSet, TransformResult, analyze_and_fix};
