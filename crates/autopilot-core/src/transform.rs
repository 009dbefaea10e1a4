//! Transform results and language dispatch.

use serde::Serialize;

use crate::css::apply_css_autofix;
use crate::error::ParseError;
use crate::js::apply_js_autofix;
use crate::registry::Language;

/// Feature ids in first-encounter order, duplicates collapsed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct IssueSet(Vec<&'static str>);

impl IssueSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `id`, returning false when it was already present.
    pub fn insert(&mut self, id: &'static str) -> bool {
        if self.contains(id) {
            return false;
        }
        self.0.push(id);
        true
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.iter().any(|existing| *existing == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[&'static str] {
        &self.0
    }
}

impl<'a> IntoIterator for &'a IssueSet {
    type Item = &'static str;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, &'static str>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter().copied()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformResult {
    pub fixed_code: String,
    pub issues_found: IssueSet,
}

impl TransformResult {
    pub fn new(fixed_code: String, issues_found: IssueSet) -> Self {
        Self {
            fixed_code,
            issues_found,
        }
    }

    /// Whether the regenerated text differs from `original`.
    pub fn changed(&self, original: &str) -> bool {
        self.fixed_code != original
    }
}

pub fn analyze_and_fix(code: &str, language: Language) -> Result<TransformResult, ParseError> {
    match language {
        Language::JavaScript => apply_js_autofix(code),
        Language::Css => apply_css_autofix(code),
    }
}
