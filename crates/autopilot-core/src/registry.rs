//! Feature rule registry
//!
//! Maps each non-Baseline feature id to its detection pattern, structural
//! matcher and optional rewrite. Both transform engines and the line scanner
//! read from the same process-wide table.

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::error::UnsupportedLanguage;

pub const CSS_HAS: &str = "css-has";
pub const CSS_CONTAINER_QUERIES: &str = "css-container-queries";
pub const CSS_FOCUS_VISIBLE: &str = "css-focus-visible";
pub const CSS_ASPECT_RATIO: &str = "css-aspect-ratio";
pub const CSS_POSITION_STICKY: &str = "css-position-sticky";
pub const JS_STRUCTURED_CLONE: &str = "javascript-structuredclone";
pub const API_ABORT_CONTROLLER: &str = "api-abortcontroller";
pub const JS_PROMISE_ANY: &str = "javascript-promise-any";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    JavaScript,
    Css,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::JavaScript => "javascript",
            Language::Css => "css",
        }
    }

    /// Short label used in scan report lines.
    pub fn label(&self) -> &'static str {
        match self {
            Language::JavaScript => "JS",
            Language::Css => "CSS",
        }
    }

    /// Engine selected by the batch scanner for a file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "js" => Some(Language::JavaScript),
            "css" => Some(Language::Css),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = UnsupportedLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "javascript" => Ok(Language::JavaScript),
            "css" => Ok(Language::Css),
            other => Err(UnsupportedLanguage(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Info,
}

/// Node shapes a JavaScript rule can fire on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsPattern {
    /// `new Name(...)`
    NewIdent(&'static str),
    /// `name(...)`
    CallIdent(&'static str),
    /// `object.property(...)`
    CallMember {
        object: &'static str,
        property: &'static str,
    },
}

/// Node shapes a stylesheet rule can fire on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CssPattern {
    /// `@name ...`
    AtRule(&'static str),
    /// A rule whose selector text contains the fragment.
    Selector(&'static str),
    /// A declaration of `property`, optionally with exactly `value`.
    Declaration {
        property: &'static str,
        value: Option<&'static str>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Matcher {
    Js(JsPattern),
    Css(CssPattern),
}

impl Matcher {
    pub fn language(&self) -> Language {
        match self {
            Matcher::Js(_) => Language::JavaScript,
            Matcher::Css(_) => Language::Css,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rewrite {
    /// Renames the constructor of a `new` expression.
    RenameConstructor(&'static str),
    /// `@container <params>` becomes `@media (min-width: <n>px)`.
    ContainerToMedia,
    /// `:has(<inner>)` becomes `.has-<inner>`.
    HasToClass,
    /// `:focus-visible` becomes `:focus`.
    FocusVisibleToFocus,
    /// `aspect-ratio` becomes the padding-top box hack.
    AspectRatioFallback,
}

impl Rewrite {
    pub fn describe(&self) -> String {
        match self {
            Rewrite::RenameConstructor(name) => format!("rename the constructor to `{}`", name),
            Rewrite::ContainerToMedia => {
                "replace with `@media (min-width: <n>px)` using the first number in the query"
                    .to_string()
            }
            Rewrite::HasToClass => "replace `:has(<inner>)` with the class `.has-<inner>`".to_string(),
            Rewrite::FocusVisibleToFocus => "replace `:focus-visible` with `:focus`".to_string(),
            Rewrite::AspectRatioFallback => {
                "replace with `padding-top: 56.25%; height: 0; position: relative`".to_string()
            }
        }
    }
}

#[derive(Debug)]
pub struct FeatureRule {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub language: Language,
    pub severity: Severity,
    pub matcher: Matcher,
    pub rewrite: Option<Rewrite>,
    detect: Regex,
}

impl FeatureRule {
    /// Textual pattern used by the line scanner.
    pub fn detect_pattern(&self) -> &Regex {
        &self.detect
    }

    pub fn is_flag_only(&self) -> bool {
        self.rewrite.is_none()
    }

    pub fn message(&self) -> String {
        format!("{} is not a Baseline feature.", self.name)
    }
}

macro_rules! feature_rule {
    (
        id = $id:expr,
        name = $name:literal,
        description = $desc:literal,
        language = $lang:ident,
        severity = $sev:ident,
        detect = $detect:literal,
        matcher = $matcher:expr
        $(, rewrite = $rewrite:expr)?
        $(,)?
    ) => {
        FeatureRule {
            id: $id,
            name: $name,
            description: $desc,
            language: Language::$lang,
            severity: Severity::$sev,
            matcher: $matcher,
            rewrite: feature_rule!(@rewrite $($rewrite)?),
            detect: Regex::new($detect).expect("invalid detection pattern"),
        }
    };
    (@rewrite $rewrite:expr) => { Some($rewrite) };
    (@rewrite) => { None };
}

pub struct Registry {
    rules: Vec<FeatureRule>,
}

static REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::with_defaults);

/// The process-wide rule table.
pub fn registry() -> &'static Registry {
    &REGISTRY
}

impl Registry {
    fn with_defaults() -> Self {
        let rules = vec![
            feature_rule!(
                id = CSS_HAS,
                name = ":has()",
                description = "The :has() relational pseudo-class selects elements based on their descendants.",
                language = Css,
                severity = Warning,
                detect = r":has\(",
                matcher = Matcher::Css(CssPattern::Selector(":has(")),
                rewrite = Rewrite::HasToClass,
            ),
            feature_rule!(
                id = CSS_CONTAINER_QUERIES,
                name = "Container queries",
                description = "Container queries apply styles based on the size of a containing element.",
                language = Css,
                severity = Warning,
                detect = r"@container",
                matcher = Matcher::Css(CssPattern::AtRule("container")),
                rewrite = Rewrite::ContainerToMedia,
            ),
            feature_rule!(
                id = CSS_FOCUS_VISIBLE,
                name = ":focus-visible",
                description = "The :focus-visible pseudo-class matches focused elements that should show a focus ring.",
                language = Css,
                severity = Warning,
                detect = r":focus-visible",
                matcher = Matcher::Css(CssPattern::Selector(":focus-visible")),
                rewrite = Rewrite::FocusVisibleToFocus,
            ),
            feature_rule!(
                id = CSS_ASPECT_RATIO,
                name = "aspect-ratio",
                description = "The aspect-ratio property sets a preferred width-to-height ratio for a box.",
                language = Css,
                severity = Warning,
                detect = r"aspect-ratio:",
                matcher = Matcher::Css(CssPattern::Declaration {
                    property: "aspect-ratio",
                    value: None,
                }),
                rewrite = Rewrite::AspectRatioFallback,
            ),
            feature_rule!(
                id = CSS_POSITION_STICKY,
                name = "Sticky positioning",
                description = "position: sticky keeps an element in flow until it reaches a scroll threshold.",
                language = Css,
                severity = Info,
                detect = r"position:\s*sticky",
                matcher = Matcher::Css(CssPattern::Declaration {
                    property: "position",
                    value: Some("sticky"),
                }),
            ),
            feature_rule!(
                id = JS_STRUCTURED_CLONE,
                name = "structuredClone()",
                description = "The structuredClone() global deep-copies a value using the structured clone algorithm.",
                language = JavaScript,
                severity = Warning,
                detect = r"structuredClone\s*\(",
                matcher = Matcher::Js(JsPattern::CallIdent("structuredClone")),
            ),
            feature_rule!(
                id = API_ABORT_CONTROLLER,
                name = "AbortController",
                description = "AbortController creates signals that cancel fetches and other asynchronous operations.",
                language = JavaScript,
                severity = Warning,
                detect = r"new AbortController\s*\(",
                matcher = Matcher::Js(JsPattern::NewIdent("AbortController")),
                rewrite = Rewrite::RenameConstructor("ManualAbortController"),
            ),
            feature_rule!(
                id = JS_PROMISE_ANY,
                name = "Promise.any()",
                description = "Promise.any() resolves with the first promise to fulfil.",
                language = JavaScript,
                severity = Warning,
                detect = r"Promise\.any\s*\(",
                matcher = Matcher::Js(JsPattern::CallMember {
                    object: "Promise",
                    property: "any",
                }),
            ),
        ];

        Self { rules }
    }

    pub fn all_rules(&self) -> &[FeatureRule] {
        &self.rules
    }

    /// Rules of one language, in registry order.
    pub fn rules_for(&self, language: Language) -> impl Iterator<Item = &FeatureRule> {
        self.rules.iter().filter(move |r| r.language == language)
    }

    pub fn get(&self, id: &str) -> Option<&FeatureRule> {
        self.rules.iter().find(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
