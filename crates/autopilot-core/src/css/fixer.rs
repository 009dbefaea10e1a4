//! Feature detection and rewriting over the stylesheet tree.
//!
//! Nodes are visited in document order, parents before children. Selector
//! and params rewrites are textual: they work on the raw strings kept by the
//! parser, not on a parsed selector grammar.

use tracing::debug;

use super::ast::{AtRule, Comment, Declaration, Node, Rule, Stylesheet};
use crate::registry::{CssPattern, FeatureRule, Language, Matcher, Rewrite, registry};
use crate::transform::IssueSet;

const CONTAINER_NOTE: &str = "fallback for @container";
const HAS_NOTE: &str = "fallback for :has()";
const DEFAULT_MIN_WIDTH: &str = "800";

pub struct StylesheetFixer {
    rules: Vec<&'static FeatureRule>,
    issues: IssueSet,
}

impl StylesheetFixer {
    pub fn new() -> Self {
        Self {
            rules: registry().rules_for(Language::Css).collect(),
            issues: IssueSet::new(),
        }
    }

    /// Rewrites `sheet` in place and returns the features found.
    pub fn fix(mut self, sheet: &mut Stylesheet) -> IssueSet {
        self.fix_nodes(&mut sheet.nodes);
        self.issues
    }

    fn fix_nodes(&mut self, nodes: &mut Vec<Node>) {
        let original = std::mem::take(nodes);
        for node in original {
            self.fix_node(node, nodes);
        }
    }

    fn fix_node(&mut self, node: Node, out: &mut Vec<Node>) {
        match node {
            Node::AtRule(mut at_rule) => {
                let notes = self.fix_at_rule(&mut at_rule);
                if let Some(body) = &mut at_rule.body {
                    self.fix_nodes(&mut body.nodes);
                }
                push_annotated(out, Node::AtRule(at_rule), &notes);
            }
            Node::Rule(mut rule) => {
                let notes = self.fix_rule(&mut rule);
                self.fix_nodes(&mut rule.body.nodes);
                push_annotated(out, Node::Rule(rule), &notes);
            }
            Node::Decl(decl) => out.extend(self.fix_declaration(decl)),
            comment @ Node::Comment(_) => out.push(comment),
        }
    }

    fn fix_at_rule(&mut self, at_rule: &mut AtRule) -> Vec<&'static str> {
        let mut notes = Vec::new();

        for rule in &self.rules {
            let Matcher::Css(CssPattern::AtRule(name)) = rule.matcher else {
                continue;
            };
            if !at_rule.name.eq_ignore_ascii_case(name) {
                continue;
            }

            if self.issues.insert(rule.id) {
                debug!(feature = rule.id, "detected non-Baseline feature");
            }
            if let Some(Rewrite::ContainerToMedia) = rule.rewrite {
                container_to_media(at_rule);
                notes.push(CONTAINER_NOTE);
            }
        }

        notes
    }

    fn fix_rule(&mut self, css_rule: &mut Rule) -> Vec<&'static str> {
        let mut notes = Vec::new();

        for rule in &self.rules {
            let Matcher::Css(CssPattern::Selector(fragment)) = rule.matcher else {
                continue;
            };
            if !css_rule.selector.contains(fragment) {
                continue;
            }

            if self.issues.insert(rule.id) {
                debug!(feature = rule.id, "detected non-Baseline feature");
            }
            match rule.rewrite {
                Some(Rewrite::HasToClass) => {
                    css_rule.selector = rewrite_has(&css_rule.selector);
                    notes.push(HAS_NOTE);
                }
                Some(Rewrite::FocusVisibleToFocus) => {
                    css_rule.selector = css_rule.selector.replace(":focus-visible", ":focus");
                }
                _ => {}
            }
        }

        notes
    }

    fn fix_declaration(&mut self, decl: Declaration) -> Vec<Node> {
        for rule in &self.rules {
            let Matcher::Css(CssPattern::Declaration { property, value }) = rule.matcher else {
                continue;
            };
            if !decl.prop.eq_ignore_ascii_case(property) {
                continue;
            }
            if value.is_some_and(|expected| decl.value != expected) {
                continue;
            }

            if self.issues.insert(rule.id) {
                debug!(feature = rule.id, "detected non-Baseline feature");
            }
            if let Some(Rewrite::AspectRatioFallback) = rule.rewrite {
                return aspect_ratio_fallback(decl);
            }
        }

        vec![Node::Decl(decl)]
    }
}

impl Default for StylesheetFixer {
    fn default() -> Self {
        Self::new()
    }
}

pub fn fix_stylesheet(sheet: &mut Stylesheet) -> IssueSet {
    StylesheetFixer::new().fix(sheet)
}

/// Pushes `node` preceded by one comment per note. The comment takes the
/// node's leading text and the node moves to its own line.
fn push_annotated(out: &mut Vec<Node>, mut node: Node, notes: &[&str]) {
    for note in notes {
        let mut comment = Comment::block(note);
        comment.before = node.before().to_string();
        let indent = indentation(&comment.before);
        node.set_before(format!("\n{}", indent));
        out.push(Node::Comment(comment));
    }
    out.push(node);
}

fn indentation(before: &str) -> String {
    match before.rfind('\n') {
        Some(newline) => before[newline + 1..]
            .chars()
            .filter(|c| c.is_whitespace())
            .collect(),
        None => String::new(),
    }
}

fn container_to_media(at_rule: &mut AtRule) {
    let width = first_number(&at_rule.params).unwrap_or(DEFAULT_MIN_WIDTH);
    at_rule.params = format!("(min-width: {}px)", width);
    at_rule.name = "media".to_string();
}

fn first_number(text: &str) -> Option<&str> {
    let start = text.find(|c: char| c.is_ascii_digit())?;
    let rest = &text[start..];
    let len = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    Some(&rest[..len])
}

/// Replaces each `:has(<inner>)` with `.has-<inner>` minus `.` and `#`.
/// Empty or unclosed arguments are left alone.
fn rewrite_has(selector: &str) -> String {
    const OPEN: &str = ":has(";

    let mut out = String::with_capacity(selector.len());
    let mut rest = selector;

    while let Some(idx) = rest.find(OPEN) {
        let arg_start = idx + OPEN.len();
        match closing_paren(&rest[arg_start..]) {
            Some(len) if len > 0 => {
                out.push_str(&rest[..idx]);
                out.push_str(".has-");
                out.extend(
                    rest[arg_start..arg_start + len]
                        .chars()
                        .filter(|c| !matches!(c, '.' | '#')),
                );
                rest = &rest[arg_start + len + 1..];
            }
            _ => {
                out.push_str(&rest[..arg_start]);
                rest = &rest[arg_start..];
            }
        }
    }

    out.push_str(rest);
    out
}

/// Byte length up to the `)` that closes an already opened parenthesis.
fn closing_paren(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in text.char_indices() {
        match c {
            '(' => depth += 1,
            ')' if depth == 0 => return Some(i),
            ')' => depth -= 1,
            _ => {}
        }
    }
    None
}

fn aspect_ratio_fallback(decl: Declaration) -> Vec<Node> {
    const FALLBACK: [(&str, &str); 3] = [
        ("padding-top", "56.25%"),
        ("height", "0"),
        ("position", "relative"),
    ];

    let spacing: String = decl.before.chars().filter(|c| c.is_whitespace()).collect();
    let last = FALLBACK.len() - 1;

    FALLBACK
        .iter()
        .enumerate()
        .map(|(i, (prop, value))| {
            let mut fallback = Declaration::new(prop, value);
            fallback.before = if i == 0 {
                decl.before.clone()
            } else {
                spacing.clone()
            };
            fallback.between = decl.between.clone();
            if i == last {
                fallback.trailing = decl.trailing.clone();
                fallback.semicolon = decl.semicolon;
            }
            Node::Decl(fallback)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::css::parser::parse;
    use insta::assert_snapshot;

    fn fix(source: &str) -> (String, Vec<&'static str>) {
        let mut sheet = parse(source).unwrap();
        let issues = fix_stylesheet(&mut sheet);
        (sheet.to_string(), issues.as_slice().to_vec())
    }

    #[test]
    fn has_becomes_class_with_comment() {
        let (code, issues) = fix(".card:has(.badge) { color: red; }");

        assert_eq!(
            code,
            "/* fallback for :has() */\n.card.has-badge { color: red; }"
        );
        assert_eq!(issues, vec!["css-has"]);
    }

    #[test]
    fn aspect_ratio_becomes_padding_hack() {
        let (code, issues) = fix("div { aspect-ratio: 16/9; }");

        assert_eq!(
            code,
            "div { padding-top: 56.25%; height: 0; position: relative; }"
        );
        assert_eq!(issues, vec!["css-aspect-ratio"]);
    }

    #[test]
    fn aspect_ratio_property_is_case_insensitive() {
        let (code, issues) = fix("div { ASPECT-RATIO: 1 }");

        assert_eq!(code, "div { padding-top: 56.25%; height: 0; position: relative }");
        assert_eq!(issues, vec!["css-aspect-ratio"]);
    }

    #[test]
    fn container_at_rule_name_is_case_insensitive() {
        let (code, issues) = fix("@CONTAINER (min-width: 10px) { a { b: c } }");

        assert_eq!(
            code,
            "/* fallback for @container */\n@media (min-width: 10px) { a { b: c } }"
        );
        assert_eq!(issues, vec!["css-container-queries"]);
    }

    #[test]
    fn focus_visible_becomes_focus_without_comment() {
        let (code, issues) = fix("button:focus-visible, a:focus-visible { outline: 2px solid; }");

        assert_eq!(code, "button:focus, a:focus { outline: 2px solid; }");
        assert_eq!(issues, vec!["css-focus-visible"]);
    }

    #[test]
    fn sticky_position_is_flagged_only() {
        let source = ".nav { position: sticky; top: 0; }";

        let (code, issues) = fix(source);

        assert_eq!(code, source);
        assert_eq!(issues, vec!["css-position-sticky"]);
    }

    #[test]
    fn sticky_must_match_exactly() {
        let (_, issues) = fix(".nav { position: -webkit-sticky; position: relative; }");

        assert!(issues.is_empty());
    }

    #[test]
    fn container_query_becomes_media_query() {
        let (code, issues) = fix(
            ".layout {\n  display: grid;\n}\n\n@container sidebar (min-width: 400px) {\n  .card {\n    aspect-ratio: 4 / 3;\n  }\n}",
        );

        assert_snapshot!(code, @r"
        .layout {
          display: grid;
        }

        /* fallback for @container */
        @media (min-width: 400px) {
          .card {
            padding-top: 56.25%;
            height: 0;
            position: relative;
          }
        }
        ");
        assert_eq!(issues, vec!["css-container-queries", "css-aspect-ratio"]);
    }

    #[test]
    fn container_query_without_number_defaults_to_800() {
        let (code, _) = fix("@container card { a { b: c } }");

        assert_eq!(
            code,
            "/* fallback for @container */\n@media (min-width: 800px) { a { b: c } }"
        );
    }

    #[test]
    fn nested_rule_keeps_indentation() {
        let (code, issues) = fix(
            "@media (min-width: 600px) {\n  .list:has(> li.active) {\n    color: blue;\n  }\n}",
        );

        assert_snapshot!(code, @r"
        @media (min-width: 600px) {
          /* fallback for :has() */
          .list.has-> liactive {
            color: blue;
          }
        }
        ");
        assert_eq!(issues, vec!["css-has"]);
    }

    #[test]
    fn scss_nesting_is_visited() {
        let (code, issues) = fix("$w: 10px;\n.a {\n  &:has(#b) { c: d; }\n  // note\n}");

        assert_eq!(
            code,
            "$w: 10px;\n.a {\n  /* fallback for :has() */\n  &.has-b { c: d; }\n  // note\n}"
        );
        assert_eq!(issues, vec!["css-has"]);
    }

    #[test]
    fn applies_every_selector_rewrite() {
        let (code, issues) = fix(".a:has(.b):focus-visible { c: d; }");

        assert_eq!(
            code,
            "/* fallback for :has() */\n.a.has-b:focus { c: d; }"
        );
        assert_eq!(issues, vec!["css-has", "css-focus-visible"]);
    }

    #[test]
    fn issues_follow_document_order() {
        let (_, issues) = fix(
            ".x { position: sticky; }\nbutton:focus-visible { y: z; }\n.p:has(.q) { aspect-ratio: 1; }",
        );

        assert_eq!(
            issues,
            vec![
                "css-position-sticky",
                "css-focus-visible",
                "css-has",
                "css-aspect-ratio"
            ]
        );
    }

    #[test]
    fn untouched_stylesheet_is_byte_identical() {
        let source = "/* theme */\nbody{margin:0}\n\n.a  >  .b ,\n.c { color : red !important ;}\n";

        let (code, issues) = fix(source);

        assert_eq!(code, source);
        assert!(issues.is_empty());
    }

    #[test]
    fn second_pass_changes_nothing() {
        let source = "@container (min-width: 300px) {\n  .a:has(.b) { aspect-ratio: 1; position: sticky; }\n}\n";

        let (first, _) = fix(source);
        let (second, issues) = fix(&first);

        assert_eq!(second, first);
        assert_eq!(issues, vec!["css-position-sticky"]);
    }

    #[test]
    fn rewrite_has_handles_nesting_and_edge_cases() {
        assert_eq!(rewrite_has(".a:has(.b)"), ".a.has-b");
        assert_eq!(rewrite_has(".a:has(.b:not(.c))"), ".a.has-b:not(c)");
        assert_eq!(rewrite_has(".a:has(.b), .c:has(#d)"), ".a.has-b, .c.has-d");
        assert_eq!(rewrite_has(".a:has(.b"), ".a:has(.b");
        assert_eq!(rewrite_has(".a:has()"), ".a:has()");
    }

    #[test]
    fn first_number_finds_leading_digits() {
        assert_eq!(first_number("sidebar (min-width: 400px)"), Some("400"));
        assert_eq!(first_number("(width > 45em)"), Some("45"));
        assert_eq!(first_number("card"), None);
    }
}
