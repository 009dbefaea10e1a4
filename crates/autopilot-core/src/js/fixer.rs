//! Feature detection and rewriting over the SWC AST.

use swc_core::common::comments::Comments;
use swc_core::ecma::ast::{
    CallExpr, Callee, Expr, MemberProp, Module, NewExpr, OptCall, OptChainBase,
};
use swc_core::ecma::codegen::to_code_default;
use swc_core::ecma::visit::{VisitMut, VisitMutWith};
use tracing::debug;

use super::parser::ParsedModule;
use crate::registry::{FeatureRule, JsPattern, Language, Matcher, Rewrite, registry};
use crate::transform::IssueSet;

/// The parts of a `new` or call expression a matcher can look at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeShape<'a> {
    New { callee: &'a str },
    Call { callee: &'a str },
    CallMember { object: &'a str, property: &'a str },
}

impl NodeShape<'_> {
    pub fn of_new(node: &NewExpr) -> Option<NodeShape<'_>> {
        match &*node.callee {
            Expr::Ident(ident) => Some(NodeShape::New { callee: &*ident.sym }),
            _ => None,
        }
    }

    pub fn of_call(node: &CallExpr) -> Option<NodeShape<'_>> {
        let Callee::Expr(callee) = &node.callee else {
            return None;
        };
        Self::of_callee(callee)
    }

    /// Shape of `callee?.(...)`, `object?.property(...)` and friends.
    pub fn of_opt_call(node: &OptCall) -> Option<NodeShape<'_>> {
        Self::of_callee(&node.callee)
    }

    fn of_callee(callee: &Expr) -> Option<NodeShape<'_>> {
        let member = match callee {
            Expr::Ident(ident) => return Some(NodeShape::Call { callee: &*ident.sym }),
            Expr::Member(member) => member,
            Expr::OptChain(chain) => match &*chain.base {
                OptChainBase::Member(member) => member,
                OptChainBase::Call(_) => return None,
            },
            _ => return None,
        };

        match (&*member.obj, &member.prop) {
            (Expr::Ident(object), MemberProp::Ident(prop)) => Some(NodeShape::CallMember {
                object: &*object.sym,
                property: &*prop.sym,
            }),
            _ => None,
        }
    }

    pub fn matches(&self, pattern: &JsPattern) -> bool {
        match (pattern, self) {
            (JsPattern::NewIdent(name), NodeShape::New { callee }) => name == callee,
            (JsPattern::CallIdent(name), NodeShape::Call { callee }) => name == callee,
            (
                JsPattern::CallMember { object, property },
                NodeShape::CallMember {
                    object: obj,
                    property: prop,
                },
            ) => object == obj && property == prop,
            _ => false,
        }
    }
}

/// Pre-order walk that records every matching feature and applies the
/// first available rewrite per node.
pub struct AutofixVisitor {
    rules: Vec<&'static FeatureRule>,
    issues: IssueSet,
}

impl AutofixVisitor {
    pub fn new() -> Self {
        Self {
            rules: registry().rules_for(Language::JavaScript).collect(),
            issues: IssueSet::new(),
        }
    }

    pub fn into_issues(self) -> IssueSet {
        self.issues
    }

    fn inspect(&mut self, shape: Option<NodeShape<'_>>) -> Option<Rewrite> {
        let shape = shape?;
        let mut rewrite = None;

        for rule in &self.rules {
            let Matcher::Js(pattern) = &rule.matcher else {
                continue;
            };
            if !shape.matches(pattern) {
                continue;
            }

            if self.issues.insert(rule.id) {
                debug!(feature = rule.id, "detected non-Baseline feature");
            }
            if rewrite.is_none() {
                rewrite = rule.rewrite;
            }
        }

        rewrite
    }
}

impl Default for AutofixVisitor {
    fn default() -> Self {
        Self::new()
    }
}

impl VisitMut for AutofixVisitor {
    fn visit_mut_new_expr(&mut self, node: &mut NewExpr) {
        if let Some(rewrite) = self.inspect(NodeShape::of_new(node)) {
            apply_rewrite(rewrite, &mut node.callee);
        }
        node.visit_mut_children_with(self);
    }

    fn visit_mut_call_expr(&mut self, node: &mut CallExpr) {
        if let Some(rewrite) = self.inspect(NodeShape::of_call(node)) {
            if let Callee::Expr(callee) = &mut node.callee {
                apply_rewrite(rewrite, callee);
            }
        }
        node.visit_mut_children_with(self);
    }

    fn visit_mut_opt_call(&mut self, node: &mut OptCall) {
        if let Some(rewrite) = self.inspect(NodeShape::of_opt_call(node)) {
            apply_rewrite(rewrite, &mut node.callee);
        }
        node.visit_mut_children_with(self);
    }
}

fn apply_rewrite(rewrite: Rewrite, callee: &mut Expr) {
    match rewrite {
        Rewrite::RenameConstructor(name) => {
            if let Expr::Ident(ident) = callee {
                ident.sym = name.into();
            }
        }
        other => debug!(rewrite = ?other, "rewrite does not apply to script nodes"),
    }
}

/// Walks `module`, rewriting it in place, and returns the features found.
pub fn fix_module(module: &mut Module) -> IssueSet {
    let mut visitor = AutofixVisitor::new();
    module.visit_mut_with(&mut visitor);
    visitor.into_issues()
}

/// Prints the module back to source, comments included.
pub fn emit(parsed: &ParsedModule) -> String {
    to_code_default(
        parsed.source_map.clone(),
        Some(&parsed.comments as &dyn Comments),
        &parsed.module,
    )
}
