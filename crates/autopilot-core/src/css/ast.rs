//! Stylesheet tree
//!
//! Every node keeps the raw text around it (`before`, `between`, ...) so a
//! tree that was not modified prints back to exactly the input.

use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stylesheet {
    pub nodes: Vec<Node>,
    /// Text after the last node.
    pub after: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    AtRule(AtRule),
    Rule(Rule),
    Decl(Declaration),
    Comment(Comment),
}

/// Children of a rule or at-rule, between `{` and `}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Block {
    pub nodes: Vec<Node>,
    pub after: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtRule {
    pub before: String,
    pub name: String,
    pub after_name: String,
    pub params: String,
    pub between: String,
    pub body: Option<Block>,
    /// Bodiless at-rules only: whether a `;` closed the statement.
    pub semicolon: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub before: String,
    pub selector: String,
    pub between: String,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub before: String,
    pub prop: String,
    /// Colon with the whitespace on either side.
    pub between: String,
    pub value: String,
    /// ` !important` as written, leading whitespace included.
    pub important: Option<String>,
    /// Whitespace between the value and the closing `;`.
    pub trailing: String,
    pub semicolon: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub before: String,
    /// Text between the delimiters, unchanged.
    pub text: String,
    /// `// ...` line comment rather than `/* ... */`.
    pub inline: bool,
}

impl Declaration {
    pub fn new(prop: &str, value: &str) -> Self {
        Self {
            before: String::new(),
            prop: prop.to_string(),
            between: ": ".to_string(),
            value: value.to_string(),
            important: None,
            trailing: String::new(),
            semicolon: true,
        }
    }
}

impl Comment {
    /// A block comment printed as `/* text */`.
    pub fn block(text: &str) -> Self {
        Self {
            before: String::new(),
            text: format!(" {} ", text),
            inline: false,
        }
    }
}

impl Node {
    pub fn before(&self) -> &str {
        match self {
            Node::AtRule(n) => &n.before,
            Node::Rule(n) => &n.before,
            Node::Decl(n) => &n.before,
            Node::Comment(n) => &n.before,
        }
    }

    pub fn set_before(&mut self, before: String) {
        match self {
            Node::AtRule(n) => n.before = before,
            Node::Rule(n) => n.before = before,
            Node::Decl(n) => n.before = before,
            Node::Comment(n) => n.before = before,
        }
    }
}

impl fmt::Display for Stylesheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for node in &self.nodes {
            write!(f, "{}", node)?;
        }
        f.write_str(&self.after)
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for node in &self.nodes {
            write!(f, "{}", node)?;
        }
        write!(f, "{}}}", self.after)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::AtRule(n) => n.fmt(f),
            Node::Rule(n) => n.fmt(f),
            Node::Decl(n) => n.fmt(f),
            Node::Comment(n) => n.fmt(f),
        }
    }
}

impl fmt::Display for AtRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}@{}{}{}{}",
            self.before, self.name, self.after_name, self.params, self.between
        )?;
        match &self.body {
            Some(body) => body.fmt(f),
            None if self.semicolon => f.write_str(";"),
            None => Ok(()),
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}{}", self.before, self.selector, self.between, self.body)
    }
}

impl fmt::Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}{}{}{}",
            self.before,
            self.prop,
            self.between,
            self.value,
            self.important.as_deref().unwrap_or(""),
            self.trailing
        )?;
        if self.semicolon {
            f.write_str(";")?;
        }
        Ok(())
    }
}

impl fmt::Display for Comment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.inline {
            write!(f, "{}//{}", self.before, self.text)
        } else {
            write!(f, "{}/*{}*/", self.before, self.text)
        }
    }
}
