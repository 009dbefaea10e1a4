//! Stylesheet parser
//!
//! Accepts plain CSS plus the SCSS superset (nesting, `//` comments,
//! `$variables`, `#{}` interpolation, control at-rules). Statements are
//! split on `{`, `;` and `}` outside of strings, comments, brackets and
//! interpolation; everything between nodes is kept as raw text.

use super::ast::{AtRule, Block, Comment, Declaration, Node, Rule, Stylesheet};
use crate::error::ParseError;
use crate::registry::Language;

pub fn parse(source: &str) -> Result<Stylesheet, ParseError> {
    CssParser::new(source).parse_stylesheet()
}

struct CssParser<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

/// Where a statement stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Terminator {
    OpenBrace,
    Semicolon,
    CloseBrace,
    Eof,
}

impl<'a> CssParser<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            bytes: src.as_bytes(),
            pos: 0,
        }
    }

    fn error(&self, offset: usize, message: &str) -> ParseError {
        ParseError::at_offset(Language::Css, self.src, offset, message)
    }

    fn byte_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(offset).copied()
    }

    fn parse_stylesheet(&mut self) -> Result<Stylesheet, ParseError> {
        let (nodes, after) = self.parse_nodes(None)?;
        Ok(Stylesheet { nodes, after })
    }

    /// Parses nodes up to the `}` matching `open`, or to the end of input at
    /// the top level.
    fn parse_nodes(&mut self, open: Option<usize>) -> Result<(Vec<Node>, String), ParseError> {
        let mut nodes = Vec::new();

        loop {
            let before = self.take_separators();

            match (self.byte_at(self.pos), open) {
                (None, None) => return Ok((nodes, before)),
                (None, Some(open)) => return Err(self.error(open, "Unclosed block")),
                (Some(b'}'), Some(_)) => {
                    self.pos += 1;
                    return Ok((nodes, before));
                }
                (Some(b'}'), None) => return Err(self.error(self.pos, "Unexpected }")),
                (Some(b'/'), _) if self.byte_at(self.pos + 1) == Some(b'*') => {
                    nodes.push(self.parse_block_comment(before)?);
                }
                (Some(b'/'), _) if self.byte_at(self.pos + 1) == Some(b'/') => {
                    nodes.push(self.parse_inline_comment(before));
                }
                (Some(b'@'), _) => nodes.push(self.parse_at_rule(before)?),
                (Some(_), _) => nodes.push(self.parse_statement(before)?),
            }
        }
    }

    /// Whitespace and stray semicolons before a node.
    fn take_separators(&mut self) -> String {
        let start = self.pos;
        while let Some(b) = self.byte_at(self.pos) {
            if b.is_ascii_whitespace() || b == b';' {
                self.pos += 1;
            } else {
                break;
            }
        }
        self.src[start..self.pos].to_string()
    }

    fn take_whitespace(&mut self) -> String {
        let start = self.pos;
        while self.byte_at(self.pos).is_some_and(|b| b.is_ascii_whitespace()) {
            self.pos += 1;
        }
        self.src[start..self.pos].to_string()
    }

    fn parse_block_comment(&mut self, before: String) -> Result<Node, ParseError> {
        let start = self.pos;
        let end = self.comment_end(start)?;
        let text = self.src[start + 2..end - 2].to_string();
        self.pos = end;

        Ok(Node::Comment(Comment {
            before,
            text,
            inline: false,
        }))
    }

    fn parse_inline_comment(&mut self, before: String) -> Node {
        let start = self.pos + 2;
        let end = self.src[start..]
            .find('\n')
            .map(|i| start + i)
            .unwrap_or(self.src.len());
        self.pos = end;

        Node::Comment(Comment {
            before,
            text: self.src[start..end].to_string(),
            inline: true,
        })
    }

    fn parse_at_rule(&mut self, before: String) -> Result<Node, ParseError> {
        let start = self.pos;
        self.pos += 1;

        let name_start = self.pos;
        while self
            .byte_at(self.pos)
            .is_some_and(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
        {
            self.pos += 1;
        }
        if self.pos == name_start {
            return Err(self.error(start, "At-rule without name"));
        }
        let name = self.src[name_start..self.pos].to_string();
        let after_name = self.take_whitespace();

        let params_start = self.pos;
        let (end, terminator) = self.scan_statement(params_start)?;
        let src = self.src;
        let raw = &src[params_start..end];
        let params = raw.trim_end().to_string();

        let mut at_rule = AtRule {
            before,
            name,
            after_name,
            between: String::new(),
            params,
            body: None,
            semicolon: false,
        };

        match terminator {
            Terminator::OpenBrace => {
                at_rule.between = raw[at_rule.params.len()..].to_string();
                self.pos = end + 1;
                at_rule.body = Some(self.parse_block(end)?);
            }
            Terminator::Semicolon => {
                at_rule.between = raw[at_rule.params.len()..].to_string();
                at_rule.semicolon = true;
                self.pos = end + 1;
            }
            Terminator::CloseBrace | Terminator::Eof => {
                self.pos = params_start + at_rule.params.len();
            }
        }

        Ok(Node::AtRule(at_rule))
    }

    fn parse_statement(&mut self, before: String) -> Result<Node, ParseError> {
        let start = self.pos;
        let (end, terminator) = self.scan_statement(start)?;
        let src = self.src;
        let raw = &src[start..end];
        let text = raw.trim_end();

        match terminator {
            Terminator::OpenBrace => {
                let selector = text.to_string();
                let between = raw[text.len()..].to_string();
                self.pos = end + 1;
                let body = self.parse_block(end)?;

                Ok(Node::Rule(Rule {
                    before,
                    selector,
                    between,
                    body,
                }))
            }
            Terminator::Semicolon => {
                let mut decl = self.declaration(start, text)?;
                decl.before = before;
                decl.trailing = raw[text.len()..].to_string();
                decl.semicolon = true;
                self.pos = end + 1;
                Ok(Node::Decl(decl))
            }
            Terminator::CloseBrace | Terminator::Eof => {
                let mut decl = self.declaration(start, text)?;
                decl.before = before;
                self.pos = start + text.len();
                Ok(Node::Decl(decl))
            }
        }
    }

    fn parse_block(&mut self, open: usize) -> Result<Block, ParseError> {
        let (nodes, after) = self.parse_nodes(Some(open))?;
        Ok(Block { nodes, after })
    }

    /// Splits `prop: value [!important]` starting at byte `start`.
    fn declaration(&self, start: usize, text: &str) -> Result<Declaration, ParseError> {
        let Some(colon) = text.find(':') else {
            return Err(self.error(start, "Unknown word"));
        };
        let prop = text[..colon].trim_end();
        if prop.is_empty() {
            return Err(self.error(start, "Unknown word"));
        }

        let rest = &text[colon + 1..];
        let value_start = colon + 1 + (rest.len() - rest.trim_start().len());
        let (value, important) = split_important(&text[value_start..]);

        Ok(Declaration {
            before: String::new(),
            prop: prop.to_string(),
            between: text[prop.len()..value_start].to_string(),
            value: value.to_string(),
            important: important.map(str::to_string),
            trailing: String::new(),
            semicolon: false,
        })
    }

    /// Finds the end of the statement starting at `start`.
    fn scan_statement(&self, start: usize) -> Result<(usize, Terminator), ParseError> {
        // Expected closer and the offset of its opener.
        let mut stack: Vec<(u8, usize)> = Vec::new();
        let mut i = start;

        loop {
            let Some(b) = self.byte_at(i) else {
                return match stack.last() {
                    Some(&(b'}', open)) => Err(self.error(open, "Unclosed interpolation")),
                    Some(&(_, open)) => Err(self.error(open, "Unclosed bracket")),
                    None => Ok((self.src.len(), Terminator::Eof)),
                };
            };

            match b {
                b'"' | b'\'' => i = self.string_end(i)?,
                b'/' if self.byte_at(i + 1) == Some(b'*') => i = self.comment_end(i)?,
                b'/' if self.byte_at(i + 1) == Some(b'/') && !self.inside_url(&stack) => {
                    i = self.line_end(i);
                }
                b'\\' => i += 2,
                b'(' => {
                    stack.push((b')', i));
                    i += 1;
                }
                b'[' => {
                    stack.push((b']', i));
                    i += 1;
                }
                b'#' if self.byte_at(i + 1) == Some(b'{') => {
                    stack.push((b'}', i));
                    i += 2;
                }
                b')' | b']' | b'}' if stack.last().is_some_and(|&(close, _)| close == b) => {
                    stack.pop();
                    i += 1;
                }
                b'{' if stack.is_empty() => return Ok((i, Terminator::OpenBrace)),
                b';' if stack.is_empty() => return Ok((i, Terminator::Semicolon)),
                b'}' if stack.is_empty() => return Ok((i, Terminator::CloseBrace)),
                _ => i += 1,
            }
        }
    }

    /// Whether an open `url(` encloses the scan position.
    fn inside_url(&self, stack: &[(u8, usize)]) -> bool {
        stack.iter().any(|&(close, open)| {
            close == b')' && open >= 3 && self.bytes[open - 3..open].eq_ignore_ascii_case(b"url")
        })
    }

    /// Offset of the newline ending the line comment at `start`, or the end
    /// of input.
    fn line_end(&self, start: usize) -> usize {
        self.src[start..]
            .find('\n')
            .map_or(self.src.len(), |i| start + i)
    }

    /// Offset just past the string opened at `start`.
    fn string_end(&self, start: usize) -> Result<usize, ParseError> {
        let quote = self.bytes[start];
        let mut i = start + 1;

        loop {
            match self.byte_at(i) {
                None => return Err(self.error(start, "Unclosed string")),
                Some(b'\\') => i += 2,
                Some(b) if b == quote => return Ok(i + 1),
                Some(_) => i += 1,
            }
        }
    }

    /// Offset just past the `*/` of the comment opened at `start`.
    fn comment_end(&self, start: usize) -> Result<usize, ParseError> {
        self.src[start + 2..]
            .find("*/")
            .map(|i| start + 2 + i + 2)
            .ok_or_else(|| self.error(start, "Unclosed comment"))
    }
}

fn split_important(value: &str) -> (&str, Option<&str>) {
    if let Some(bang) = value.rfind('!') {
        if value[bang + 1..].trim().eq_ignore_ascii_case("important") {
            let head = value[..bang].trim_end();
            return (head, Some(&value[head.len()..]));
        }
    }
    (value, None)
}
