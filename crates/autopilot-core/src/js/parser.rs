//! Parser for JavaScript-family source
//!
//! Wraps the SWC parser. Comments are collected alongside the module so the
//! code generator can put them back.

use swc_core::common::comments::{Comments, SingleThreadedComments};
use swc_core::common::sync::Lrc;
use swc_core::common::{FileName, SourceMap, Spanned};
use swc_core::ecma::ast::{EsVersion, Module};
use swc_core::ecma::parser::{EsSyntax, StringInput, Syntax, TsSyntax, lexer::Lexer};

use crate::error::ParseError;
use crate::registry::Language;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    JavaScript,
    TypeScript,
    Jsx,
    Tsx,
}

impl Dialect {
    /// Dialect for a file extension, or `None` for non-script files.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "js" | "mjs" | "cjs" => Some(Dialect::JavaScript),
            "jsx" => Some(Dialect::Jsx),
            "ts" | "mts" | "cts" => Some(Dialect::TypeScript),
            "tsx" => Some(Dialect::Tsx),
            _ => None,
        }
    }
}

pub fn detect_dialect(filename: &str) -> Dialect {
    filename
        .rsplit_once('.')
        .and_then(|(_, ext)| Dialect::from_extension(ext))
        .unwrap_or(Dialect::JavaScript)
}

/// A parsed module together with what is needed to print it again.
pub struct ParsedModule {
    pub module: Module,
    pub comments: SingleThreadedComments,
    pub source_map: Lrc<SourceMap>,
}

impl std::fmt::Debug for ParsedModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParsedModule")
            .field("statements", &self.module.body.len())
            .finish()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ParserBuilder {
    jsx: bool,
    typescript: bool,
    decorators: bool,
}

impl ParserBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn jsx(mut self, enabled: bool) -> Self {
        self.jsx = enabled;
        self
    }

    pub fn typescript(mut self, enabled: bool) -> Self {
        self.typescript = enabled;
        self
    }

    pub fn decorators(mut self, enabled: bool) -> Self {
        self.decorators = enabled;
        self
    }

    pub fn build(self) -> Parser {
        let syntax = if self.typescript {
            Syntax::Typescript(TsSyntax {
                tsx: self.jsx,
                decorators: self.decorators,
                ..Default::default()
            })
        } else {
            Syntax::Es(EsSyntax {
                jsx: self.jsx,
                decorators: self.decorators,
                ..Default::default()
            })
        };

        Parser { syntax }
    }
}

#[derive(Debug, Clone)]
pub struct Parser {
    syntax: Syntax,
}

impl Parser {
    pub fn new() -> Self {
        Self {
            syntax: Syntax::Es(Default::default()),
        }
    }

    pub fn for_dialect(dialect: Dialect) -> Self {
        match dialect {
            Dialect::JavaScript => Self::new(),
            Dialect::TypeScript => Self::builder().typescript(true).build(),
            Dialect::Jsx => Self::builder().jsx(true).build(),
            Dialect::Tsx => Self::builder().typescript(true).jsx(true).build(),
        }
    }

    pub fn for_file(filename: &str) -> Self {
        Self::for_dialect(detect_dialect(filename))
    }

    pub fn builder() -> ParserBuilder {
        ParserBuilder::new()
    }

    /// Parses `code` as an ES module.
    ///
    /// Errors the parser recovered from are treated like fatal ones: the
    /// first of them is returned and no module is produced.
    pub fn parse_module(&self, code: &str) -> Result<ParsedModule, ParseError> {
        let source_map: Lrc<SourceMap> = Default::default();
        let fm = source_map
            .new_source_file(FileName::Custom("input.js".into()).into(), code.to_string());
        let comments = SingleThreadedComments::default();

        let (result, recovered) = {
            let lexer = Lexer::new(
                self.syntax,
                EsVersion::latest(),
                StringInput::from(&*fm),
                Some(&comments as &dyn Comments),
            );
            let mut parser = swc_core::ecma::parser::Parser::new_from(lexer);
            let result = parser.parse_module();
            (result, parser.take_errors())
        };

        let to_parse_error = |e: swc_core::ecma::parser::error::Error| {
            let span = e.span();
            let loc = source_map.lookup_char_pos(span.lo);
            ParseError::new(
                Language::JavaScript,
                loc.line,
                loc.col_display + 1,
                e.kind().msg().to_string(),
            )
        };

        let module = result.map_err(to_parse_error)?;

        if let Some(first) = recovered.into_iter().next() {
            return Err(to_parse_error(first));
        }

        Ok(ParsedModule {
            module,
            comments,
            source_map,
        })
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}
