//! JavaScript parsing front for the pipeline's parse stage.
//!
//! Code is parsed as an ES module with `swc`. The first syntax error is
//! reported as a [`ParseFailure`] carrying a 1-based line and a 0-based
//! column in the parsed text, the same convention source maps use for
//! columns.

use std::path::Path;
use swc_core::common::{sync::Lrc, FileName, SourceMap, Spanned};
use swc_core::ecma::ast::{EsVersion, Expr, Module};
use swc_core::ecma::parser::error::Error as SwcError;
use swc_core::ecma::parser::lexer::Lexer;
use swc_core::ecma::parser::{Parser, StringInput, Syntax};

/// AST node types handed to AST-level hooks.
pub use swc_core::ecma::ast as types;
/// Mutable traversal handed to AST-level hooks.
pub use swc_core::ecma::visit as traverse;

/// A syntax error located in the parsed text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFailure {
    pub message: String,
    /// 1-based line
    pub line: u32,
    /// 0-based column, counted in characters
    pub column: u32,
}

impl std::fmt::Display for ParseFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}:{})", self.message, self.line, self.column)
    }
}

impl std::error::Error for ParseFailure {}

fn file_name(path: &Path) -> FileName {
    FileName::Real(path.to_path_buf())
}

fn locate(cm: &SourceMap, err: &SwcError) -> ParseFailure {
    let loc = cm.lookup_char_pos(err.span().lo);
    ParseFailure {
        message: err.kind().msg().to_string(),
        line: loc.line as u32,
        column: loc.col.0 as u32,
    }
}

/// Parse `code` as an ES module.
///
/// Recoverable errors are treated as failures too: the pipeline only hands
/// clean trees to AST hooks.
pub fn parse_module(code: &str, path: &Path) -> Result<Module, ParseFailure> {
    let cm: Lrc<SourceMap> = Default::default();
    let fm = cm.new_source_file(file_name(path).into(), code.to_string());

    let lexer = Lexer::new(
        Syntax::Es(Default::default()),
        EsVersion::EsNext,
        StringInput::from(&*fm),
        None,
    );
    let mut parser = Parser::new_from(lexer);

    let module = parser.parse_module();
    let mut errors = parser.take_errors();

    match module {
        Err(err) => Err(locate(&cm, &err)),
        Ok(_) if !errors.is_empty() => {
            errors.sort_by_key(|e| e.span().lo);
            Err(locate(&cm, &errors[0]))
        }
        Ok(module) => Ok(module),
    }
}

/// Tools lent to AST-level hooks alongside the tree.
///
/// Node types live in [`types`] and traversal in [`traverse`]; this handle
/// adds node construction from source snippets.
#[derive(Debug, Clone, Copy)]
pub struct AstTools<'a> {
    path: &'a Path,
}

impl<'a> AstTools<'a> {
    pub fn new(path: &'a Path) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        self.path
    }

    /// Build an expression node from JavaScript source text.
    pub fn parse_expr(&self, source: &str) -> Result<Box<Expr>, ParseFailure> {
        let cm: Lrc<SourceMap> = Default::default();
        let fm = cm.new_source_file(
            FileName::Custom(format!("{}#expr", self.path.display())).into(),
            source.to_string(),
        );

        let lexer = Lexer::new(
            Syntax::Es(Default::default()),
            EsVersion::EsNext,
            StringInput::from(&*fm),
            None,
        );
        let mut parser = Parser::new_from(lexer);

        let expr = parser.parse_expr().map_err(|err| locate(&cm, &err))?;
        if let Some(err) = parser.take_errors().first() {
            return Err(locate(&cm, err));
        }
        Ok(expr)
    }
}
