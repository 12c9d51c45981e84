//! Syntax highlighting for code frames, driven by tree-sitter.

use crate::formatting::{Painter, TokenClass};
use std::path::Path;
use tree_sitter::{Language, Parser, TreeCursor};

/// Grammar used to tokenize a framed file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    JavaScript,
    TypeScript,
    Tsx,
}

impl Dialect {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("ts") | Some("mts") | Some("cts") => Self::TypeScript,
            Some("tsx") => Self::Tsx,
            _ => Self::JavaScript,
        }
    }

    fn language(self) -> Language {
        match self {
            Self::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
            Self::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Self::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }
}

struct Token {
    start: usize,
    end: usize,
    class: TokenClass,
}

/// Highlight `source`, returning one painted string per `'\n'`-separated
/// line. `None` when the grammar cannot be loaded.
pub fn highlight_lines(source: &str, dialect: Dialect, painter: &Painter) -> Option<Vec<String>> {
    let mut parser = Parser::new();
    parser.set_language(&dialect.language()).ok()?;
    let tree = parser.parse(source, None)?;

    let mut tokens = Vec::new();
    collect_tokens(&mut tree.walk(), source, &mut tokens);
    Some(paint(source, &tokens, painter))
}

fn collect_tokens(cursor: &mut TreeCursor, source: &str, tokens: &mut Vec<Token>) {
    let node = cursor.node();
    let kind = node.kind();

    let whole = match kind {
        "string" | "template_string" => Some(TokenClass::String),
        "comment" => Some(TokenClass::Comment),
        "number" => Some(TokenClass::Number),
        "regex" => Some(TokenClass::String),
        _ => None,
    };
    if let Some(class) = whole {
        tokens.push(Token {
            start: node.start_byte(),
            end: node.end_byte(),
            class,
        });
        return;
    }

    if node.child_count() == 0 {
        if let Some(class) = classify_leaf(&node, source) {
            tokens.push(Token {
                start: node.start_byte(),
                end: node.end_byte(),
                class,
            });
        }
        return;
    }

    if cursor.goto_first_child() {
        loop {
            collect_tokens(cursor, source, tokens);
            if !cursor.goto_next_sibling() {
                break;
            }
        }
        cursor.goto_parent();
    }
}

fn classify_leaf(node: &tree_sitter::Node, source: &str) -> Option<TokenClass> {
    let kind = node.kind();
    if node.is_named() {
        return match kind {
            "true" | "false" | "null" | "undefined" | "this" | "super" => Some(TokenClass::Keyword),
            "identifier" | "property_identifier" | "type_identifier"
            | "shorthand_property_identifier" => {
                let text = source.get(node.start_byte()..node.end_byte())?;
                text.chars()
                    .next()
                    .filter(|c| c.is_uppercase())
                    .map(|_| TokenClass::Capitalized)
            }
            _ => None,
        };
    }

    if kind.chars().all(|c| c.is_ascii_alphabetic()) {
        Some(TokenClass::Keyword)
    } else if matches!(kind, "{" | "}" | "(" | ")" | "[" | "]") {
        Some(TokenClass::Punctuation)
    } else {
        None
    }
}

fn paint(source: &str, tokens: &[Token], painter: &Painter) -> Vec<String> {
    let mut lines = vec![String::new()];
    let mut pos = 0;

    for token in tokens {
        if token.start < pos || token.end > source.len() {
            continue;
        }
        emit(&mut lines, &source[pos..token.start], TokenClass::Plain, painter);
        emit(&mut lines, &source[token.start..token.end], token.class, painter);
        pos = token.end;
    }
    emit(&mut lines, &source[pos..], TokenClass::Plain, painter);

    lines
}

/// Append `text`, painting each line piece separately so escape codes never
/// span a line break.
fn emit(lines: &mut Vec<String>, text: &str, class: TokenClass, painter: &Painter) {
    for (i, piece) in text.split('\n').enumerate() {
        if i > 0 {
            lines.push(String::new());
        }
        let piece = piece.strip_suffix('\r').unwrap_or(piece);
        if let Some(line) = lines.last_mut() {
            line.push_str(&painter.token(piece, class));
        }
    }
}
