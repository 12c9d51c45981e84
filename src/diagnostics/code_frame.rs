//! Code frame rendering.
//!
//! ```text
//!   1 | import a from "./a";
//! > 2 | const x = ;
//!     |           ^ Expression expected
//!   3 | export default x;
//! ```

use super::highlight::{highlight_lines, Dialect};
use super::FrameLocation;
use crate::formatting::{ColorMode, Painter};
use serde::{Deserialize, Serialize};

/// Context around the failing line and colour handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameOptions {
    pub lines_above: usize,
    pub lines_below: usize,
    pub color: ColorMode,
}

impl Default for FrameOptions {
    fn default() -> Self {
        Self {
            lines_above: 2,
            lines_below: 3,
            color: ColorMode::Auto,
        }
    }
}

/// Render a frame around `location`.
///
/// When `painter` is enabled and a `dialect` is given, lines are syntax
/// highlighted; the layout is identical either way.
pub fn render(
    source: &str,
    location: FrameLocation,
    message: Option<&str>,
    options: &FrameOptions,
    painter: &Painter,
    dialect: Option<Dialect>,
) -> String {
    let lines: Vec<&str> = source
        .split('\n')
        .map(|l| l.strip_suffix('\r').unwrap_or(l))
        .collect();
    let last = lines.len().saturating_sub(1);
    let target = (location.line.saturating_sub(1) as usize).min(last);

    let start = target.saturating_sub(options.lines_above);
    let end = (target + options.lines_below).min(last);
    let width = (end + 1).to_string().len();

    let highlighted = match dialect {
        Some(dialect) if painter.is_enabled() => highlight_lines(source, dialect, painter),
        _ => None,
    };

    let mut out = Vec::with_capacity(end - start + 2);
    for (idx, raw) in lines.iter().enumerate().take(end + 1).skip(start) {
        let text = highlighted
            .as_ref()
            .and_then(|h| h.get(idx))
            .map(String::as_str)
            .unwrap_or(raw);
        let gutter = format!(" {:>width$} |", idx + 1, width = width);
        let body = if raw.is_empty() {
            String::new()
        } else {
            format!(" {}", text)
        };

        if idx == target {
            out.push(format!("{}{}{}", painter.marker(">"), gutter, body));
            out.push(caret_line(raw, location.column, message, width, painter));
        } else {
            out.push(format!(" {}{}", painter.dim(&gutter), body));
        }
    }

    out.join("\n")
}

fn caret_line(
    line: &str,
    column: u32,
    message: Option<&str>,
    width: usize,
    painter: &Painter,
) -> String {
    let offset = column.saturating_sub(1) as usize;
    // tabs are kept so the caret lines up with tab-indented code
    let mut spacing: String = line
        .chars()
        .take(offset)
        .map(|c| if c == '\t' { '\t' } else { ' ' })
        .collect();
    let drawn = spacing.chars().count();
    if drawn < offset {
        spacing.push_str(&" ".repeat(offset - drawn));
    }

    let gutter = format!(" {} |", " ".repeat(width));
    let mut caret = painter.marker("^");
    if let Some(message) = message {
        caret.push(' ');
        caret.push_str(&painter.marker(message));
    }
    format!(" {} {}{}", painter.dim(&gutter), spacing, caret)
}
