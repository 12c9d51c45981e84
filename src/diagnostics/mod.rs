//! Structured failures and warnings produced while processing one file.
//!
//! A [`Diagnostic`] is the failure side of
//! [`Pipeline::process`](crate::pipeline::Pipeline::process). It always carries
//! a plain `message` for programmatic consumers; parse failures additionally
//! carry an ANSI-decorated `frame` for terminals, rendered from the same
//! [`FrameLocation`] so the two never disagree.
//!
//! [`Warning`]s are non-fatal and ride along with either outcome, so callers
//! can assert on them without capturing log output.

pub mod code_frame;
pub mod highlight;
pub mod locator;

use std::fmt;

pub use code_frame::FrameOptions;
pub use locator::locate;

/// A 1-based line/column pair inside a framed text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameLocation {
    pub line: u32,
    pub column: u32,
}

impl FrameLocation {
    /// Build a location, bumping a zero column to one.
    pub fn new(line: u32, column: u32) -> Self {
        Self {
            line: line.max(1),
            column: column.max(1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// A content or into-JS hook reported failure
    Hook,
    /// No load hook produced content for the file
    MissingLoader,
    /// The final code is not valid JavaScript
    Parse,
}

/// Which text a diagnostic frame was rendered from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOrigin {
    /// No frame (hook failures)
    Unframed,
    /// The code handed to the parser, with no map to consult
    Generated,
    /// Original source recovered through the position map
    Original,
    /// Original source unreachable; generated code framed instead
    BestEffort,
}

/// Non-fatal condition recorded during a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// The file never reached JavaScript form before parsing
    UnsupportedType { kind: Option<String> },
    /// No load hook produced content and processing continued anyway
    MissingLoader,
    /// A parse failure mapped to a source that could not be read
    OriginalSourceUnavailable { source: String },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedType { kind } => write!(
                f,
                "File with type \"{}\" is not supported. A loader is needed to transform this kind of file into JavaScript.",
                kind.as_deref().unwrap_or("<none>")
            ),
            Self::MissingLoader => write!(f, "No loader produced content for this file."),
            Self::OriginalSourceUnavailable { source } => {
                write!(f, "Original source \"{}\" could not be located.", source)
            }
        }
    }
}

/// Terminal failure for one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// Plain text: header, optional notice and un-highlighted frame
    pub message: String,
    /// Highlighted frame for terminal display
    pub frame: Option<String>,
    pub location: Option<FrameLocation>,
    pub origin: FrameOrigin,
    /// Source identifier the frame was rendered from, when recovered
    pub source: Option<String>,
    pub warnings: Vec<Warning>,
}

impl Diagnostic {
    pub fn hook(message: impl Into<String>) -> Self {
        Self {
            kind: DiagnosticKind::Hook,
            message: message.into(),
            frame: None,
            location: None,
            origin: FrameOrigin::Unframed,
            source: None,
            warnings: Vec::new(),
        }
    }

    pub fn missing_loader(path: &std::path::Path) -> Self {
        Self {
            kind: DiagnosticKind::MissingLoader,
            message: format!(
                "No loader is available for \"{}\". Add a plugin with a load hook for this kind of file.",
                path.display()
            ),
            frame: None,
            location: None,
            origin: FrameOrigin::Unframed,
            source: None,
            warnings: Vec::new(),
        }
    }

    /// Prepend warnings collected before the failure.
    pub fn with_warnings(mut self, mut earlier: Vec<Warning>) -> Self {
        earlier.append(&mut self.warnings);
        self.warnings = earlier;
        self
    }

    /// `false` only when the frame is a best-effort guess in generated code.
    pub fn original_location_found(&self) -> bool {
        self.origin != FrameOrigin::BestEffort
    }

    /// Text meant for a terminal: the decorated frame when present.
    pub fn console_text(&self) -> &str {
        self.frame.as_deref().unwrap_or(&self.message)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for Diagnostic {}
