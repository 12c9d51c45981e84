//! Error types shared across the pipeline.
//!
//! Two families live here:
//!
//! - [`HookError`]: the single failure shape a plugin hook can report. The
//!   orchestrator turns it into a [`Diagnostic`](crate::diagnostics::Diagnostic)
//!   carrying the hook's message and nothing else.
//! - [`Error`]: library-level failures outside of a file's pipeline run
//!   (source-map decoding, configuration, I/O).
//!
//! # Example
//!
//! ```rust
//! use transpipe::errors::HookError;
//!
//! let err = HookError::new("sass: undefined variable $accent");
//! assert_eq!(err.message(), "sass: undefined variable $accent");
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Failure reported by a plugin hook.
///
/// Hooks return `Result<Option<T>, HookError>`: `Ok(None)` means the hook had
/// nothing to do, `Ok(Some(_))` is a payload and `Err` aborts the file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct HookError {
    message: String,
}

impl HookError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<std::io::Error> for HookError {
    fn from(err: std::io::Error) -> Self {
        Self::new(err.to_string())
    }
}

impl From<Error> for HookError {
    fn from(err: Error) -> Self {
        Self::new(err.to_string())
    }
}

/// Main error type for transpipe library operations
#[derive(Debug, Error)]
pub enum Error {
    /// Source map could not be decoded or encoded
    #[error("Source map error: {0}")]
    SourceMap(#[from] SourceMapError),

    /// Configuration errors
    #[error("Configuration error in {path}: {message}")]
    Config { path: PathBuf, message: String },

    /// File system related errors
    #[error("File system error: {message}")]
    FileSystem {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },
}

impl Error {
    pub fn config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn file_system(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        Self::FileSystem {
            message: format!("{}: {}", path.display(), source),
            path: Some(path),
            source: Some(source),
        }
    }
}

/// Errors raised by the source map codec.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceMapError {
    #[error("invalid source map JSON: {0}")]
    Json(String),

    #[error("unsupported source map version {0}")]
    UnsupportedVersion(u32),

    #[error("invalid base64 VLQ character {0:?}")]
    InvalidBase64(char),

    #[error("VLQ segment ended in the middle of a value")]
    TruncatedVlq,

    #[error("VLQ value does not fit in 32 bits")]
    VlqOverflow,

    #[error("mapping segment has {0} fields, expected 1, 4 or 5")]
    InvalidSegment(usize),

    #[error("mapping references {kind} index {index} which is out of range")]
    IndexOutOfRange { kind: &'static str, index: i64 },

    #[error("mapping has a negative {0}")]
    NegativeValue(&'static str),
}

impl From<serde_json::Error> for SourceMapError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
