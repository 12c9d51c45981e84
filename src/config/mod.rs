//! File-based settings for the pipeline.
//!
//! Settings come from `.transpipe.toml`, found by walking up from the project
//! root. Every key is optional:
//!
//! ```toml
//! [pipeline]
//! missing_loader = "fail"   # or "continue"
//!
//! [diagnostics]
//! color = "auto"            # "always" | "never"
//! lines_above = 2
//! lines_below = 3
//! ```

mod loader;

pub use loader::{
    directory_ancestors, load_config, load_config_from, parse_config, CONFIG_FILE_NAME,
};

use crate::diagnostics::FrameOptions;
use serde::{Deserialize, Serialize};

/// What to do when no load hook produces content for a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingLoaderPolicy {
    /// Stop with a missing-loader diagnostic before any transform runs
    #[default]
    Fail,
    /// Record a warning and run the remaining stages on empty content
    Continue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineSettings {
    pub missing_loader: MissingLoaderPolicy,
}

/// Root of `.transpipe.toml`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TranspipeConfig {
    pub pipeline: PipelineSettings,
    pub diagnostics: FrameOptions,
}
