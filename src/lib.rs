//! File-transform pipeline for a development bundler.
//!
//! A file path goes in; a JavaScript module AST and a position map tracing
//! generated code back to its original sources come out. Plugins supply the
//! work through five optional hooks (resolve, load, content transform,
//! into-JS, AST transform) and the pipeline runs them in a fixed order,
//! merging position maps as content is rewritten. When the final code does
//! not parse, the failure is traced back to the original source and framed.
//!
//! ```rust,no_run
//! use transpipe::pipeline::PipelineBuilder;
//! use transpipe::plugin::builtin::FsLoadPlugin;
//!
//! # async fn run() {
//! let pipeline = PipelineBuilder::from_config("/project")
//!     .plugin(FsLoadPlugin::plugin())
//!     .build();
//!
//! match pipeline.process("src/index.js").await {
//!     Ok(processed) => println!("{} items", processed.ast.body.len()),
//!     Err(diagnostic) => eprintln!("{}", diagnostic.console_text()),
//! }
//! # }
//! ```

pub mod config;
pub mod diagnostics;
pub mod errors;
pub mod formatting;
pub mod parse;
pub mod pipeline;
pub mod plugin;
pub mod source_map;

pub use crate::config::{MissingLoaderPolicy, TranspipeConfig};
pub use crate::diagnostics::{Diagnostic, DiagnosticKind, FrameLocation, FrameOrigin, Warning};
pub use crate::errors::{Error, HookError, Result};
pub use crate::pipeline::{Pipeline, PipelineBuilder, Processed};
pub use crate::plugin::{HookRegistry, Plugin, PluginContext};
pub use crate::source_map::{PositionMap, PositionMapBuilder};
