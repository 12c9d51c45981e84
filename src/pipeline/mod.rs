//! The file-transform pipeline.
//!
//! [`PipelineBuilder`] collects plugins and settings and partitions hooks
//! once; the resulting [`Pipeline`] is immutable and may process any number
//! of files concurrently. Each file owns its own [`PipelineState`].

pub mod builder;
pub mod orchestrator;
pub mod stage;
pub mod state;

pub use builder::PipelineBuilder;
pub use orchestrator::{Pipeline, Processed};
pub use stage::{StageName, StageTiming};
pub use state::{PipelineState, JS_KIND};
