//! Stage names and per-stage timing.

use std::fmt;
use std::time::{Duration, Instant};

/// The ordered stages one file passes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StageName {
    Load,
    TransformContent,
    TransformIntoJs,
    Parse,
    TransformAst,
}

impl StageName {
    pub const ALL: [StageName; 5] = [
        StageName::Load,
        StageName::TransformContent,
        StageName::TransformIntoJs,
        StageName::Parse,
        StageName::TransformAst,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Load => "load",
            Self::TransformContent => "transform_content",
            Self::TransformIntoJs => "transform_into_js",
            Self::Parse => "parse",
            Self::TransformAst => "transform_ast",
        }
    }
}

impl fmt::Display for StageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Timing information for a pipeline stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageTiming {
    pub stage: StageName,
    pub duration: Duration,
}

impl StageTiming {
    /// Format the timing as a human-readable string.
    pub fn format(&self) -> String {
        format!("{}: {:.2}ms", self.stage, self.duration.as_secs_f64() * 1000.0)
    }
}

pub fn total_duration(timings: &[StageTiming]) -> Duration {
    timings.iter().map(|t| t.duration).sum()
}

pub(crate) struct StageTimer {
    stage: StageName,
    start: Instant,
}

impl StageTimer {
    pub(crate) fn start(stage: StageName) -> Self {
        tracing::debug!(stage = %stage, "stage started");
        Self {
            stage,
            start: Instant::now(),
        }
    }

    pub(crate) fn finish(self, timings: &mut Vec<StageTiming>) {
        timings.push(StageTiming {
            stage: self.stage,
            duration: self.start.elapsed(),
        });
    }
}
