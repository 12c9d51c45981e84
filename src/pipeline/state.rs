//! Per-file state threaded through the stages.

use super::stage::StageTiming;
use crate::diagnostics::Warning;
use crate::plugin::{ContentInput, ContentOutput, IntoJsOutput, LoadOutput};
use crate::source_map::{merge, PositionMap};
use std::path::Path;

/// Kind tag a file must carry before it is parsed.
pub const JS_KIND: &str = "js";

/// Owned by a single in-flight `process` call; never shared.
#[derive(Debug, Clone, Default)]
pub struct PipelineState {
    pub code: String,
    pub kind: Option<String>,
    /// Maps positions in `code` back to the earliest known coordinates
    pub map: Option<PositionMap>,
    pub warnings: Vec<Warning>,
    pub timings: Vec<StageTiming>,
}

impl PipelineState {
    pub fn input(&self) -> ContentInput<'_> {
        ContentInput {
            code: &self.code,
            kind: self.kind.as_deref(),
            map: self.map.as_ref(),
        }
    }

    pub fn adopt_load(&mut self, output: LoadOutput) {
        self.code = output.code;
        self.kind = output.kind;
        self.map = output.map;
    }

    /// Adopt a content hook's output, merging its map into the accumulated
    /// one after naming unnamed sources after `path`.
    pub fn apply_content(&mut self, output: ContentOutput, path: &Path) {
        self.code = output.code;
        if let Some(mut map) = output.map {
            map.normalize_unnamed_sources(&path.to_string_lossy());
            self.map = merge(self.map.take(), Some(map));
        }
        if let Some(kind) = output.kind {
            self.kind = Some(kind);
        }
    }

    /// Adopt an into-JS hook's output. Its map replaces the accumulated one.
    pub fn apply_into_js(&mut self, output: IntoJsOutput) {
        self.code = output.code;
        self.map = output.input_map;
        self.kind = Some(JS_KIND.to_string());
    }

    pub fn is_js(&self) -> bool {
        self.kind.as_deref() == Some(JS_KIND)
    }
}
