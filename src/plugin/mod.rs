//! Plugin capabilities and the payloads they exchange with the pipeline.
//!
//! A [`Plugin`] is a named bundle of up to five optional hooks. Each hook is
//! its own object-safe async trait, so a plugin only implements the stages it
//! cares about and the registry can partition plugins by capability once.
//!
//! Hook results follow one shape: `Ok(None)` when the hook has nothing to
//! contribute, `Ok(Some(payload))` on success and `Err(HookError)` to abort
//! the file.
//!
//! # Example
//!
//! ```rust
//! use async_trait::async_trait;
//! use std::path::Path;
//! use transpipe::errors::HookError;
//! use transpipe::plugin::{LoadHook, LoadOutput, Plugin, PluginContext};
//!
//! struct Inline;
//!
//! #[async_trait]
//! impl LoadHook for Inline {
//!     async fn load(
//!         &self,
//!         _ctx: &PluginContext,
//!         path: &Path,
//!     ) -> Result<Option<LoadOutput>, HookError> {
//!         if path.ends_with("virtual.js") {
//!             return Ok(Some(LoadOutput::new("export default 1;", Some("js"))));
//!         }
//!         Ok(None)
//!     }
//! }
//!
//! let plugin = Plugin::new("inline").with_load(Inline);
//! assert!(plugin.load().is_some());
//! assert!(plugin.transform_ast().is_none());
//! ```

pub mod builtin;
pub mod registry;

use crate::errors::HookError;
use crate::parse::AstTools;
use crate::source_map::PositionMap;
use async_trait::async_trait;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use swc_core::ecma::ast::Module;

pub use registry::{HookRegistry, RegisteredHook};

/// Read-only context handed to every hook call.
#[derive(Debug, Clone)]
pub struct PluginContext {
    root_dir: PathBuf,
}

impl PluginContext {
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    /// Resolve `path` against the project root unless it is already absolute.
    pub fn absolute(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root_dir.join(path)
        }
    }
}

/// Content produced by a load hook.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadOutput {
    pub code: String,
    /// Content type tag, e.g. `"js"` or `"scss"`
    pub kind: Option<String>,
    pub map: Option<PositionMap>,
}

impl LoadOutput {
    pub fn new(code: impl Into<String>, kind: Option<&str>) -> Self {
        Self {
            code: code.into(),
            kind: kind.map(str::to_string),
            map: None,
        }
    }

    pub fn with_map(mut self, map: PositionMap) -> Self {
        self.map = Some(map);
        self
    }
}

/// Current state of a file as seen by content and into-JS hooks.
#[derive(Debug, Clone, Copy)]
pub struct ContentInput<'a> {
    pub code: &'a str,
    pub kind: Option<&'a str>,
    pub map: Option<&'a PositionMap>,
}

/// Rewritten content from a content hook. `map` maps the new code back to the
/// code the hook received; `kind` replaces the current tag when set.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ContentOutput {
    pub code: String,
    pub map: Option<PositionMap>,
    pub kind: Option<String>,
}

impl ContentOutput {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            ..Self::default()
        }
    }

    pub fn with_map(mut self, map: PositionMap) -> Self {
        self.map = Some(map);
        self
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }
}

/// JavaScript produced by an into-JS hook.
///
/// `input_map` replaces the accumulated map rather than being merged into it.
#[derive(Debug, Clone, PartialEq)]
pub struct IntoJsOutput {
    pub code: String,
    pub input_map: Option<PositionMap>,
}

#[async_trait]
pub trait ResolveHook: Send + Sync {
    async fn resolve(
        &self,
        ctx: &PluginContext,
        specifier: &str,
        importer: &Path,
    ) -> Result<Option<PathBuf>, HookError>;
}

#[async_trait]
pub trait LoadHook: Send + Sync {
    async fn load(&self, ctx: &PluginContext, path: &Path)
        -> Result<Option<LoadOutput>, HookError>;
}

#[async_trait]
pub trait TransformContentHook: Send + Sync {
    async fn transform_content(
        &self,
        ctx: &PluginContext,
        input: ContentInput<'_>,
        path: &Path,
    ) -> Result<Option<ContentOutput>, HookError>;
}

#[async_trait]
pub trait TransformIntoJsHook: Send + Sync {
    async fn transform_into_js(
        &self,
        ctx: &PluginContext,
        input: ContentInput<'_>,
        path: &Path,
    ) -> Result<Option<IntoJsOutput>, HookError>;
}

/// Mutates the parsed module in place. Hooks run one after another and each
/// sees the mutations of the hooks before it.
#[async_trait]
pub trait TransformAstHook: Send + Sync {
    async fn transform_ast(
        &self,
        ctx: &PluginContext,
        module: &mut Module,
        tools: AstTools<'_>,
        path: &Path,
    ) -> Result<(), HookError>;
}

/// A named set of optional hooks.
#[derive(Clone, Default)]
pub struct Plugin {
    name: String,
    resolve: Option<Arc<dyn ResolveHook>>,
    load: Option<Arc<dyn LoadHook>>,
    transform_content: Option<Arc<dyn TransformContentHook>>,
    transform_into_js: Option<Arc<dyn TransformIntoJsHook>>,
    transform_ast: Option<Arc<dyn TransformAstHook>>,
}

impl Plugin {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_resolve(mut self, hook: impl ResolveHook + 'static) -> Self {
        self.resolve = Some(Arc::new(hook));
        self
    }

    pub fn with_load(mut self, hook: impl LoadHook + 'static) -> Self {
        self.load = Some(Arc::new(hook));
        self
    }

    pub fn with_transform_content(mut self, hook: impl TransformContentHook + 'static) -> Self {
        self.transform_content = Some(Arc::new(hook));
        self
    }

    pub fn with_transform_into_js(mut self, hook: impl TransformIntoJsHook + 'static) -> Self {
        self.transform_into_js = Some(Arc::new(hook));
        self
    }

    pub fn with_transform_ast(mut self, hook: impl TransformAstHook + 'static) -> Self {
        self.transform_ast = Some(Arc::new(hook));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn resolve(&self) -> Option<&Arc<dyn ResolveHook>> {
        self.resolve.as_ref()
    }

    pub fn load(&self) -> Option<&Arc<dyn LoadHook>> {
        self.load.as_ref()
    }

    pub fn transform_content(&self) -> Option<&Arc<dyn TransformContentHook>> {
        self.transform_content.as_ref()
    }

    pub fn transform_into_js(&self) -> Option<&Arc<dyn TransformIntoJsHook>> {
        self.transform_into_js.as_ref()
    }

    pub fn transform_ast(&self) -> Option<&Arc<dyn TransformAstHook>> {
        self.transform_ast.as_ref()
    }

    pub fn has_hooks(&self) -> bool {
        self.resolve.is_some()
            || self.load.is_some()
            || self.transform_content.is_some()
            || self.transform_into_js.is_some()
            || self.transform_ast.is_some()
    }

    fn capabilities(&self) -> Vec<&'static str> {
        [
            (self.resolve.is_some(), "resolve"),
            (self.load.is_some(), "load"),
            (self.transform_content.is_some(), "transform_content"),
            (self.transform_into_js.is_some(), "transform_into_js"),
            (self.transform_ast.is_some(), "transform_ast"),
        ]
        .into_iter()
        .filter_map(|(present, name)| present.then_some(name))
        .collect()
    }
}

impl fmt::Debug for Plugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Plugin")
            .field("name", &self.name)
            .field("hooks", &self.capabilities())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Noop;

    #[async_trait]
    impl TransformAstHook for Noop {
        async fn transform_ast(
            &self,
            _ctx: &PluginContext,
            _module: &mut Module,
            _tools: AstTools<'_>,
            _path: &Path,
        ) -> Result<(), HookError> {
            Ok(())
        }
    }

    #[test]
    fn test_plugin_without_hooks() {
        let plugin = Plugin::new("empty");
        assert!(!plugin.has_hooks());
        assert_eq!(format!("{:?}", plugin), "Plugin { name: \"empty\", hooks: [] }");
    }

    #[test]
    fn test_plugin_debug_lists_capabilities() {
        let plugin = Plugin::new("ast").with_transform_ast(Noop);
        assert!(plugin.has_hooks());
        assert!(format!("{:?}", plugin).contains("[\"transform_ast\"]"));
    }

    #[test]
    fn test_context_absolute() {
        let ctx = PluginContext::new("/project");
        assert_eq!(ctx.absolute(Path::new("src/a.js")), PathBuf::from("/project/src/a.js"));
        assert_eq!(ctx.absolute(Path::new("/tmp/b.js")), PathBuf::from("/tmp/b.js"));
    }
}
