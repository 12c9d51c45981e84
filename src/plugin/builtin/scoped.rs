use crate::errors::HookError;
use crate::parse::AstTools;
use crate::plugin::{
    ContentInput, ContentOutput, IntoJsOutput, LoadHook, LoadOutput, Plugin, PluginContext,
    ResolveHook, TransformAstHook, TransformContentHook, TransformIntoJsHook,
};
use async_trait::async_trait;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use swc_core::ecma::ast::Module;

/// Restricts another plugin to files whose path matches a pattern.
///
/// Every hook of the inner plugin is wrapped; for paths that do not match, the
/// wrapper returns `Ok(None)` (or does nothing for AST hooks) without calling
/// the inner hook. Resolve hooks are gated on the importer's path.
///
/// ```rust
/// use regex::Regex;
/// use transpipe::plugin::builtin::{FsLoadPlugin, ScopedPlugin};
///
/// let plugin = ScopedPlugin::new(Regex::new(r"\.png$").unwrap(), FsLoadPlugin::plugin()).plugin();
/// assert_eq!(plugin.name(), "scoped(fs-load)");
/// assert!(plugin.load().is_some());
/// ```
#[derive(Debug, Clone)]
pub struct ScopedPlugin {
    test: Arc<Regex>,
    inner: Plugin,
}

struct Scoped<H: ?Sized> {
    test: Arc<Regex>,
    inner: Arc<H>,
}

impl<H: ?Sized> Scoped<H> {
    fn wrap(test: &Arc<Regex>, inner: &Arc<H>) -> Self {
        Self {
            test: Arc::clone(test),
            inner: Arc::clone(inner),
        }
    }

    fn applies_to(&self, path: &Path) -> bool {
        self.test.is_match(&path.to_string_lossy())
    }
}

impl ScopedPlugin {
    pub fn new(test: Regex, inner: Plugin) -> Self {
        Self {
            test: Arc::new(test),
            inner,
        }
    }

    pub fn plugin(self) -> Plugin {
        let mut plugin = Plugin::new(format!("scoped({})", self.inner.name()));
        if let Some(hook) = self.inner.resolve() {
            plugin = plugin.with_resolve(Scoped::wrap(&self.test, hook));
        }
        if let Some(hook) = self.inner.load() {
            plugin = plugin.with_load(Scoped::wrap(&self.test, hook));
        }
        if let Some(hook) = self.inner.transform_content() {
            plugin = plugin.with_transform_content(Scoped::wrap(&self.test, hook));
        }
        if let Some(hook) = self.inner.transform_into_js() {
            plugin = plugin.with_transform_into_js(Scoped::wrap(&self.test, hook));
        }
        if let Some(hook) = self.inner.transform_ast() {
            plugin = plugin.with_transform_ast(Scoped::wrap(&self.test, hook));
        }
        plugin
    }
}

#[async_trait]
impl ResolveHook for Scoped<dyn ResolveHook> {
    async fn resolve(
        &self,
        ctx: &PluginContext,
        specifier: &str,
        importer: &Path,
    ) -> Result<Option<PathBuf>, HookError> {
        if !self.applies_to(importer) {
            return Ok(None);
        }
        self.inner.resolve(ctx, specifier, importer).await
    }
}

#[async_trait]
impl LoadHook for Scoped<dyn LoadHook> {
    async fn load(&self, ctx: &PluginContext, path: &Path) -> Result<Option<LoadOutput>, HookError> {
        if !self.applies_to(path) {
            return Ok(None);
        }
        self.inner.load(ctx, path).await
    }
}

#[async_trait]
impl TransformContentHook for Scoped<dyn TransformContentHook> {
    async fn transform_content(
        &self,
        ctx: &PluginContext,
        input: ContentInput<'_>,
        path: &Path,
    ) -> Result<Option<ContentOutput>, HookError> {
        if !self.applies_to(path) {
            return Ok(None);
        }
        self.inner.transform_content(ctx, input, path).await
    }
}

#[async_trait]
impl TransformIntoJsHook for Scoped<dyn TransformIntoJsHook> {
    async fn transform_into_js(
        &self,
        ctx: &PluginContext,
        input: ContentInput<'_>,
        path: &Path,
    ) -> Result<Option<IntoJsOutput>, HookError> {
        if !self.applies_to(path) {
            return Ok(None);
        }
        self.inner.transform_into_js(ctx, input, path).await
    }
}

#[async_trait]
impl TransformAstHook for Scoped<dyn TransformAstHook> {
    async fn transform_ast(
        &self,
        ctx: &PluginContext,
        module: &mut Module,
        tools: AstTools<'_>,
        path: &Path,
    ) -> Result<(), HookError> {
        if !self.applies_to(path) {
            return Ok(());
        }
        self.inner.transform_ast(ctx, module, tools, path).await
    }
}
