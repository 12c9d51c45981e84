// Test plugins shared by the transpipe integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use swc_core::ecma::ast::Module;
use transpipe::errors::HookError;
use transpipe::parse::AstTools;
use transpipe::plugin::{
    ContentInput, ContentOutput, IntoJsOutput, LoadHook, LoadOutput, Plugin, PluginContext,
    ResolveHook, TransformAstHook, TransformContentHook, TransformIntoJsHook,
};

/// Ordered record of hook invocations, as `"<label>"` entries.
#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, entry: impl Into<String>) {
        self.0.lock().unwrap().push(entry.into());
    }

    pub fn calls(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

type LoadFn = dyn Fn(&Path) -> Result<Option<LoadOutput>, HookError> + Send + Sync;
type ContentFn =
    dyn for<'a> Fn(ContentInput<'a>) -> Result<Option<ContentOutput>, HookError> + Send + Sync;
type IntoJsFn =
    dyn for<'a> Fn(ContentInput<'a>) -> Result<Option<IntoJsOutput>, HookError> + Send + Sync;
type AstFn = dyn Fn(&mut Module) -> Result<(), HookError> + Send + Sync;
type ResolveFn = dyn Fn(&str) -> Option<PathBuf> + Send + Sync;

struct Recorded<F: ?Sized> {
    label: String,
    log: CallLog,
    f: Box<F>,
}

#[async_trait]
impl LoadHook for Recorded<LoadFn> {
    async fn load(&self, _ctx: &PluginContext, path: &Path) -> Result<Option<LoadOutput>, HookError> {
        self.log.record(&self.label);
        (self.f)(path)
    }
}

#[async_trait]
impl TransformContentHook for Recorded<ContentFn> {
    async fn transform_content(
        &self,
        _ctx: &PluginContext,
        input: ContentInput<'_>,
        _path: &Path,
    ) -> Result<Option<ContentOutput>, HookError> {
        self.log.record(&self.label);
        (self.f)(input)
    }
}

#[async_trait]
impl TransformIntoJsHook for Recorded<IntoJsFn> {
    async fn transform_into_js(
        &self,
        _ctx: &PluginContext,
        input: ContentInput<'_>,
        _path: &Path,
    ) -> Result<Option<IntoJsOutput>, HookError> {
        self.log.record(&self.label);
        (self.f)(input)
    }
}

#[async_trait]
impl TransformAstHook for Recorded<AstFn> {
    async fn transform_ast(
        &self,
        _ctx: &PluginContext,
        module: &mut Module,
        _tools: AstTools<'_>,
        _path: &Path,
    ) -> Result<(), HookError> {
        self.log.record(&self.label);
        (self.f)(module)
    }
}

#[async_trait]
impl ResolveHook for Recorded<ResolveFn> {
    async fn resolve(
        &self,
        _ctx: &PluginContext,
        specifier: &str,
        _importer: &Path,
    ) -> Result<Option<PathBuf>, HookError> {
        self.log.record(&self.label);
        Ok((self.f)(specifier))
    }
}

pub fn load_plugin<F>(label: &str, log: &CallLog, f: F) -> Plugin
where
    F: Fn(&Path) -> Result<Option<LoadOutput>, HookError> + Send + Sync + 'static,
{
    let f: Box<LoadFn> = Box::new(f);
    Plugin::new(label).with_load(Recorded {
        label: label.to_string(),
        log: log.clone(),
        f,
    })
}

pub fn content_plugin<F>(label: &str, log: &CallLog, f: F) -> Plugin
where
    F: for<'a> Fn(ContentInput<'a>) -> Result<Option<ContentOutput>, HookError>
        + Send
        + Sync
        + 'static,
{
    let f: Box<ContentFn> = Box::new(f);
    Plugin::new(label).with_transform_content(Recorded {
        label: label.to_string(),
        log: log.clone(),
        f,
    })
}

pub fn into_js_plugin<F>(label: &str, log: &CallLog, f: F) -> Plugin
where
    F: for<'a> Fn(ContentInput<'a>) -> Result<Option<IntoJsOutput>, HookError>
        + Send
        + Sync
        + 'static,
{
    let f: Box<IntoJsFn> = Box::new(f);
    Plugin::new(label).with_transform_into_js(Recorded {
        label: label.to_string(),
        log: log.clone(),
        f,
    })
}

pub fn ast_plugin<F>(label: &str, log: &CallLog, f: F) -> Plugin
where
    F: Fn(&mut Module) -> Result<(), HookError> + Send + Sync + 'static,
{
    let f: Box<AstFn> = Box::new(f);
    Plugin::new(label).with_transform_ast(Recorded {
        label: label.to_string(),
        log: log.clone(),
        f,
    })
}

pub fn resolve_plugin<F>(label: &str, log: &CallLog, f: F) -> Plugin
where
    F: Fn(&str) -> Option<PathBuf> + Send + Sync + 'static,
{
    let f: Box<ResolveFn> = Box::new(f);
    Plugin::new(label).with_resolve(Recorded {
        label: label.to_string(),
        log: log.clone(),
        f,
    })
}

/// Loader that serves `code` tagged `kind` for every path.
pub fn static_loader(code: &str, kind: &str) -> Plugin {
    let code = code.to_string();
    let kind = kind.to_string();
    load_plugin("static-loader", &CallLog::new(), move |_| {
        Ok(Some(LoadOutput::new(code.clone(), Some(kind.as_str()))))
    })
}

/// v3 map JSON for code shifted down by one line: generated line `i + 1`
/// maps to line `i` of an unnamed source, for `lines` lines.
pub fn line_shift_map_json(lines: usize) -> String {
    let mut mappings = String::from(";");
    for i in 0..lines {
        if i > 0 {
            mappings.push(';');
        }
        mappings.push_str(if i == 0 { "AAAA" } else { "AACA" });
    }
    format!(
        r#"{{"version":3,"sources":[null],"names":[],"mappings":"{}"}}"#,
        mappings
    )
}
