//! Fluent construction of a [`Pipeline`].

use super::orchestrator::Pipeline;
use crate::config::{load_config, TranspipeConfig};
use crate::plugin::{HookRegistry, Plugin, PluginContext};
use std::path::PathBuf;
use std::sync::Arc;

/// Builder for constructing pipelines.
///
/// The hook registry is partitioned exactly once, in [`build`](Self::build),
/// before any file can be processed.
///
/// # Example
///
/// ```rust
/// use transpipe::pipeline::PipelineBuilder;
/// use transpipe::plugin::builtin::{FsLoadPlugin, ReplacePlugin};
///
/// let minify = false;
/// let pipeline = PipelineBuilder::new("/project")
///     .plugin(FsLoadPlugin::plugin())
///     .when(!minify, |b| b.plugin(ReplacePlugin::new().replace("DEBUG", "true").plugin()))
///     .build();
///
/// assert_eq!(pipeline.registry().load_hooks().len(), 1);
/// assert_eq!(pipeline.registry().transform_ast_hooks().len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct PipelineBuilder {
    root_dir: PathBuf,
    plugins: Vec<Plugin>,
    settings: TranspipeConfig,
}

impl PipelineBuilder {
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
            plugins: Vec::new(),
            settings: TranspipeConfig::default(),
        }
    }

    /// Like [`new`](Self::new), with settings from the nearest `.transpipe.toml`.
    pub fn from_config(root_dir: impl Into<PathBuf>) -> Self {
        let root_dir = root_dir.into();
        let settings = load_config(&root_dir);
        Self::new(root_dir).settings(settings)
    }

    /// Append a plugin. Declaration order is hook order.
    pub fn plugin(mut self, plugin: Plugin) -> Self {
        self.plugins.push(plugin);
        self
    }

    pub fn plugins(mut self, plugins: impl IntoIterator<Item = Plugin>) -> Self {
        self.plugins.extend(plugins);
        self
    }

    /// Apply `f` only if `condition` holds.
    pub fn when<F>(self, condition: bool, f: F) -> Self
    where
        F: FnOnce(Self) -> Self,
    {
        if condition {
            f(self)
        } else {
            self
        }
    }

    pub fn settings(mut self, settings: TranspipeConfig) -> Self {
        self.settings = settings;
        self
    }

    pub fn build(self) -> Pipeline {
        let registry = HookRegistry::from_plugins(&self.plugins);
        Pipeline::new(
            Arc::new(registry),
            Arc::new(PluginContext::new(self.root_dir)),
            self.settings,
        )
    }
}
