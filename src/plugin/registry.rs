//! Per-capability hook lists, partitioned once from the plugin list.

use super::{
    LoadHook, Plugin, ResolveHook, TransformAstHook, TransformContentHook, TransformIntoJsHook,
};
use std::sync::Arc;

/// A hook together with the name of the plugin that provided it.
pub struct RegisteredHook<H: ?Sized> {
    plugin_name: Arc<str>,
    hook: Arc<H>,
}

impl<H: ?Sized> RegisteredHook<H> {
    pub fn plugin_name(&self) -> &str {
        &self.plugin_name
    }

    pub fn hook(&self) -> &H {
        &self.hook
    }
}

impl<H: ?Sized> Clone for RegisteredHook<H> {
    fn clone(&self) -> Self {
        Self {
            plugin_name: Arc::clone(&self.plugin_name),
            hook: Arc::clone(&self.hook),
        }
    }
}

impl<H: ?Sized> std::fmt::Debug for RegisteredHook<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("RegisteredHook").field(&self.plugin_name).finish()
    }
}

/// Ordered hook lists, one per capability. Immutable once built.
#[derive(Debug, Clone, Default)]
pub struct HookRegistry {
    resolve: Vec<RegisteredHook<dyn ResolveHook>>,
    load: Vec<RegisteredHook<dyn LoadHook>>,
    transform_content: Vec<RegisteredHook<dyn TransformContentHook>>,
    transform_into_js: Vec<RegisteredHook<dyn TransformIntoJsHook>>,
    transform_ast: Vec<RegisteredHook<dyn TransformAstHook>>,
}

fn collect<'p, H: ?Sized + 'p>(
    plugins: &'p [Plugin],
    project: impl Fn(&'p Plugin) -> Option<&'p Arc<H>>,
) -> Vec<RegisteredHook<H>> {
    plugins
        .iter()
        .filter_map(|plugin| {
            project(plugin).map(|hook| RegisteredHook {
                plugin_name: Arc::from(plugin.name()),
                hook: Arc::clone(hook),
            })
        })
        .collect()
}

impl HookRegistry {
    /// Partition `plugins` by capability, keeping declaration order.
    pub fn from_plugins(plugins: &[Plugin]) -> Self {
        let registry = Self {
            resolve: collect(plugins, Plugin::resolve),
            load: collect(plugins, Plugin::load),
            transform_content: collect(plugins, Plugin::transform_content),
            transform_into_js: collect(plugins, Plugin::transform_into_js),
            transform_ast: collect(plugins, Plugin::transform_ast),
        };

        tracing::debug!(
            plugins = plugins.len(),
            resolve = registry.resolve.len(),
            load = registry.load.len(),
            transform_content = registry.transform_content.len(),
            transform_into_js = registry.transform_into_js.len(),
            transform_ast = registry.transform_ast.len(),
            "hook registry built"
        );
        registry
    }

    pub fn resolve_hooks(&self) -> &[RegisteredHook<dyn ResolveHook>] {
        &self.resolve
    }

    pub fn load_hooks(&self) -> &[RegisteredHook<dyn LoadHook>] {
        &self.load
    }

    pub fn transform_content_hooks(&self) -> &[RegisteredHook<dyn TransformContentHook>] {
        &self.transform_content
    }

    pub fn transform_into_js_hooks(&self) -> &[RegisteredHook<dyn TransformIntoJsHook>] {
        &self.transform_into_js
    }

    pub fn transform_ast_hooks(&self) -> &[RegisteredHook<dyn TransformAstHook>] {
        &self.transform_ast
    }

    pub fn is_empty(&self) -> bool {
        self.resolve.is_empty()
            && self.load.is_empty()
            && self.transform_content.is_empty()
            && self.transform_into_js.is_empty()
            && self.transform_ast.is_empty()
    }
}
