//! Drives one file through load, content transforms, into-JS, parse and AST
//! transforms.
//!
//! Hooks are awaited strictly one at a time; each hook's output is the next
//! one's input. [`Pipeline::process`] spawns nothing, so dropping its future
//! drops any pending hook call with it.

use super::stage::{StageName, StageTimer, StageTiming};
use super::state::PipelineState;
use crate::config::{MissingLoaderPolicy, TranspipeConfig};
use crate::diagnostics::{locate, Diagnostic, Warning};
use crate::errors::HookError;
use crate::formatting::Painter;
use crate::parse::{parse_module, AstTools};
use crate::plugin::{HookRegistry, PluginContext};
use crate::source_map::PositionMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use swc_core::ecma::ast::Module;
use tokio::task::JoinSet;
use tracing::Instrument;

/// A successfully processed file.
#[derive(Debug, Clone)]
pub struct Processed {
    pub ast: Module,
    /// Maps the parsed code back to the original sources
    pub map: Option<PositionMap>,
    pub warnings: Vec<Warning>,
    pub timings: Vec<StageTiming>,
}

impl Processed {
    pub fn total_duration(&self) -> Duration {
        super::stage::total_duration(&self.timings)
    }
}

/// Immutable, cheaply clonable pipeline shared by every file in flight.
#[derive(Debug, Clone)]
pub struct Pipeline {
    registry: Arc<HookRegistry>,
    context: Arc<PluginContext>,
    settings: TranspipeConfig,
}

impl Pipeline {
    pub(crate) fn new(
        registry: Arc<HookRegistry>,
        context: Arc<PluginContext>,
        settings: TranspipeConfig,
    ) -> Self {
        Self {
            registry,
            context,
            settings,
        }
    }

    pub fn registry(&self) -> &HookRegistry {
        &self.registry
    }

    pub fn context(&self) -> &PluginContext {
        &self.context
    }

    pub fn settings(&self) -> &TranspipeConfig {
        &self.settings
    }

    /// Ask resolve hooks in order; the first to answer wins.
    pub async fn resolve(
        &self,
        specifier: &str,
        importer: &Path,
    ) -> Result<Option<PathBuf>, HookError> {
        for entry in self.registry.resolve_hooks() {
            if let Some(resolved) = entry
                .hook()
                .resolve(&self.context, specifier, importer)
                .await?
            {
                tracing::debug!(
                    plugin = entry.plugin_name(),
                    specifier,
                    resolved = %resolved.display(),
                    "specifier resolved"
                );
                return Ok(Some(resolved));
            }
        }
        Ok(None)
    }

    /// Turn one file into an AST and position map.
    pub async fn process(&self, path: impl AsRef<Path>) -> Result<Processed, Diagnostic> {
        let path = path.as_ref();
        let span = tracing::debug_span!("process", path = %path.display());
        self.run(path).instrument(span).await
    }

    /// Process files concurrently, returning results in input order.
    ///
    /// Each file runs in its own task on a [`JoinSet`]; dropping the returned
    /// future aborts every task still running.
    pub async fn process_many<I, P>(&self, paths: I) -> Vec<Result<Processed, Diagnostic>>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let paths: Vec<PathBuf> = paths.into_iter().map(Into::into).collect();
        let mut tasks = JoinSet::new();
        for (index, path) in paths.iter().cloned().enumerate() {
            let pipeline = self.clone();
            tasks.spawn(async move { (index, pipeline.process(&path).await) });
        }

        let mut results: Vec<Option<Result<Processed, Diagnostic>>> =
            paths.iter().map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, result)) => results[index] = Some(result),
                Err(e) => tracing::error!("processing task failed: {}", e),
            }
        }

        paths
            .iter()
            .zip(results)
            .map(|(path, result)| {
                result.unwrap_or_else(|| {
                    Err(Diagnostic::hook(format!(
                        "Processing \"{}\" did not complete",
                        path.display()
                    )))
                })
            })
            .collect()
    }

    async fn run(&self, path: &Path) -> Result<Processed, Diagnostic> {
        let ctx = &*self.context;
        let mut state = PipelineState::default();

        let timer = StageTimer::start(StageName::Load);
        let mut loaded = false;
        for entry in self.registry.load_hooks() {
            match entry.hook().load(ctx, path).await {
                Ok(Some(output)) => {
                    tracing::debug!(plugin = entry.plugin_name(), kind = ?output.kind, "loaded");
                    state.adopt_load(output);
                    loaded = true;
                    break;
                }
                Ok(None) => {}
                Err(e) => {
                    return Err(self.hook_failure(
                        entry.plugin_name(),
                        StageName::Load,
                        e,
                        state,
                    ))
                }
            }
        }
        timer.finish(&mut state.timings);

        if !loaded {
            match self.settings.pipeline.missing_loader {
                MissingLoaderPolicy::Fail => {
                    let diagnostic = Diagnostic::missing_loader(path);
                    tracing::error!("{}", self.painter().error(&diagnostic.message));
                    return Err(diagnostic.with_warnings(state.warnings));
                }
                MissingLoaderPolicy::Continue => {
                    tracing::warn!("no loader produced content, continuing with empty code");
                    state.warnings.push(Warning::MissingLoader);
                }
            }
        }

        let timer = StageTimer::start(StageName::TransformContent);
        for entry in self.registry.transform_content_hooks() {
            match entry.hook().transform_content(ctx, state.input(), path).await {
                Ok(Some(output)) => {
                    tracing::debug!(
                        plugin = entry.plugin_name(),
                        with_map = output.map.is_some(),
                        "content transformed"
                    );
                    state.apply_content(output, path);
                }
                Ok(None) => {}
                Err(e) => {
                    return Err(self.hook_failure(
                        entry.plugin_name(),
                        StageName::TransformContent,
                        e,
                        state,
                    ))
                }
            }
        }
        timer.finish(&mut state.timings);

        let timer = StageTimer::start(StageName::TransformIntoJs);
        for entry in self.registry.transform_into_js_hooks() {
            match entry.hook().transform_into_js(ctx, state.input(), path).await {
                Ok(Some(output)) => {
                    tracing::debug!(plugin = entry.plugin_name(), "converted into JavaScript");
                    state.apply_into_js(output);
                    break;
                }
                Ok(None) => {}
                Err(e) => {
                    return Err(self.hook_failure(
                        entry.plugin_name(),
                        StageName::TransformIntoJs,
                        e,
                        state,
                    ))
                }
            }
        }
        timer.finish(&mut state.timings);

        if !state.is_js() {
            let warning = Warning::UnsupportedType {
                kind: state.kind.clone(),
            };
            tracing::warn!("{}", self.painter().error(&warning.to_string()));
            state.warnings.push(warning);
        }

        let timer = StageTimer::start(StageName::Parse);
        let parsed = parse_module(&state.code, path);
        timer.finish(&mut state.timings);

        let mut module = match parsed {
            Ok(module) => module,
            Err(failure) => {
                let diagnostic = locate(
                    &failure,
                    &state.code,
                    state.map.as_ref(),
                    path,
                    ctx.root_dir(),
                    &self.settings.diagnostics,
                )
                .await;
                tracing::error!("{}", diagnostic.console_text());
                return Err(diagnostic.with_warnings(state.warnings));
            }
        };

        let timer = StageTimer::start(StageName::TransformAst);
        for entry in self.registry.transform_ast_hooks() {
            if let Err(e) = entry
                .hook()
                .transform_ast(ctx, &mut module, AstTools::new(path), path)
                .await
            {
                return Err(self.hook_failure(
                    entry.plugin_name(),
                    StageName::TransformAst,
                    e,
                    state,
                ));
            }
        }
        timer.finish(&mut state.timings);

        Ok(Processed {
            ast: module,
            map: state.map,
            warnings: state.warnings,
            timings: state.timings,
        })
    }

    fn painter(&self) -> Painter {
        Painter::new(self.settings.diagnostics.color.with_env_overrides())
    }

    fn hook_failure(
        &self,
        plugin: &str,
        stage: StageName,
        error: HookError,
        state: PipelineState,
    ) -> Diagnostic {
        tracing::error!(plugin, stage = %stage, "{}", self.painter().error(error.message()));
        Diagnostic::hook(error.message()).with_warnings(state.warnings)
    }
}
