use crate::errors::HookError;
use crate::plugin::{LoadHook, LoadOutput, Plugin, PluginContext};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::Path;

/// Default loader: reads the file from disk and tags it with its extension.
///
/// A missing file yields `Ok(None)` so later loaders still get a chance;
/// any other I/O error is reported as a hook failure.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsLoadPlugin;

impl FsLoadPlugin {
    pub const NAME: &'static str = "fs-load";

    pub fn plugin() -> Plugin {
        Plugin::new(Self::NAME).with_load(Self)
    }
}

#[async_trait]
impl LoadHook for FsLoadPlugin {
    async fn load(&self, ctx: &PluginContext, path: &Path) -> Result<Option<LoadOutput>, HookError> {
        let absolute = ctx.absolute(path);
        let code = match tokio::fs::read_to_string(&absolute).await {
            Ok(code) => code,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(HookError::new(format!(
                    "Failed to read {}: {}",
                    absolute.display(),
                    e
                )))
            }
        };

        let kind = path.extension().and_then(|ext| ext.to_str());
        Ok(Some(LoadOutput::new(code, kind)))
    }
}
