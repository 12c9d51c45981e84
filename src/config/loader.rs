use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use anyhow::Context;

use super::TranspipeConfig;
use crate::errors::Error;

pub const CONFIG_FILE_NAME: &str = ".transpipe.toml";

const MAX_TRAVERSAL_DEPTH: usize = 10;

fn read_config_file(path: &Path) -> Result<String, std::io::Error> {
    let file = fs::File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Parse config from a TOML string
pub fn parse_config(contents: &str) -> anyhow::Result<TranspipeConfig> {
    toml::from_str::<TranspipeConfig>(contents)
        .with_context(|| format!("Failed to parse {}", CONFIG_FILE_NAME))
}

/// Load config from an explicit path, failing on any read or parse error.
pub fn load_config_from(path: &Path) -> Result<TranspipeConfig, Error> {
    let contents = read_config_file(path).map_err(|e| Error::file_system(path, e))?;
    parse_config(&contents).map_err(|e| Error::config(path, format!("{:#}", e)))
}

fn try_load_config_from_path(config_path: &Path) -> Option<TranspipeConfig> {
    let contents = match read_config_file(config_path) {
        Ok(contents) => contents,
        Err(e) => {
            handle_read_error(config_path, &e);
            return None;
        }
    };

    match parse_config(&contents) {
        Ok(config) => {
            log::debug!("Loaded config from {}", config_path.display());
            Some(config)
        }
        Err(e) => {
            log::warn!("{:#}. Using defaults.", e);
            None
        }
    }
}

fn handle_read_error(config_path: &Path, error: &std::io::Error) {
    // "not found" is the normal case while walking up
    if error.kind() != std::io::ErrorKind::NotFound {
        log::warn!(
            "Failed to read config file {}: {}",
            config_path.display(),
            error
        );
    }
}

/// `start` followed by its parents, at most `max_depth` entries
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Find the nearest `.transpipe.toml` at or above `start`.
///
/// Unreadable or malformed files are logged and skipped; defaults are used
/// when nothing loads.
pub fn load_config(start: &Path) -> TranspipeConfig {
    directory_ancestors(start.to_path_buf(), MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find_map(|path| try_load_config_from_path(&path))
        .unwrap_or_else(|| {
            log::debug!(
                "No config found after checking {} directories. Using default config.",
                MAX_TRAVERSAL_DEPTH
            );
            TranspipeConfig::default()
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MissingLoaderPolicy;
    use tempfile::TempDir;

    #[test]
    fn test_directory_ancestors_is_bounded() {
        let dirs: Vec<_> = directory_ancestors(PathBuf::from("/a/b/c/d"), 3).collect();
        assert_eq!(
            dirs,
            vec![
                PathBuf::from("/a/b/c/d"),
                PathBuf::from("/a/b/c"),
                PathBuf::from("/a/b")
            ]
        );
    }

    #[test]
    fn test_load_config_finds_parent_file() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[pipeline]\nmissing_loader = \"continue\"\n",
        )
        .unwrap();
        let nested = dir.path().join("packages/app");
        fs::create_dir_all(&nested).unwrap();

        let config = load_config(&nested);
        assert_eq!(config.pipeline.missing_loader, MissingLoaderPolicy::Continue);
    }

    #[test]
    fn test_malformed_file_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), "[pipeline\n").unwrap();
        assert_eq!(load_config(dir.path()), TranspipeConfig::default());
    }

    #[test]
    fn test_load_config_from_reports_errors() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.toml");
        assert!(matches!(
            load_config_from(&missing),
            Err(Error::FileSystem { .. })
        ));

        let bad = dir.path().join("bad.toml");
        fs::write(&bad, "[diagnostics]\nlines_above = \"two\"\n").unwrap();
        assert!(matches!(load_config_from(&bad), Err(Error::Config { .. })));
    }
}
