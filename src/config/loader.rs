use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::core::A11ymapConfig;
use crate::errors::ConfigError;

pub const CONFIG_FILE_NAME: &str = ".a11ymap.toml";

/// Ancestor directories searched when no `--config` is given.
const SEARCH_DEPTH: usize = 10;

pub fn parse_config(contents: &str) -> Result<A11ymapConfig, toml::de::Error> {
    toml::from_str(contents)
}

/// Load a config file the user asked for explicitly. Failures are errors.
pub fn load_config_from_path(path: &Path) -> Result<A11ymapConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a discovered config file. A missing file is silently skipped;
/// unreadable or invalid ones are skipped with a warning.
fn load_discovered(path: &Path) -> Option<A11ymapConfig> {
    match load_config_from_path(path) {
        Ok(config) => {
            tracing::debug!(path = %path.display(), "Loaded config");
            Some(config)
        }
        Err(ConfigError::Read { source, .. }) if source.kind() == io::ErrorKind::NotFound => None,
        Err(e) => {
            tracing::warn!("{e}; ignoring this file");
            None
        }
    }
}

/// `start` followed by its parents, at most `max_depth` directories.
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| dir.parent().map(Path::to_path_buf)).take(max_depth)
}

/// Search `start` and its ancestors for `.a11ymap.toml`.
pub fn discover_config(start: PathBuf) -> A11ymapConfig {
    directory_ancestors(start, SEARCH_DEPTH)
        .find_map(|dir| load_discovered(&dir.join(CONFIG_FILE_NAME)))
        .unwrap_or_else(|| {
            tracing::debug!(depth = SEARCH_DEPTH, "No config file found; using defaults");
            A11ymapConfig::default()
        })
}

/// Load the explicit config when given, otherwise discover one from the
/// current directory.
pub fn load_config(explicit: Option<&Path>) -> Result<A11ymapConfig, ConfigError> {
    if let Some(path) = explicit {
        return load_config_from_path(path);
    }

    match std::env::current_dir() {
        Ok(dir) => Ok(discover_config(dir)),
        Err(e) => {
            tracing::warn!(error = %e, "Cannot determine current directory; using default config");
            Ok(A11ymapConfig::default())
        }
    }
}
