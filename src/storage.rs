use crate::config::default_endpoints;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

const CONFIG_FILE_NAME: &str = "config.json";

/// Optional overrides read from `<config dir>/pktloss/config.json`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PersistedConfig {
    pub endpoints: Option<Vec<String>>,
    pub window_capacity: Option<usize>,
    pub tick_interval_ms: Option<u64>,
    pub probe_timeout_ms: Option<u64>,
}

impl PersistedConfig {
    /// Endpoint addresses to probe: the file's list when present, otherwise
    /// the built-in catalog. An explicitly empty list stays empty.
    pub fn catalog(&self) -> Vec<String> {
        self.endpoints.clone().unwrap_or_else(default_endpoints)
    }
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("pktloss"))
}

pub fn config_file_path() -> Option<PathBuf> {
    config_dir().map(|p| p.join(CONFIG_FILE_NAME))
}

/// Loads the overrides file, falling back to defaults when it is missing or
/// unusable.
pub fn load() -> PersistedConfig {
    let Some(path) = config_file_path() else {
        return PersistedConfig::default();
    };

    match load_from(&path) {
        Ok(Some(config)) => {
            tracing::info!(path = %path.display(), "Loaded config file");
            config
        }
        Ok(None) => PersistedConfig::default(),
        Err(err) => {
            tracing::warn!(error = %err, "Ignoring config file");
            PersistedConfig::default()
        }
    }
}

pub fn load_from(path: &Path) -> Result<Option<PersistedConfig>, StorageError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(StorageError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    serde_json::from_str(&content)
        .map(Some)
        .map_err(|source| StorageError::Parse {
            path: path.to_path_buf(),
            source,
        })
}
