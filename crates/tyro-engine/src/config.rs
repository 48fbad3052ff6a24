//! Engine configuration, loaded from an optional `tyro.toml`.
//!
//! ```toml
//! workspace_dir = "workspace"
//! progress_file = "progress.json"
//! gas_limit = 1000000
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;
use tyro_eval::DEFAULT_GAS_LIMIT;

use crate::error::EngineError;

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "tyro.toml";

/// Tunable engine settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Directory holding the learner's workspace files.
    pub workspace_dir: PathBuf,
    /// Path of the persisted progress JSON.
    pub progress_file: PathBuf,
    /// Evaluation step budget per test expression.
    pub gas_limit: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            workspace_dir: PathBuf::from("workspace"),
            progress_file: PathBuf::from("progress.json"),
            gas_limit: DEFAULT_GAS_LIMIT,
        }
    }
}

impl EngineConfig {
    /// Load a config file. The file must exist and parse.
    pub fn load(path: &Path) -> Result<Self, EngineError> {
        let text = fs::read_to_string(path).map_err(|e| EngineError::io(path, e))?;
        let config = toml::from_str(&text).map_err(|e| EngineError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        debug!(path = %path.display(), "loaded engine config");
        Ok(config)
    }

    /// Load the given path when provided, else `tyro.toml` when present,
    /// else defaults. An explicitly named file that is missing or invalid
    /// is an error; the implicit one only errors when invalid.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, EngineError> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let implicit = Path::new(CONFIG_FILE_NAME);
                if implicit.exists() {
                    Self::load(implicit)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.workspace_dir, PathBuf::from("workspace"));
        assert_eq!(config.progress_file, PathBuf::from("progress.json"));
        assert_eq!(config.gas_limit, DEFAULT_GAS_LIMIT);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tyro.toml");
        std::fs::write(&path, "gas_limit = 500\n").unwrap();
        let config = EngineConfig::load(&path).unwrap();
        assert_eq!(config.gas_limit, 500);
        assert_eq!(config.workspace_dir, PathBuf::from("workspace"));
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tyro.toml");
        std::fs::write(&path, "gas_limit = \"lots\"\n").unwrap();
        let err = EngineConfig::load(&path);
        assert!(matches!(err, Err(EngineError::Config { .. })));
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let err = EngineConfig::load_or_default(Some(Path::new("/definitely/not/here.toml")));
        assert!(matches!(err, Err(EngineError::Io { .. })));
    }
}
