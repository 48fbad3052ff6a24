//! Fatal/environmental errors for the curriculum engine.
//!
//! Learner-caused conditions (bad syntax, type errors, runtime throws in
//! test expressions) are never errors; they are represented as data in
//! [`crate::ValidationResult`]. Only broken-installation conditions
//! propagate through this type.

use std::path::PathBuf;
use thiserror::Error;

/// An environmental failure the engine cannot (and should not) swallow.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Filesystem access failed for a reason other than "file missing".
    #[error("i/o error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A configuration file exists but cannot be understood.
    #[error("invalid configuration in {path}: {message}")]
    Config { path: PathBuf, message: String },

    /// Learner progress could not be serialized.
    #[error("could not persist progress to {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl EngineError {
    /// Wrap an I/O error with the path it occurred on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
