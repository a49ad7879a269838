//! Error types for the game launcher.
//!
//! Runtime failures come in two kinds, spawn and terminate. Both stop at the
//! controller boundary: they are logged there and the caller only sees a
//! failed outcome.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the launcher.
#[derive(Debug, Error)]
pub enum LauncherError {
    #[error("Failed to spawn {path}: {source}")]
    SpawnFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to terminate process {pid}: {source}")]
    TerminateFailed {
        pid: u32,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

/// Result type alias for launcher operations.
pub type Result<T> = std::result::Result<T, LauncherError>;

impl LauncherError {
    pub fn spawn_failed(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LauncherError::SpawnFailed {
            path: path.into(),
            source,
        }
    }

    pub fn terminate_failed(pid: u32, source: std::io::Error) -> Self {
        LauncherError::TerminateFailed { pid, source }
    }

    /// Short machine-readable kind, used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            LauncherError::SpawnFailed { .. } => "spawn_failed",
            LauncherError::TerminateFailed { .. } => "terminate_failed",
            LauncherError::Config { .. } => "config",
        }
    }
}
