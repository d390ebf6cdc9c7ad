//! Error types surfaced by the environment

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors returned by the engine's public interface
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvError {
    /// Action integer outside the encoded range
    #[error("invalid action {0}: expected one of 0 (left), 1 (right), 2 (fire), 3 (no-op)")]
    InvalidAction(i64),
    /// `step` or `render_snapshot` called before the first `reset`
    #[error("environment not initialized: call reset() before step()")]
    NotInitialized,
}

/// Errors reading or writing driver files (settings, best-episodes board)
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to access {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON in {}: {}", .path.display(), .source)]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn json(path: &Path, source: serde_json::Error) -> Self {
        StoreError::Json {
            path: path.to_path_buf(),
            source,
        }
    }
}
