//! Error types for skhelper-core operations.
//!
//! Nothing in the lifecycle is allowed to abort a game launch. These errors are
//! produced by the lower layers, logged by the orchestrator and turned into
//! "step failed" entries of a [`crate::lifecycle::LifecycleReport`].

use std::path::PathBuf;

/// All errors that can occur in skhelper-core operations.
#[derive(Debug, thiserror::Error)]
pub enum HelperError {
    // ─────────────────────────────────────────────────────────────────────
    // Expected-absent resources
    // ─────────────────────────────────────────────────────────────────────
    #[error("Not found: {0}")]
    NotFound(PathBuf),

    // ─────────────────────────────────────────────────────────────────────
    // Helper service errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("Failed to launch {program}: {source}")]
    ExternalProcessFailure {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Readiness signal {signal} not observed after {attempts} attempts")]
    TimeoutNotReady { signal: String, attempts: u32 },

    // ─────────────────────────────────────────────────────────────────────
    // I/O Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("Failed to persist {path}: {source}")]
    PersistenceFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON parsing error: {context}: {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    // ─────────────────────────────────────────────────────────────────────
    // Catalog Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("Catalog search failed: {0}")]
    Catalog(String),
}

/// Convenience type alias for Results using HelperError.
pub type Result<T> = std::result::Result<T, HelperError>;

impl HelperError {
    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        HelperError::Io {
            context: context.into(),
            source,
        }
    }

    pub(crate) fn persistence(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        HelperError::PersistenceFailure {
            path: path.into(),
            source,
        }
    }
}
