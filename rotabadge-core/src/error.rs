/// Structured error types for rotabadge-core.
///
/// Uses `thiserror` so the server crate can map each case onto a status code.
/// The binary (rotabadge-cli) wraps these in `anyhow` for reporting.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failure while discovering badges on disk
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Reading the badge directory failed (missing path, permissions)
    #[error("failed to scan badge directory {path:?}: {source}")]
    Scan {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Blocking scan task was cancelled or panicked
    #[error("badge scan task failed: {reason}")]
    Task { reason: String },
}

impl CatalogError {
    /// Create a scan error for `path`
    pub fn scan(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Scan {
            path: path.into(),
            source,
        }
    }
}

/// Failure while picking a badge for a slot
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectError {
    /// Catalog has no eligible files
    #[error("no badges available")]
    Empty,

    /// Permutation and catalog disagree in length
    #[error("badge permutation has {permutation} entries but catalog has {catalog}")]
    Inconsistent { permutation: usize, catalog: usize },
}

/// Result type alias for catalog operations
pub type Result<T> = std::result::Result<T, CatalogError>;
