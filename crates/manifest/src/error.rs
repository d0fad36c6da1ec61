//! Error types for the manifest crate

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during manifest operations
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Directory to hash does not exist
    #[error("path does not exist: {}", .0.display())]
    PathNotFound(PathBuf),

    /// No persisted manifest in the directory
    #[error("no manifest found at {}", .0.display())]
    ManifestNotFound(PathBuf),

    /// Manifest file exists but is missing expected columns or rows
    #[error("malformed manifest {}: {reason}", .path.display())]
    Malformed { path: PathBuf, reason: String },

    /// Failed to hash file
    #[error("failed to hash file {}: {source}", .path.display())]
    HashFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for manifest operations
pub type Result<T> = std::result::Result<T, Error>;
