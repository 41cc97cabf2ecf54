//! Error types for the media index

use std::path::PathBuf;
use thiserror::Error;

/// Media index errors
#[derive(Debug, Error)]
pub enum LibraryError {
    /// Directory not found
    #[error("Directory not found: {0}")]
    DirectoryNotFound(PathBuf),

    /// Path exists but is not a directory
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// The process may not read the directory
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// Tag reading failed
    #[error("Tag error in {path}: {message}")]
    Tags { path: PathBuf, message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<LibraryError> for lite_core::CoreError {
    fn from(err: LibraryError) -> Self {
        match err {
            LibraryError::PermissionDenied(path) => {
                lite_core::CoreError::PermissionDenied(path.display().to_string())
            }
            LibraryError::Io(e) => lite_core::CoreError::Io(e),
            other => lite_core::CoreError::catalog(other.to_string()),
        }
    }
}

/// Result type for media index operations
pub type Result<T> = std::result::Result<T, LibraryError>;
