/// Core error types for Lite Player
use crate::types::TrackId;
use thiserror::Error;

/// Result type alias using `CoreError`
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core error type for Lite Player
#[derive(Error, Debug)]
pub enum CoreError {
    /// The track id is not known to the resolver
    #[error("Track not found: {0}")]
    TrackNotFound(TrackId),

    /// The track is known but its media can no longer be reached
    #[error("Track {id} cannot be resolved: {reason}")]
    UnresolvableTrack { id: TrackId, reason: String },

    /// Catalog enumeration failed
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// Permission denied with context
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CoreError {
    /// Create an unresolvable-track error
    pub fn unresolvable(id: TrackId, reason: impl Into<String>) -> Self {
        Self::UnresolvableTrack {
            id,
            reason: reason.into(),
        }
    }

    /// Create a catalog error
    pub fn catalog(msg: impl Into<String>) -> Self {
        Self::Catalog(msg.into())
    }
}
