//! Error types for playback

use thiserror::Error;

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// Index outside the catalog
    #[error("Index out of bounds: {index} (catalog has {len} tracks)")]
    IndexOutOfBounds { index: usize, len: usize },

    /// The service released its engine and accepts no new clients
    #[error("Playback service has been released")]
    ServiceReleased,

    /// The service task is no longer running
    #[error("Playback service is not running")]
    ServiceStopped,

    /// Engine-level failure (data source, decoder, device)
    #[error("Engine error: {0}")]
    Engine(String),

    /// Track resolution failed
    #[error(transparent)]
    Core(#[from] lite_core::CoreError),
}

impl PlaybackError {
    /// Create an engine error
    pub fn engine(msg: impl Into<String>) -> Self {
        Self::Engine(msg.into())
    }
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
