/// Desktop audio errors
use thiserror::Error;

/// Result type for desktop audio operations
pub type Result<T> = std::result::Result<T, AudioError>;

/// Audio errors
#[derive(Debug, Error)]
pub enum AudioError {
    /// Device not found
    #[error("Audio device not found")]
    DeviceNotFound,

    /// Device error
    #[error("Device error: {0}")]
    DeviceError(String),

    /// Failed to build output stream
    #[error("Failed to build output stream: {0}")]
    StreamBuildError(String),

    /// Failed to play stream
    #[error("Failed to play stream: {0}")]
    PlayError(String),

    /// File could not be opened or probed
    #[error("Cannot open {path}: {message}")]
    Open { path: String, message: String },

    /// Unsupported audio format
    #[error("Unsupported audio format: {0}")]
    UnsupportedFormat(String),

    /// Packet decoding failed
    #[error("Decode error: {0}")]
    DecodeError(String),

    /// Sample rate conversion error
    #[error("Sample rate conversion error: {0}")]
    ResampleError(String),

    /// Seek failed
    #[error("Seek failed: {0}")]
    SeekError(String),
}

impl From<cpal::BuildStreamError> for AudioError {
    fn from(err: cpal::BuildStreamError) -> Self {
        AudioError::StreamBuildError(err.to_string())
    }
}

impl From<cpal::PlayStreamError> for AudioError {
    fn from(err: cpal::PlayStreamError) -> Self {
        AudioError::PlayError(err.to_string())
    }
}

impl From<cpal::DefaultStreamConfigError> for AudioError {
    fn from(err: cpal::DefaultStreamConfigError) -> Self {
        AudioError::DeviceError(err.to_string())
    }
}

impl From<AudioError> for lite_playback::PlaybackError {
    fn from(err: AudioError) -> Self {
        lite_playback::PlaybackError::engine(err.to_string())
    }
}
