/// Application error types
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PlayerError>;

#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Library(#[from] lite_library::LibraryError),

    #[error(transparent)]
    Playback(#[from] lite_playback::PlaybackError),

    #[error(transparent)]
    Audio(#[from] lite_audio_desktop::AudioError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<config::ConfigError> for PlayerError {
    fn from(err: config::ConfigError) -> Self {
        PlayerError::Config(err.to_string())
    }
}
