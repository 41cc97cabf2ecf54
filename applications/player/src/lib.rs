//! Lite Player application
//!
//! Wires the media index, the desktop engine and the playback service to a
//! line-oriented console that acts as the song list and transport controls.

pub mod config;
pub mod console;
pub mod error;
pub mod session;

pub use config::PlayerConfig;
pub use error::{PlayerError, Result};
pub use session::{run_session, SessionExit};
