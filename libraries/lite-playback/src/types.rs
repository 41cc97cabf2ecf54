//! Core types for playback

use lite_core::Track;
use serde::{Deserialize, Serialize};
use std::fmt;

/// State of the single-track engine as seen by the adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EngineState {
    /// Nothing loaded
    #[default]
    Idle,

    /// Data source set, asynchronous prepare in flight
    Preparing,

    /// Prepared and started
    Playing,

    /// Paused by the user
    Paused,

    /// The last load could not be started
    Error,
}

/// Lifecycle of the playback service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ServiceState {
    /// No client has attached yet
    #[default]
    Unbound,

    /// At least one client is attached
    Bound { clients: usize },

    /// The last client detached and the engine was released
    Released,
}

/// Outcome of a shuffle toggle, for the UI to surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShuffleNotice {
    pub enabled: bool,
}

impl ShuffleNotice {
    pub fn message(self) -> &'static str {
        if self.enabled {
            "Shuffle ON"
        } else {
            "Shuffle OFF"
        }
    }
}

impl fmt::Display for ShuffleNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Snapshot of everything a transport surface displays
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportStatus {
    pub service: ServiceState,
    pub engine: EngineState,
    pub current_index: Option<usize>,
    pub current_track: Option<Track>,
    pub shuffle_enabled: bool,
    pub paused: bool,
    pub is_playing: bool,
    /// Zero unless playing or user-paused
    pub position_ms: u64,
    /// Zero unless playing or user-paused
    pub duration_ms: u64,
}
