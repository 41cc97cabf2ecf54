/// ID types for Lite Player entities
use serde::{Deserialize, Serialize};
use std::fmt;

/// Track identifier
///
/// Opaque to everything except the media index that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(u64);

impl TrackId {
    /// Create a new track ID
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the inner value
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for TrackId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}
