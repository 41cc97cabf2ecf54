/// Track domain type
use crate::types::TrackId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A playable audio item
///
/// Immutable once enumerated. Two tracks are equal only when id, title
/// and artist all match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Track {
    /// Identifier issued by the media index
    pub id: TrackId,

    /// Track title
    pub title: String,

    /// Artist name
    pub artist: String,
}

impl Track {
    /// Create a new track
    pub fn new(id: TrackId, title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            artist: artist.into(),
        }
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.title, self.artist)
    }
}
