//! Title-sorted track catalog

use crate::types::{Track, TrackId};
use std::ops::Index;
use std::sync::Arc;

/// Ordered, read-only collection of tracks for one session
///
/// Tracks are sorted by title (byte-wise, case-sensitive) at construction
/// and never reordered afterwards, so an index stays valid for as long as
/// the catalog lives. Clones share the same storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    tracks: Arc<[Track]>,
}

impl Catalog {
    /// Build a catalog, sorting by title
    ///
    /// The sort is stable: tracks with equal titles keep their source order.
    pub fn from_tracks(tracks: impl IntoIterator<Item = Track>) -> Self {
        let mut tracks: Vec<Track> = tracks.into_iter().collect();
        tracks.sort_by(|a, b| a.title.cmp(&b.title));
        Self {
            tracks: tracks.into(),
        }
    }

    /// A catalog with no tracks
    pub fn empty() -> Self {
        Self {
            tracks: Arc::from(Vec::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Get the track at `index`, if in range
    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Track> {
        self.tracks.iter()
    }

    /// Find the index of the track with the given id
    pub fn position_of(&self, id: TrackId) -> Option<usize> {
        self.tracks.iter().position(|t| t.id == id)
    }

    /// Borrow all tracks in catalog order
    pub fn as_slice(&self) -> &[Track] {
        &self.tracks
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::empty()
    }
}

impl Index<usize> for Catalog {
    type Output = Track;

    fn index(&self, index: usize) -> &Self::Output {
        &self.tracks[index]
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Track;
    type IntoIter = std::slice::Iter<'a, Track>;

    fn into_iter(self) -> Self::IntoIter {
        self.tracks.iter()
    }
}

impl FromIterator<Track> for Catalog {
    fn from_iter<I: IntoIterator<Item = Track>>(iter: I) -> Self {
        Self::from_tracks(iter)
    }
}
