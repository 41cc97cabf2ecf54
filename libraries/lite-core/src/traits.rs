/// Core traits for Lite Player
use crate::error::Result;
use crate::types::{Catalog, TrackId};
use std::path::PathBuf;

/// Something that can enumerate the playable tracks of this session
///
/// Implementations query an external media index. An index with no
/// entries (or no index at all) is not an error: return `Catalog::empty()`.
pub trait CatalogSource {
    /// Enumerate every audio item and return them as a title-sorted catalog
    ///
    /// # Errors
    /// Returns an error only when the index itself cannot be queried
    fn load_catalog(&self) -> Result<Catalog>;
}

/// Maps a track identifier to a playable data source
///
/// Resolution may fail (the file was removed, the id is stale). Callers
/// log the failure and abort that load; they never crash on it.
pub trait TrackResolver: Send + Sync {
    /// Resolve a track id to the location of its audio data
    ///
    /// # Errors
    /// Returns `CoreError::TrackNotFound` or `CoreError::UnresolvableTrack`
    fn resolve(&self, id: TrackId) -> Result<PathBuf>;
}
