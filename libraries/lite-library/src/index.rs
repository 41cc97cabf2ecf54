//! The media index: scanned files, their tags, and id resolution

use crate::access::check_access;
use crate::scanner::FileScanner;
use crate::tags::{read_track_tags, TrackTags};
use lite_core::{Catalog, CatalogSource, CoreError, Track, TrackId, TrackResolver};
use std::collections::HashMap;
use std::path::PathBuf;

/// Audio files found under the music directories, keyed by track id
///
/// Ids are issued sequentially from 1 in scan order. The index is built
/// once per session and is read-only afterwards.
#[derive(Debug, Default)]
pub struct MediaIndex {
    directories: Vec<PathBuf>,
    tracks: Vec<Track>,
    paths: HashMap<TrackId, PathBuf>,
}

impl MediaIndex {
    /// Scan `directories` and read tags for every audio file found
    pub fn build(directories: &[PathBuf], scanner: &FileScanner) -> Self {
        let files = scanner.scan_directories(directories);
        let mut index = Self::from_files(files);
        index.directories = directories.to_vec();
        tracing::info!(
            "Indexed {} audio files from {} directories",
            index.len(),
            directories.len()
        );
        index
    }

    /// Index an explicit list of files
    pub fn from_files(files: impl IntoIterator<Item = PathBuf>) -> Self {
        let mut index = Self::default();

        for (path, next_id) in files.into_iter().zip(1u64..) {
            let id = TrackId::new(next_id);
            let tags = read_track_tags(&path).unwrap_or_else(|e| {
                tracing::debug!("{}", e);
                TrackTags::from_file_name(&path)
            });

            index.tracks.push(Track::new(id, tags.title, tags.artist));
            index.paths.insert(id, path);
        }

        index
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// The catalog for this index, sorted by title
    pub fn catalog(&self) -> Catalog {
        Catalog::from_tracks(self.tracks.iter().cloned())
    }
}

impl CatalogSource for MediaIndex {
    /// Fails with `CoreError::PermissionDenied` if a scanned directory cannot be read
    fn load_catalog(&self) -> lite_core::Result<Catalog> {
        check_access(&self.directories)?;
        Ok(self.catalog())
    }
}

impl TrackResolver for MediaIndex {
    fn resolve(&self, id: TrackId) -> lite_core::Result<PathBuf> {
        let path = self.paths.get(&id).ok_or(CoreError::TrackNotFound(id))?;

        if !path.is_file() {
            return Err(CoreError::unresolvable(
                id,
                format!("{} is no longer available", path.display()),
            ));
        }

        Ok(path.clone())
    }
}
