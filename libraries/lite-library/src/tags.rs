/// Tag reading using lofty
use crate::error::LibraryError;
use lofty::TaggedFileExt;
use std::path::Path;

/// Placeholder artist for files without an artist tag
pub const UNKNOWN_ARTIST: &str = "<unknown>";

/// The subset of tag data a catalog entry needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackTags {
    pub title: String,
    pub artist: String,
}

impl TrackTags {
    /// Tags derived from the file name alone
    pub fn from_file_name(path: &Path) -> Self {
        let title = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            title,
            artist: UNKNOWN_ARTIST.to_string(),
        }
    }

    fn fill_from_tag(&mut self, tag: &lofty::Tag) {
        // lofty 0.18 API - iterate through items
        for item in tag.items() {
            let Some(text) = item.value().text().map(str::trim).filter(|s| !s.is_empty()) else {
                continue;
            };

            match item.key() {
                lofty::ItemKey::TrackTitle => self.title = text.to_string(),
                lofty::ItemKey::TrackArtist => self.artist = text.to_string(),
                _ => {}
            }
        }
    }
}

/// Read title and artist for one file
///
/// Missing tags fall back to the file stem and `UNKNOWN_ARTIST`. A file
/// lofty cannot parse at all is an error; callers usually fall back to
/// `TrackTags::from_file_name`.
pub fn read_track_tags(path: &Path) -> Result<TrackTags, LibraryError> {
    let tagged_file = lofty::read_from_path(path).map_err(|e| LibraryError::Tags {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut tags = TrackTags::from_file_name(path);

    if let Some(tag) = tagged_file.primary_tag().or_else(|| tagged_file.first_tag()) {
        tags.fill_from_tag(tag);
    }

    Ok(tags)
}
