//! Lite Player - Media Index
//!
//! Builds the session catalog from music directories on disk:
//! - Recursive directory scanning filtered by audio extension
//! - Title/artist extraction from embedded tags (lofty)
//! - Track id assignment and id -> path resolution
//!
//! # Example
//!
//! ```rust,no_run
//! use lite_core::CatalogSource;
//! use lite_library::{FileScanner, MediaIndex};
//! use std::path::PathBuf;
//!
//! let dirs = vec![PathBuf::from("/home/me/Music")];
//! let index = MediaIndex::build(&dirs, &FileScanner::new());
//! let catalog = index.load_catalog().unwrap();
//! println!("{} tracks", catalog.len());
//! ```

mod access;
mod error;
mod index;
mod scanner;
mod tags;

pub use access::check_access;
pub use error::{LibraryError, Result};
pub use index::MediaIndex;
pub use scanner::{is_audio_file, FileScanner, SUPPORTED_EXTENSIONS};
pub use tags::{read_track_tags, TrackTags, UNKNOWN_ARTIST};
