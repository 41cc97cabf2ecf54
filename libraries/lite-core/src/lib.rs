//! Lite Player Core
//!
//! Platform-agnostic core types, traits, and error handling for Lite Player.
//!
//! The core crate defines:
//! - **Domain Types**: `Track`, `TrackId` and the title-sorted `Catalog`
//! - **Core Traits**: `CatalogSource` (enumerates tracks) and `TrackResolver`
//!   (maps a track id to something the audio engine can open)
//! - **Error Handling**: `CoreError` and `Result`
//!
//! # Example
//!
//! ```rust
//! use lite_core::{Catalog, Track, TrackId};
//!
//! let catalog = Catalog::from_tracks(vec![
//!     Track::new(TrackId::new(1), "Zeta", "Band"),
//!     Track::new(TrackId::new(2), "Alpha", "Band"),
//! ]);
//!
//! assert_eq!(catalog.get(0).map(|t| t.title.as_str()), Some("Alpha"));
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod traits;
pub mod types;

pub use error::{CoreError, Result};
pub use traits::{CatalogSource, TrackResolver};
pub use types::{Catalog, Track, TrackId};
