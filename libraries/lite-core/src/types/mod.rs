//! Domain types for Lite Player

mod catalog;
mod ids;
mod track;

pub use catalog::Catalog;
pub use ids::TrackId;
pub use track::Track;
