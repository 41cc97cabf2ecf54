//! Lite Player - Playback
//!
//! Platform-agnostic playback sequencing and service lifecycle.
//!
//! This crate provides:
//! - `Sequencer`: current catalog index, shuffle flag, next/previous selection
//! - `PlayerEngine`: the single-track player a platform plugs in
//! - `EngineAdapter`: drives one engine and reacts to its asynchronous events
//! - `PlaybackService`: owns sequencer + adapter, tracks attached clients
//! - `ServiceHost`: runs a service as a tokio task behind a cloneable handle
//!
//! # Architecture
//!
//! `lite-playback` has no audio dependencies. Decoding and output live in a
//! platform crate that implements `PlayerEngine` and reports `Prepared`,
//! `Completed` and `Error` over the channel from `engine_channel()`.
//!
//! # Example: Sequencing
//!
//! ```rust
//! use lite_core::{Catalog, Track, TrackId};
//! use lite_playback::Sequencer;
//!
//! let catalog = Catalog::from_tracks(vec![
//!     Track::new(TrackId::new(1), "Alpha", "A"),
//!     Track::new(TrackId::new(2), "Zeta", "Z"),
//!     Track::new(TrackId::new(3), "Mid", "M"),
//! ]);
//!
//! let mut sequencer = Sequencer::new(catalog);
//! sequencer.select(0).unwrap();
//! sequencer.advance();
//! assert_eq!(sequencer.advance(), Some(2));
//! assert_eq!(sequencer.current_track().unwrap().title, "Zeta");
//! ```

mod adapter;
mod engine;
mod error;
mod events;
mod host;
mod sequencer;
mod service;
pub mod types;

// Public exports
pub use adapter::EngineAdapter;
pub use engine::PlayerEngine;
pub use error::{PlaybackError, Result};
pub use events::{engine_channel, EngineEvent, EngineEventReceiver, EngineEventSender, ServiceEvent};
pub use host::{ServiceBinding, ServiceHandle, ServiceHost};
pub use sequencer::Sequencer;
pub use service::PlaybackService;
pub use types::{EngineState, ServiceState, ShuffleNotice, TransportStatus};
