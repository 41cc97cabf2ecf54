//! Lite Player - Desktop Audio
//!
//! `PlayerEngine` implementation for desktop platforms:
//! - Symphonia decoding (MP3, FLAC, OGG/Vorbis, WAV, AAC/M4A)
//! - Rubato resampling to the output device rate
//! - CPAL output on a dedicated thread that owns the stream
//!
//! # Example
//!
//! ```rust,no_run
//! use lite_audio_desktop::DesktopEngine;
//! use lite_playback::{engine_channel, PlayerEngine};
//! use std::path::Path;
//!
//! let (events_tx, mut events_rx) = engine_channel();
//! let mut engine = DesktopEngine::new(events_tx).unwrap();
//!
//! engine.set_data_source(Path::new("/music/song.flac")).unwrap();
//! engine.prepare_async(1);
//! // ... wait for EngineEvent::Prepared { generation: 1 } on events_rx, then:
//! engine.start();
//! ```

mod engine;
mod error;
mod source;

pub use engine::DesktopEngine;
pub use error::{AudioError, Result};
pub use source::LocalAudioSource;
