//! Drives one `PlayerEngine` on behalf of the playback service

use crate::engine::PlayerEngine;
use crate::error::Result;
use crate::types::EngineState;
use lite_core::{Track, TrackId, TrackResolver};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Owns a single-track engine and interprets its events
///
/// Every engine failure is absorbed here: it is logged and reflected in
/// `state()`, never returned to the caller.
pub struct EngineAdapter<E: PlayerEngine> {
    engine: E,
    resolver: Arc<dyn TrackResolver>,
    state: EngineState,
    loaded: Option<TrackId>,
    /// Bumped by every load; engine events tagged with another value are stale
    generation: u64,
}

impl<E: PlayerEngine> EngineAdapter<E> {
    pub fn new(engine: E, resolver: Arc<dyn TrackResolver>) -> Self {
        Self {
            engine,
            resolver,
            state: EngineState::Idle,
            loaded: None,
            generation: 0,
        }
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Track handed to the engine by the last successful load
    pub fn loaded_track(&self) -> Option<TrackId> {
        self.loaded
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Generation of the most recent load
    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn is_current(&self, generation: u64, event: &str) -> bool {
        if generation == self.generation {
            return true;
        }
        debug!(
            "Dropping stale {} event (generation {}, current {})",
            event, generation, self.generation
        );
        false
    }

    /// Reset, resolve `track`, and start an asynchronous prepare
    ///
    /// Returns as soon as the prepare is issued. A prepare still in flight
    /// from an earlier call is superseded: its events no longer match the
    /// generation and are dropped.
    pub fn load_and_play(&mut self, track: &Track) {
        self.generation = self.generation.wrapping_add(1);
        self.engine.reset();
        self.state = EngineState::Idle;
        self.loaded = None;

        let location = match self.open(track) {
            Ok(location) => location,
            Err(e) => {
                warn!(track = %track.id, "Cannot load \"{}\": {}", track.title, e);
                self.state = EngineState::Error;
                return;
            }
        };

        self.engine.prepare_async(self.generation);
        self.loaded = Some(track.id);
        self.state = EngineState::Preparing;
        debug!(track = %track.id, "Preparing {}", location.display());
    }

    /// Resolve `track` and hand its location to the engine
    fn open(&mut self, track: &Track) -> Result<PathBuf> {
        let location = self.resolver.resolve(track.id)?;
        self.engine.set_data_source(&location)?;
        Ok(location)
    }

    /// Start playback once the engine is prepared
    ///
    /// Returns true when the transport controls should be shown.
    pub fn on_prepared(&mut self, generation: u64) -> bool {
        if !self.is_current(generation, "prepared") {
            return false;
        }
        if self.state != EngineState::Preparing {
            debug!("Ignoring prepared event in state {:?}", self.state);
            return false;
        }

        self.engine.start();
        self.state = EngineState::Playing;
        true
    }

    /// Handle end of track
    ///
    /// Returns true when the caller should advance and load the next track.
    /// A completion reported at position zero played nothing and is ignored.
    pub fn on_completed(&mut self, generation: u64) -> bool {
        if !self.is_current(generation, "completed") {
            return false;
        }
        if self.engine.position_ms() == 0 {
            debug!("Ignoring completion at position 0");
            return false;
        }

        self.engine.reset();
        self.state = EngineState::Idle;
        self.loaded = None;
        true
    }

    /// Reset after a decoder or output failure; never advances
    ///
    /// Returns false when the error belongs to a superseded load.
    pub fn on_error(&mut self, generation: u64, message: &str) -> bool {
        if !self.is_current(generation, "error") {
            return false;
        }
        warn!("Playback error: {}", message);
        self.engine.reset();
        self.state = EngineState::Idle;
        self.loaded = None;
        true
    }

    pub fn pause(&mut self) {
        if self.state == EngineState::Playing {
            self.engine.pause();
            self.state = EngineState::Paused;
        } else {
            debug!("Pause ignored in state {:?}", self.state);
        }
    }

    pub fn resume(&mut self) {
        if self.state == EngineState::Paused {
            self.engine.start();
            self.state = EngineState::Playing;
        } else {
            debug!("Resume ignored in state {:?}", self.state);
        }
    }

    pub fn seek(&mut self, position_ms: u64) {
        match self.state {
            EngineState::Playing | EngineState::Paused => self.engine.seek_to(position_ms),
            state => debug!("Seek ignored in state {:?}", state),
        }
    }

    /// Stop output and free the engine
    ///
    /// Consumes the adapter, so the engine cannot be touched afterwards.
    pub fn stop_and_release(mut self) {
        self.engine.stop();
        self.engine.release();
        info!("Engine released");
    }

    /// Playhead, or 0 unless the engine is playing or `paused` is set
    ///
    /// The engine cannot tell "paused mid-track" from "stopped" on its own,
    /// so the caller passes the user-pause flag it keeps.
    pub fn position_ms(&self, paused: bool) -> u64 {
        if self.engine.is_playing() || paused {
            self.engine.position_ms()
        } else {
            0
        }
    }

    /// Track length, or 0 unless the engine is playing or `paused` is set
    pub fn duration_ms(&self, paused: bool) -> u64 {
        if self.engine.is_playing() || paused {
            self.engine.duration_ms()
        } else {
            0
        }
    }

    pub fn is_playing(&self) -> bool {
        self.engine.is_playing()
    }
}
