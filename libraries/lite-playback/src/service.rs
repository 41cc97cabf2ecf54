//! Playback service: sequencer + engine adapter behind a client lifecycle
//!
//! `PlaybackService` is the synchronous core. It is driven by exactly one
//! owner (normally the task started by `ServiceHost::spawn`) and buffers
//! `ServiceEvent`s for that owner to drain after each call.

use crate::adapter::EngineAdapter;
use crate::engine::PlayerEngine;
use crate::error::{PlaybackError, Result};
use crate::events::{EngineEvent, ServiceEvent};
use crate::sequencer::Sequencer;
use crate::types::{EngineState, ServiceState, TransportStatus};
use lite_core::{Catalog, TrackResolver};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Owns playback state for the lifetime of the session
///
/// Control operations never fail from the caller's point of view: anything
/// that cannot be honoured (empty catalog, bad index, released engine) is
/// logged and ignored. Effects are observable through the query methods
/// and the drained events.
pub struct PlaybackService<E: PlayerEngine> {
    state: ServiceState,
    sequencer: Sequencer,
    adapter: Option<EngineAdapter<E>>,

    /// Set by a user pause, cleared when a new track starts or on resume
    paused: bool,

    pending_events: Vec<ServiceEvent>,
}

impl<E: PlayerEngine> PlaybackService<E> {
    /// Create an unbound service with an empty catalog
    pub fn new(engine: E, resolver: Arc<dyn TrackResolver>) -> Self {
        Self::with_sequencer(engine, resolver, Sequencer::new(Catalog::empty()))
    }

    /// Create a service around an existing sequencer
    pub fn with_sequencer(engine: E, resolver: Arc<dyn TrackResolver>, sequencer: Sequencer) -> Self {
        Self {
            state: ServiceState::Unbound,
            sequencer,
            adapter: Some(EngineAdapter::new(engine, resolver)),
            paused: false,
            pending_events: Vec::new(),
        }
    }

    // ===== Lifecycle =====

    pub fn state(&self) -> ServiceState {
        self.state
    }

    pub fn is_released(&self) -> bool {
        self.state == ServiceState::Released
    }

    /// Register a UI client; returns the number of attached clients
    ///
    /// A new client may attach before the previous one detaches, which is
    /// how a UI that is torn down and recreated keeps playback going.
    pub fn attach(&mut self) -> Result<usize> {
        let clients = match self.state {
            ServiceState::Unbound => 1,
            ServiceState::Bound { clients } => clients + 1,
            ServiceState::Released => return Err(PlaybackError::ServiceReleased),
        };

        self.state = ServiceState::Bound { clients };
        info!("Client attached ({} bound)", clients);
        Ok(clients)
    }

    /// Unregister a UI client; the last one out releases the engine
    pub fn detach(&mut self) {
        match self.state {
            ServiceState::Bound { clients } if clients > 1 => {
                self.state = ServiceState::Bound {
                    clients: clients - 1,
                };
                info!("Client detached ({} bound)", clients - 1);
            }
            ServiceState::Bound { .. } => {
                info!("Last client detached");
                self.release();
            }
            state => warn!("Detach in state {:?} ignored", state),
        }
    }

    /// Stop and release the engine, whatever the client count
    pub fn release(&mut self) {
        if let Some(adapter) = self.adapter.take() {
            adapter.stop_and_release();
            self.state = ServiceState::Released;
            self.paused = false;
            self.pending_events.push(ServiceEvent::Released);
        }
    }

    // ===== Control plane =====

    /// Hand the service the catalog to play from
    pub fn set_catalog(&mut self, catalog: Catalog) {
        if !self.check_active("set_catalog") {
            return;
        }

        info!("Catalog set ({} tracks)", catalog.len());
        self.sequencer.replace_catalog(catalog);
    }

    /// Select the track at `index` and play it
    pub fn select_track(&mut self, index: usize) {
        if !self.check_active("select_track") {
            return;
        }

        match self.sequencer.select(index) {
            Ok(_) => self.play_current(),
            Err(e) => warn!("select_track ignored: {}", e),
        }
    }

    pub fn play_next(&mut self) {
        if !self.check_active("play_next") {
            return;
        }

        if self.sequencer.advance().is_some() {
            self.play_current();
        } else {
            info!("Nothing to play");
        }
    }

    /// Play the previous track (sequential even when shuffling)
    pub fn play_previous(&mut self) {
        if !self.check_active("play_previous") {
            return;
        }

        if self.sequencer.retreat().is_some() {
            self.play_current();
        } else {
            info!("Nothing to play");
        }
    }

    pub fn toggle_shuffle(&mut self) {
        if !self.check_active("toggle_shuffle") {
            return;
        }

        let notice = self.sequencer.toggle_shuffle();
        info!("{}", notice);
        self.pending_events
            .push(ServiceEvent::Notification(notice.to_string()));
    }

    pub fn pause(&mut self) {
        if let Some(adapter) = self.adapter.as_mut() {
            adapter.pause();
            self.paused = adapter.state() == EngineState::Paused;
        }
    }

    pub fn resume(&mut self) {
        if let Some(adapter) = self.adapter.as_mut() {
            adapter.resume();
            self.paused = adapter.state() == EngineState::Paused;
        }
    }

    pub fn seek(&mut self, position_ms: u64) {
        if let Some(adapter) = self.adapter.as_mut() {
            adapter.seek(position_ms);
        }
    }

    // ===== Queries =====

    /// Playhead in ms; 0 unless playing or user-paused
    pub fn position_ms(&self) -> u64 {
        self.adapter
            .as_ref()
            .map(|a| a.position_ms(self.paused))
            .unwrap_or(0)
    }

    /// Track length in ms; 0 unless playing or user-paused
    pub fn duration_ms(&self) -> u64 {
        self.adapter
            .as_ref()
            .map(|a| a.duration_ms(self.paused))
            .unwrap_or(0)
    }

    pub fn is_playing(&self) -> bool {
        self.adapter.as_ref().is_some_and(|a| a.is_playing())
    }

    pub fn paused_flag(&self) -> bool {
        self.paused
    }

    pub fn engine_state(&self) -> EngineState {
        self.adapter
            .as_ref()
            .map(|a| a.state())
            .unwrap_or(EngineState::Idle)
    }

    pub fn sequencer(&self) -> &Sequencer {
        &self.sequencer
    }

    pub fn status(&self) -> TransportStatus {
        TransportStatus {
            service: self.state,
            engine: self.engine_state(),
            current_index: self.sequencer.current_index(),
            current_track: self.sequencer.current_track().cloned(),
            shuffle_enabled: self.sequencer.shuffle_enabled(),
            paused: self.paused,
            is_playing: self.is_playing(),
            position_ms: self.position_ms(),
            duration_ms: self.duration_ms(),
        }
    }

    // ===== Engine events =====

    /// React to an asynchronous engine notification
    pub fn handle_engine_event(&mut self, event: EngineEvent) {
        let Some(adapter) = self.adapter.as_mut() else {
            debug!("Engine event {:?} after release ignored", event);
            return;
        };

        match event {
            EngineEvent::Prepared { generation } => {
                if adapter.on_prepared(generation) {
                    if let (Some(index), Some(track)) =
                        (self.sequencer.current_index(), self.sequencer.current_track())
                    {
                        info!("Playing {} ({})", track, index);
                        self.pending_events.push(ServiceEvent::TransportReady {
                            index,
                            track: track.clone(),
                        });
                    }
                }
            }
            EngineEvent::Completed { generation } => {
                if adapter.on_completed(generation) {
                    debug!("Track completed, advancing");
                    self.play_next();
                }
            }
            EngineEvent::Error {
                generation,
                message,
            } => {
                if adapter.on_error(generation, &message) {
                    self.paused = false;
                }
            }
        }
    }

    /// Take all events buffered since the last drain
    pub fn drain_events(&mut self) -> Vec<ServiceEvent> {
        std::mem::take(&mut self.pending_events)
    }

    // ===== Internal =====

    fn check_active(&self, operation: &str) -> bool {
        if self.adapter.is_none() {
            warn!("{} after release ignored", operation);
            return false;
        }
        true
    }

    fn play_current(&mut self) {
        let (Some(index), Some(track)) = (
            self.sequencer.current_index(),
            self.sequencer.current_track().cloned(),
        ) else {
            return;
        };

        let Some(adapter) = self.adapter.as_mut() else {
            return;
        };

        adapter.load_and_play(&track);
        self.paused = false;
        self.pending_events
            .push(ServiceEvent::TrackLoading { index, track });
    }
}
