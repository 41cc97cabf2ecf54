//! Scripted engine and resolver shared by the integration tests

#![allow(dead_code)]

use lite_core::{Catalog, CoreError, Track, TrackId, TrackResolver};
use lite_playback::{EngineEvent, EngineEventSender, PlayerEngine, Result};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Calls made on a `MockEngine`, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Reset,
    SetDataSource(PathBuf),
    PrepareAsync,
    Start,
    Pause,
    SeekTo(u64),
    Stop,
    Release,
}

#[derive(Debug, Default)]
pub struct MockState {
    pub calls: Vec<Call>,
    pub playing: bool,
    pub position_ms: u64,
    pub duration_ms: u64,
    /// Send `Prepared` straight from `prepare_async`
    pub auto_prepare: bool,
    /// Reject every data source
    pub reject_sources: bool,
    /// Generation passed to the latest `prepare_async`
    pub generation: u64,
}

/// Engine that records calls and lets tests set position/duration
#[derive(Clone)]
pub struct MockEngine {
    pub state: Arc<Mutex<MockState>>,
    events: Option<EngineEventSender>,
}

impl MockEngine {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState::default())),
            events: None,
        }
    }

    /// Engine that reports `Prepared` on the given channel as soon as asked
    pub fn auto_preparing(events: EngineEventSender) -> Self {
        let engine = Self {
            state: Arc::new(Mutex::new(MockState::default())),
            events: Some(events),
        };
        engine.state.lock().unwrap().auto_prepare = true;
        engine
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    pub fn count(&self, call: &Call) -> usize {
        self.calls().iter().filter(|c| *c == call).count()
    }

    pub fn set_progress(&self, position_ms: u64, duration_ms: u64) {
        let mut state = self.state.lock().unwrap();
        state.position_ms = position_ms;
        state.duration_ms = duration_ms;
    }

    pub fn set_playing(&self, playing: bool) {
        self.state.lock().unwrap().playing = playing;
    }

    /// `Prepared` for the latest load
    pub fn prepared(&self) -> EngineEvent {
        EngineEvent::Prepared {
            generation: self.generation(),
        }
    }

    /// `Completed` for the latest load
    pub fn completed(&self) -> EngineEvent {
        EngineEvent::Completed {
            generation: self.generation(),
        }
    }

    /// `Error` for the latest load
    pub fn failed(&self, message: &str) -> EngineEvent {
        EngineEvent::Error {
            generation: self.generation(),
            message: message.into(),
        }
    }

    pub fn generation(&self) -> u64 {
        self.state.lock().unwrap().generation
    }

    pub fn reject_sources(&self) {
        self.state.lock().unwrap().reject_sources = true;
    }

    /// Data sources handed to the engine, in order
    pub fn sources(&self) -> Vec<PathBuf> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::SetDataSource(path) => Some(path),
                _ => None,
            })
            .collect()
    }
}

impl PlayerEngine for MockEngine {
    fn reset(&mut self) {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Reset);
        state.playing = false;
        state.position_ms = 0;
        state.duration_ms = 0;
    }

    fn set_data_source(&mut self, location: &Path) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.reject_sources {
            return Err(lite_playback::PlaybackError::engine("unsupported format"));
        }
        state.calls.push(Call::SetDataSource(location.to_path_buf()));
        Ok(())
    }

    fn prepare_async(&mut self, generation: u64) {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::PrepareAsync);
        state.generation = generation;
        if state.auto_prepare {
            if let Some(events) = &self.events {
                let _ = events.send(EngineEvent::Prepared { generation });
            }
        }
    }

    fn start(&mut self) {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Start);
        state.playing = true;
        if state.duration_ms == 0 {
            state.duration_ms = 180_000;
        }
    }

    fn pause(&mut self) {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Pause);
        state.playing = false;
    }

    fn seek_to(&mut self, position_ms: u64) {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::SeekTo(position_ms));
        state.position_ms = position_ms;
    }

    fn stop(&mut self) {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Stop);
        state.playing = false;
    }

    fn release(&mut self) {
        self.state.lock().unwrap().calls.push(Call::Release);
    }

    fn position_ms(&self) -> u64 {
        self.state.lock().unwrap().position_ms
    }

    fn duration_ms(&self) -> u64 {
        self.state.lock().unwrap().duration_ms
    }

    fn is_playing(&self) -> bool {
        self.state.lock().unwrap().playing
    }
}

/// Resolves ids to `/music/<id>.mp3`, except the ids marked missing
#[derive(Default)]
pub struct MockResolver {
    missing: HashSet<TrackId>,
}

impl MockResolver {
    pub fn with_missing(ids: impl IntoIterator<Item = u64>) -> Self {
        Self {
            missing: ids.into_iter().map(TrackId::new).collect(),
        }
    }
}

impl TrackResolver for MockResolver {
    fn resolve(&self, id: TrackId) -> lite_core::Result<PathBuf> {
        if self.missing.contains(&id) {
            return Err(CoreError::unresolvable(id, "file removed"));
        }
        Ok(path_for(id.get()))
    }
}

pub fn path_for(id: u64) -> PathBuf {
    PathBuf::from(format!("/music/{id}.mp3"))
}

pub fn resolver() -> Arc<dyn TrackResolver> {
    Arc::new(MockResolver::default())
}

/// Catalog with ids 1.. in the given title order (then sorted)
pub fn catalog(titles: &[&str]) -> Catalog {
    Catalog::from_tracks(
        titles
            .iter()
            .zip(1u64..)
            .map(|(title, id)| Track::new(TrackId::new(id), *title, "Artist")),
    )
}
