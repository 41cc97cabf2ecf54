//! Console session against a live service task with a scripted engine

use lite_core::{Catalog, CoreError, Track, TrackId, TrackResolver};
use lite_player::{run_session, SessionExit};
use lite_playback::{
    engine_channel, EngineEvent, EngineEventSender, PlaybackService, PlayerEngine, Result,
    ServiceHost,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Prepares instantly and reports a fixed three minute track
struct InstantEngine {
    events: EngineEventSender,
    playing: bool,
    position_ms: u64,
}

impl PlayerEngine for InstantEngine {
    fn reset(&mut self) {
        self.playing = false;
        self.position_ms = 0;
    }

    fn set_data_source(&mut self, _path: &Path) -> Result<()> {
        Ok(())
    }

    fn prepare_async(&mut self, generation: u64) {
        let _ = self.events.send(EngineEvent::Prepared { generation });
    }

    fn start(&mut self) {
        self.playing = true;
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn seek_to(&mut self, position_ms: u64) {
        self.position_ms = position_ms;
    }

    fn stop(&mut self) {
        self.playing = false;
    }

    fn release(&mut self) {}

    fn position_ms(&self) -> u64 {
        self.position_ms
    }

    fn duration_ms(&self) -> u64 {
        180_000
    }

    fn is_playing(&self) -> bool {
        self.playing
    }
}

struct PathResolver;

impl TrackResolver for PathResolver {
    fn resolve(&self, id: TrackId) -> std::result::Result<PathBuf, CoreError> {
        Ok(PathBuf::from(format!("/music/{id}.wav")))
    }
}

fn catalog() -> Catalog {
    Catalog::from_tracks(vec![
        Track::new(TrackId::new(1), "Zeta", "B"),
        Track::new(TrackId::new(2), "Alpha", "A"),
    ])
}

async fn run(script: &str) -> (SessionExit, String, lite_playback::ServiceHandle) {
    let (tx, rx) = engine_channel();
    let engine = InstantEngine {
        events: tx,
        playing: false,
        position_ms: 0,
    };
    let handle = ServiceHost::spawn(PlaybackService::new(engine, Arc::new(PathResolver)), rx);
    let events = handle.subscribe();
    let binding = handle.bind().await.unwrap();
    let catalog = catalog();
    binding.set_catalog(catalog.clone());

    let mut out = Vec::new();
    let exit = run_session(&handle, &binding, &catalog, events, script.as_bytes(), &mut out)
        .await
        .unwrap();

    (exit, String::from_utf8(out).unwrap(), handle)
}

#[tokio::test]
async fn prints_list_then_plays_and_reports_status() {
    let (exit, out, _handle) = run("play 2\nseek 42\nstatus\n").await;

    assert_eq!(exit, SessionExit::InputClosed);
    assert!(out.starts_with("  1. Alpha - A\n  2. Zeta - B\n"));
    assert!(out.contains("Playing: 2. Zeta - B (0:42 / 3:00)"), "{out}");
}

#[tokio::test]
async fn unknown_and_out_of_range_input_is_reported() {
    let (_, out, _handle) = run("dance\nplay 9\nstatus\n").await;

    assert!(out.contains("Unknown command 'dance'"));
    assert!(out.contains("No song number 9"));
    assert!(out.contains("Nothing selected"));
}

#[tokio::test]
async fn end_shuts_the_service_down() {
    let (exit, _, handle) = run("play 1\nend\nstatus\n").await;

    assert_eq!(exit, SessionExit::End);
    for _ in 0..100 {
        if !handle.is_running() {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    assert!(!handle.is_running());
}
