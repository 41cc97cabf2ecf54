//! Playback service: lifecycle, control plane and event handling

mod common;

use common::{catalog, path_for, resolver, Call, MockEngine, MockResolver};
use lite_core::Catalog;
use lite_playback::{
    EngineState, PlaybackError, PlaybackService, Sequencer, ServiceEvent, ServiceState,
};
use std::sync::Arc;

fn bound_service(titles: &[&str]) -> (PlaybackService<MockEngine>, MockEngine) {
    let engine = MockEngine::new();
    let mut service = PlaybackService::new(engine.clone(), resolver());
    service.attach().unwrap();
    service.set_catalog(catalog(titles));
    (service, engine)
}

#[test]
fn lifecycle_unbound_bound_released() {
    let engine = MockEngine::new();
    let mut service = PlaybackService::new(engine.clone(), resolver());
    assert_eq!(service.state(), ServiceState::Unbound);

    assert_eq!(service.attach().unwrap(), 1);
    assert_eq!(service.state(), ServiceState::Bound { clients: 1 });

    service.detach();
    assert_eq!(service.state(), ServiceState::Released);
    assert_eq!(engine.count(&Call::Release), 1);
    assert_eq!(service.drain_events(), vec![ServiceEvent::Released]);

    assert!(matches!(service.attach(), Err(PlaybackError::ServiceReleased)));
}

#[test]
fn rotation_keeps_playing() {
    let (mut service, engine) = bound_service(&["Alpha", "Beta"]);
    service.select_track(0);
    service.handle_engine_event(engine.prepared());

    // New UI attaches before the old one goes away
    service.attach().unwrap();
    service.detach();

    assert_eq!(service.state(), ServiceState::Bound { clients: 1 });
    assert!(service.is_playing());
    assert_eq!(engine.count(&Call::Release), 0);
}

#[test]
fn release_happens_once() {
    let (mut service, engine) = bound_service(&["Alpha"]);

    service.detach();
    service.detach();
    service.release();

    assert_eq!(engine.count(&Call::Release), 1);
    assert_eq!(engine.count(&Call::Stop), 1);
}

#[test]
fn commands_after_release_are_ignored() {
    let (mut service, engine) = bound_service(&["Alpha", "Beta"]);
    service.detach();
    engine.clear_calls();

    service.select_track(1);
    service.play_next();
    service.toggle_shuffle();
    service.pause();
    service.handle_engine_event(engine.prepared());

    assert!(engine.calls().is_empty());
    assert!(!service.sequencer().shuffle_enabled());
    assert_eq!(service.position_ms(), 0);
    assert!(!service.is_playing());
}

#[test]
fn select_track_loads_and_shows_transport_when_prepared() {
    let (mut service, engine) = bound_service(&["Alpha", "Zeta", "Mid"]);

    service.select_track(1);
    assert_eq!(engine.sources(), vec![path_for(3)]);
    assert_eq!(service.engine_state(), EngineState::Preparing);

    service.handle_engine_event(engine.prepared());

    let events = service.drain_events();
    let mid = catalog(&["Alpha", "Zeta", "Mid"])[1].clone();
    assert_eq!(
        events,
        vec![
            ServiceEvent::TrackLoading { index: 1, track: mid.clone() },
            ServiceEvent::TransportReady { index: 1, track: mid },
        ]
    );
    assert!(service.is_playing());
}

#[test]
fn select_out_of_range_is_ignored() {
    let (mut service, engine) = bound_service(&["Alpha", "Beta"]);
    service.select_track(1);
    engine.clear_calls();

    service.select_track(5);

    assert!(engine.calls().is_empty());
    assert_eq!(service.sequencer().current_index(), Some(1));
}

#[test]
fn empty_catalog_commands_are_noops() {
    let engine = MockEngine::new();
    let mut service = PlaybackService::new(engine.clone(), resolver());
    service.attach().unwrap();
    service.set_catalog(Catalog::empty());

    service.select_track(0);
    service.play_next();
    service.play_previous();
    service.handle_engine_event(engine.completed());

    assert!(engine.calls().is_empty());
    assert_eq!(service.status().current_index, None);
    assert!(service.drain_events().is_empty());
}

#[test]
fn next_and_previous_wrap() {
    let (mut service, engine) = bound_service(&["a", "b", "c"]);

    service.play_previous();
    service.play_next();
    service.play_next();

    assert_eq!(engine.sources(), vec![path_for(3), path_for(1), path_for(2)]);
}

#[test]
fn previous_ignores_shuffle() {
    let (mut service, _engine) = bound_service(&["a", "b", "c"]);
    service.toggle_shuffle();

    service.play_previous();

    assert_eq!(service.sequencer().current_index(), Some(2));
}

#[test]
fn completion_with_progress_advances_exactly_once() {
    let (mut service, engine) = bound_service(&["a", "b", "c"]);
    service.select_track(0);
    service.handle_engine_event(engine.prepared());
    engine.set_progress(120_000, 180_000);
    engine.clear_calls();

    service.handle_engine_event(engine.completed());

    assert_eq!(service.sequencer().current_index(), Some(1));
    assert_eq!(engine.sources(), vec![path_for(2)]);
    assert_eq!(engine.count(&Call::PrepareAsync), 1);
}

#[test]
fn completion_at_zero_does_not_advance() {
    let (mut service, engine) = bound_service(&["a", "b", "c"]);
    service.select_track(0);
    service.handle_engine_event(engine.prepared());
    engine.set_progress(0, 180_000);
    engine.clear_calls();

    service.handle_engine_event(engine.completed());

    assert_eq!(service.sequencer().current_index(), Some(0));
    assert!(engine.sources().is_empty());
}

#[test]
fn engine_error_resets_without_advancing() {
    let (mut service, engine) = bound_service(&["a", "b"]);
    service.select_track(0);
    engine.clear_calls();

    service.handle_engine_event(engine.failed("corrupt frame"));

    assert_eq!(engine.calls(), vec![Call::Reset]);
    assert_eq!(service.engine_state(), EngineState::Idle);
    assert_eq!(service.sequencer().current_index(), Some(0));
}

#[test]
fn unresolvable_track_does_not_crash() {
    let engine = MockEngine::new();
    let mut service = PlaybackService::new(engine.clone(), Arc::new(MockResolver::with_missing([1])));
    service.attach().unwrap();
    service.set_catalog(catalog(&["gone", "here"]));

    service.select_track(0);
    assert_eq!(service.engine_state(), EngineState::Error);

    service.play_next();
    assert_eq!(service.engine_state(), EngineState::Preparing);
    assert_eq!(engine.sources(), vec![path_for(2)]);
}

#[test]
fn paused_quirk_for_position_and_duration() {
    let (mut service, engine) = bound_service(&["a"]);
    service.select_track(0);
    service.handle_engine_event(engine.prepared());
    engine.set_progress(42_000, 180_000);

    service.pause();
    assert!(service.paused_flag());
    assert_eq!(service.position_ms(), 42_000);
    assert_eq!(service.duration_ms(), 180_000);

    // Hard stop: the engine still holds values, but nothing is playing or paused
    service.handle_engine_event(engine.failed("device lost"));
    service.play_next();
    engine.set_progress(42_000, 180_000);
    assert!(!service.paused_flag());
    assert_eq!(service.position_ms(), 0);
    assert_eq!(service.duration_ms(), 0);
}

#[test]
fn new_track_clears_paused_flag() {
    let (mut service, engine) = bound_service(&["a", "b"]);
    service.select_track(0);
    service.handle_engine_event(engine.prepared());
    service.pause();
    assert!(service.paused_flag());

    service.play_next();
    assert!(!service.paused_flag());
}

#[test]
fn resume_clears_paused_flag() {
    let (mut service, engine) = bound_service(&["a"]);
    service.select_track(0);
    service.handle_engine_event(engine.prepared());
    service.pause();
    service.resume();

    assert!(!service.paused_flag());
    assert!(service.is_playing());
    assert_eq!(engine.count(&Call::Start), 2);
}

#[test]
fn toggle_shuffle_twice_notifies_both_times() {
    let (mut service, _engine) = bound_service(&["a", "b"]);

    service.toggle_shuffle();
    service.toggle_shuffle();

    assert!(!service.sequencer().shuffle_enabled());
    assert_eq!(
        service.drain_events(),
        vec![
            ServiceEvent::Notification("Shuffle ON".into()),
            ServiceEvent::Notification("Shuffle OFF".into()),
        ]
    );
}

#[test]
fn shuffled_next_never_repeats_track() {
    let engine = MockEngine::new();
    let sequencer = Sequencer::with_seed(catalog(&["a", "b", "c", "d"]), 42);
    let mut service = PlaybackService::with_sequencer(engine.clone(), resolver(), sequencer);
    service.attach().unwrap();
    service.toggle_shuffle();

    service.select_track(0);
    for _ in 0..50 {
        service.play_next();
    }

    let sources = engine.sources();
    assert_eq!(sources.len(), 51);
    for pair in sources.windows(2) {
        assert_ne!(pair[0], pair[1]);
    }
}

#[test]
fn status_snapshot() {
    let (mut service, engine) = bound_service(&["Alpha", "Beta"]);
    service.select_track(1);
    service.handle_engine_event(engine.prepared());
    engine.set_progress(1_500, 200_000);

    let status = service.status();

    assert_eq!(status.service, ServiceState::Bound { clients: 1 });
    assert_eq!(status.engine, EngineState::Playing);
    assert_eq!(status.current_index, Some(1));
    assert_eq!(status.current_track.unwrap().title, "Beta");
    assert!(status.is_playing);
    assert!(!status.paused);
    assert_eq!(status.position_ms, 1_500);
    assert_eq!(status.duration_ms, 200_000);
}

#[test]
fn stale_error_does_not_cancel_the_newer_track() {
    let (mut service, engine) = bound_service(&["a", "b"]);
    service.select_track(0);
    let late_error = engine.failed("cannot open a");
    service.select_track(1);

    service.handle_engine_event(late_error);
    assert_eq!(service.engine_state(), EngineState::Preparing);
    assert_ne!(engine.calls().last(), Some(&Call::Reset));

    service.handle_engine_event(engine.prepared());
    assert_eq!(service.engine_state(), EngineState::Playing);
    assert!(service.is_playing());
    assert_eq!(engine.sources().last(), Some(&path_for(2)));
}

#[test]
fn stale_prepared_does_not_start_the_newer_track() {
    let (mut service, engine) = bound_service(&["a", "b"]);
    service.select_track(0);
    let late_prepared = engine.prepared();
    service.select_track(1);
    engine.clear_calls();
    service.drain_events();

    service.handle_engine_event(late_prepared);
    assert_eq!(engine.count(&Call::Start), 0);
    assert_eq!(service.engine_state(), EngineState::Preparing);
    assert!(service.drain_events().is_empty());

    service.handle_engine_event(engine.prepared());
    assert_eq!(engine.count(&Call::Start), 1);
    let b = catalog(&["a", "b"])[1].clone();
    assert_eq!(
        service.drain_events(),
        vec![ServiceEvent::TransportReady { index: 1, track: b }]
    );
}

#[test]
fn stale_completion_does_not_advance() {
    let (mut service, engine) = bound_service(&["a", "b", "c"]);
    service.select_track(0);
    service.handle_engine_event(engine.prepared());
    engine.set_progress(170_000, 180_000);
    let late_completion = engine.completed();
    service.select_track(1);
    engine.clear_calls();

    service.handle_engine_event(late_completion);

    assert_eq!(service.sequencer().current_index(), Some(1));
    assert!(engine.calls().is_empty());
}

#[test]
fn engine_error_while_paused_clears_paused_flag() {
    let (mut service, engine) = bound_service(&["a"]);
    service.select_track(0);
    service.handle_engine_event(engine.prepared());
    service.pause();
    assert!(service.paused_flag());

    service.handle_engine_event(engine.failed("decoder error"));

    assert!(!service.paused_flag());
    let status = service.status();
    assert!(!status.paused);
    assert_eq!(status.engine, EngineState::Idle);
}
