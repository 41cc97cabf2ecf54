/// CPAL-backed single-track engine
use crate::error::{AudioError, Result};
use crate::source::LocalAudioSource;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Stream, StreamConfig};
use crossbeam_channel::{bounded, Receiver, Sender};
use lite_playback::{EngineEvent, EngineEventSender, PlayerEngine};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// State shared by the engine, prepare workers and the output callback
struct SharedState {
    /// The prepared track, if any
    source: Mutex<Option<LocalAudioSource>>,
    /// Output pulls from `source` only while set
    playing: AtomicBool,
    /// Bumped by every reset; a prepare started under an older value is stale
    epoch: AtomicU64,
    /// Caller's load generation for the track in `source`, written under its lock
    loaded_generation: AtomicU64,
}

impl SharedState {
    fn new() -> Self {
        Self {
            source: Mutex::new(None),
            playing: AtomicBool::new(false),
            epoch: AtomicU64::new(0),
            loaded_generation: AtomicU64::new(0),
        }
    }

    fn lock_source(&self) -> MutexGuard<'_, Option<LocalAudioSource>> {
        self.source.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Desktop `PlayerEngine`
///
/// **Architecture**: a dedicated output thread owns the CPAL `Stream` (which
/// is not `Send`) for the engine's whole life and only waits for shutdown.
/// The stream callback reads from the shared source while `playing` is set.
/// Files are opened on short-lived worker threads so `prepare_async` never
/// blocks the caller.
pub struct DesktopEngine {
    shared: Arc<SharedState>,
    events: EngineEventSender,
    data_source: Option<PathBuf>,
    sample_rate: u32,
    shutdown_tx: Option<Sender<()>>,
    output_thread: Option<JoinHandle<()>>,
}

impl DesktopEngine {
    /// Open the default output device
    ///
    /// # Errors
    /// Returns an error if no device is available or the stream cannot be built
    pub fn new(events: EngineEventSender) -> Result<Self> {
        let shared = Arc::new(SharedState::new());
        let (ready_tx, ready_rx) = bounded::<Result<u32>>(1);
        let (shutdown_tx, shutdown_rx) = bounded::<()>(1);

        let thread_shared = Arc::clone(&shared);
        let thread_events = events.clone();
        let output_thread = thread::Builder::new()
            .name("lite-audio-output".into())
            .spawn(move || output_thread_run(thread_shared, thread_events, ready_tx, shutdown_rx))
            .map_err(|e| AudioError::DeviceError(e.to_string()))?;

        let sample_rate = ready_rx
            .recv()
            .map_err(|_| AudioError::DeviceError("output thread exited during startup".into()))??;

        tracing::info!("Audio output ready at {} Hz", sample_rate);

        Ok(Self {
            shared,
            events,
            data_source: None,
            sample_rate,
            shutdown_tx: Some(shutdown_tx),
            output_thread: Some(output_thread),
        })
    }

    /// Output device sample rate
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn clear_source(&self) {
        let mut source = self.shared.lock_source();
        self.shared.epoch.fetch_add(1, Ordering::SeqCst);
        self.shared.playing.store(false, Ordering::SeqCst);
        *source = None;
    }
}

impl PlayerEngine for DesktopEngine {
    fn reset(&mut self) {
        self.clear_source();
        self.data_source = None;
    }

    fn set_data_source(&mut self, location: &Path) -> lite_playback::Result<()> {
        if !location.is_file() {
            return Err(AudioError::Open {
                path: location.display().to_string(),
                message: "not a readable file".into(),
            }
            .into());
        }

        self.data_source = Some(location.to_path_buf());
        Ok(())
    }

    fn prepare_async(&mut self, generation: u64) {
        let Some(path) = self.data_source.clone() else {
            let _ = self.events.send(EngineEvent::Error {
                generation,
                message: "prepare without data source".into(),
            });
            return;
        };

        let epoch = self.shared.epoch.load(Ordering::SeqCst);
        let shared = Arc::clone(&self.shared);
        let events = self.events.clone();
        let sample_rate = self.sample_rate;

        let spawned = thread::Builder::new()
            .name("lite-audio-prepare".into())
            .spawn(move || {
                let opened = LocalAudioSource::open(&path, sample_rate);

                // Checked under the source lock so a concurrent reset wins
                let mut source = shared.lock_source();
                if shared.epoch.load(Ordering::SeqCst) != epoch {
                    tracing::debug!("Discarding superseded prepare of {}", path.display());
                    return;
                }

                let event = match opened {
                    Ok(opened) => {
                        *source = Some(opened);
                        shared.loaded_generation.store(generation, Ordering::SeqCst);
                        EngineEvent::Prepared { generation }
                    }
                    Err(e) => EngineEvent::Error {
                        generation,
                        message: e.to_string(),
                    },
                };
                let _ = events.send(event);
            });

        if let Err(e) = spawned {
            let _ = self.events.send(EngineEvent::Error {
                generation,
                message: format!("cannot spawn prepare worker: {e}"),
            });
        }
    }

    fn start(&mut self) {
        if self.shared.lock_source().is_some() {
            self.shared.playing.store(true, Ordering::SeqCst);
        }
    }

    fn pause(&mut self) {
        self.shared.playing.store(false, Ordering::SeqCst);
    }

    fn seek_to(&mut self, position_ms: u64) {
        if let Some(source) = self.shared.lock_source().as_mut() {
            if let Err(e) = source.seek(Duration::from_millis(position_ms)) {
                tracing::warn!("{}", e);
            }
        }
    }

    fn stop(&mut self) {
        self.clear_source();
    }

    fn release(&mut self) {
        self.clear_source();
        self.data_source = None;

        if let Some(shutdown_tx) = self.shutdown_tx.take() {
            let _ = shutdown_tx.send(());
        }
        if let Some(handle) = self.output_thread.take() {
            if handle.join().is_err() {
                tracing::error!("Audio output thread panicked");
            }
        }
    }

    fn position_ms(&self) -> u64 {
        self.shared
            .lock_source()
            .as_ref()
            .map(|s| s.position().as_millis() as u64)
            .unwrap_or(0)
    }

    fn duration_ms(&self) -> u64 {
        self.shared
            .lock_source()
            .as_ref()
            .map(|s| s.duration().as_millis() as u64)
            .unwrap_or(0)
    }

    fn is_playing(&self) -> bool {
        self.shared.playing.load(Ordering::SeqCst)
    }
}

impl Drop for DesktopEngine {
    fn drop(&mut self) {
        self.release();
    }
}

/// Output thread: owns the stream until shutdown
fn output_thread_run(
    shared: Arc<SharedState>,
    events: EngineEventSender,
    ready_tx: Sender<Result<u32>>,
    shutdown_rx: Receiver<()>,
) {
    let stream = match build_stream(shared, events) {
        Ok((stream, sample_rate)) => {
            let _ = ready_tx.send(Ok(sample_rate));
            stream
        }
        Err(e) => {
            let _ = ready_tx.send(Err(e));
            return;
        }
    };

    // Shutdown message or engine dropped
    let _ = shutdown_rx.recv();
    drop(stream);
    tracing::debug!("Audio output thread exiting");
}

fn build_stream(shared: Arc<SharedState>, events: EngineEventSender) -> Result<(Stream, u32)> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or(AudioError::DeviceNotFound)?;

    let config = device.default_output_config()?;
    let sample_rate = config.sample_rate();
    let config: StreamConfig = config.config();
    let channels = usize::from(config.channels);

    let mut scratch = Vec::new();
    let stream = device.build_output_stream(
        &config,
        move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
            fill_output(data, channels, &shared, &events, &mut scratch);
        },
        |err| tracing::error!("Audio stream error: {}", err),
        None,
    )?;
    stream.play()?;

    Ok((stream, sample_rate))
}

/// Audio callback (runs on the real-time audio thread)
fn fill_output(
    output: &mut [f32],
    channels: usize,
    shared: &SharedState,
    events: &EngineEventSender,
    scratch: &mut Vec<f32>,
) {
    output.fill(0.0);

    if channels == 0 || !shared.playing.load(Ordering::SeqCst) {
        return;
    }

    // Never wait on the engine thread from here
    let Ok(mut guard) = shared.source.try_lock() else {
        return;
    };
    let Some(source) = guard.as_mut() else {
        return;
    };
    let generation = shared.loaded_generation.load(Ordering::SeqCst);

    let frames = output.len() / channels;
    scratch.resize(frames * 2, 0.0);

    if let Err(e) = source.read_samples(scratch) {
        shared.playing.store(false, Ordering::SeqCst);
        let _ = events.send(EngineEvent::Error {
            generation,
            message: e.to_string(),
        });
        return;
    }

    for (frame, stereo) in output.chunks_exact_mut(channels).zip(scratch.chunks_exact(2)) {
        if channels == 1 {
            frame[0] = (stereo[0] + stereo[1]) * 0.5;
        } else {
            frame[0] = stereo[0];
            frame[1] = stereo[1];
        }
    }

    if source.is_finished() && shared.playing.swap(false, Ordering::SeqCst) {
        let _ = events.send(EngineEvent::Completed { generation });
    }
}
