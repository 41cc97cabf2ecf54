//! Runs a `PlaybackService` as a tokio task
//!
//! UI clients talk to the task through `ServiceBinding`s. Engine events
//! arrive on their own channel and are handled on the same task, so the
//! service itself never needs a lock.

use crate::engine::PlayerEngine;
use crate::error::{PlaybackError, Result};
use crate::events::{EngineEventReceiver, ServiceEvent};
use crate::service::PlaybackService;
use crate::types::TransportStatus;
use lite_core::Catalog;
use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::info;

/// Capacity of the service event broadcast
const EVENT_CAPACITY: usize = 64;

/// Commands sent to the service task
#[derive(Debug)]
enum ServiceCommand {
    Attach(oneshot::Sender<Result<usize>>),
    Detach,
    SetCatalog(Catalog),
    SelectTrack(usize),
    PlayNext,
    PlayPrevious,
    ToggleShuffle,
    Pause,
    Resume,
    Seek(u64),
    Position(oneshot::Sender<u64>),
    Duration(oneshot::Sender<u64>),
    IsPlaying(oneshot::Sender<bool>),
    Status(oneshot::Sender<TransportStatus>),
    Shutdown,
}

/// Starts service tasks
pub struct ServiceHost;

impl ServiceHost {
    /// Move `service` onto a new task on the current tokio runtime
    ///
    /// The task ends once the service is released: by the last binding
    /// detaching, by `ServiceHandle::shutdown`, or by every handle and
    /// binding being dropped.
    pub fn spawn<E>(service: PlaybackService<E>, engine_events: EngineEventReceiver) -> ServiceHandle
    where
        E: PlayerEngine + 'static,
    {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (events_tx, _) = broadcast::channel(EVENT_CAPACITY);

        tokio::spawn(run(service, command_rx, engine_events, events_tx.clone()));

        ServiceHandle {
            command_tx,
            events_tx,
        }
    }
}

async fn run<E: PlayerEngine>(
    mut service: PlaybackService<E>,
    mut command_rx: mpsc::UnboundedReceiver<ServiceCommand>,
    mut engine_rx: EngineEventReceiver,
    events_tx: broadcast::Sender<ServiceEvent>,
) {
    info!("Playback service started");

    loop {
        // Engine events first: a command queued behind a `Prepared` sees its effect
        tokio::select! {
            biased;

            Some(event) = engine_rx.recv() => service.handle_engine_event(event),
            command = command_rx.recv() => match command {
                Some(command) => apply(&mut service, command),
                None => service.release(),
            },
        }

        for event in service.drain_events() {
            // No subscribers is fine
            let _ = events_tx.send(event);
        }

        if service.is_released() {
            break;
        }
    }

    info!("Playback service stopped");
}

fn apply<E: PlayerEngine>(service: &mut PlaybackService<E>, command: ServiceCommand) {
    match command {
        ServiceCommand::Attach(reply) => {
            let _ = reply.send(service.attach());
        }
        ServiceCommand::Detach => service.detach(),
        ServiceCommand::SetCatalog(catalog) => service.set_catalog(catalog),
        ServiceCommand::SelectTrack(index) => service.select_track(index),
        ServiceCommand::PlayNext => service.play_next(),
        ServiceCommand::PlayPrevious => service.play_previous(),
        ServiceCommand::ToggleShuffle => service.toggle_shuffle(),
        ServiceCommand::Pause => service.pause(),
        ServiceCommand::Resume => service.resume(),
        ServiceCommand::Seek(position_ms) => service.seek(position_ms),
        ServiceCommand::Position(reply) => {
            let _ = reply.send(service.position_ms());
        }
        ServiceCommand::Duration(reply) => {
            let _ = reply.send(service.duration_ms());
        }
        ServiceCommand::IsPlaying(reply) => {
            let _ = reply.send(service.is_playing());
        }
        ServiceCommand::Status(reply) => {
            let _ = reply.send(service.status());
        }
        ServiceCommand::Shutdown => {
            info!("Shutdown requested");
            service.release();
        }
    }
}

/// Cloneable handle to a running service task
#[derive(Clone)]
pub struct ServiceHandle {
    command_tx: mpsc::UnboundedSender<ServiceCommand>,
    events_tx: broadcast::Sender<ServiceEvent>,
}

impl ServiceHandle {
    /// Attach a new UI client
    pub async fn bind(&self) -> Result<ServiceBinding> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.command_tx
            .send(ServiceCommand::Attach(reply_tx))
            .map_err(|_| PlaybackError::ServiceStopped)?;

        reply_rx.await.map_err(|_| PlaybackError::ServiceStopped)??;

        Ok(ServiceBinding {
            command_tx: self.command_tx.clone(),
        })
    }

    /// Receive service events (transport ready, notifications, release)
    pub fn subscribe(&self) -> broadcast::Receiver<ServiceEvent> {
        self.events_tx.subscribe()
    }

    /// Release the engine and stop the task, regardless of bound clients
    pub fn shutdown(&self) {
        let _ = self.command_tx.send(ServiceCommand::Shutdown);
    }

    pub fn is_running(&self) -> bool {
        !self.command_tx.is_closed()
    }
}

/// One attached UI client
///
/// Commands are fire-and-forget. Queries against a stopped service answer
/// 0 / false. Dropping the binding detaches it.
pub struct ServiceBinding {
    command_tx: mpsc::UnboundedSender<ServiceCommand>,
}

impl ServiceBinding {
    fn send(&self, command: ServiceCommand) {
        let _ = self.command_tx.send(command);
    }

    async fn query<T>(&self, command: impl FnOnce(oneshot::Sender<T>) -> ServiceCommand) -> Option<T> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.command_tx.send(command(reply_tx)).ok()?;
        reply_rx.await.ok()
    }

    pub fn set_catalog(&self, catalog: Catalog) {
        self.send(ServiceCommand::SetCatalog(catalog));
    }

    pub fn select_track(&self, index: usize) {
        self.send(ServiceCommand::SelectTrack(index));
    }

    pub fn play_next(&self) {
        self.send(ServiceCommand::PlayNext);
    }

    pub fn play_previous(&self) {
        self.send(ServiceCommand::PlayPrevious);
    }

    pub fn toggle_shuffle(&self) {
        self.send(ServiceCommand::ToggleShuffle);
    }

    pub fn pause(&self) {
        self.send(ServiceCommand::Pause);
    }

    pub fn resume(&self) {
        self.send(ServiceCommand::Resume);
    }

    pub fn seek(&self, position_ms: u64) {
        self.send(ServiceCommand::Seek(position_ms));
    }

    pub async fn position_ms(&self) -> u64 {
        self.query(ServiceCommand::Position).await.unwrap_or(0)
    }

    pub async fn duration_ms(&self) -> u64 {
        self.query(ServiceCommand::Duration).await.unwrap_or(0)
    }

    pub async fn is_playing(&self) -> bool {
        self.query(ServiceCommand::IsPlaying).await.unwrap_or(false)
    }

    /// Full transport snapshot, or `None` once the service has stopped
    pub async fn status(&self) -> Option<TransportStatus> {
        self.query(ServiceCommand::Status).await
    }

    /// Detach explicitly (same as dropping)
    pub fn unbind(self) {}
}

impl Drop for ServiceBinding {
    fn drop(&mut self) {
        self.send(ServiceCommand::Detach);
    }
}
