//! Events flowing out of the engine and out of the service

use lite_core::Track;
use tokio::sync::mpsc;

/// Asynchronous notifications from a `PlayerEngine`
///
/// Every event carries the `generation` passed to the `prepare_async` call
/// whose load it concerns. Events from an older load are dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// The prepare requested by `prepare_async` finished; ready to start
    Prepared { generation: u64 },

    /// The loaded track played to its end
    Completed { generation: u64 },

    /// The decoder or output failed
    Error { generation: u64, message: String },
}

impl EngineEvent {
    /// Load this event belongs to
    pub fn generation(&self) -> u64 {
        match self {
            EngineEvent::Prepared { generation }
            | EngineEvent::Completed { generation }
            | EngineEvent::Error { generation, .. } => *generation,
        }
    }
}

pub type EngineEventSender = mpsc::UnboundedSender<EngineEvent>;
pub type EngineEventReceiver = mpsc::UnboundedReceiver<EngineEvent>;

/// Create the channel an engine reports on
///
/// The engine keeps the sender; the receiver goes to `ServiceHost::spawn`.
pub fn engine_channel() -> (EngineEventSender, EngineEventReceiver) {
    mpsc::unbounded_channel()
}

/// Notifications for attached UI clients
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceEvent {
    /// A track was handed to the engine
    TrackLoading { index: usize, track: Track },

    /// Playback started; live transport controls should be shown
    TransportReady { index: usize, track: Track },

    /// Short user-visible message
    Notification(String),

    /// The engine was released; the service stops
    Released,
}
