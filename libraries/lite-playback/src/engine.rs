//! Platform abstraction for a single-track audio player
//!
//! Platform-specific code implements this trait for:
//! - Desktop: symphonia decoding into a CPAL output stream
//! - Tests: scripted engines that record calls
//!
//! The engine never calls back into the adapter. Asynchronous outcomes
//! (`Prepared`, `Completed`, `Error`) go out on the `EngineEventSender` the
//! engine was built with.

use crate::error::Result;
use std::path::Path;

/// Single-track player
///
/// # Contract
///
/// - `reset` is synchronous and discards any loaded track. Events from a
///   prepare that started before `reset` must not be delivered.
/// - `prepare_async` returns immediately; exactly one of `Prepared` or
///   `Error` follows unless the prepare is reset first.
/// - `Completed` is sent once when the loaded track plays to its end.
/// - Every event is tagged with the `generation` given to the
///   `prepare_async` that loaded the track it reports on.
/// - After `release` no other method is called.
pub trait PlayerEngine: Send {
    /// Drop the loaded track and any in-flight prepare
    fn reset(&mut self);

    /// Set the media to load on the next `prepare_async`
    ///
    /// # Errors
    /// Returns an error if the location cannot be opened by this engine
    fn set_data_source(&mut self, location: &Path) -> Result<()>;

    /// Begin preparing the data source off the caller's thread
    fn prepare_async(&mut self, generation: u64);

    /// Start or resume output
    fn start(&mut self);

    fn pause(&mut self);

    /// Move the playhead
    fn seek_to(&mut self, position_ms: u64);

    /// Stop output, keeping the loaded track
    fn stop(&mut self);

    /// Free decoder and device resources
    fn release(&mut self);

    /// Current playhead in milliseconds (0 when nothing is loaded)
    fn position_ms(&self) -> u64;

    /// Loaded track length in milliseconds (0 when nothing is loaded)
    fn duration_ms(&self) -> u64;

    fn is_playing(&self) -> bool;
}
