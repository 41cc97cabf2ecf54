//! Interactive console session bound to the playback service

use crate::console::{self, ConsoleCommand, HELP};
use crate::error::Result;
use lite_core::Catalog;
use lite_playback::{ServiceBinding, ServiceEvent, ServiceHandle};
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, warn};

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionExit {
    /// The user asked to end; the service was told to shut down
    End,
    /// Input reached EOF; the binding is still held by the caller
    InputClosed,
    /// The service released itself
    ServiceStopped,
}

/// Read commands from `input`, drive `binding`, and print events to `out`
///
/// `events` should be subscribed before any command is sent so that the
/// first notifications are not missed.
pub async fn run_session<R, W>(
    handle: &ServiceHandle,
    binding: &ServiceBinding,
    catalog: &Catalog,
    mut events: broadcast::Receiver<ServiceEvent>,
    input: R,
    out: &mut W,
) -> Result<SessionExit>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();

    write!(out, "{}", console::render_catalog(catalog))?;
    writeln!(out, "Type 'help' for commands.")?;
    out.flush()?;

    loop {
        tokio::select! {
            biased;

            event = events.recv() => match event {
                Ok(ServiceEvent::Released) => {
                    writeln!(out, "Playback stopped")?;
                    out.flush()?;
                    return Ok(SessionExit::ServiceStopped);
                }
                Ok(event) => {
                    if let Some(text) = console::render_event(&event) {
                        writeln!(out, "{text}")?;
                        out.flush()?;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Console missed {} service events", skipped);
                }
                Err(RecvError::Closed) => return Ok(SessionExit::ServiceStopped),
            },

            line = lines.next_line() => {
                let Some(line) = line? else {
                    debug!("Console input closed");
                    return Ok(SessionExit::InputClosed);
                };

                match line.parse::<ConsoleCommand>() {
                    Ok(ConsoleCommand::End) => {
                        handle.shutdown();
                        return Ok(SessionExit::End);
                    }
                    Ok(command) => execute(command, binding, catalog, out).await?,
                    Err(e) => writeln!(out, "{e}")?,
                }
                out.flush()?;
            }
        }
    }
}

async fn execute<W: Write>(
    command: ConsoleCommand,
    binding: &ServiceBinding,
    catalog: &Catalog,
    out: &mut W,
) -> Result<()> {
    match command {
        ConsoleCommand::List => write!(out, "{}", console::render_catalog(catalog))?,
        ConsoleCommand::Play(number) => {
            if number > catalog.len() {
                writeln!(out, "No song number {number}")?;
            } else {
                binding.select_track(number - 1);
            }
        }
        ConsoleCommand::Next => binding.play_next(),
        ConsoleCommand::Previous => binding.play_previous(),
        ConsoleCommand::Pause => binding.pause(),
        ConsoleCommand::Resume => binding.resume(),
        ConsoleCommand::Seek(seconds) => binding.seek(seconds.saturating_mul(1000)),
        ConsoleCommand::Shuffle => binding.toggle_shuffle(),
        ConsoleCommand::Status => match binding.status().await {
            Some(status) => writeln!(out, "{}", console::render_status(&status))?,
            None => writeln!(out, "Player service is not running")?,
        },
        ConsoleCommand::Help => writeln!(out, "{HELP}")?,
        ConsoleCommand::End | ConsoleCommand::Empty => {}
    }
    Ok(())
}
