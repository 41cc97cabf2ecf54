//! Console surface: command parsing and text rendering
//!
//! The numbered catalog listing stands in for the song list, and the status
//! line stands in for the transport controls.

use lite_core::Catalog;
use lite_playback::{EngineState, ServiceEvent, TransportStatus};
use std::fmt::Write as _;
use std::str::FromStr;
use thiserror::Error;

pub const HELP: &str = "\
Commands:
  list            show the song list
  play <n>        play song number n
  next, n         next song
  prev, p         previous song
  pause           pause playback
  resume          resume playback
  seek <seconds>  jump to a position in the current song
  shuffle         toggle shuffle
  status          show what is playing
  help            show this help
  end, quit       stop playback and exit";

/// One line of console input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleCommand {
    List,
    /// 1-based song number, as shown in the list
    Play(usize),
    Next,
    Previous,
    Pause,
    Resume,
    /// Target position in seconds
    Seek(u64),
    Shuffle,
    Status,
    Help,
    End,
    /// Blank line
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseCommandError {
    #[error("Unknown command '{0}', type 'help' for a list of commands")]
    Unknown(String),

    #[error("Usage: {0}")]
    Usage(&'static str),
}

impl FromStr for ConsoleCommand {
    type Err = ParseCommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(word) = words.next() else {
            return Ok(ConsoleCommand::Empty);
        };
        let argument = words.next();

        let command = match word.to_ascii_lowercase().as_str() {
            "list" | "ls" => ConsoleCommand::List,
            "play" => {
                let number = argument
                    .and_then(|arg| arg.parse::<usize>().ok())
                    .filter(|n| *n > 0)
                    .ok_or(ParseCommandError::Usage("play <song number>"))?;
                ConsoleCommand::Play(number)
            }
            "next" | "n" => ConsoleCommand::Next,
            "prev" | "previous" | "p" => ConsoleCommand::Previous,
            "pause" => ConsoleCommand::Pause,
            "resume" => ConsoleCommand::Resume,
            "seek" => {
                let seconds = argument
                    .and_then(|arg| arg.parse::<u64>().ok())
                    .ok_or(ParseCommandError::Usage("seek <seconds>"))?;
                ConsoleCommand::Seek(seconds)
            }
            "shuffle" => ConsoleCommand::Shuffle,
            "status" => ConsoleCommand::Status,
            "help" | "?" => ConsoleCommand::Help,
            "end" | "quit" | "exit" => ConsoleCommand::End,
            other => return Err(ParseCommandError::Unknown(other.to_string())),
        };

        Ok(command)
    }
}

/// Format milliseconds as `m:ss`
pub fn format_duration(ms: u64) -> String {
    let total_seconds = ms / 1000;
    format!("{}:{:02}", total_seconds / 60, total_seconds % 60)
}

/// One line per track, numbered from 1
pub fn render_catalog(catalog: &Catalog) -> String {
    if catalog.is_empty() {
        return "No songs found in the music directories.\n".to_string();
    }

    let mut out = String::new();
    for (i, track) in catalog.iter().enumerate() {
        let _ = writeln!(out, "{:>3}. {} - {}", i + 1, track.title, track.artist);
    }
    out
}

pub fn render_status(status: &TransportStatus) -> String {
    let Some(track) = &status.current_track else {
        return "Nothing selected".to_string();
    };

    let state = match status.engine {
        EngineState::Playing => "Playing",
        EngineState::Paused => "Paused",
        EngineState::Preparing => "Loading",
        EngineState::Error => "Unplayable",
        EngineState::Idle => "Stopped",
    };
    let number = status.current_index.map(|i| i + 1).unwrap_or(0);
    let shuffle = if status.shuffle_enabled { " [shuffle]" } else { "" };

    format!(
        "{state}: {number}. {} - {} ({} / {}){shuffle}",
        track.title,
        track.artist,
        format_duration(status.position_ms),
        format_duration(status.duration_ms),
    )
}

/// Text to show for a service event, if any
pub fn render_event(event: &ServiceEvent) -> Option<String> {
    match event {
        ServiceEvent::TransportReady { index, track } => Some(format!(
            "Now playing: {}. {} - {}",
            index + 1,
            track.title,
            track.artist
        )),
        ServiceEvent::Notification(message) => Some(message.clone()),
        ServiceEvent::Released => Some("Playback stopped".to_string()),
        ServiceEvent::TrackLoading { .. } => None,
    }
}
