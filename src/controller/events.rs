//! Messages background tasks send back to the UI thread
//!
//! Remote calls and the progress ticker never touch controller state directly;
//! they post one of these and the UI loop applies it.

use crate::error::PlayerError;
use crate::model::Track;

/// Which user command a remote completion belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Play,
    Pause,
    Next,
    Previous,
    Seek,
    Stop,
}

impl Command {
    pub fn label(self) -> &'static str {
        match self {
            Command::Play => "play",
            Command::Pause => "pause",
            Command::Next => "next",
            Command::Previous => "previous",
            Command::Seek => "seek",
            Command::Stop => "stop",
        }
    }
}

#[derive(Debug)]
pub enum ControllerEvent {
    /// Periodic progress tick from the ticker with the given generation
    Tick { generation: u64 },

    /// A remote playback call finished
    RemoteCompleted {
        seq: u64,
        command: Command,
        result: Result<(), PlayerError>,
    },

    /// Album-mode lookup for the track at `index` finished
    TrackResolved {
        seq: u64,
        command: Command,
        index: usize,
        result: Result<Track, PlayerError>,
    },
}
