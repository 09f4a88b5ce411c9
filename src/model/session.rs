//! Playback state owned by a single player controller

use std::time::Duration;

use super::clock::PlaybackClock;
use super::types::Track;

/// Controller state machine
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerState {
    Idle,
    Playing,
    Paused,
}

#[derive(Clone, Debug)]
pub struct PlaybackSession {
    pub track: Track,
    pub is_playing: bool,
    /// Elapsed time frozen at the last pause, zero if never paused
    pub paused_offset: Duration,
    pub keep_playing: bool,
    pub clock: PlaybackClock,
    /// Distinguishes a fresh/stopped session from a paused one
    started: bool,
}

impl PlaybackSession {
    pub fn new(track: Track, keep_playing: bool) -> Self {
        let clock = PlaybackClock::for_track_ms(track.duration_ms);
        Self {
            track,
            is_playing: false,
            paused_offset: Duration::ZERO,
            keep_playing,
            clock,
            started: false,
        }
    }

    pub fn state(&self) -> PlayerState {
        match (self.is_playing, self.started) {
            (true, _) => PlayerState::Playing,
            (false, true) => PlayerState::Paused,
            (false, false) => PlayerState::Idle,
        }
    }

    /// Starts the clock from `paused_offset`.
    pub fn resume(&mut self) {
        self.clock.start(self.paused_offset);
        self.is_playing = true;
        self.started = true;
    }

    /// Freezes the clock. The resume offset never points past the end of the track.
    pub fn pause(&mut self) -> Duration {
        self.paused_offset = self.clock.pause().min(self.clock.total());
        self.is_playing = false;
        self.paused_offset
    }

    /// Replaces the current track; the clock starts over.
    pub fn load(&mut self, track: Track) {
        self.clock = PlaybackClock::for_track_ms(track.duration_ms);
        self.track = track;
        self.paused_offset = Duration::ZERO;
    }

    /// Session ends: back to Idle, rewound so a later play starts from the top.
    pub fn stop(&mut self) {
        self.clock.reset();
        self.paused_offset = Duration::ZERO;
        self.is_playing = false;
        self.started = false;
    }

    /// Offset to hand to the remote `play` call, `None` when starting from zero.
    pub fn resume_position_ms(&self) -> Option<u32> {
        if self.paused_offset.is_zero() {
            None
        } else {
            Some(self.paused_offset.as_millis() as u32)
        }
    }
}
