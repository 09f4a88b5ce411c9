//! Controller module - Playback logic and event handling
//!
//! This module contains the player controller that owns the queue and the
//! playback session, turns user input into remote calls and applies the
//! results those calls post back. It is organized into submodules by
//! responsibility:
//!
//! - `events`: Messages background tasks send to the UI loop
//! - `ticker`: Cancellable progress ticker
//! - `playback`: Playback commands, completions and the end-of-session handoff
//! - `input`: Key and mouse handling for the player screen
//! - `navigation`: Menu and results screen keys
//! - `autoplay`: Start-and-exit playback without a UI
//! - `commands`: One-shot command-line operations

mod events;
mod ticker;
mod playback;
mod input;
mod navigation;
pub mod autoplay;
pub mod commands;

pub use events::{Command, ControllerEvent};
pub use input::InputOutcome;
pub use navigation::{handle_menu_key, handle_results_key, perform_search, MenuAction, ResultsAction};
pub use playback::{pick_device, play_on_active_device, resolve_device};
pub use ticker::{Ticker, TICK_PERIOD};

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

use crate::error::PlayerError;
use crate::model::{PlaybackSession, PlayerState, Queue, QueueMode, RemoteService, Track};

/// How long a status line stays up before it clears itself
pub const STATUS_TTL: Duration = Duration::from_secs(5);

/// Upper bound on waiting for the remote stop when the player closes
pub const STOP_SIGNAL_GRACE: Duration = Duration::from_secs(2);

/// Seek step for arrow keys and the mouse wheel
pub const SEEK_STEP_MS: i64 = 10_000;

#[derive(Clone, Debug)]
pub struct PlayerOptions {
    pub keep_playing: bool,
    pub return_to_menu: bool,
    pub tick_period: Duration,
}

impl Default for PlayerOptions {
    fn default() -> Self {
        Self {
            keep_playing: false,
            return_to_menu: false,
            tick_period: TICK_PERIOD,
        }
    }
}

/// Where the app goes once the player screen closes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Handoff {
    Menu,
    Quit,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
    pub(crate) shown_at: Instant,
}

impl StatusMessage {
    fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
            shown_at: Instant::now(),
        }
    }

    fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
            shown_at: Instant::now(),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.shown_at.elapsed() >= STATUS_TTL
    }
}

/// Everything the player screen draws, copied out of the controller
#[derive(Clone, Debug)]
pub struct PlayerView {
    pub track: Track,
    pub state: PlayerState,
    pub elapsed: Duration,
    pub total: Duration,
    pub progress: f64,
    pub keep_playing: bool,
    pub mode: QueueMode,
    pub position: usize,
    pub queue_len: usize,
    pub status: Option<StatusMessage>,
    pub return_to_menu: bool,
}

/// State to restore when the command with `seq` fails
#[derive(Clone, Debug)]
struct Rollback {
    seq: u64,
    cursor: usize,
    session: PlaybackSession,
}

pub struct PlayerController {
    pub(crate) remote: Arc<dyn RemoteService>,
    pub(crate) queue: Queue,
    pub(crate) session: PlaybackSession,
    events_tx: UnboundedSender<ControllerEvent>,
    ticker: Option<Ticker>,
    tick_generation: u64,
    tick_period: Duration,
    /// Sequence number of the most recent command; only it may change state
    seq: u64,
    rollback: Option<Rollback>,
    /// Album lookup still in flight: its sequence number and target index
    resolving: Option<(u64, usize)>,
    status: Option<StatusMessage>,
    return_to_menu: bool,
    stop_signal: Option<JoinHandle<()>>,
    exited: bool,
}

impl PlayerController {
    /// Builds a controller for `queue`, with `track` being the playable form of
    /// the item under the cursor. Nothing is sent to the remote until `play`.
    pub fn new(
        remote: Arc<dyn RemoteService>,
        queue: Queue,
        track: Track,
        options: PlayerOptions,
    ) -> (Self, UnboundedReceiver<ControllerEvent>) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        tracing::info!(
            mode = %queue.mode(),
            len = queue.len(),
            cursor = queue.cursor(),
            track = %track.name,
            "Player session created"
        );

        let controller = Self {
            remote,
            session: PlaybackSession::new(track, options.keep_playing),
            queue,
            events_tx,
            ticker: None,
            tick_generation: 0,
            tick_period: options.tick_period,
            seq: 0,
            rollback: None,
            resolving: None,
            status: None,
            return_to_menu: options.return_to_menu,
            stop_signal: None,
            exited: false,
        };
        (controller, events_rx)
    }

    pub fn state(&self) -> PlayerState {
        self.session.state()
    }

    pub fn current_track(&self) -> &Track {
        &self.session.track
    }

    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    pub fn session(&self) -> &PlaybackSession {
        &self.session
    }

    pub fn keep_playing(&self) -> bool {
        self.session.keep_playing
    }

    pub fn is_ticking(&self) -> bool {
        self.ticker.is_some()
    }

    pub fn has_exited(&self) -> bool {
        self.exited
    }

    /// Current status line, if it has not timed out yet
    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref().filter(|s| !s.is_expired())
    }

    pub fn clear_expired_status(&mut self) {
        if self.status.as_ref().is_some_and(StatusMessage::is_expired) {
            self.status = None;
        }
    }

    pub fn view(&self) -> PlayerView {
        PlayerView {
            track: self.session.track.clone(),
            state: self.session.state(),
            elapsed: self.session.clock.elapsed(),
            total: self.session.clock.total(),
            progress: self.session.clock.progress_ratio(),
            keep_playing: self.session.keep_playing,
            mode: self.queue.mode(),
            position: self.queue.cursor() + 1,
            queue_len: self.queue.len(),
            status: self.status().cloned(),
            return_to_menu: self.return_to_menu,
        }
    }

    pub(crate) fn set_info(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage::info(text));
    }

    pub(crate) fn report_error(&mut self, error: &PlayerError) {
        self.status = Some(StatusMessage::error(Self::format_error(error)));
    }

    pub(crate) fn format_error(error: &PlayerError) -> String {
        let PlayerError::Remote { message, .. } = error else {
            return error.to_string();
        };

        // Common Spotify API failures get a hint instead of the raw response
        if message.contains("403") {
            "Action forbidden. Check your Spotify Premium status.".to_string()
        } else if message.contains("401") {
            "Authentication expired. Please restart the app.".to_string()
        } else if message.contains("429") {
            "Rate limited. Please wait a moment.".to_string()
        } else {
            error.to_string()
        }
    }

    pub(crate) fn start_ticker(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.stop();
        }
        self.tick_generation += 1;
        self.ticker = Some(Ticker::spawn(
            self.tick_period,
            self.tick_generation,
            self.events_tx.clone(),
        ));
    }

    pub(crate) fn stop_ticker(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.stop();
        }
        // Ticks already queued from the old ticker are now stale
        self.tick_generation += 1;
    }

    pub(crate) fn is_current_tick(&self, generation: u64) -> bool {
        self.ticker
            .as_ref()
            .is_some_and(|t| t.generation() == generation)
    }

    /// Allocates a sequence number without a rollback point.
    pub(crate) fn next_seq(&mut self, command: Command) -> u64 {
        self.seq += 1;
        self.resolving = None;
        tracing::debug!(seq = self.seq, command = command.label(), "Command issued");
        self.seq
    }

    /// Allocates a sequence number and records the state to go back to if the
    /// command fails.
    pub(crate) fn begin(&mut self, command: Command) -> u64 {
        let seq = self.next_seq(command);
        self.rollback = Some(Rollback {
            seq,
            cursor: self.queue.cursor(),
            session: self.session.clone(),
        });
        seq
    }

    pub(crate) fn is_latest(&self, seq: u64) -> bool {
        seq == self.seq
    }

    pub(crate) fn take_rollback(&mut self, seq: u64) -> bool {
        let Some(rollback) = self.rollback.take() else {
            return false;
        };
        if rollback.seq != seq {
            self.rollback = Some(rollback);
            return false;
        }

        tracing::debug!(seq, cursor = rollback.cursor, "Rolling back failed command");
        if let Err(e) = self.queue.commit(rollback.cursor) {
            tracing::error!(error = %e, "Rollback cursor out of range");
        }
        // Keep-playing is a user preference, not part of the failed transition
        let keep_playing = self.session.keep_playing;
        self.session = rollback.session;
        self.session.keep_playing = keep_playing;
        if self.session.is_playing {
            self.start_ticker();
        } else {
            self.stop_ticker();
        }
        true
    }

    pub(crate) fn clear_rollback(&mut self, seq: u64) {
        if self.rollback.as_ref().is_some_and(|r| r.seq == seq) {
            self.rollback = None;
        }
    }

    pub(crate) fn mark_resolving(&mut self, seq: u64, index: usize) {
        self.resolving = Some((seq, index));
    }

    pub(crate) fn is_resolving(&self) -> bool {
        self.resolving.is_some()
    }

    /// Index the next skip steps from: a pending lookup's target, else the cursor.
    pub(crate) fn skip_origin(&self) -> usize {
        self.resolving.map_or(self.queue.cursor(), |(_, index)| index)
    }

    pub(crate) fn finish_resolving(&mut self) {
        self.resolving = None;
    }

    pub(crate) fn events_tx(&self) -> UnboundedSender<ControllerEvent> {
        self.events_tx.clone()
    }

    pub(crate) fn return_to_menu(&self) -> bool {
        self.return_to_menu
    }

    pub(crate) fn set_exited(&mut self, stop_signal: Option<JoinHandle<()>>) {
        self.exited = true;
        self.stop_signal = stop_signal;
    }

    pub(crate) fn take_stop_signal(&mut self) -> Option<JoinHandle<()>> {
        self.stop_signal.take()
    }
}

impl Drop for PlayerController {
    fn drop(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.stop();
        }
    }
}
