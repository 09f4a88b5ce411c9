//! Playback control methods
//!
//! Every command updates local state right away, hands the remote call to a
//! background task and gets the outcome back as a `ControllerEvent`. A failed
//! command restores the state captured when it was issued, unless a newer
//! command has been issued since.

use std::time::Duration;

use crate::error::PlayerError;
use crate::model::{DeviceInfo, ItemRef, PlayerState, RemoteService, Track};

use super::events::{Command, ControllerEvent};
use super::{Handoff, PlayerController, STOP_SIGNAL_GRACE};

/// Picks the device to play on: the active one, otherwise the first listed.
pub fn pick_device(devices: &[DeviceInfo]) -> Option<&DeviceInfo> {
    devices
        .iter()
        .find(|d| d.is_active)
        .or_else(|| devices.first())
}

/// Looks up the device to target, failing when the account has none.
pub async fn resolve_device<R>(remote: &R) -> Result<DeviceInfo, PlayerError>
where
    R: RemoteService + ?Sized,
{
    let devices = remote.list_devices().await?;
    let device = pick_device(&devices).cloned().ok_or(PlayerError::NoActiveDevice)?;
    tracing::debug!(device = %device.name, active = device.is_active, "Selected playback device");
    Ok(device)
}

/// Starts `uri` on the selected device, resuming at `position_ms` when given.
pub async fn play_on_active_device<R>(remote: &R, uri: &str, position_ms: Option<u32>) -> Result<(), PlayerError>
where
    R: RemoteService + ?Sized,
{
    let device = resolve_device(remote).await?;
    let device_id = (!device.id.is_empty()).then_some(device.id.as_str());
    remote.play(device_id, &[uri.to_string()], position_ms).await
}

impl PlayerController {
    /// Starts or resumes the current track. No-op while already playing.
    pub fn play(&mut self) {
        if self.has_exited() || self.state() == PlayerState::Playing {
            return;
        }

        let seq = self.begin(Command::Play);
        let position = self.session.resume_position_ms();
        self.session.resume();
        self.start_ticker();
        tracing::info!(track = %self.session.track.name, position_ms = ?position, "Play");
        self.dispatch_play(seq, Command::Play, position);
    }

    /// Pauses playback and freezes the clock. No-op unless playing.
    pub fn pause(&mut self) {
        if self.has_exited() || self.state() != PlayerState::Playing {
            return;
        }

        let seq = self.begin(Command::Pause);
        let offset = self.session.pause();
        self.stop_ticker();
        tracing::info!(offset_ms = offset.as_millis() as u64, "Pause");

        let remote = self.remote.clone();
        let tx = self.events_tx();
        tokio::spawn(async move {
            let result = remote.pause(None).await;
            let _ = tx.send(ControllerEvent::RemoteCompleted {
                seq,
                command: Command::Pause,
                result,
            });
        });
    }

    pub fn toggle_playback(&mut self) {
        match self.state() {
            PlayerState::Playing => self.pause(),
            PlayerState::Paused | PlayerState::Idle => self.play(),
        }
    }

    pub fn next(&mut self) {
        self.skip(Command::Next);
    }

    pub fn previous(&mut self) {
        self.skip(Command::Previous);
    }

    /// Moves playback by `delta_ms` within the current track, clamped to its bounds.
    pub fn seek(&mut self, delta_ms: i64) {
        if self.has_exited() || self.state() != PlayerState::Playing {
            return;
        }

        let target = self.session.clock.seek_target(delta_ms);
        self.seek_to(target);
    }

    /// Seeks to `ratio` of the track length, e.g. from a click on the gauge.
    pub fn seek_to_ratio(&mut self, ratio: f64) {
        if self.has_exited() || self.state() != PlayerState::Playing {
            return;
        }

        let total = self.session.clock.total();
        let target = total.mul_f64(ratio.clamp(0.0, 1.0));
        self.seek_to(target);
    }

    fn seek_to(&mut self, target: Duration) {
        let seq = self.begin(Command::Seek);
        self.session.clock.seek_to(target);
        let position_ms = target.as_millis() as u32;
        tracing::debug!(position_ms, "Seek");

        let remote = self.remote.clone();
        let tx = self.events_tx();
        tokio::spawn(async move {
            let result = remote.seek(position_ms).await;
            let _ = tx.send(ControllerEvent::RemoteCompleted {
                seq,
                command: Command::Seek,
                result,
            });
        });
    }

    pub fn toggle_keep_playing(&mut self) {
        self.session.keep_playing = !self.session.keep_playing;
        let label = if self.session.keep_playing { "ON" } else { "OFF" };
        tracing::info!(keep_playing = self.session.keep_playing, "Keep playing toggled");
        self.set_info(format!("Keep playing: {}", label));
    }

    /// Applies one message posted by a background task.
    pub fn handle_event(&mut self, event: ControllerEvent) {
        if self.has_exited() {
            tracing::trace!(?event, "Ignoring event after exit");
            return;
        }

        match event {
            ControllerEvent::Tick { generation } => self.on_tick(generation),
            ControllerEvent::RemoteCompleted { seq, command, result } => {
                self.on_remote_completed(seq, command, result)
            }
            ControllerEvent::TrackResolved {
                seq,
                command,
                index,
                result,
            } => self.on_track_resolved(seq, command, index, result),
        }
    }

    /// Stops the session and reports where the app goes next. Safe to call twice.
    pub fn exit(&mut self) -> Handoff {
        if !self.has_exited() {
            self.stop_ticker();
            let stop_signal = if self.session.keep_playing {
                tracing::info!("Leaving player, playback continues");
                None
            } else {
                tracing::info!("Leaving player, stopping playback");
                let remote = self.remote.clone();
                Some(tokio::spawn(async move {
                    if let Err(e) = remote.pause(None).await {
                        tracing::warn!(error = %e, "Failed to stop playback on exit");
                    }
                }))
            };
            self.session.stop();
            self.set_exited(stop_signal);
        }

        if self.return_to_menu() {
            Handoff::Menu
        } else {
            Handoff::Quit
        }
    }

    /// Waits for the stop signal sent by `exit`, bounded by `STOP_SIGNAL_GRACE`.
    pub async fn finish(mut self) {
        let Some(handle) = self.take_stop_signal() else {
            return;
        };
        if tokio::time::timeout(STOP_SIGNAL_GRACE, handle).await.is_err() {
            tracing::warn!("Stop signal still pending, not waiting any longer");
        }
    }

    fn skip(&mut self, command: Command) {
        if self.has_exited() || self.state() == PlayerState::Idle {
            return;
        }

        let wrap = self.session.keep_playing;
        let origin = self.skip_origin();
        let index = match command {
            Command::Previous => self.queue.peek_retreat_from(origin, wrap),
            _ => self.queue.peek_advance_from(origin, wrap),
        };
        let Some(index) = index else {
            tracing::debug!(command = command.label(), origin, "No track to move to");
            return;
        };

        let item = match self.queue.item_at(index) {
            Ok(item) => item,
            Err(e) => {
                tracing::error!(error = %e, "Queue lookup failed");
                self.report_error(&e);
                return;
            }
        };

        let seq = self.begin(command);
        tracing::debug!(seq, index, id = item.id(), command = command.label(), "Skipping");
        match item {
            ItemRef::Ready(track) => self.load_and_play(seq, command, index, track),
            ItemRef::Pending(track_ref) => {
                tracing::debug!(seq, "Resolving album track");
                self.mark_resolving(seq, index);
                let remote = self.remote.clone();
                let tx = self.events_tx();
                tokio::spawn(async move {
                    let result = ItemRef::Pending(track_ref).resolve(remote.as_ref()).await;
                    let _ = tx.send(ControllerEvent::TrackResolved {
                        seq,
                        command,
                        index,
                        result,
                    });
                });
            }
        }
    }

    fn load_and_play(&mut self, seq: u64, command: Command, index: usize, track: Track) {
        if let Err(e) = self.queue.commit(index) {
            tracing::error!(error = %e, "Cannot move queue cursor");
            self.report_error(&e);
            return;
        }

        tracing::info!(
            command = command.label(),
            index,
            track = %track.name,
            "Loading track"
        );
        self.session.load(track);
        self.session.resume();
        self.start_ticker();
        self.dispatch_play(seq, command, None);
    }

    fn dispatch_play(&self, seq: u64, command: Command, position_ms: Option<u32>) {
        let remote = self.remote.clone();
        let tx = self.events_tx();
        let uri = self.session.track.uri();
        tokio::spawn(async move {
            let result = play_on_active_device(remote.as_ref(), &uri, position_ms).await;
            let _ = tx.send(ControllerEvent::RemoteCompleted { seq, command, result });
        });
    }

    fn on_tick(&mut self, generation: u64) {
        if !self.is_current_tick(generation) || self.state() != PlayerState::Playing {
            tracing::trace!(generation, "Dropping stale tick");
            return;
        }
        if !self.session.clock.is_finished() || self.is_resolving() {
            return;
        }

        tracing::debug!(track = %self.session.track.name, "Track finished");
        let wrap = self.session.keep_playing;
        if self.queue.peek_advance(wrap).is_some() {
            // Hold at the end of the finished track until the next one loads
            self.session.pause();
            self.stop_ticker();
            self.skip(Command::Next);
        } else {
            self.end_session();
        }
    }

    /// Queue ran out: back to Idle and tell the remote to stop.
    fn end_session(&mut self) {
        let seq = self.next_seq(Command::Stop);
        self.rollback = None;
        self.session.stop();
        self.stop_ticker();
        tracing::info!("Reached the end of the queue");
        self.set_info("Finished playing.");

        let remote = self.remote.clone();
        let tx = self.events_tx();
        tokio::spawn(async move {
            let result = remote.pause(None).await;
            let _ = tx.send(ControllerEvent::RemoteCompleted {
                seq,
                command: Command::Stop,
                result,
            });
        });
    }

    fn on_remote_completed(&mut self, seq: u64, command: Command, result: Result<(), PlayerError>) {
        match result {
            Ok(()) => {
                tracing::info!(seq, command = command.label(), "Remote command succeeded");
                self.clear_rollback(seq);
            }
            Err(e) => {
                tracing::error!(
                    seq,
                    command = command.label(),
                    error = %e,
                    retryable = e.is_retryable(),
                    "Remote command failed"
                );
                if !self.is_latest(seq) {
                    tracing::debug!(seq, latest = self.seq, "Ignoring failure of a superseded command");
                    return;
                }
                self.take_rollback(seq);
                self.report_error(&e);
            }
        }
    }

    fn on_track_resolved(&mut self, seq: u64, command: Command, index: usize, result: Result<Track, PlayerError>) {
        if !self.is_latest(seq) {
            tracing::debug!(seq, latest = self.seq, "Ignoring superseded track lookup");
            return;
        }
        self.finish_resolving();

        match result {
            Ok(track) => self.load_and_play(seq, command, index, track),
            Err(e) => {
                // Cursor was never moved; nothing to undo
                tracing::error!(seq, index, error = %e, "Track lookup failed");
                self.clear_rollback(seq);
                self.report_error(&e);
            }
        }
    }
}
