//! Local estimate of how far into the current track the remote player is
//!
//! The remote position is never polled; the clock is re-anchored whenever the
//! controller starts, pauses or seeks, and only has to be right to within one
//! tick of the UI refresh.

use std::time::{Duration, Instant};

#[derive(Clone, Debug)]
pub struct PlaybackClock {
    total: Duration,
    /// Elapsed time at `anchor`; equivalent to `start_instant = anchor - offset`
    offset: Duration,
    /// Set while running
    anchor: Option<Instant>,
}

impl PlaybackClock {
    pub fn new(total: Duration) -> Self {
        Self {
            total,
            offset: Duration::ZERO,
            anchor: None,
        }
    }

    pub fn for_track_ms(duration_ms: u32) -> Self {
        Self::new(Duration::from_millis(duration_ms as u64))
    }

    pub fn total(&self) -> Duration {
        self.total
    }

    pub fn is_running(&self) -> bool {
        self.anchor.is_some()
    }

    /// Runs from `resume_offset`, so elapsed time carries across a pause.
    pub fn start(&mut self, resume_offset: Duration) {
        self.offset = resume_offset;
        self.anchor = Some(Instant::now());
    }

    /// Freezes the clock and returns the offset to resume from.
    pub fn pause(&mut self) -> Duration {
        let elapsed = self.raw_elapsed();
        self.offset = elapsed;
        self.anchor = None;
        elapsed
    }

    /// Stops and rewinds to the start of the track.
    pub fn reset(&mut self) {
        self.offset = Duration::ZERO;
        self.anchor = None;
    }

    /// Unclamped elapsed time; may run past `total` until the completion check fires.
    pub fn raw_elapsed(&self) -> Duration {
        match self.anchor {
            Some(anchor) => self.offset + anchor.elapsed(),
            None => self.offset,
        }
    }

    /// Elapsed time clamped to the track length, for display.
    pub fn elapsed(&self) -> Duration {
        self.raw_elapsed().min(self.total)
    }

    pub fn is_finished(&self) -> bool {
        self.raw_elapsed() > self.total
    }

    /// Target position for a relative seek, clamped to `[0, total]`.
    pub fn seek_target(&self, delta_ms: i64) -> Duration {
        let current = self.raw_elapsed().min(self.total).as_millis() as i64;
        let target = (current + delta_ms).clamp(0, self.total.as_millis() as i64);
        Duration::from_millis(target as u64)
    }

    /// Jumps to `position` without stopping; keeps running if it was running.
    pub fn seek_to(&mut self, position: Duration) {
        self.offset = position.min(self.total);
        if self.is_running() {
            self.anchor = Some(Instant::now());
        }
    }

    pub fn progress_ratio(&self) -> f64 {
        if self.total.is_zero() {
            return 0.0;
        }
        (self.elapsed().as_secs_f64() / self.total.as_secs_f64()).clamp(0.0, 1.0)
    }
}
