//! Cancellable periodic tick that drives the progress display

use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use super::events::ControllerEvent;

pub const TICK_PERIOD: Duration = Duration::from_secs(1);

pub struct Ticker {
    generation: u64,
    token: CancellationToken,
    handle: JoinHandle<()>,
}

impl Ticker {
    /// Posts `ControllerEvent::Tick` every `period`, first one after one period.
    pub fn spawn(period: Duration, generation: u64, tx: UnboundedSender<ControllerEvent>) -> Self {
        let token = CancellationToken::new();
        let child = token.clone();

        let handle = tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = child.cancelled() => break,
                    _ = interval.tick() => {
                        if tx.send(ControllerEvent::Tick { generation }).is_err() {
                            // UI side is gone
                            break;
                        }
                    }
                }
            }
            tracing::trace!(generation, "Ticker stopped");
        });

        tracing::trace!(generation, ?period, "Ticker started");
        Self {
            generation,
            token,
            handle,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Stops the task; no tick is sent after this returns.
    pub fn stop(self) {
        self.token.cancel();
        self.handle.abort();
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn ticks_until_stopped() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let ticker = Ticker::spawn(Duration::from_millis(10), 7, tx);

        let event = tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .expect("tick in time");
        assert!(matches!(event, Some(ControllerEvent::Tick { generation: 7 })));

        ticker.stop();
        // Drain what was queued before the stop, then nothing else arrives
        tokio::time::sleep(Duration::from_millis(30)).await;
        while rx.try_recv().is_ok() {}
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(rx.try_recv().is_err());
    }
}
