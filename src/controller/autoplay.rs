//! Start playback once and exit, without the player screen

use std::sync::Arc;
use std::time::Duration;

use crate::error::PlayerError;
use crate::model::{RemoteService, Track};

use super::playback::play_on_active_device;

/// How long autoplay waits for the remote to answer
pub const AUTOPLAY_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, PartialEq, Eq)]
pub enum AutoplayOutcome {
    Started,
    Failed(PlayerError),
    /// The call did not answer in time; playback may still start remotely
    TimedOut,
}

/// Issues one play call for `track` and waits at most `timeout` for it.
///
/// The call runs on its own task, so a timeout leaves it running rather than
/// cancelling a request the remote may already be acting on.
pub async fn autoplay(remote: Arc<dyn RemoteService>, track: &Track, timeout: Duration) -> AutoplayOutcome {
    let uri = track.uri();
    tracing::info!(track = %track.name, %uri, "Autoplay");

    let handle = tokio::spawn(async move { play_on_active_device(remote.as_ref(), &uri, None).await });

    match tokio::time::timeout(timeout, handle).await {
        Ok(Ok(Ok(()))) => AutoplayOutcome::Started,
        Ok(Ok(Err(e))) => {
            tracing::error!(error = %e, "Autoplay failed");
            AutoplayOutcome::Failed(e)
        }
        Ok(Err(join_error)) => {
            tracing::error!(error = %join_error, "Autoplay task died");
            AutoplayOutcome::Failed(PlayerError::remote("starting playback", join_error))
        }
        Err(_) => {
            tracing::warn!(?timeout, "Autoplay timed out");
            AutoplayOutcome::TimedOut
        }
    }
}

/// Prints what is about to play, runs `autoplay` and prints the outcome.
pub async fn run_autoplay(remote: Arc<dyn RemoteService>, track: &Track, timeout: Duration) -> AutoplayOutcome {
    println!("Now playing: {} by {}", track.name, track.artist_line());
    if !track.album.is_empty() {
        println!("Album: {}", track.album);
    }

    let outcome = autoplay(remote, track, timeout).await;
    match &outcome {
        AutoplayOutcome::Started => println!("Playback started successfully."),
        AutoplayOutcome::Failed(e) => eprintln!("Error starting playback: {}", e),
        AutoplayOutcome::TimedOut => println!(
            "{} after {} seconds. Playback may still start.",
            PlayerError::Timeout,
            timeout.as_secs()
        ),
    }
    outcome
}
