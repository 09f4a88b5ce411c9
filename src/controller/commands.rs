//! One-shot command-line operations and the lookups the results screen shares
//! with them

use std::sync::Arc;
use std::time::Duration;

use crate::error::PlayerError;
use crate::model::{Queue, RemoteService, SearchKind, SearchRequest, SearchResults, Track};

use super::autoplay::{run_autoplay, AutoplayOutcome};
use super::playback::resolve_device;

pub async fn search(remote: &dyn RemoteService, request: &SearchRequest) -> Result<SearchResults, PlayerError> {
    remote.search(&request.query_text(), request.kind, request.limit).await
}

pub fn no_results_message(kind: SearchKind) -> String {
    format!("No {} found matching your query.", kind.plural())
}

/// Builds the queue for the result at `index` together with its first playable track.
///
/// Tracks open a search-results queue at `index`; albums and playlists are
/// fetched and start from their first entry. `None` when there is nothing
/// playable.
pub async fn open_selection(
    remote: &dyn RemoteService,
    results: &SearchResults,
    index: usize,
) -> Result<Option<(Queue, Track)>, PlayerError> {
    match results {
        SearchResults::Tracks(tracks) => {
            let Some(queue) = Queue::search_results(tracks.clone(), index) else {
                return Ok(None);
            };
            let track = queue.current()?.resolve(remote).await?;
            Ok(Some((queue, track)))
        }
        SearchResults::Albums(albums) => {
            let Some(album) = albums.get(index) else {
                return Ok(None);
            };
            tracing::debug!(album = %album.name, "Loading album tracks");
            let refs = remote.get_album_tracks(&album.id).await?;
            let Some(queue) = Queue::album(refs, 0) else {
                return Ok(None);
            };
            let track = queue.current()?.resolve(remote).await?;
            Ok(Some((queue, track)))
        }
        SearchResults::Playlists(playlists) => {
            let Some(playlist) = playlists.get(index) else {
                return Ok(None);
            };
            tracing::debug!(playlist = %playlist.name, "Loading playlist tracks");
            let items = remote.get_playlist_items(&playlist.id).await?;
            let Some(queue) = Queue::playlist(items, 0) else {
                return Ok(None);
            };
            let track = queue.current()?.resolve(remote).await?;
            Ok(Some((queue, track)))
        }
    }
}

/// Pauses whatever is playing on the active (or first) device.
pub async fn stop_playback(remote: &dyn RemoteService) -> Result<(), PlayerError> {
    let device = resolve_device(remote).await?;
    let device_id = (!device.id.is_empty()).then_some(device.id.as_str());
    remote
        .pause(device_id)
        .await
        .map_err(|e| e.during("stopping playback"))?;
    tracing::info!(device = %device.name, "Playback stopped");
    Ok(())
}

pub async fn run_stop(remote: &dyn RemoteService) {
    match stop_playback(remote).await {
        Ok(()) => println!("Playback stopped successfully."),
        Err(PlayerError::NoActiveDevice) => println!("{}", PlayerError::NoActiveDevice),
        Err(e) => eprintln!("{}", e),
    }
}

pub async fn run_profile(remote: &dyn RemoteService, user_id: &str) {
    match remote.user_profile(user_id).await {
        Ok(user) => {
            println!("User ID: {}", user.id);
            println!("Display name: {}", user.display_name);
            println!("Spotify URI: {}", user.uri);
            println!("Endpoint: {}", user.endpoint);
            println!("Followers: {}", user.followers);
        }
        Err(e) => eprintln!("{}", e),
    }
}

/// Plays the first playable result once and returns without a UI.
pub async fn run_autoplay_search(
    remote: Arc<dyn RemoteService>,
    results: &SearchResults,
    timeout: Duration,
) -> Option<AutoplayOutcome> {
    println!("Found {} {} matching your query.", results.len(), results.kind().plural());
    match results {
        SearchResults::Albums(albums) => {
            if let Some(album) = albums.first() {
                println!("Selected the first album: {} by {}", album.name, album.artists.join(", "));
            }
        }
        SearchResults::Playlists(playlists) => {
            if let Some(playlist) = playlists.first() {
                println!("Selected the first playlist: {} by {}", playlist.name, playlist.owner);
            }
        }
        SearchResults::Tracks(_) => {}
    }

    let track = match open_selection(remote.as_ref(), results, 0).await {
        Ok(Some((_, track))) => track,
        Ok(None) => {
            match results.kind() {
                SearchKind::Playlist => println!("No playable tracks found in the selected playlist."),
                _ => println!("No tracks found in the selected {}.", results.kind()),
            }
            return None;
        }
        Err(e) => {
            eprintln!("{}", e);
            return None;
        }
    };

    Some(run_autoplay(remote, &track, timeout).await)
}
