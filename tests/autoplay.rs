mod common;

use std::sync::Arc;
use std::time::Duration;

use common::*;
use spotty::controller::autoplay::{autoplay, AutoplayOutcome};
use spotty::controller::commands;
use spotty::error::PlayerError;
use spotty::model::{AlbumSummary, PlaylistSummary, QueueMode, RemoteService, SearchResults};

#[tokio::test]
async fn autoplay_reports_success() {
    let remote = Arc::new(MockRemote::with_active_device());
    let outcome = autoplay(remote.clone(), &track("t0", 1000), Duration::from_secs(1)).await;

    assert_eq!(outcome, AutoplayOutcome::Started);
    assert_eq!(remote.played_uris(), vec![uri("t0")]);
}

#[tokio::test]
async fn autoplay_without_devices_fails() {
    let remote = Arc::new(MockRemote::new());
    let outcome = autoplay(remote, &track("t0", 1000), Duration::from_secs(1)).await;

    assert_eq!(outcome, AutoplayOutcome::Failed(PlayerError::NoActiveDevice));
}

#[tokio::test]
async fn autoplay_gives_up_after_the_timeout() {
    let remote = Arc::new(MockRemote::with_active_device());
    remote.script_play(Step::ok_after(Duration::from_secs(5)));

    let started = tokio::time::Instant::now();
    let outcome = autoplay(remote, &track("t0", 1000), Duration::from_millis(50)).await;

    assert_eq!(outcome, AutoplayOutcome::TimedOut);
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[tokio::test]
async fn album_selection_resolves_the_first_track() {
    let remote = Arc::new(MockRemote::new());
    remote.set_album_tracks(vec![track_ref("r0"), track_ref("r1")]);
    remote.add_track(track("r0", 123_000));
    let results = SearchResults::Albums(vec![AlbumSummary {
        id: "al".into(),
        name: "Album".into(),
        artists: vec!["Artist".into()],
        release_date: "1959".into(),
    }]);

    let dyn_remote: &dyn RemoteService = remote.as_ref();
    let (queue, first) = commands::open_selection(dyn_remote, &results, 0)
        .await
        .expect("lookup succeeds")
        .expect("album has tracks");

    assert_eq!(queue.mode(), QueueMode::Album);
    assert_eq!(queue.len(), 2);
    assert_eq!(first.duration_ms, 123_000);
    assert_eq!(remote.calls(), vec![Call::AlbumTracks("al".into()), Call::GetTrack("r0".into())]);
}

#[tokio::test]
async fn empty_playlist_has_nothing_to_play() {
    let remote = Arc::new(MockRemote::new());
    let results = SearchResults::Playlists(vec![PlaylistSummary {
        id: "pl".into(),
        name: "Empty".into(),
        owner: "me".into(),
        total_tracks: 0,
    }]);

    let dyn_remote: &dyn RemoteService = remote.as_ref();
    let selection = commands::open_selection(dyn_remote, &results, 0).await.expect("no error");
    assert!(selection.is_none());
}

#[tokio::test]
async fn track_selection_starts_at_the_chosen_row() {
    let remote = Arc::new(MockRemote::new());
    let results = SearchResults::Tracks(vec![track("a", 1000), track("b", 1000), track("c", 1000)]);

    let dyn_remote: &dyn RemoteService = remote.as_ref();
    let (queue, first) = commands::open_selection(dyn_remote, &results, 2)
        .await
        .expect("no error")
        .expect("has tracks");

    assert_eq!(queue.mode(), QueueMode::SearchResults);
    assert_eq!(queue.cursor(), 2);
    assert_eq!(first.id, "c");
    assert!(remote.calls().is_empty());
}

#[tokio::test]
async fn stop_pauses_the_selected_device() {
    let remote = Arc::new(MockRemote::with_devices(vec![device("laptop", false), device("phone", true)]));
    commands::stop_playback(remote.as_ref()).await.expect("stopped");
    assert_eq!(remote.calls(), vec![Call::ListDevices, Call::Pause(Some("phone".into()))]);

    let empty = Arc::new(MockRemote::new());
    assert_eq!(commands::stop_playback(empty.as_ref()).await, Err(PlayerError::NoActiveDevice));
}
