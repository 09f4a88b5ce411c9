#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc::UnboundedReceiver;

use spotty::controller::{ControllerEvent, PlayerController, PlayerOptions};
use spotty::error::PlayerError;
use spotty::model::{
    DeviceInfo, Queue, RemoteService, SearchKind, SearchResults, Track, TrackRef, UserProfile,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    Search(String, SearchKind, u32),
    ListDevices,
    Play {
        device_id: Option<String>,
        uris: Vec<String>,
        position_ms: Option<u32>,
    },
    Pause(Option<String>),
    Seek(u32),
    GetTrack(String),
    AlbumTracks(String),
    PlaylistItems(String),
    Profile(String),
}

/// Scripted outcome for one remote call
#[derive(Clone, Debug)]
pub struct Step {
    pub delay: Duration,
    pub result: Result<(), PlayerError>,
}

impl Step {
    pub fn ok_after(delay: Duration) -> Self {
        Self { delay, result: Ok(()) }
    }

    pub fn fail(error: PlayerError) -> Self {
        Self {
            delay: Duration::ZERO,
            result: Err(error),
        }
    }

    pub fn fail_after(delay: Duration, error: PlayerError) -> Self {
        Self { delay, result: Err(error) }
    }
}

/// Records every call; answers from scripted data.
#[derive(Default)]
pub struct MockRemote {
    calls: Mutex<Vec<Call>>,
    devices: Mutex<Vec<DeviceInfo>>,
    tracks: Mutex<HashMap<String, Track>>,
    failing_tracks: Mutex<HashMap<String, PlayerError>>,
    play_script: Mutex<VecDeque<Step>>,
    pause_script: Mutex<VecDeque<Step>>,
    seek_script: Mutex<VecDeque<Step>>,
    search_results: Mutex<Option<SearchResults>>,
    album_tracks: Mutex<Vec<TrackRef>>,
    playlist_items: Mutex<Vec<Track>>,
}

impl MockRemote {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_devices(devices: Vec<DeviceInfo>) -> Self {
        let mock = Self::new();
        *mock.devices.lock().unwrap() = devices;
        mock
    }

    /// One active device called "phone"
    pub fn with_active_device() -> Self {
        Self::with_devices(vec![device("phone", true)])
    }

    pub fn add_track(&self, track: Track) {
        self.tracks.lock().unwrap().insert(track.id.clone(), track);
    }

    pub fn fail_track(&self, id: &str, error: PlayerError) {
        self.failing_tracks.lock().unwrap().insert(id.to_string(), error);
    }

    pub fn script_play(&self, step: Step) {
        self.play_script.lock().unwrap().push_back(step);
    }

    pub fn script_pause(&self, step: Step) {
        self.pause_script.lock().unwrap().push_back(step);
    }

    pub fn script_seek(&self, step: Step) {
        self.seek_script.lock().unwrap().push_back(step);
    }

    pub fn set_search_results(&self, results: SearchResults) {
        *self.search_results.lock().unwrap() = Some(results);
    }

    pub fn set_album_tracks(&self, refs: Vec<TrackRef>) {
        *self.album_tracks.lock().unwrap() = refs;
    }

    pub fn set_playlist_items(&self, tracks: Vec<Track>) {
        *self.playlist_items.lock().unwrap() = tracks;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn plays(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, Call::Play { .. }))
            .collect()
    }

    pub fn played_uris(&self) -> Vec<String> {
        self.plays()
            .into_iter()
            .filter_map(|c| match c {
                Call::Play { uris, .. } => uris.first().cloned(),
                _ => None,
            })
            .collect()
    }

    pub fn pauses(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::Pause(_)))
            .count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    async fn run_step(script: &Mutex<VecDeque<Step>>) -> Result<(), PlayerError> {
        let step = script.lock().unwrap().pop_front();
        match step {
            Some(step) => {
                if !step.delay.is_zero() {
                    tokio::time::sleep(step.delay).await;
                }
                step.result
            }
            None => Ok(()),
        }
    }
}

#[async_trait]
impl RemoteService for MockRemote {
    async fn search(&self, query: &str, kind: SearchKind, limit: u32) -> Result<SearchResults, PlayerError> {
        self.record(Call::Search(query.to_string(), kind, limit));
        let results = self.search_results.lock().unwrap().clone();
        Ok(results.unwrap_or(SearchResults::Tracks(Vec::new())))
    }

    async fn list_devices(&self) -> Result<Vec<DeviceInfo>, PlayerError> {
        self.record(Call::ListDevices);
        Ok(self.devices.lock().unwrap().clone())
    }

    async fn play(&self, device_id: Option<&str>, uris: &[String], position_ms: Option<u32>) -> Result<(), PlayerError> {
        self.record(Call::Play {
            device_id: device_id.map(str::to_string),
            uris: uris.to_vec(),
            position_ms,
        });
        Self::run_step(&self.play_script).await
    }

    async fn pause(&self, device_id: Option<&str>) -> Result<(), PlayerError> {
        self.record(Call::Pause(device_id.map(str::to_string)));
        Self::run_step(&self.pause_script).await
    }

    async fn seek(&self, position_ms: u32) -> Result<(), PlayerError> {
        self.record(Call::Seek(position_ms));
        Self::run_step(&self.seek_script).await
    }

    async fn get_track(&self, id: &str) -> Result<Track, PlayerError> {
        self.record(Call::GetTrack(id.to_string()));
        if let Some(error) = self.failing_tracks.lock().unwrap().get(id).cloned() {
            return Err(error);
        }
        Ok(self
            .tracks
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .unwrap_or_else(|| track(id, 180_000)))
    }

    async fn get_album_tracks(&self, id: &str) -> Result<Vec<TrackRef>, PlayerError> {
        self.record(Call::AlbumTracks(id.to_string()));
        Ok(self.album_tracks.lock().unwrap().clone())
    }

    async fn get_playlist_items(&self, id: &str) -> Result<Vec<Track>, PlayerError> {
        self.record(Call::PlaylistItems(id.to_string()));
        Ok(self.playlist_items.lock().unwrap().clone())
    }

    async fn user_profile(&self, user_id: &str) -> Result<UserProfile, PlayerError> {
        self.record(Call::Profile(user_id.to_string()));
        Ok(UserProfile {
            id: user_id.to_string(),
            display_name: user_id.to_uppercase(),
            uri: format!("spotify:user:{}", user_id),
            endpoint: format!("https://api.spotify.com/v1/users/{}", user_id),
            followers: 42,
        })
    }
}

pub fn device(id: &str, is_active: bool) -> DeviceInfo {
    DeviceInfo {
        id: id.to_string(),
        name: id.to_string(),
        is_active,
    }
}

pub fn track(id: &str, duration_ms: u32) -> Track {
    Track {
        id: id.to_string(),
        name: format!("Track {}", id),
        artists: vec!["Artist".to_string()],
        album: "Album".to_string(),
        release_date: "2020-01-01".to_string(),
        duration_ms,
    }
}

pub fn track_ref(id: &str) -> TrackRef {
    TrackRef {
        id: id.to_string(),
        name: format!("Track {}", id),
        duration_ms: 180_000,
    }
}

pub fn uri(id: &str) -> String {
    format!("spotify:track:{}", id)
}

/// Options with a tick period long enough that no tick fires during a test.
pub fn quiet_options(keep_playing: bool) -> PlayerOptions {
    PlayerOptions {
        keep_playing,
        return_to_menu: false,
        tick_period: Duration::from_secs(3600),
    }
}

pub fn controller(
    remote: &Arc<MockRemote>,
    queue: Queue,
    options: PlayerOptions,
) -> (PlayerController, UnboundedReceiver<ControllerEvent>) {
    let first = match queue.current().expect("queue has a current item") {
        spotty::model::ItemRef::Ready(track) => track,
        spotty::model::ItemRef::Pending(r) => track(&r.id, r.duration_ms),
    };
    let remote: Arc<dyn RemoteService> = remote.clone();
    PlayerController::new(remote, queue, first, options)
}

/// Applies events until none arrive for a short while.
pub async fn settle(controller: &mut PlayerController, rx: &mut UnboundedReceiver<ControllerEvent>) {
    while let Ok(Some(event)) = tokio::time::timeout(Duration::from_millis(100), rx.recv()).await {
        controller.handle_event(event);
    }
}

/// Applies events until `done` holds or `limit` passes; returns whether it held.
pub async fn pump_until<F>(
    controller: &mut PlayerController,
    rx: &mut UnboundedReceiver<ControllerEvent>,
    limit: Duration,
    done: F,
) -> bool
where
    F: Fn(&PlayerController) -> bool,
{
    let deadline = tokio::time::Instant::now() + limit;
    while !done(controller) {
        match tokio::time::timeout_at(deadline, rx.recv()).await {
            Ok(Some(event)) => controller.handle_event(event),
            _ => return done(controller),
        }
    }
    true
}
