//! Spotify Web API boundary and its rspotify-backed implementation

use std::sync::Arc;

use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt};
use rspotify::{
    model::{AlbumId, PlayableId, PlayableItem, PlaylistId, SearchResult, SearchType, TrackId, UserId},
    prelude::*,
    AuthCodeSpotify,
};

use crate::error::PlayerError;
use crate::{log_api_request, log_api_result};
use super::types::{
    AlbumSummary, DeviceInfo, PlaylistSummary, SearchKind, SearchResults, Track, TrackRef, UserProfile,
};

/// Everything the player needs from the streaming service.
///
/// Implementations hold no per-call state, so one handle can be shared by every
/// controller the app spawns.
#[async_trait]
pub trait RemoteService: Send + Sync {
    async fn search(&self, query: &str, kind: SearchKind, limit: u32) -> Result<SearchResults, PlayerError>;
    async fn list_devices(&self) -> Result<Vec<DeviceInfo>, PlayerError>;
    async fn play(&self, device_id: Option<&str>, uris: &[String], position_ms: Option<u32>) -> Result<(), PlayerError>;
    async fn pause(&self, device_id: Option<&str>) -> Result<(), PlayerError>;
    async fn seek(&self, position_ms: u32) -> Result<(), PlayerError>;
    async fn get_track(&self, id: &str) -> Result<Track, PlayerError>;
    async fn get_album_tracks(&self, id: &str) -> Result<Vec<TrackRef>, PlayerError>;
    async fn get_playlist_items(&self, id: &str) -> Result<Vec<Track>, PlayerError>;
    async fn user_profile(&self, user_id: &str) -> Result<UserProfile, PlayerError>;
}

/// Spotify API client
#[derive(Clone)]
pub struct SpotifyClient {
    client: Arc<AuthCodeSpotify>,
}

impl SpotifyClient {
    pub const PLAYLIST_PAGE_SIZE: usize = 100;

    pub fn new(client: AuthCodeSpotify) -> Self {
        Self {
            client: Arc::new(client),
        }
    }

    fn track_from_full(track: rspotify::model::FullTrack) -> Option<Track> {
        let id = track.id.as_ref()?.id().to_string();
        Some(Track {
            id,
            name: track.name,
            artists: track.artists.into_iter().map(|a| a.name).collect(),
            album: track.album.name,
            release_date: track.album.release_date.unwrap_or_default(),
            duration_ms: track.duration.num_milliseconds().max(0) as u32,
        })
    }
}

#[async_trait]
impl RemoteService for SpotifyClient {
    async fn search(&self, query: &str, kind: SearchKind, limit: u32) -> Result<SearchResults, PlayerError> {
        log_api_request!("search", query, kind = %kind, limit);
        let search_type = match kind {
            SearchKind::Track => SearchType::Track,
            SearchKind::Album => SearchType::Album,
            SearchKind::Playlist => SearchType::Playlist,
        };

        let result = self
            .client
            .search(query, search_type, None, None, Some(limit), None)
            .await;
        log_api_result!("search", result);

        let results = match result.map_err(|e| PlayerError::from(e).during(&format!("searching for {}", kind.plural())))? {
            SearchResult::Tracks(page) => {
                SearchResults::Tracks(page.items.into_iter().filter_map(Self::track_from_full).collect())
            }
            SearchResult::Albums(page) => SearchResults::Albums(
                page.items
                    .into_iter()
                    .filter_map(|album| {
                        Some(AlbumSummary {
                            id: album.id.as_ref()?.id().to_string(),
                            name: album.name,
                            artists: album.artists.into_iter().map(|a| a.name).collect(),
                            release_date: album.release_date.unwrap_or_default(),
                        })
                    })
                    .collect(),
            ),
            SearchResult::Playlists(page) => SearchResults::Playlists(
                page.items
                    .into_iter()
                    .map(|playlist| PlaylistSummary {
                        id: playlist.id.id().to_string(),
                        name: playlist.name,
                        owner: playlist
                            .owner
                            .display_name
                            .unwrap_or_else(|| playlist.owner.id.id().to_string()),
                        total_tracks: playlist.tracks.total,
                    })
                    .collect(),
            ),
            _ => SearchResults::Tracks(Vec::new()),
        };

        tracing::debug!(count = results.len(), kind = %kind, "Search finished");
        Ok(results)
    }

    async fn list_devices(&self) -> Result<Vec<DeviceInfo>, PlayerError> {
        log_api_request!("list_devices");
        let result = self.client.device().await;
        log_api_result!("list_devices", result);

        let devices: Vec<DeviceInfo> = result
            .map_err(|e| PlayerError::from(e).during("getting devices"))?
            .into_iter()
            .map(|d| DeviceInfo {
                id: d.id.unwrap_or_default(),
                name: d.name,
                is_active: d.is_active,
            })
            .collect();
        tracing::debug!(count = devices.len(), "Found devices");
        Ok(devices)
    }

    async fn play(&self, device_id: Option<&str>, uris: &[String], position_ms: Option<u32>) -> Result<(), PlayerError> {
        log_api_request!("play", device_id = ?device_id, uris = ?uris, position_ms = ?position_ms);

        let ids = uris
            .iter()
            .map(|uri| {
                let id = uri.rsplit(':').next().unwrap_or(uri);
                TrackId::from_id(id).map(|id| PlayableId::Track(id.into_static()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let position = position_ms.map(|ms| chrono::Duration::milliseconds(ms as i64));

        let result = self
            .client
            .start_uris_playback(ids, device_id, None, position)
            .await;
        log_api_result!("play", result);
        result.map_err(|e| PlayerError::from(e).during("starting playback"))
    }

    async fn pause(&self, device_id: Option<&str>) -> Result<(), PlayerError> {
        log_api_request!("pause", device_id = ?device_id);
        let result = self.client.pause_playback(device_id).await;
        log_api_result!("pause", result);
        result.map_err(|e| PlayerError::from(e).during("pausing playback"))
    }

    async fn seek(&self, position_ms: u32) -> Result<(), PlayerError> {
        log_api_request!("seek", position_ms);
        let result = self
            .client
            .seek_track(chrono::Duration::milliseconds(position_ms as i64), None)
            .await;
        log_api_result!("seek", result);
        result.map_err(|e| PlayerError::from(e).during("seeking"))
    }

    async fn get_track(&self, id: &str) -> Result<Track, PlayerError> {
        log_api_request!("get_track", id);
        let track_id = TrackId::from_id(id)?;
        let result = self.client.track(track_id, None).await;
        log_api_result!("get_track", result);

        let track = result.map_err(|e| PlayerError::from(e).during("getting track"))?;
        Self::track_from_full(track).ok_or_else(|| PlayerError::Resolution {
            id: id.to_string(),
            message: "track is not playable".to_string(),
        })
    }

    async fn get_album_tracks(&self, id: &str) -> Result<Vec<TrackRef>, PlayerError> {
        log_api_request!("get_album_tracks", id);
        let album_id = AlbumId::from_id(id)?;
        let result = self.client.album(album_id, None).await;
        log_api_result!("get_album_tracks", result);

        // Album tracks are included in the full album response
        let album = result.map_err(|e| PlayerError::from(e).during("getting album tracks"))?;
        Ok(album
            .tracks
            .items
            .into_iter()
            .filter_map(|track| {
                Some(TrackRef {
                    id: track.id.as_ref()?.id().to_string(),
                    name: track.name,
                    duration_ms: track.duration.num_milliseconds().max(0) as u32,
                })
            })
            .collect())
    }

    async fn get_playlist_items(&self, id: &str) -> Result<Vec<Track>, PlayerError> {
        log_api_request!("get_playlist_items", id);
        let playlist_id = PlaylistId::from_id(id)?;

        let result: Result<Vec<_>, _> = self
            .client
            .playlist_items(playlist_id, None, None)
            .take(Self::PLAYLIST_PAGE_SIZE)
            .try_collect()
            .await;
        log_api_result!("get_playlist_items", result);

        let items = result.map_err(|e| PlayerError::from(e).during("getting playlist tracks"))?;
        let tracks: Vec<Track> = items
            .into_iter()
            .filter_map(|item| match item.track {
                Some(PlayableItem::Track(track)) => Self::track_from_full(track),
                _ => None,
            })
            .collect();
        tracing::debug!(playlist_id = id, count = tracks.len(), "Loaded playlist tracks");
        Ok(tracks)
    }

    async fn user_profile(&self, user_id: &str) -> Result<UserProfile, PlayerError> {
        log_api_request!("user_profile", user_id);
        let id = UserId::from_id(user_id)?;
        let result = self.client.user(id).await;
        log_api_result!("user_profile", result);

        let user = result.map_err(|e| PlayerError::from(e).during("looking up user"))?;
        let id = user.id.id().to_string();
        Ok(UserProfile {
            uri: format!("spotify:user:{}", id),
            display_name: user.display_name.unwrap_or_default(),
            endpoint: user.href,
            followers: user.followers.map(|f| f.total).unwrap_or(0),
            id,
        })
    }
}
