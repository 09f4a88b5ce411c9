//! Core type definitions for the application

use std::fmt;

/// A fully materialized track that can be sent to the player
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Track {
    pub id: String,
    pub name: String,
    pub artists: Vec<String>,
    pub album: String,
    pub release_date: String,
    pub duration_ms: u32,
}

impl Track {
    pub fn uri(&self) -> String {
        format!("spotify:track:{}", self.id)
    }

    pub fn artist_line(&self) -> String {
        self.artists.join(", ")
    }

    pub fn link(&self) -> String {
        format!("https://open.spotify.com/track/{}", self.id)
    }
}

/// Lightweight album entry; needs a track lookup before it can be played
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrackRef {
    pub id: String,
    pub name: String,
    pub duration_ms: u32,
}

/// Information about a Spotify playback device
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeviceInfo {
    pub id: String,
    pub name: String,
    pub is_active: bool,
}

/// Album row in search results
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AlbumSummary {
    pub id: String,
    pub name: String,
    pub artists: Vec<String>,
    pub release_date: String,
}

/// Playlist row in search results
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlaylistSummary {
    pub id: String,
    pub name: String,
    pub owner: String,
    pub total_tracks: u32,
}

/// Public profile of a Spotify user
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserProfile {
    pub id: String,
    pub display_name: String,
    pub uri: String,
    pub endpoint: String,
    pub followers: u32,
}

/// What a search looks for
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum SearchKind {
    #[default]
    Track,
    Album,
    Playlist,
}

impl SearchKind {
    pub const ALL: [SearchKind; 3] = [SearchKind::Track, SearchKind::Album, SearchKind::Playlist];

    pub fn as_str(self) -> &'static str {
        match self {
            SearchKind::Track => "track",
            SearchKind::Album => "album",
            SearchKind::Playlist => "playlist",
        }
    }

    pub fn plural(self) -> &'static str {
        match self {
            SearchKind::Track => "tracks",
            SearchKind::Album => "albums",
            SearchKind::Playlist => "playlists",
        }
    }

    pub fn next(self) -> Self {
        match self {
            SearchKind::Track => SearchKind::Album,
            SearchKind::Album => SearchKind::Playlist,
            SearchKind::Playlist => SearchKind::Track,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            SearchKind::Track => SearchKind::Playlist,
            SearchKind::Album => SearchKind::Track,
            SearchKind::Playlist => SearchKind::Album,
        }
    }
}

impl fmt::Display for SearchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated search, from the command line or the menu screen
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchRequest {
    pub kind: SearchKind,
    pub query: String,
    pub artist: Option<String>,
    pub limit: u32,
}

impl SearchRequest {
    pub const MAX_LIMIT: u32 = 50;
    pub const DEFAULT_LIMIT: u32 = 5;

    /// Query text sent to the search endpoint; an artist narrows track searches.
    pub fn query_text(&self) -> String {
        match self.artist.as_deref().map(str::trim).filter(|a| !a.is_empty()) {
            Some(artist) if self.kind == SearchKind::Track => format!("{} artist:{}", self.query, artist),
            _ => self.query.clone(),
        }
    }
}

/// Search results for a single search kind
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchResults {
    Tracks(Vec<Track>),
    Albums(Vec<AlbumSummary>),
    Playlists(Vec<PlaylistSummary>),
}

impl SearchResults {
    pub fn kind(&self) -> SearchKind {
        match self {
            SearchResults::Tracks(_) => SearchKind::Track,
            SearchResults::Albums(_) => SearchKind::Album,
            SearchResults::Playlists(_) => SearchKind::Playlist,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            SearchResults::Tracks(items) => items.len(),
            SearchResults::Albums(items) => items.len(),
            SearchResults::Playlists(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
