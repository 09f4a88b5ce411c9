//! Model module - Playback state and data types
//!
//! This module contains the data structures the player core works on.
//! It is organized into submodules by responsibility:
//!
//! - `types`: Core type definitions (tracks, devices, search results)
//! - `queue`: Play queue and its four sourcing modes
//! - `clock`: Local elapsed-time estimate for the current track
//! - `session`: Playback state owned by one controller
//! - `screens`: Menu and results screen state
//! - `spotify_client`: Remote service boundary and the Spotify implementation

mod types;
mod queue;
mod clock;
mod session;
mod screens;
mod spotify_client;

pub use types::{
    AlbumSummary, DeviceInfo, PlaylistSummary, SearchKind, SearchRequest, SearchResults, Track, TrackRef,
    UserProfile,
};

pub use queue::{ItemRef, Queue, QueueMode};

pub use clock::PlaybackClock;

pub use session::{PlaybackSession, PlayerState};

pub use screens::{MenuField, MenuState, ResultsState};

pub use spotify_client::{RemoteService, SpotifyClient};
