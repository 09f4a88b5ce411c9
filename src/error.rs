//! Error types shared by the playback core and the command-line layer

use thiserror::Error;

/// Failures a playback command can report back to the status line.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlayerError {
    /// The account has no device that can receive playback commands
    #[error("No active Spotify devices found. Please open Spotify on any device first.")]
    NoActiveDevice,

    /// Network error, rate limit or server-side failure; the user may retry
    #[error("Error {operation}: {message}")]
    Remote { operation: String, message: String },

    /// An album track reference could not be turned into a playable track
    #[error("Error getting track {id}: {message}")]
    Resolution { id: String, message: String },

    /// Queue cursor points outside the queue
    #[error("Queue cursor {index} out of range for {len} tracks")]
    InvalidCursor { index: usize, len: usize },

    #[error("Timed out waiting for Spotify to respond")]
    Timeout,
}

impl PlayerError {
    pub fn remote(operation: &str, message: impl ToString) -> Self {
        Self::Remote {
            operation: operation.to_string(),
            message: message.to_string(),
        }
    }

    /// Whether re-issuing the same command might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Remote { .. } | Self::Resolution { .. } | Self::Timeout)
    }

    /// Tags a bare remote failure with the operation that produced it.
    pub fn during(self, operation: &str) -> Self {
        match self {
            Self::Remote { message, .. } => Self::Remote {
                operation: operation.to_string(),
                message,
            },
            other => other,
        }
    }
}

impl From<rspotify::ClientError> for PlayerError {
    fn from(err: rspotify::ClientError) -> Self {
        Self::remote("calling Spotify", err)
    }
}

impl From<rspotify::model::IdError> for PlayerError {
    fn from(err: rspotify::model::IdError) -> Self {
        Self::remote("parsing Spotify id", format!("{:?}", err))
    }
}

/// Invalid command-line input; reported with usage and exit code 1.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid search type '{0}'. Must be one of: track, album, playlist")]
    InvalidSearchType(String),

    #[error("missing search query")]
    MissingQuery,

    #[error("limit must be a number between 1 and 50 (got {0})")]
    InvalidLimit(u32),

    #[error("missing {0} environment variable")]
    MissingCredential(&'static str),
}
