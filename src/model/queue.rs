//! Play queue for one player session
//!
//! The queue is a cursor over one of four sources. Album sources only carry
//! track references, so moving the cursor there needs a track lookup before the
//! item can be played; the other sources carry full tracks.

use std::fmt;

use crate::error::PlayerError;
use super::spotify_client::RemoteService;
use super::types::{Track, TrackRef};

/// Where the queue's items came from
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QueueMode {
    Single,
    Playlist,
    Album,
    SearchResults,
}

impl fmt::Display for QueueMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            QueueMode::Single => "Track",
            QueueMode::Playlist => "Playlist",
            QueueMode::Album => "Album",
            QueueMode::SearchResults => "Search Results",
        })
    }
}

#[derive(Clone, Debug)]
enum QueueSource {
    Single(Track),
    Playlist(Vec<Track>),
    Album(Vec<TrackRef>),
    SearchResults(Vec<Track>),
}

/// An item the cursor landed on
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ItemRef {
    /// Already playable
    Ready(Track),
    /// Needs a remote lookup first
    Pending(TrackRef),
}

impl ItemRef {
    pub fn id(&self) -> &str {
        match self {
            ItemRef::Ready(track) => &track.id,
            ItemRef::Pending(track_ref) => &track_ref.id,
        }
    }

    /// Turns the reference into a playable track, looking it up remotely when needed.
    pub async fn resolve<R>(self, remote: &R) -> Result<Track, PlayerError>
    where
        R: RemoteService + ?Sized,
    {
        match self {
            ItemRef::Ready(track) => Ok(track),
            ItemRef::Pending(track_ref) => {
                remote
                    .get_track(&track_ref.id)
                    .await
                    .map_err(|e| PlayerError::Resolution {
                        id: track_ref.id.clone(),
                        message: e.to_string(),
                    })
            }
        }
    }
}

/// Ordered items plus a cursor. The mode is fixed at construction.
#[derive(Clone, Debug)]
pub struct Queue {
    source: QueueSource,
    cursor: usize,
}

impl Queue {
    pub fn single(track: Track) -> Self {
        Self {
            source: QueueSource::Single(track),
            cursor: 0,
        }
    }

    /// `None` when `tracks` is empty. The start index is clamped into range.
    pub fn playlist(tracks: Vec<Track>, start: usize) -> Option<Self> {
        Self::build(QueueSource::Playlist(tracks), start)
    }

    pub fn album(tracks: Vec<TrackRef>, start: usize) -> Option<Self> {
        Self::build(QueueSource::Album(tracks), start)
    }

    pub fn search_results(tracks: Vec<Track>, start: usize) -> Option<Self> {
        Self::build(QueueSource::SearchResults(tracks), start)
    }

    fn build(source: QueueSource, start: usize) -> Option<Self> {
        let mut queue = Self { source, cursor: 0 };
        if queue.is_empty() {
            return None;
        }
        queue.cursor = start.min(queue.len() - 1);
        Some(queue)
    }

    pub fn mode(&self) -> QueueMode {
        match self.source {
            QueueSource::Single(_) => QueueMode::Single,
            QueueSource::Playlist(_) => QueueMode::Playlist,
            QueueSource::Album(_) => QueueMode::Album,
            QueueSource::SearchResults(_) => QueueMode::SearchResults,
        }
    }

    pub fn len(&self) -> usize {
        match &self.source {
            QueueSource::Single(_) => 1,
            QueueSource::Playlist(tracks) | QueueSource::SearchResults(tracks) => tracks.len(),
            QueueSource::Album(refs) => refs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn item_at(&self, index: usize) -> Result<ItemRef, PlayerError> {
        let item = match &self.source {
            QueueSource::Single(track) if index == 0 => Some(ItemRef::Ready(track.clone())),
            QueueSource::Single(_) => None,
            QueueSource::Playlist(tracks) | QueueSource::SearchResults(tracks) => {
                tracks.get(index).cloned().map(ItemRef::Ready)
            }
            QueueSource::Album(refs) => refs.get(index).cloned().map(ItemRef::Pending),
        };
        item.ok_or(PlayerError::InvalidCursor {
            index,
            len: self.len(),
        })
    }

    pub fn current(&self) -> Result<ItemRef, PlayerError> {
        self.item_at(self.cursor)
    }

    /// Index `advance` would move to, without moving.
    pub fn peek_advance(&self, wrap: bool) -> Option<usize> {
        self.peek_advance_from(self.cursor, wrap)
    }

    /// Index `retreat` would move to, without moving.
    pub fn peek_retreat(&self, wrap: bool) -> Option<usize> {
        self.peek_retreat_from(self.cursor, wrap)
    }

    /// Like `peek_advance`, stepping from `index` instead of the cursor.
    pub fn peek_advance_from(&self, index: usize, wrap: bool) -> Option<usize> {
        if index + 1 < self.len() {
            Some(index + 1)
        } else if wrap && !self.is_empty() {
            Some(0)
        } else {
            None
        }
    }

    pub fn peek_retreat_from(&self, index: usize, wrap: bool) -> Option<usize> {
        if index > 0 && index <= self.len() {
            Some(index - 1)
        } else if wrap && !self.is_empty() {
            Some(self.len() - 1)
        } else {
            None
        }
    }

    /// Moves the cursor to `index`. Used once the item there is known to be playable.
    pub fn commit(&mut self, index: usize) -> Result<(), PlayerError> {
        if index >= self.len() {
            return Err(PlayerError::InvalidCursor {
                index,
                len: self.len(),
            });
        }
        self.cursor = index;
        Ok(())
    }

    /// Steps forward, looping to the first item only when `wrap` is set.
    /// At the end without `wrap` nothing changes.
    pub fn advance(&mut self, wrap: bool) -> Option<ItemRef> {
        let index = self.peek_advance(wrap)?;
        self.cursor = index;
        self.current().ok()
    }

    /// Steps back, looping to the last item only when `wrap` is set.
    pub fn retreat(&mut self, wrap: bool) -> Option<ItemRef> {
        let index = self.peek_retreat(wrap)?;
        self.cursor = index;
        self.current().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(id: &str, duration_ms: u32) -> Track {
        Track {
            id: id.to_string(),
            name: id.to_uppercase(),
            artists: vec!["Artist".to_string()],
            album: "Album".to_string(),
            release_date: "2020".to_string(),
            duration_ms,
        }
    }

    fn two_track_playlist() -> Queue {
        Queue::playlist(vec![track("a", 180_000), track("b", 240_000)], 0).unwrap()
    }

    #[test]
    fn next_stops_at_end_without_wrap() {
        let mut queue = two_track_playlist();

        assert_eq!(queue.advance(false), Some(ItemRef::Ready(track("b", 240_000))));
        assert_eq!(queue.cursor(), 1);

        assert_eq!(queue.advance(false), None);
        assert_eq!(queue.cursor(), 1);
    }

    #[test]
    fn next_wraps_to_start_with_keep_playing() {
        let mut queue = two_track_playlist();

        queue.advance(true);
        assert_eq!(queue.cursor(), 1);

        assert_eq!(queue.advance(true), Some(ItemRef::Ready(track("a", 180_000))));
        assert_eq!(queue.cursor(), 0);
    }

    #[test]
    fn retreat_wraps_to_last_item() {
        let mut queue = two_track_playlist();

        assert_eq!(queue.retreat(false), None);
        assert_eq!(queue.cursor(), 0);

        assert_eq!(queue.retreat(true), Some(ItemRef::Ready(track("b", 240_000))));
        assert_eq!(queue.cursor(), 1);
    }

    #[test]
    fn album_items_are_pending_references() {
        let refs = vec![
            TrackRef { id: "x".into(), name: "X".into(), duration_ms: 1 },
            TrackRef { id: "y".into(), name: "Y".into(), duration_ms: 2 },
        ];
        let queue = Queue::album(refs, 5).unwrap();

        assert_eq!(queue.mode(), QueueMode::Album);
        assert_eq!(queue.cursor(), 1);
        assert!(matches!(queue.current(), Ok(ItemRef::Pending(r)) if r.id == "y"));
    }

    #[test]
    fn peek_does_not_move_cursor() {
        let queue = two_track_playlist();
        assert_eq!(queue.peek_advance(false), Some(1));
        assert_eq!(queue.peek_retreat(true), Some(1));
        assert_eq!(queue.cursor(), 0);
    }

    #[test]
    fn commit_rejects_out_of_range() {
        let mut queue = two_track_playlist();
        assert_eq!(
            queue.commit(2),
            Err(PlayerError::InvalidCursor { index: 2, len: 2 })
        );
        assert_eq!(queue.cursor(), 0);
    }

    #[test]
    fn single_track_only_loops_with_wrap() {
        let mut queue = Queue::single(track("a", 1_000));
        assert_eq!(queue.advance(false), None);
        assert_eq!(queue.advance(true), Some(ItemRef::Ready(track("a", 1_000))));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn empty_sources_are_rejected() {
        assert!(Queue::search_results(Vec::new(), 0).is_none());
        assert!(Queue::album(Vec::new(), 0).is_none());
    }

    #[test]
    fn peeks_from_an_arbitrary_index() {
        let queue = two_track_playlist();
        assert_eq!(queue.peek_advance_from(0, false), Some(1));
        assert_eq!(queue.peek_advance_from(1, false), None);
        assert_eq!(queue.peek_advance_from(1, true), Some(0));
        assert_eq!(queue.peek_retreat_from(1, false), Some(0));
        assert_eq!(queue.peek_retreat_from(0, true), Some(1));
        assert_eq!(queue.cursor(), 0);
    }
}
