mod common;

use common::{track, track_ref};
use proptest::prelude::*;
use spotty::model::{PlaybackClock, Queue};
use std::time::Duration;

fn playlist(len: usize, start: usize) -> Queue {
    let tracks = (0..len).map(|i| track(&format!("t{}", i), 1000)).collect();
    Queue::playlist(tracks, start).expect("non-empty")
}

proptest! {
    #[test]
    fn advance_stops_at_the_last_index(len in 1usize..40) {
        let mut queue = playlist(len, 0);
        for expected in 1..len {
            prop_assert!(queue.advance(false).is_some());
            prop_assert_eq!(queue.cursor(), expected);
        }
        prop_assert!(queue.advance(false).is_none());
        prop_assert_eq!(queue.cursor(), len - 1);
        prop_assert!(queue.advance(false).is_none());
        prop_assert_eq!(queue.cursor(), len - 1);
    }

    #[test]
    fn advance_with_wrap_is_cyclic(len in 1usize..40, start in 0usize..40) {
        let mut queue = playlist(len, start);
        let origin = queue.cursor();
        let first = queue.current().expect("in range");
        for _ in 0..len {
            prop_assert!(queue.advance(true).is_some());
        }
        prop_assert_eq!(queue.cursor(), origin);
        prop_assert_eq!(queue.current().expect("in range"), first);
    }

    #[test]
    fn retreat_mirrors_advance(len in 1usize..40, start in 0usize..40, wrap: bool) {
        let mut queue = playlist(len, start);
        let origin = queue.cursor();
        match queue.retreat(wrap) {
            Some(_) => {
                prop_assert!(origin > 0 || wrap);
                prop_assert!(queue.advance(true).is_some());
                prop_assert_eq!(queue.cursor(), origin);
            }
            None => {
                prop_assert!(origin == 0 && !wrap);
                prop_assert_eq!(queue.cursor(), 0);
            }
        }
    }

    #[test]
    fn peek_never_moves_the_cursor(len in 1usize..20, start in 0usize..20, wrap: bool) {
        let refs = (0..len).map(|i| track_ref(&format!("r{}", i))).collect();
        let queue = Queue::album(refs, start).expect("non-empty");
        let before = queue.cursor();
        let next = queue.peek_advance(wrap);
        let prev = queue.peek_retreat(wrap);
        prop_assert_eq!(queue.cursor(), before);
        if let Some(i) = next {
            prop_assert!(i < len);
        }
        if let Some(i) = prev {
            prop_assert!(i < len);
        }
    }

    #[test]
    fn cursor_stays_in_bounds(len in 1usize..20, steps in proptest::collection::vec(any::<(bool, bool)>(), 0..60)) {
        let mut queue = playlist(len, 0);
        for (forward, wrap) in steps {
            if forward {
                queue.advance(wrap);
            } else {
                queue.retreat(wrap);
            }
            prop_assert!(queue.cursor() < queue.len());
        }
        prop_assert!(queue.commit(len).is_err());
    }

    #[test]
    fn seek_target_stays_within_the_track(total_ms in 0u64..600_000, offset_ms in 0u64..600_000, delta in -700_000i64..700_000) {
        let mut clock = PlaybackClock::new(Duration::from_millis(total_ms));
        clock.start(Duration::from_millis(offset_ms.min(total_ms)));
        let target = clock.seek_target(delta);
        prop_assert!(target <= clock.total());
    }
}
