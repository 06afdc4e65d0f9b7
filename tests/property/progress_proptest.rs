//! Invariants of chapter normalization and completion percentage

use chrono::Utc;
use proptest::prelude::*;

use bookblinks::shared::engagement::{completed_at, normalize_chapters, percent_complete};

proptest! {
    #[test]
    fn normalized_chapters_are_sorted_unique_and_positive(
        chapters in prop::collection::vec(-20i64..200, 0..64)
    ) {
        let normalized = normalize_chapters(chapters.clone());

        prop_assert!(normalized.windows(2).all(|w| w[0] < w[1]));
        prop_assert!(normalized.iter().all(|n| *n >= 1));
        for n in chapters.iter().filter(|n| **n >= 1) {
            prop_assert!(normalized.contains(n));
        }
    }

    #[test]
    fn normalization_is_idempotent(chapters in prop::collection::vec(any::<i64>(), 0..64)) {
        let once = normalize_chapters(chapters);
        let twice = normalize_chapters(once.clone());
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn percent_stays_in_range(read in 0usize..500, total in -5i64..500) {
        let percent = percent_complete(read, total);
        prop_assert!((0.0..=100.0).contains(&percent));
        if total <= 0 {
            prop_assert_eq!(percent, 0.0);
        }
    }

    #[test]
    fn percent_reaches_hundred_only_when_all_read(total in 1i64..300, missing in 0i64..300) {
        let read = (total - missing).max(0) as usize;
        let percent = percent_complete(read, total);
        prop_assert_eq!(percent >= 100.0, missing == 0);
    }

    #[test]
    fn completion_time_set_only_when_complete(read in 0usize..50, total in 0i64..50) {
        let now = Utc::now();
        let percent = percent_complete(read, total);
        match completed_at(percent, now) {
            Some(at) => {
                prop_assert!(percent >= 100.0);
                prop_assert_eq!(at, now);
            }
            None => prop_assert!(percent < 100.0),
        }
    }
}
