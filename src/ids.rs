use chrono::Utc;
use std::sync::atomic::{AtomicI64, Ordering};

/// Hands out archive ids derived from the current time in milliseconds.
/// Ids are strictly increasing within a process, so two archives submitted
/// in the same millisecond still get different ids.
#[derive(Debug, Default)]
pub struct ArchiveIds {
    last: AtomicI64,
}

impl ArchiveIds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&self) -> String {
        let now = Utc::now().timestamp_millis();
        let previous = self
            .last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last + 1))
            })
            .unwrap_or(now);
        now.max(previous + 1).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequential_ids_are_distinct_and_increasing() {
        let ids = ArchiveIds::new();
        let first: i64 = ids.next().parse().expect("numeric id");
        let second: i64 = ids.next().parse().expect("numeric id");
        let third: i64 = ids.next().parse().expect("numeric id");
        assert!(first < second && second < third);
    }

    #[test]
    fn ids_track_wall_clock_milliseconds() {
        let before = Utc::now().timestamp_millis();
        let id: i64 = ArchiveIds::new().next().parse().expect("numeric id");
        let after = Utc::now().timestamp_millis();
        assert!(id >= before && id <= after);
    }
}
