use std::sync::atomic::{AtomicU64, Ordering};

/// Atomic counters updated on every cache operation.
///
/// Kept outside the state lock so recording never extends a critical section.
pub struct StatsCounter {
    reads: AtomicU64,
    writes: AtomicU64,
    user_removals: AtomicU64,
}

impl StatsCounter {
    pub fn new() -> Self {
        StatsCounter {
            reads: AtomicU64::new(0),
            writes: AtomicU64::new(0),
            user_removals: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn record_read(&self) {
        self.reads.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_write(&self) {
        self.writes.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_user_removal(&self) {
        self.user_removals.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns a point-in-time snapshot of the counters.
    pub fn snapshot(&self) -> Metrics {
        Metrics {
            reads: self.reads.load(Ordering::Relaxed),
            writes: self.writes.load(Ordering::Relaxed),
            user_removals: self.user_removals.load(Ordering::Relaxed),
        }
    }
}

impl Default for StatsCounter {
    fn default() -> Self {
        Self::new()
    }
}

/// A point-in-time snapshot of cache statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Metrics {
    /// Getter calls, including `is_screen_capture_allowed` and snapshots.
    pub reads: u64,
    /// Setter calls.
    pub writes: u64,
    /// `on_user_removed` calls, whether or not the user had entries.
    pub user_removals: u64,
}

impl Metrics {
    pub fn operation_count(&self) -> u64 {
        self.reads + self.writes + self.user_removals
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_are_independent() {
        let stats = StatsCounter::new();
        stats.record_read();
        stats.record_read();
        stats.record_write();
        stats.record_user_removal();

        let m = stats.snapshot();
        assert_eq!(m.reads, 2);
        assert_eq!(m.writes, 1);
        assert_eq!(m.user_removals, 1);
        assert_eq!(m.operation_count(), 4);
    }
}
