//! Counters collected over a sync run

use std::sync::atomic::{AtomicU64, Ordering};

/// Run metrics
#[derive(Debug, Default)]
pub struct SyncMetrics {
    pub resources_fetched: AtomicU64,
    pub bytes_fetched: AtomicU64,
    pub resources_missing: AtomicU64,
    pub locale_strings: AtomicU64,
    pub textures_fetched: AtomicU64,
}

impl SyncMetrics {
    pub fn record_fetched(&self, size: u64) {
        self.resources_fetched.fetch_add(1, Ordering::Relaxed);
        self.bytes_fetched.fetch_add(size, Ordering::Relaxed);
    }

    pub fn record_missing(&self) {
        self.resources_missing.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_locale_strings(&self, count: usize) {
        self.locale_strings.fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn record_textures(&self, count: usize) {
        self.textures_fetched.fetch_add(count as u64, Ordering::Relaxed);
    }

    /// Get metrics snapshot
    pub fn snapshot(&self) -> SyncMetricsSnapshot {
        SyncMetricsSnapshot {
            resources_fetched: self.resources_fetched.load(Ordering::Relaxed),
            bytes_fetched: self.bytes_fetched.load(Ordering::Relaxed),
            resources_missing: self.resources_missing.load(Ordering::Relaxed),
            locale_strings: self.locale_strings.load(Ordering::Relaxed),
            textures_fetched: self.textures_fetched.load(Ordering::Relaxed),
        }
    }
}

/// Immutable snapshot of metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SyncMetricsSnapshot {
    pub resources_fetched: u64,
    pub bytes_fetched: u64,
    pub resources_missing: u64,
    pub locale_strings: u64,
    pub textures_fetched: u64,
}

impl std::fmt::Display for SyncMetricsSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} resources ({} bytes), {} textures, {} locale strings",
            self.resources_fetched, self.bytes_fetched, self.textures_fetched, self.locale_strings
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_reflects_recorded_counts() {
        let metrics = SyncMetrics::default();
        metrics.record_fetched(10);
        metrics.record_fetched(5);
        metrics.record_missing();
        metrics.record_textures(3);
        metrics.record_locale_strings(2);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.resources_fetched, 2);
        assert_eq!(snapshot.bytes_fetched, 15);
        assert_eq!(snapshot.resources_missing, 1);
        assert_eq!(
            snapshot.to_string(),
            "2 resources (15 bytes), 3 textures, 2 locale strings"
        );
    }
}
