//! Analyzer statistics.
//!
//! Atomic counters shared by all threads using one analyzer, with a
//! point-in-time snapshot type for reporting. The matcher-engine counter is
//! also the observable hook tests use to prove that cached parses do not
//! re-run the engine.

use std::sync::atomic::{AtomicU64, Ordering};

/// Live counters for one analyzer. Thread-safe.
#[derive(Debug, Default)]
pub struct AnalyzerStats {
    /// Total number of parse calls.
    pub parses: AtomicU64,
    /// Parses served from the cache.
    pub cache_hits: AtomicU64,
    /// Parses that had to compute (cache miss or cache disabled).
    pub cache_misses: AtomicU64,
    /// Times the matcher engine ran. Stays flat while the cache serves hits.
    pub engine_runs: AtomicU64,
}

impl AnalyzerStats {
    pub(crate) fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Take a snapshot of the current counters.
    pub fn snapshot(&self) -> AnalyzerStatsSnapshot {
        AnalyzerStatsSnapshot {
            parses: self.parses.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.cache_misses.load(Ordering::Relaxed),
            engine_runs: self.engine_runs.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time view of [`AnalyzerStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnalyzerStatsSnapshot {
    /// Total number of parse calls.
    pub parses: u64,
    /// Parses served from the cache.
    pub cache_hits: u64,
    /// Parses that had to compute.
    pub cache_misses: u64,
    /// Times the matcher engine ran.
    pub engine_runs: u64,
}

impl AnalyzerStatsSnapshot {
    /// Cache hit rate in `0.0..=1.0`; zero when nothing was parsed yet.
    pub fn cache_hit_rate(&self) -> f64 {
        let total = self.cache_hits + self.cache_misses;
        if total == 0 {
            0.0
        } else {
            self.cache_hits as f64 / total as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_and_hit_rate() {
        let stats = AnalyzerStats::default();
        assert_eq!(stats.snapshot().cache_hit_rate(), 0.0);

        AnalyzerStats::bump(&stats.cache_hits);
        AnalyzerStats::bump(&stats.cache_hits);
        AnalyzerStats::bump(&stats.cache_misses);
        AnalyzerStats::bump(&stats.parses);

        let snap = stats.snapshot();
        assert_eq!(snap.cache_hits, 2);
        assert_eq!(snap.cache_misses, 1);
        assert!((snap.cache_hit_rate() - 2.0 / 3.0).abs() < 1e-9);
    }
}
