use std::sync::atomic::{AtomicU64, Ordering};

/// Hit/miss counters for one memoized function.
///
/// Counters are atomics with `Relaxed` ordering, so a single `CacheStats` can be
/// shared through an `Arc` by every memoizer registered under the same name
/// (for example one thread-local memoizer per thread).
///
/// * a **hit** is a lookup that found a stored value
/// * a **miss** is a lookup that did not
/// * a **failure** is a miss whose computation returned an error, and was
///   therefore not stored
///
/// # Examples
///
/// ```
/// use memoprint_core::CacheStats;
///
/// let stats = CacheStats::new();
/// stats.record_miss();
/// stats.record_hit();
/// stats.record_hit();
///
/// assert_eq!(stats.lookups(), 3);
/// assert!((stats.hit_rate() - 0.6666).abs() < 0.001);
/// ```
#[derive(Debug, Default)]
pub struct CacheStats {
    hits: AtomicU64,
    misses: AtomicU64,
    failures: AtomicU64,
}

impl CacheStats {
    /// Creates zeroed counters.
    ///
    /// # Examples
    ///
    /// ```
    /// use memoprint_core::CacheStats;
    ///
    /// let stats = CacheStats::new();
    /// stats.record_miss();
    /// stats.record_hit();
    /// stats.record_hit();
    ///
    /// assert_eq!(stats.lookups(), 3);
    /// assert!((stats.hit_rate() - 2.0 / 3.0).abs() < 1e-9);
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    /// Computations that failed and were therefore not cached.
    #[inline]
    pub fn failures(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }

    /// Total number of lookups (hits + misses).
    #[inline]
    pub fn lookups(&self) -> u64 {
        self.hits() + self.misses()
    }

    /// Fraction of lookups served from the store, `0.0` when nothing was looked up.
    pub fn hit_rate(&self) -> f64 {
        let total = self.lookups();
        if total == 0 {
            0.0
        } else {
            self.hits() as f64 / total as f64
        }
    }

    /// Fraction of lookups that had to compute, `0.0` when nothing was looked up.
    pub fn miss_rate(&self) -> f64 {
        let total = self.lookups();
        if total == 0 {
            0.0
        } else {
            self.misses() as f64 / total as f64
        }
    }

    /// Zeroes all counters.
    pub fn reset(&self) {
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        self.failures.store(0, Ordering::Relaxed);
    }
}

impl Clone for CacheStats {
    /// Takes a point-in-time copy; the clone counts independently afterwards.
    fn clone(&self) -> Self {
        Self {
            hits: AtomicU64::new(self.hits()),
            misses: AtomicU64::new(self.misses()),
            failures: AtomicU64::new(self.failures()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_new_stats_are_zero() {
        let stats = CacheStats::new();
        assert_eq!(stats.hits(), 0);
        assert_eq!(stats.misses(), 0);
        assert_eq!(stats.failures(), 0);
        assert_eq!(stats.lookups(), 0);
    }

    #[test]
    fn test_rates_without_lookups() {
        let stats = CacheStats::new();
        assert_eq!(stats.hit_rate(), 0.0);
        assert_eq!(stats.miss_rate(), 0.0);
    }

    #[test]
    fn test_rates() {
        let stats = CacheStats::new();
        stats.record_hit();
        stats.record_miss();
        stats.record_miss();
        stats.record_miss();
        assert!((stats.hit_rate() - 0.25).abs() < f64::EPSILON);
        assert!((stats.miss_rate() - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn test_failures_are_not_lookups() {
        let stats = CacheStats::new();
        stats.record_miss();
        stats.record_failure();
        assert_eq!(stats.lookups(), 1);
        assert_eq!(stats.failures(), 1);
    }

    #[test]
    fn test_reset() {
        let stats = CacheStats::new();
        stats.record_hit();
        stats.record_miss();
        stats.record_failure();

        stats.reset();
        assert_eq!(stats.lookups(), 0);
        assert_eq!(stats.failures(), 0);
    }

    #[test]
    fn test_clone_is_independent() {
        let stats = CacheStats::new();
        stats.record_hit();

        let snapshot = stats.clone();
        stats.record_hit();

        assert_eq!(stats.hits(), 2);
        assert_eq!(snapshot.hits(), 1);
    }

    #[test]
    fn test_concurrent_recording() {
        let stats = Arc::new(CacheStats::new());
        let handles: Vec<_> = (0..10)
            .map(|_| {
                let stats = Arc::clone(&stats);
                thread::spawn(move || {
                    for _ in 0..100 {
                        stats.record_hit();
                    }
                    for _ in 0..50 {
                        stats.record_miss();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(stats.hits(), 1000);
        assert_eq!(stats.misses(), 500);
        assert_eq!(stats.lookups(), 1500);
    }
}
