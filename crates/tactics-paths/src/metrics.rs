//! Per-calculator performance counters.
//!
//! Each calculator owns its own [`PerformanceMonitor`]; there is no
//! process-wide registry. The monitor is purely observational and never
//! alters search outcomes.

use std::time::Duration;

/// Node-expansion count above which a path query counts as "complex".
pub const COMPLEX_PATH_THRESHOLD: usize = 100;

/// Running counters for one calculator instance.
#[derive(Debug, Clone, Default)]
pub struct PerformanceMonitor {
    invocations: u64,
    cache_hits: u64,
    cache_misses: u64,
    total_time: Duration,
    max_time: Duration,
    nodes_explored: u64,
    max_nodes_explored: u64,
    complex_queries: u64,
    cap_terminations: u64,
}

/// Read-only view of the counters, with derived averages.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MetricsSnapshot {
    pub invocations: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub total_time: Duration,
    pub avg_time: Duration,
    pub max_time: Duration,
    pub nodes_explored: u64,
    pub avg_nodes_explored: f64,
    pub max_nodes_explored: u64,
    /// Queries that expanded more than [`COMPLEX_PATH_THRESHOLD`] nodes.
    pub complex_queries: u64,
    /// Searches cut off by the node-exploration cap.
    pub cap_terminations: u64,
}

impl PerformanceMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a query answered from the cache.
    pub fn record_cache_hit(&mut self, elapsed: Duration) {
        self.invocations += 1;
        self.cache_hits += 1;
        self.record_time(elapsed);
    }

    /// Record a full search: a cache miss that expanded `nodes` nodes.
    pub fn record_search(&mut self, elapsed: Duration, nodes: usize) {
        self.invocations += 1;
        self.cache_misses += 1;
        self.record_time(elapsed);
        self.nodes_explored += nodes as u64;
        self.max_nodes_explored = self.max_nodes_explored.max(nodes as u64);
        if nodes > COMPLEX_PATH_THRESHOLD {
            self.complex_queries += 1;
        }
    }

    /// Record a search cut short by the node-exploration cap. The query
    /// itself is still recorded through [`record_search`].
    ///
    /// [`record_search`]: PerformanceMonitor::record_search
    pub fn record_cap_termination(&mut self) {
        self.cap_terminations += 1;
    }

    /// Zero every counter.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Current counter values.
    pub fn snapshot(&self) -> MetricsSnapshot {
        let searches = self.cache_misses.max(1);
        MetricsSnapshot {
            invocations: self.invocations,
            cache_hits: self.cache_hits,
            cache_misses: self.cache_misses,
            total_time: self.total_time,
            avg_time: self.total_time / self.invocations.max(1) as u32,
            max_time: self.max_time,
            nodes_explored: self.nodes_explored,
            avg_nodes_explored: self.nodes_explored as f64 / searches as f64,
            max_nodes_explored: self.max_nodes_explored,
            complex_queries: self.complex_queries,
            cap_terminations: self.cap_terminations,
        }
    }

    fn record_time(&mut self, elapsed: Duration) {
        self.total_time += elapsed;
        self.max_time = self.max_time.max(elapsed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hits_and_misses_are_tracked_separately() {
        let mut mon = PerformanceMonitor::new();
        mon.record_search(Duration::from_millis(4), 20);
        mon.record_cache_hit(Duration::from_micros(10));
        mon.record_cache_hit(Duration::from_micros(10));

        let snap = mon.snapshot();
        assert_eq!(snap.invocations, 3);
        assert_eq!(snap.cache_hits, 2);
        assert_eq!(snap.cache_misses, 1);
        assert_eq!(snap.nodes_explored, 20);
        assert_eq!(snap.max_nodes_explored, 20);
    }

    #[test]
    fn complex_queries_counted_above_threshold() {
        let mut mon = PerformanceMonitor::new();
        mon.record_search(Duration::ZERO, COMPLEX_PATH_THRESHOLD);
        mon.record_search(Duration::ZERO, COMPLEX_PATH_THRESHOLD + 1);
        assert_eq!(mon.snapshot().complex_queries, 1);
    }

    #[test]
    fn reset_zeroes_everything() {
        let mut mon = PerformanceMonitor::new();
        mon.record_search(Duration::from_millis(1), 50);
        mon.record_cap_termination();
        mon.reset();
        let snap = mon.snapshot();
        assert_eq!(snap.invocations, 0);
        assert_eq!(snap.cap_terminations, 0);
        assert_eq!(snap.total_time, Duration::ZERO);
    }

    #[test]
    fn averages_do_not_divide_by_zero() {
        let snap = PerformanceMonitor::new().snapshot();
        assert_eq!(snap.avg_time, Duration::ZERO);
        assert_eq!(snap.avg_nodes_explored, 0.0);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn snapshot_round_trip() {
        let mut mon = PerformanceMonitor::new();
        mon.record_search(Duration::from_millis(2), 30);
        let snap = mon.snapshot();
        let json = serde_json::to_string(&snap).unwrap();
        let back: MetricsSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(snap, back);
    }
}
