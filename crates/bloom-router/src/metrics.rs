//! Metrics hooks for shard dispatch
//!
//! Counts per-shard calls, routed keys and failures so callers can see how
//! load spreads across shards and how often shards misbehave.
//!
//! ## Usage
//!
//! ```ignore
//! use bloom_router::metrics::RouterMetrics;
//! use std::sync::Arc;
//!
//! let metrics = Arc::new(RouterMetrics::new());
//! let router = BloomRouter::with_client_and_metrics(client, config, metrics.clone()).await?;
//!
//! router.add(&keys).await?;
//! println!("{:?}", metrics.snapshot());
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Metrics collector for router operations
#[derive(Default)]
pub struct RouterMetrics {
    /// Filters created (or found existing) during provisioning
    pub shards_provisioned: AtomicU64,
    /// Successful per-shard bulk-add calls
    pub add_calls: AtomicU64,
    /// Successful per-shard multi-check calls
    pub check_calls: AtomicU64,
    /// Keys written across all shards
    pub keys_added: AtomicU64,
    /// Keys checked across all shards
    pub keys_checked: AtomicU64,
    /// Failed per-shard calls, timeouts included
    pub shard_failures: AtomicU64,
    /// Per-shard calls that hit the timeout
    pub timeouts: AtomicU64,
    /// Cumulative time spent in successful shard calls
    pub call_time_ns: AtomicU64,
}

impl RouterMetrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one provisioned shard
    pub fn record_provisioned(&self) {
        self.shards_provisioned.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a successful bulk-add on one shard
    pub fn record_add(&self, keys: usize, duration: Duration) {
        self.add_calls.fetch_add(1, Ordering::Relaxed);
        self.keys_added.fetch_add(keys as u64, Ordering::Relaxed);
        self.call_time_ns
            .fetch_add(duration.as_nanos() as u64, Ordering::Relaxed);
    }

    /// Record a successful multi-check on one shard
    pub fn record_check(&self, keys: usize, duration: Duration) {
        self.check_calls.fetch_add(1, Ordering::Relaxed);
        self.keys_checked.fetch_add(keys as u64, Ordering::Relaxed);
        self.call_time_ns
            .fetch_add(duration.as_nanos() as u64, Ordering::Relaxed);
    }

    /// Record a failed shard call
    pub fn record_failure(&self, timed_out: bool) {
        self.shard_failures.fetch_add(1, Ordering::Relaxed);
        if timed_out {
            self.timeouts.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            shards_provisioned: self.shards_provisioned.load(Ordering::Relaxed),
            add_calls: self.add_calls.load(Ordering::Relaxed),
            check_calls: self.check_calls.load(Ordering::Relaxed),
            keys_added: self.keys_added.load(Ordering::Relaxed),
            keys_checked: self.keys_checked.load(Ordering::Relaxed),
            shard_failures: self.shard_failures.load(Ordering::Relaxed),
            timeouts: self.timeouts.load(Ordering::Relaxed),
            avg_call_ns: self.avg_call_time_ns(),
        }
    }

    /// Average duration of a successful shard call in nanoseconds
    pub fn avg_call_time_ns(&self) -> u64 {
        let total = self.call_time_ns.load(Ordering::Relaxed);
        let count =
            self.add_calls.load(Ordering::Relaxed) + self.check_calls.load(Ordering::Relaxed);
        if count > 0 {
            total / count
        } else {
            0
        }
    }

    /// Reset all counters
    pub fn reset(&self) {
        self.shards_provisioned.store(0, Ordering::Relaxed);
        self.add_calls.store(0, Ordering::Relaxed);
        self.check_calls.store(0, Ordering::Relaxed);
        self.keys_added.store(0, Ordering::Relaxed);
        self.keys_checked.store(0, Ordering::Relaxed);
        self.shard_failures.store(0, Ordering::Relaxed);
        self.timeouts.store(0, Ordering::Relaxed);
        self.call_time_ns.store(0, Ordering::Relaxed);
    }
}

/// Point-in-time metrics snapshot
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub shards_provisioned: u64,
    pub add_calls: u64,
    pub check_calls: u64,
    pub keys_added: u64,
    pub keys_checked: u64,
    pub shard_failures: u64,
    pub timeouts: u64,
    pub avg_call_ns: u64,
}

/// Trait for custom metrics recording implementations
///
/// Implement this trait to forward router metrics to an external system.
pub trait MetricsRecorder: Send + Sync {
    /// Record one provisioned shard
    fn record_provisioned(&self);

    /// Record a successful bulk-add on one shard
    fn record_add(&self, keys: usize, duration: Duration);

    /// Record a successful multi-check on one shard
    fn record_check(&self, keys: usize, duration: Duration);

    /// Record a failed shard call
    fn record_failure(&self, timed_out: bool);
}

/// No-op metrics recorder for when metrics are disabled
#[derive(Default)]
pub struct NoOpMetrics;

impl MetricsRecorder for NoOpMetrics {
    fn record_provisioned(&self) {}
    fn record_add(&self, _: usize, _: Duration) {}
    fn record_check(&self, _: usize, _: Duration) {}
    fn record_failure(&self, _: bool) {}
}

impl MetricsRecorder for RouterMetrics {
    fn record_provisioned(&self) {
        RouterMetrics::record_provisioned(self);
    }

    fn record_add(&self, keys: usize, duration: Duration) {
        RouterMetrics::record_add(self, keys, duration);
    }

    fn record_check(&self, keys: usize, duration: Duration) {
        RouterMetrics::record_check(self, keys, duration);
    }

    fn record_failure(&self, timed_out: bool) {
        RouterMetrics::record_failure(self, timed_out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_initialization() {
        let snapshot = RouterMetrics::new().snapshot();
        assert_eq!(snapshot, MetricsSnapshot::default());
    }

    #[test]
    fn test_record_calls() {
        let metrics = RouterMetrics::new();

        metrics.record_add(10, Duration::from_nanos(100));
        metrics.record_check(4, Duration::from_nanos(200));
        metrics.record_check(6, Duration::from_nanos(300));

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.add_calls, 1);
        assert_eq!(snapshot.check_calls, 2);
        assert_eq!(snapshot.keys_added, 10);
        assert_eq!(snapshot.keys_checked, 10);
        assert_eq!(snapshot.avg_call_ns, 200);
    }

    #[test]
    fn test_record_failures() {
        let metrics = RouterMetrics::new();

        metrics.record_failure(false);
        metrics.record_failure(true);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.shard_failures, 2);
        assert_eq!(snapshot.timeouts, 1);
    }

    #[test]
    fn test_reset() {
        let metrics = RouterMetrics::new();

        metrics.record_provisioned();
        metrics.record_add(1, Duration::from_nanos(50));
        metrics.record_failure(true);

        metrics.reset();

        assert_eq!(metrics.snapshot(), MetricsSnapshot::default());
    }

    #[test]
    fn test_noop_metrics() {
        let metrics = NoOpMetrics;
        metrics.record_provisioned();
        metrics.record_add(1, Duration::from_nanos(100));
        metrics.record_check(1, Duration::from_nanos(100));
        metrics.record_failure(true);
    }
}
