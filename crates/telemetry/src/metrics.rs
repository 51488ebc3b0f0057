//! In-process run metrics.
//!
//! Counters are bumped by the reader, normalizer, and sink; a snapshot is
//! logged when a run finishes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// A counter metric.
#[derive(Debug, Default)]
pub struct Counter(AtomicU64);

impl Counter {
    pub fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    pub fn inc(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_by(&self, n: u64) {
        self.0.fetch_add(n, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

/// Histogram for stage latency tracking.
#[derive(Debug)]
pub struct Histogram {
    /// Buckets: 10ms, 50ms, 100ms, 500ms, 1s, 5s, 10s, 30s, 60s, 300s, +inf
    buckets: [AtomicU64; 11],
    sum: AtomicU64,
    count: AtomicU64,
}

impl Default for Histogram {
    fn default() -> Self {
        Self::new()
    }
}

impl Histogram {
    const BUCKET_BOUNDS: [u64; 11] = [
        10,
        50,
        100,
        500,
        1_000,
        5_000,
        10_000,
        30_000,
        60_000,
        300_000,
        u64::MAX,
    ];

    pub fn new() -> Self {
        Self {
            buckets: Default::default(),
            sum: AtomicU64::new(0),
            count: AtomicU64::new(0),
        }
    }

    /// Records a value in milliseconds.
    pub fn observe(&self, ms: u64) {
        self.sum.fetch_add(ms, Ordering::Relaxed);
        self.count.fetch_add(1, Ordering::Relaxed);

        let idx = Self::BUCKET_BOUNDS
            .iter()
            .position(|&bound| ms <= bound)
            .unwrap_or(Self::BUCKET_BOUNDS.len() - 1);
        self.buckets[idx].fetch_add(1, Ordering::Relaxed);
    }

    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    pub fn sum(&self) -> u64 {
        self.sum.load(Ordering::Relaxed)
    }

    pub fn mean(&self) -> f64 {
        let count = self.count();
        if count == 0 {
            0.0
        } else {
            self.sum() as f64 / count as f64
        }
    }

    /// Returns bucket counts.
    pub fn buckets(&self) -> Vec<(u64, u64)> {
        Self::BUCKET_BOUNDS
            .iter()
            .zip(self.buckets.iter())
            .map(|(&bound, count)| (bound, count.load(Ordering::Relaxed)))
            .collect()
    }
}

/// Collected metrics for the pipeline.
#[derive(Debug, Default)]
pub struct Metrics {
    // Input
    pub rows_read: Counter,
    pub rows_unreadable: Counter,

    // Normalizer
    pub rows_dropped_invalid_date: Counter,
    pub events_normalized: Counter,

    // Sink
    pub tables_written: Counter,
    pub rows_written: Counter,
    pub write_errors: Counter,

    // Stage latency histograms
    pub read_latency_ms: Histogram,
    pub aggregate_latency_ms: Histogram,
    pub write_latency_ms: Histogram,
    pub run_latency_ms: Histogram,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }
}

/// A snapshot of metrics at a point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub timestamp: DateTime<Utc>,
    pub rows_read: u64,
    pub rows_unreadable: u64,
    pub rows_dropped_invalid_date: u64,
    pub events_normalized: u64,
    pub tables_written: u64,
    pub rows_written: u64,
    pub write_errors: u64,
    pub read_latency_mean_ms: f64,
    pub aggregate_latency_mean_ms: f64,
    pub write_latency_mean_ms: f64,
    pub run_latency_mean_ms: f64,
}

impl Metrics {
    /// Takes a snapshot of current metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            timestamp: Utc::now(),
            rows_read: self.rows_read.get(),
            rows_unreadable: self.rows_unreadable.get(),
            rows_dropped_invalid_date: self.rows_dropped_invalid_date.get(),
            events_normalized: self.events_normalized.get(),
            tables_written: self.tables_written.get(),
            rows_written: self.rows_written.get(),
            write_errors: self.write_errors.get(),
            read_latency_mean_ms: self.read_latency_ms.mean(),
            aggregate_latency_mean_ms: self.aggregate_latency_ms.mean(),
            write_latency_mean_ms: self.write_latency_ms.mean(),
            run_latency_mean_ms: self.run_latency_ms.mean(),
        }
    }
}

/// Global metrics registry.
pub static METRICS: std::sync::LazyLock<Metrics> = std::sync::LazyLock::new(Metrics::new);

/// Get the global metrics instance.
pub fn metrics() -> &'static Metrics {
    &METRICS
}
