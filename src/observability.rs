//! Run metrics (per-row outcome counters)

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics handle for recording counters
#[derive(Debug, Default)]
pub struct Metrics {
    downloaded: AtomicU64,
    already_present: AtomicU64,
    no_source: AtomicU64,
    failed: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn row_downloaded(&self) {
        self.downloaded.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "downloaded", "Metric incremented");
    }

    pub fn row_already_present(&self) {
        self.already_present.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "already_present", "Metric incremented");
    }

    pub fn row_without_source(&self) {
        self.no_source.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "no_source", "Metric incremented");
    }

    pub fn row_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "failed", "Metric incremented");
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            downloaded: self.downloaded.load(Ordering::Relaxed),
            already_present: self.already_present.load(Ordering::Relaxed),
            no_source: self.no_source.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub downloaded: u64,
    pub already_present: u64,
    pub no_source: u64,
    pub failed: u64,
}
