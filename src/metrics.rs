use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use serde::Serialize;
use crate::suggestion::engine::Confidence;

/// Counters for observability.
/// All metrics are atomic counters for thread-safety
#[derive(Clone, Default)]
pub struct Metrics {
    /// Suggestions computed at high confidence
    pub suggestions_high: Arc<AtomicU64>,
    pub suggestions_medium: Arc<AtomicU64>,
    pub suggestions_low: Arc<AtomicU64>,
    /// Suggestion cache hit count
    pub cache_hit_count: Arc<AtomicU64>,
    /// Suggestion cache miss count
    pub cache_miss_count: Arc<AtomicU64>,
    /// Class records written
    pub records_saved: Arc<AtomicU64>,
    /// Feed recomputations triggered by data changes
    pub feed_refreshes: Arc<AtomicU64>,
}

/// Point-in-time copy of the counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub suggestions_high: u64,
    pub suggestions_medium: u64,
    pub suggestions_low: u64,
    pub cache_hit_count: u64,
    pub cache_miss_count: u64,
    pub records_saved: u64,
    pub feed_refreshes: u64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_suggestion(&self, confidence: Confidence) {
        let counter = match confidence {
            Confidence::High => &self.suggestions_high,
            Confidence::Medium => &self.suggestions_medium,
            Confidence::Low => &self.suggestions_low,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Record cache hit
    pub fn record_cache_hit(&self) {
        self.cache_hit_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Record cache miss
    pub fn record_cache_miss(&self) {
        self.cache_miss_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_saved(&self) {
        self.records_saved.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_feed_refresh(&self) {
        self.feed_refreshes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            suggestions_high: self.suggestions_high.load(Ordering::Relaxed),
            suggestions_medium: self.suggestions_medium.load(Ordering::Relaxed),
            suggestions_low: self.suggestions_low.load(Ordering::Relaxed),
            cache_hit_count: self.cache_hit_count.load(Ordering::Relaxed),
            cache_miss_count: self.cache_miss_count.load(Ordering::Relaxed),
            records_saved: self.records_saved.load(Ordering::Relaxed),
            feed_refreshes: self.feed_refreshes.load(Ordering::Relaxed),
        }
    }
}
