use std::num::NonZeroUsize;
use std::sync::Arc;
use lru::LruCache;
use parking_lot::RwLock;
use serde::Serialize;
use sha2::{Digest, Sha256};
use crate::class_records::ClassRecord;
use crate::metrics::Metrics;
use crate::suggestion::engine::{suggest, Suggestion};
use crate::units::Unit;

type Fingerprint = [u8; 32];

#[derive(Serialize)]
struct Snapshot<'a> {
    units: &'a [Unit],
    records: &'a [ClassRecord],
}

/// SHA-256 over the JSON form of a units/records snapshot
fn fingerprint(units: &[Unit], records: &[ClassRecord]) -> Option<Fingerprint> {
    let bytes = serde_json::to_vec(&Snapshot { units, records }).ok()?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Some(hasher.finalize().into())
}

/// Bounded memo of suggestion results keyed by input snapshot.
#[derive(Clone)]
pub struct SuggestionCache {
    entries: Arc<RwLock<LruCache<Fingerprint, Suggestion>>>,
    metrics: Metrics,
}

impl SuggestionCache {
    pub fn new(capacity: usize, metrics: Metrics) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        SuggestionCache {
            entries: Arc::new(RwLock::new(LruCache::new(capacity))),
            metrics,
        }
    }

    /// Same result as `suggest`, reusing earlier results for identical input
    pub fn suggest(&self, units: &[Unit], records: &[ClassRecord]) -> Suggestion {
        let key = match fingerprint(units, records) {
            Some(key) => key,
            None => return self.compute(units, records),
        };

        if let Some(hit) = self.entries.read().peek(&key) {
            tracing::debug!(confidence = ?hit.confidence, "Suggestion cache hit");
            self.metrics.record_cache_hit();
            return hit.clone();
        }

        tracing::debug!(units = units.len(), records = records.len(), "Suggestion cache miss");
        self.metrics.record_cache_miss();
        let suggestion = self.compute(units, records);
        self.entries.write().put(key, suggestion.clone());
        suggestion
    }

    fn compute(&self, units: &[Unit], records: &[ClassRecord]) -> Suggestion {
        let suggestion = suggest(units, records);
        self.metrics.record_suggestion(suggestion.confidence);
        suggestion
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }
}
