use std::collections::HashMap;
use std::sync::Arc;
use parking_lot::RwLock;
use serde::Serialize;
use tokio::sync::{watch, Mutex};
use tokio_stream::wrappers::WatchStream;
use crate::cache::SuggestionCache;
use crate::db::Database;
use crate::error::TutorError;
use crate::metrics::Metrics;
use crate::suggestion::engine::Suggestion;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "suggestion", rename_all = "lowercase")]
pub enum SuggestionState {
    /// No snapshot has been read for this student yet
    Loading,
    Ready(Suggestion),
}

struct Channel {
    tx: watch::Sender<SuggestionState>,
    /// Serializes read-compute-publish so an older snapshot never overwrites a newer one
    refresh: Mutex<()>,
}

impl Channel {
    fn new() -> Self {
        Channel {
            tx: watch::channel(SuggestionState::Loading).0,
            refresh: Mutex::new(()),
        }
    }
}

/// Nobody is listening and no refresh holds it
fn is_idle(channel: &Arc<Channel>) -> bool {
    channel.tx.receiver_count() == 0 && Arc::strong_count(channel) == 1
}

/// Per-student suggestion channels.
///
/// The host calls `refresh` after every write touching a student's units or
/// class records; subscribers then see the recomputed suggestion. Channels of
/// other students with no subscribers are dropped along the way.
#[derive(Clone)]
pub struct SuggestionFeed {
    db: Database,
    cache: SuggestionCache,
    metrics: Metrics,
    channels: Arc<RwLock<HashMap<String, Arc<Channel>>>>,
}

impl SuggestionFeed {
    pub fn new(db: Database, cache: SuggestionCache, metrics: Metrics) -> Self {
        SuggestionFeed {
            db,
            cache,
            metrics,
            channels: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    fn channel(&self, student_id: &str) -> Arc<Channel> {
        let mut channels = self.channels.write();
        channels.retain(|id, ch| id == student_id || !is_idle(ch));
        channels
            .entry(student_id.to_string())
            .or_insert_with(|| Arc::new(Channel::new()))
            .clone()
    }

    /// Stream of suggestion states; yields the current state first
    pub fn subscribe(&self, student_id: &str) -> WatchStream<SuggestionState> {
        WatchStream::new(self.channel(student_id).tx.subscribe())
    }

    pub fn current(&self, student_id: &str) -> SuggestionState {
        self.channels
            .read()
            .get(student_id)
            .map(|ch| ch.tx.borrow().clone())
            .unwrap_or(SuggestionState::Loading)
    }

    /// Number of students with a live channel
    pub fn channel_count(&self) -> usize {
        self.channels.read().len()
    }

    /// Re-read the student's snapshot, recompute and publish.
    /// Subscribers are only woken when the suggestion changed.
    pub async fn refresh(&self, student_id: &str) -> Result<Suggestion, TutorError> {
        let channel = self.channel(student_id);
        let _guard = channel.refresh.lock().await;

        let units = self.db.units_for_student(student_id).await?;
        let records = self.db.class_records_for_student(student_id).await?;
        let suggestion = self.cache.suggest(&units, &records);
        self.metrics.record_feed_refresh();

        let next = SuggestionState::Ready(suggestion.clone());
        let changed = channel.tx.send_if_modified(|state| {
            if *state == next {
                false
            } else {
                *state = next.clone();
                true
            }
        });
        tracing::debug!(
            student_id = %student_id,
            confidence = ?suggestion.confidence,
            changed,
            "Suggestion feed refreshed"
        );
        Ok(suggestion)
    }
}
