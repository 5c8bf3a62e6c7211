use std::sync::Arc;
use parking_lot::RwLock;
use crate::cache::SuggestionCache;
use crate::config::settings::AppConfig;
use crate::db::Database;
use crate::metrics::Metrics;
use crate::suggestion::feed::SuggestionFeed;

/// Application-wide state container.
/// Passed explicitly to every command; clones share the same state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: Database,
    /// Memoized suggestion results
    pub cache: SuggestionCache,
    pub metrics: Metrics,
    /// Per-student suggestion subscriptions
    pub feed: SuggestionFeed,
    /// Student currently open in the UI
    pub selected_student: Arc<RwLock<Option<String>>>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let metrics = Metrics::new();
        let db = Database::open(config.resolved_data_dir());
        let cache = SuggestionCache::new(config.suggestion_cache_size, metrics.clone());
        let feed = SuggestionFeed::new(db.clone(), cache.clone(), metrics.clone());
        AppState {
            config: Arc::new(config),
            db,
            cache,
            metrics,
            feed,
            selected_student: Arc::new(RwLock::new(None)),
        }
    }

    pub fn select_student(&self, student_id: Option<String>) {
        *self.selected_student.write() = student_id;
    }

    pub fn selected_student(&self) -> Option<String> {
        self.selected_student.read().clone()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}
