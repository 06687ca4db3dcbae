//! Recent-search list: ordered, de-duplicated, bounded, persisted.

use std::sync::Arc;

use clima_core::KeyValueStore;

/// Storage key for the persisted list (JSON array of city names).
pub const RECENT_SEARCHES_KEY: &str = "weather-recent-searches";

/// Bound on the list length; the oldest entry is evicted past this.
pub const MAX_RECENT_SEARCHES: usize = 5;

/// Most-recent-first list of queried city names.
///
/// Uniqueness is case-insensitive; recording an existing name moves it to the
/// front with the new casing. Persistence is fire-and-forget: a failed write
/// is logged, never surfaced.
pub struct SearchHistory {
    store: Arc<dyn KeyValueStore>,
    entries: Vec<String>,
}

impl SearchHistory {
    /// Load the persisted list. Missing or malformed data yields an empty
    /// history rather than an error.
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let entries = match store.get(RECENT_SEARCHES_KEY) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!("Malformed recent-search data, starting empty: {}", e);
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!("Could not read recent searches: {:#}", e);
                Vec::new()
            }
        };
        Self { store, entries }
    }

    /// Record a successful search, moving any case-insensitive match to the
    /// front and truncating to [`MAX_RECENT_SEARCHES`].
    pub fn record(&mut self, city: &str) {
        let needle = city.to_lowercase();
        self.entries.retain(|entry| entry.to_lowercase() != needle);
        self.entries.insert(0, city.to_string());
        self.entries.truncate(MAX_RECENT_SEARCHES);
        self.persist();
    }

    /// Remove an entry by exact string match.
    pub fn remove(&mut self, city: &str) {
        self.entries.retain(|entry| entry != city);
        self.persist();
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn persist(&self) {
        if self.entries.is_empty() {
            if let Err(e) = self.store.delete(RECENT_SEARCHES_KEY) {
                tracing::warn!("Could not clear recent searches: {:#}", e);
            }
            return;
        }
        let raw = match serde_json::to_string(&self.entries) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!("Could not encode recent searches: {}", e);
                return;
            }
        };
        if let Err(e) = self.store.set(RECENT_SEARCHES_KEY, &raw) {
            tracing::warn!("Could not persist recent searches: {:#}", e);
        }
    }
}
