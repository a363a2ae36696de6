//! Bounded, most-recent-first list of city names backed by a [`KeyValueStore`].
//!
//! Used for both the search history and the favorites list. Entries are
//! de-duplicated case-insensitively; the most recently supplied casing wins.
//!
//! Storage failures never reach the caller: reads degrade to an empty list and
//! failed writes leave whatever was stored before. Concurrent mutations are not
//! coordinated, so the last write wins.

use std::sync::Arc;

use crate::storage::KeyValueStore;

pub const DEFAULT_LIMIT: usize = 10;

#[derive(Debug, Clone)]
pub struct RecencyList {
    store: Arc<dyn KeyValueStore>,
    key: String,
    limit: usize,
}

impl RecencyList {
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>, limit: usize) -> Self {
        Self { store, key: key.into(), limit }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Current entries, most recent first.
    pub async fn get_all(&self) -> Vec<String> {
        let raw = match self.store.get(&self.key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!(key = %self.key, "Failed to read list: {e:#}");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<String>>(&raw) {
            Ok(list) => list,
            Err(e) => {
                tracing::warn!(key = %self.key, "Stored list is not valid JSON: {e}");
                Vec::new()
            }
        }
    }

    /// Moves `city` (trimmed) to the front, dropping the oldest entries past the limit.
    pub async fn add(&self, city: &str) {
        let city = city.trim();
        if city.is_empty() {
            return;
        }

        let mut list = self.get_all().await;
        list.retain(|entry| !same_city(entry, city));
        list.insert(0, city.to_string());
        list.truncate(self.limit);

        self.persist(&list).await;
    }

    pub async fn remove(&self, city: &str) {
        let mut list = self.get_all().await;
        list.retain(|entry| !same_city(entry, city));
        self.persist(&list).await;
    }

    pub async fn contains(&self, city: &str) -> bool {
        self.get_all().await.iter().any(|entry| same_city(entry, city))
    }

    /// Removes `city` if present, otherwise adds it. Returns whether it is now present.
    pub async fn toggle(&self, city: &str) -> bool {
        if self.contains(city).await {
            self.remove(city).await;
            false
        } else {
            self.add(city).await;
            true
        }
    }

    /// Deletes the stored key entirely.
    pub async fn clear(&self) {
        match self.store.delete(&self.key).await {
            Ok(()) => tracing::info!(key = %self.key, "Cleared list"),
            Err(e) => tracing::warn!(key = %self.key, "Failed to clear list: {e:#}"),
        }
    }

    async fn persist(&self, list: &[String]) {
        let json = match serde_json::to_string(list) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(key = %self.key, "Failed to serialize list: {e}");
                return;
            }
        };

        match self.store.set(&self.key, &json).await {
            Ok(()) => tracing::debug!(key = %self.key, len = list.len(), "Saved list"),
            Err(e) => tracing::warn!(key = %self.key, "Failed to save list: {e:#}"),
        }
    }
}

/// `entry` is stored trimmed; `query` may not be.
fn same_city(entry: &str, query: &str) -> bool {
    entry.to_lowercase() == query.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{HISTORY_KEY, MemoryStore};
    use anyhow::{Result, anyhow};
    use async_trait::async_trait;

    fn list() -> (Arc<MemoryStore>, RecencyList) {
        let store = Arc::new(MemoryStore::new());
        let list = RecencyList::new(store.clone(), HISTORY_KEY, DEFAULT_LIMIT);
        (store, list)
    }

    #[derive(Debug)]
    struct BrokenStore;

    #[async_trait]
    impl KeyValueStore for BrokenStore {
        async fn get(&self, _key: &str) -> Result<Option<String>> {
            Err(anyhow!("disk on fire"))
        }
        async fn set(&self, _key: &str, _value: &str) -> Result<()> {
            Err(anyhow!("disk on fire"))
        }
        async fn delete(&self, _key: &str) -> Result<()> {
            Err(anyhow!("disk on fire"))
        }
    }

    #[tokio::test]
    async fn readd_moves_to_front_with_new_casing() {
        let (_, list) = list();
        list.add("paris").await;
        list.add("London").await;
        list.add("PARIS").await;

        assert_eq!(list.get_all().await, vec!["PARIS".to_string(), "London".to_string()]);
    }

    #[tokio::test]
    async fn add_trims_and_ignores_blank() {
        let (_, list) = list();
        list.add("   ").await;
        list.add("").await;
        assert!(list.get_all().await.is_empty());

        list.add("  Oslo  ").await;
        assert_eq!(list.get_all().await, vec!["Oslo".to_string()]);
    }

    #[tokio::test]
    async fn add_drops_oldest_past_limit() {
        let (_, list) = list();
        for i in 0..11 {
            list.add(&format!("City {i}")).await;
        }

        let all = list.get_all().await;
        assert_eq!(all.len(), 10);
        assert_eq!(all[0], "City 10");
        assert!(!all.contains(&"City 0".to_string()));
    }

    #[tokio::test]
    async fn remove_is_case_insensitive_and_keeps_order() {
        let (_, list) = list();
        for city in ["A", "B", "C"] {
            list.add(city).await;
        }
        list.remove("b").await;
        list.remove("missing").await;

        assert_eq!(list.get_all().await, vec!["C".to_string(), "A".to_string()]);
    }

    #[tokio::test]
    async fn toggle_twice_restores_membership() {
        let (_, list) = list();
        assert!(!list.contains("Rome").await);

        assert!(list.toggle("Rome").await);
        assert!(list.contains("rome").await);
        assert!(!list.toggle(" ROME ").await);
        assert!(!list.contains("Rome").await);
    }

    #[tokio::test]
    async fn clear_deletes_key() {
        let (store, list) = list();
        list.add("Lima").await;
        assert!(store.contains_key(HISTORY_KEY).await);

        list.clear().await;
        assert!(!store.contains_key(HISTORY_KEY).await);
        assert!(list.get_all().await.is_empty());
    }

    #[tokio::test]
    async fn corrupt_value_reads_as_empty() {
        let (store, list) = list();
        store.set(HISTORY_KEY, "{not json").await.unwrap();

        assert!(list.get_all().await.is_empty());
        list.add("Kyiv").await;
        assert_eq!(list.get_all().await, vec!["Kyiv".to_string()]);
    }

    #[tokio::test]
    async fn storage_failures_degrade_silently() {
        let list = RecencyList::new(Arc::new(BrokenStore), HISTORY_KEY, DEFAULT_LIMIT);

        list.add("Quito").await;
        list.remove("Quito").await;
        list.clear().await;
        assert!(list.get_all().await.is_empty());
        assert!(!list.contains("Quito").await);
        assert!(list.toggle("Quito").await);
    }
}
