//! Favorite records with optimistic persistence
//!
//! Toggling updates the in-memory [`FavoriteSet`] immediately and queues a
//! write of the whole set to a [`KeyValueStore`]. The in-memory set is
//! authoritative: a failed write is logged and reported through
//! [`FavoritesCoordinator::poll_failures`], never rolled back.

mod persister;

pub use persister::{PersistFailure, Persister};

use crate::models::Resource;
use crate::store::KeyValueStore;

/// Result of a toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggled {
    /// The record is now a favorite (at the front)
    Added,
    /// The record is no longer a favorite
    Removed,
}

/// Favorites, most recently added first
#[derive(Debug, Clone, PartialEq)]
pub struct FavoriteSet<R> {
    items: Vec<R>,
}

impl<R> Default for FavoriteSet<R> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<R: Resource> FavoriteSet<R> {
    /// Records in display order
    pub fn items(&self) -> &[R] {
        &self.items
    }

    /// Number of favorites
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether there are no favorites
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether `id` is a favorite
    pub fn contains(&self, id: &str) -> bool {
        self.items.iter().any(|r| r.id() == id)
    }

    /// Remove `record` if present, otherwise insert it at the front
    pub fn toggle(&mut self, record: R) -> Toggled {
        if let Some(index) = self.items.iter().position(|r| r.id() == record.id()) {
            self.items.remove(index);
            Toggled::Removed
        } else {
            self.items.insert(0, record);
            Toggled::Added
        }
    }

    /// Remove everything
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Serialize as a JSON array
    pub fn to_blob(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.items)
    }

    /// Parse a JSON array written by [`Self::to_blob`]
    pub fn from_blob(blob: &str) -> serde_json::Result<Self> {
        Ok(Self {
            items: serde_json::from_str(blob)?,
        })
    }
}

/// Owns the favorite set and its background persister
pub struct FavoritesCoordinator<R: Resource> {
    set: FavoriteSet<R>,
    persister: Persister,
}

impl<R: Resource> FavoritesCoordinator<R> {
    /// Load favorites from `store` under `key`
    ///
    /// Missing, unreadable or corrupt data yields an empty set.
    pub async fn load<S: KeyValueStore>(store: S, key: &str) -> Self {
        let set = match store.get(key).await {
            Ok(Some(blob)) => FavoriteSet::from_blob(&blob).unwrap_or_else(|e| {
                tracing::warn!("Ignoring corrupt favorites under {key}: {e}");
                FavoriteSet::default()
            }),
            Ok(None) => FavoriteSet::default(),
            Err(e) => {
                tracing::warn!("Failed to read favorites: {e:#}");
                FavoriteSet::default()
            }
        };
        tracing::debug!("Loaded {} favorite {}(s)", set.len(), R::NAME);

        Self {
            set,
            persister: Persister::spawn(store, key.to_string()),
        }
    }

    /// Current favorites
    pub const fn set(&self) -> &FavoriteSet<R> {
        &self.set
    }

    /// Whether `id` is a favorite
    pub fn contains(&self, id: &str) -> bool {
        self.set.contains(id)
    }

    /// Toggle `record` and schedule a write
    pub fn toggle(&mut self, record: R) -> Toggled {
        let toggled = self.set.toggle(record);
        self.schedule_persist();
        toggled
    }

    /// Remove every favorite and schedule a write
    pub fn clear_all(&mut self) {
        self.set.clear();
        self.schedule_persist();
    }

    /// Failed writes since the last poll
    pub fn poll_failures(&mut self) -> Vec<PersistFailure> {
        self.persister.poll_failures()
    }

    /// Wait until every scheduled write has been attempted
    pub async fn flush(&self) {
        self.persister.flush().await;
    }

    /// Stop the persister after pending writes
    pub fn shutdown(&self) {
        self.persister.shutdown();
    }

    fn schedule_persist(&self) {
        match self.set.to_blob() {
            Ok(blob) => self.persister.save(blob),
            Err(e) => tracing::warn!("Failed to serialize favorites: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::demo::demo_matches;
    use crate::db::Database;
    use crate::models::Match;
    use crate::store::{MemoryStore, SqliteStore};
    use std::sync::Arc;
    use tempfile::tempdir;

    const KEY: &str = "test.favorites";

    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        async fn get(&self, _key: &str) -> anyhow::Result<Option<String>> {
            anyhow::bail!("disk unavailable")
        }

        async fn set(&self, _key: &str, _value: &str) -> anyhow::Result<()> {
            anyhow::bail!("disk full")
        }
    }

    fn ids(set: &FavoriteSet<Match>) -> Vec<&str> {
        set.items().iter().map(|m| m.id.as_str()).collect()
    }

    #[test]
    fn test_toggle_pairs_and_inserts_at_front() {
        let matches = demo_matches();
        let mut set = FavoriteSet::default();

        assert_eq!(set.toggle(matches[0].clone()), Toggled::Added);
        assert_eq!(set.toggle(matches[1].clone()), Toggled::Added);
        assert_eq!(ids(&set), [matches[1].id.as_str(), matches[0].id.as_str()]);

        assert_eq!(set.toggle(matches[1].clone()), Toggled::Removed);
        assert_eq!(ids(&set), [matches[0].id.as_str()]);
        assert!(!set.contains(&matches[1].id));
    }

    #[tokio::test]
    async fn test_favorites_survive_reload() {
        let store = Arc::new(MemoryStore::new());
        let matches = demo_matches();

        let mut favorites = FavoritesCoordinator::<Match>::load(Arc::clone(&store), KEY).await;
        assert!(favorites.set().is_empty());
        favorites.toggle(matches[2].clone());
        favorites.toggle(matches[4].clone());
        favorites.flush().await;
        assert!(favorites.poll_failures().is_empty());

        let reloaded = FavoritesCoordinator::<Match>::load(store, KEY).await;
        assert_eq!(reloaded.set(), favorites.set());
        assert!(reloaded.contains(&matches[4].id));
    }

    #[tokio::test]
    async fn test_clear_all_persists_empty_set() {
        let store = Arc::new(MemoryStore::new());
        let mut favorites = FavoritesCoordinator::<Match>::load(Arc::clone(&store), KEY).await;
        favorites.toggle(demo_matches().remove(0));
        favorites.clear_all();
        favorites.flush().await;

        assert_eq!(store.get(KEY).await.unwrap().as_deref(), Some("[]"));
    }

    #[tokio::test]
    async fn test_corrupt_blob_loads_empty() {
        let store = MemoryStore::new();
        store.set(KEY, "{not json").await.unwrap();

        let favorites = FavoritesCoordinator::<Match>::load(store, KEY).await;
        assert!(favorites.set().is_empty());
    }

    #[tokio::test]
    async fn test_failing_store_keeps_set() {
        let matches = demo_matches();
        let mut favorites = FavoritesCoordinator::<Match>::load(BrokenStore, KEY).await;
        assert!(favorites.set().is_empty());

        assert_eq!(favorites.toggle(matches[0].clone()), Toggled::Added);
        favorites.flush().await;

        assert!(favorites.contains(&matches[0].id));
        let failures = favorites.poll_failures();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].key, KEY);
        assert!(failures[0].error.contains("disk full"));
    }

    #[tokio::test]
    async fn test_sqlite_backed_favorites() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("favorites.sqlite");
        let matches = demo_matches();

        {
            let store = SqliteStore::new(Database::open_path(&path).unwrap());
            let mut favorites = FavoritesCoordinator::<Match>::load(store, KEY).await;
            favorites.toggle(matches[3].clone());
            favorites.flush().await;
            favorites.shutdown();
        }

        let store = SqliteStore::new(Database::open_path(&path).unwrap());
        let favorites = FavoritesCoordinator::<Match>::load(store, KEY).await;
        assert_eq!(ids(favorites.set()), [matches[3].id.as_str()]);
    }
}
