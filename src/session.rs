//! Transient per-session storage of generated itineraries
//!
//! Entries live in memory only and expire after the configured TTL. Expired
//! entries are dropped on read and by a periodic sweep.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::config::SessionConfig;

struct StoredEntry<T> {
    value: T,
    expires_at: Instant,
}

impl<T> StoredEntry<T> {
    fn is_fresh(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

pub struct SessionStore<T> {
    entries: Arc<RwLock<HashMap<Uuid, StoredEntry<T>>>>,
    ttl: Duration,
}

impl<T> Clone for SessionStore<T> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
            ttl: self.ttl,
        }
    }
}

impl<T: Clone + Send + Sync + 'static> SessionStore<T> {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    #[must_use]
    pub fn from_config(config: &SessionConfig) -> Self {
        Self::new(Duration::from_secs(u64::from(config.ttl_minutes) * 60))
    }

    /// Store a value under a fresh session id
    #[tracing::instrument(name = "put_session", level = "debug", skip_all)]
    pub async fn insert(&self, value: T) -> Uuid {
        let id = Uuid::new_v4();
        let entry = StoredEntry {
            value,
            expires_at: Instant::now() + self.ttl,
        };
        self.entries.write().await.insert(id, entry);
        tracing::debug!(%id, "Session stored");
        id
    }

    /// A copy of the value if it exists and has not expired
    #[tracing::instrument(name = "query_session", level = "debug", skip(self))]
    pub async fn get(&self, id: &Uuid) -> Option<T> {
        {
            let entries = self.entries.read().await;
            match entries.get(id) {
                Some(entry) if entry.is_fresh(Instant::now()) => {
                    tracing::debug!("Session found and still fresh");
                    return Some(entry.value.clone());
                }
                Some(_) => tracing::debug!("Session found but expired"),
                None => {
                    tracing::debug!("Session not found");
                    return None;
                }
            }
        }
        self.remove(id).await;
        None
    }

    /// Apply `change` to a live entry and return the updated copy
    pub async fn update<F>(&self, id: &Uuid, change: F) -> Option<T>
    where
        F: FnOnce(&mut T),
    {
        let mut entries = self.entries.write().await;
        let entry = entries
            .get_mut(id)
            .filter(|entry| entry.is_fresh(Instant::now()))?;
        change(&mut entry.value);
        Some(entry.value.clone())
    }

    pub async fn remove(&self, id: &Uuid) -> bool {
        self.entries.write().await.remove(id).is_some()
    }

    /// Drop every expired entry, returning how many were removed
    pub async fn sweep(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| entry.is_fresh(now));
        before - entries.len()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Run [`Self::sweep`] every `interval` until the handle is aborted
    pub fn spawn_sweeper(&self, interval: Duration) -> JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let removed = store.sweep().await;
                if removed > 0 {
                    tracing::info!("Expired {} sessions", removed);
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_get_remove() {
        let store = SessionStore::new(Duration::from_secs(60));
        let id = store.insert("Goa".to_string()).await;

        assert_eq!(store.get(&id).await.as_deref(), Some("Goa"));
        assert_eq!(store.len().await, 1);
        assert!(store.remove(&id).await);
        assert!(store.get(&id).await.is_none());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_unknown_id() {
        let store: SessionStore<String> = SessionStore::new(Duration::from_secs(60));
        assert!(store.get(&Uuid::new_v4()).await.is_none());
        assert!(!store.remove(&Uuid::new_v4()).await);
    }

    #[tokio::test]
    async fn test_update_live_entry() {
        let store = SessionStore::new(Duration::from_secs(60));
        let id = store.insert(vec![1u32]).await;

        let updated = store.update(&id, |v| v.push(2)).await;
        assert_eq!(updated, Some(vec![1, 2]));
        assert_eq!(store.get(&id).await, Some(vec![1, 2]));
        assert!(store.update(&Uuid::new_v4(), |v| v.push(3)).await.is_none());
    }

    #[tokio::test]
    async fn test_expired_entries_are_dropped() {
        let store = SessionStore::new(Duration::from_millis(20));
        let first = store.insert(1u8).await;
        let _second = store.insert(2u8).await;
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert!(store.get(&first).await.is_none());
        assert!(store.update(&first, |v| *v = 3).await.is_none());
        assert_eq!(store.len().await, 1);
        assert_eq!(store.sweep().await, 1);
        assert!(store.is_empty().await);
    }

    #[test]
    fn test_ttl_from_config() {
        let store: SessionStore<String> = SessionStore::from_config(&SessionConfig::default());
        assert_eq!(store.ttl, Duration::from_secs(120 * 60));
    }
}
