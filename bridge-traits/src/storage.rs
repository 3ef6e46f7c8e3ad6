//! Durable Key-Value Storage Abstraction
//!
//! Provides a platform-agnostic trait for the small amount of state the core
//! persists across launches (currently a single serialized session record).

use async_trait::async_trait;

use crate::error::Result;

/// Key-value persistence trait
///
/// Abstracts durable storage mechanisms:
/// - Desktop: SQLite file in the app data directory
/// - iOS/Android: platform preference stores
/// - Web: localStorage
///
/// Values are opaque strings; the core serializes its own records. Keys are
/// stable identifiers chosen by the core, so an implementation must return
/// exactly what was stored under a key, or `None` if nothing ever was.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::storage::KeyValueStore;
///
/// async fn remember(store: &dyn KeyValueStore) -> Result<()> {
///     store.set("greeting", "hello").await?;
///     assert_eq!(store.get("greeting").await?.as_deref(), Some("hello"));
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, if any
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove the value stored under `key`
    ///
    /// Removing a key that was never set is not an error.
    async fn remove(&self, key: &str) -> Result<()>;

    /// Check whether a value is stored under `key`
    async fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.get(key).await?.is_some())
    }

    /// Remove every stored entry
    async fn clear(&self) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MapStore {
        entries: Mutex<HashMap<String, String>>,
    }

    #[async_trait]
    impl KeyValueStore for MapStore {
        async fn get(&self, key: &str) -> Result<Option<String>> {
            Ok(self.entries.lock().unwrap().get(key).cloned())
        }

        async fn set(&self, key: &str, value: &str) -> Result<()> {
            self.entries
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }

        async fn remove(&self, key: &str) -> Result<()> {
            self.entries.lock().unwrap().remove(key);
            Ok(())
        }

        async fn clear(&self) -> Result<()> {
            self.entries.lock().unwrap().clear();
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_contains_default_follows_get() {
        let store = MapStore::default();
        assert!(!store.contains("session").await.unwrap());

        store.set("session", "{}").await.unwrap();
        assert!(store.contains("session").await.unwrap());

        store.remove("session").await.unwrap();
        assert!(!store.contains("session").await.unwrap());
    }

    #[tokio::test]
    async fn test_set_replaces_previous_value() {
        let store = MapStore::default();
        store.set("k", "first").await.unwrap();
        store.set("k", "second").await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("second"));
    }
}
