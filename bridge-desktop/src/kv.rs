//! Key-Value Storage using SQLite

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result},
    storage::KeyValueStore,
};
use sqlx::{sqlite::SqlitePool, Row};
use std::path::PathBuf;
use tracing::debug;

/// SQLite-backed key-value store implementation
///
/// Stores string entries in a single table:
/// - Durable across restarts
/// - Upsert semantics for `set`
/// - Async operations via sqlx
pub struct SqliteKeyValueStore {
    pool: SqlitePool,
}

impl SqliteKeyValueStore {
    /// Open the store at the given database path.
    ///
    /// The parent directory and the database file are created on first
    /// use.
    pub async fn open(db_path: PathBuf) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(BridgeError::Io)?;
        }

        // Convert path to string, replacing backslashes with forward slashes for SQLite URL.
        // mode=rwc creates the database file if it does not exist yet.
        let path_str = db_path.to_string_lossy().replace('\\', "/");
        let db_url = format!("sqlite://{}?mode=rwc", path_str);

        let pool = SqlitePool::connect(&db_url)
            .await
            .map_err(|e| BridgeError::Storage(format!("Failed to connect to DB: {}", e)))?;

        Self::create_table(&pool).await?;

        debug!(path = ?db_path, "Initialized key-value store");
        Ok(Self { pool })
    }

    /// Create an in-memory store (for testing)
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePool::connect("sqlite::memory:")
            .await
            .map_err(|e| BridgeError::Storage(format!("Failed to connect to DB: {}", e)))?;

        Self::create_table(&pool).await?;
        Ok(Self { pool })
    }

    async fn create_table(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS kv_entries (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at INTEGER NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await
        .map_err(|e| BridgeError::Storage(format!("Failed to create table: {}", e)))?;
        Ok(())
    }

    /// Get the current Unix timestamp
    fn now() -> i64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0)
    }
}

#[async_trait]
impl KeyValueStore for SqliteKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let row = sqlx::query("SELECT value FROM kv_entries WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| BridgeError::Storage(format!("Failed to get entry: {}", e)))?;

        Ok(row.map(|row| row.get(0)))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO kv_entries (key, value, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(Self::now())
        .execute(&self.pool)
        .await
        .map_err(|e| BridgeError::Storage(format!("Failed to set entry: {}", e)))?;

        debug!(key = key, "Stored entry");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        sqlx::query("DELETE FROM kv_entries WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(|e| BridgeError::Storage(format!("Failed to remove entry: {}", e)))?;

        debug!(key = key, "Removed entry");
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        sqlx::query("DELETE FROM kv_entries")
            .execute(&self.pool)
            .await
            .map_err(|e| BridgeError::Storage(format!("Failed to clear entries: {}", e)))?;

        debug!("Cleared all entries");
        Ok(())
    }
}

/// Default location for the client's state database.
///
/// Resolves under the platform data directory, for example
/// `~/.local/share/todo-core/state.db` on Linux.
pub fn default_state_path() -> Result<PathBuf> {
    let base = dirs::data_dir()
        .ok_or_else(|| BridgeError::NotAvailable("no platform data directory".to_string()))?;
    Ok(base.join("todo-core").join("state.db"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_kv_store_creation() {
        let _store = SqliteKeyValueStore::in_memory().await.unwrap();
        // Just verify it constructs
    }

    #[tokio::test]
    async fn test_round_trip_and_remove() {
        let store = SqliteKeyValueStore::in_memory().await.unwrap();

        store.set("auth-storage", r#"{"authenticated":false}"#).await.unwrap();
        let value = store.get("auth-storage").await.unwrap();
        assert_eq!(value, Some(r#"{"authenticated":false}"#.to_string()));

        store.remove("auth-storage").await.unwrap();
        assert_eq!(store.get("auth-storage").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_overwrites_existing_value() {
        let store = SqliteKeyValueStore::in_memory().await.unwrap();

        store.set("key", "first").await.unwrap();
        store.set("key", "second").await.unwrap();

        assert_eq!(store.get("key").await.unwrap(), Some("second".to_string()));
    }

    #[tokio::test]
    async fn test_remove_missing_key_is_not_an_error() {
        let store = SqliteKeyValueStore::in_memory().await.unwrap();
        store.remove("never-set").await.unwrap();
    }

    #[tokio::test]
    async fn test_contains_follows_get() {
        let store = SqliteKeyValueStore::in_memory().await.unwrap();

        assert!(!store.contains("key").await.unwrap());
        store.set("key", "value").await.unwrap();
        assert!(store.contains("key").await.unwrap());
    }

    #[tokio::test]
    async fn test_clear_removes_everything() {
        let store = SqliteKeyValueStore::in_memory().await.unwrap();

        store.set("a", "1").await.unwrap();
        store.set("b", "2").await.unwrap();
        store.clear().await.unwrap();

        assert_eq!(store.get("a").await.unwrap(), None);
        assert_eq!(store.get("b").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_entries_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("state.db");

        {
            let store = SqliteKeyValueStore::open(db_path.clone()).await.unwrap();
            store.set("auth-storage", "persisted").await.unwrap();
        }

        let reopened = SqliteKeyValueStore::open(db_path).await.unwrap();
        assert_eq!(
            reopened.get("auth-storage").await.unwrap(),
            Some("persisted".to_string())
        );
    }

    #[tokio::test]
    async fn test_open_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("nested").join("deeper").join("state.db");

        let store = SqliteKeyValueStore::open(db_path).await.unwrap();
        store.set("key", "value").await.unwrap();
        assert_eq!(store.get("key").await.unwrap(), Some("value".to_string()));
    }
}
