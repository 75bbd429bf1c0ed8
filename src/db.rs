use std::{collections::HashMap, future::Future, str::FromStr};

use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use tokio::sync::RwLock;

use crate::error::AppResult;

/// String-keyed text slots, the same surface a browser's local storage offers.
///
/// `set_items` must be atomic: either every entry becomes visible or none does.
pub trait KeyValueStore: Send + Sync + 'static {
    fn get_item(&self, key: &str) -> impl Future<Output = AppResult<Option<String>>> + Send;

    fn set_item(&self, key: &str, value: String) -> impl Future<Output = AppResult<()>> + Send;

    fn remove_item(&self, key: &str) -> impl Future<Output = AppResult<()>> + Send;

    fn set_items(
        &self,
        entries: Vec<(String, String)>,
    ) -> impl Future<Output = AppResult<()>> + Send;
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    slots: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    async fn get_item(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.slots.read().await.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: String) -> AppResult<()> {
        self.slots.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> AppResult<()> {
        self.slots.write().await.remove(key);
        Ok(())
    }

    async fn set_items(&self, entries: Vec<(String, String)>) -> AppResult<()> {
        let mut slots = self.slots.write().await;
        for (key, value) in entries {
            slots.insert(key, value);
        }
        Ok(())
    }
}

/// Key-value slots kept in a single SQLite table.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        // Every connection to `:memory:` opens its own empty database.
        let pool = if database_url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await?
        } else {
            SqlitePoolOptions::new()
                .max_connections(5)
                .connect_with(options)
                .await?
        };
        init_schema(&pool).await?;
        Ok(Self { pool })
    }
}

async fn init_schema(pool: &SqlitePool) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS kv_store (
            key TEXT PRIMARY KEY NOT NULL,
            value TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

const UPSERT: &str = r#"
    INSERT INTO kv_store (key, value)
    VALUES (?1, ?2)
    ON CONFLICT (key) DO UPDATE SET value = excluded.value
"#;

impl KeyValueStore for SqliteStore {
    async fn get_item(&self, key: &str) -> AppResult<Option<String>> {
        let row: Option<(String,)> = sqlx::query_as("SELECT value FROM kv_store WHERE key = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|(value,)| value))
    }

    async fn set_item(&self, key: &str, value: String) -> AppResult<()> {
        sqlx::query(UPSERT)
            .bind(key)
            .bind(value)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> AppResult<()> {
        sqlx::query("DELETE FROM kv_store WHERE key = ?1")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn set_items(&self, entries: Vec<(String, String)>) -> AppResult<()> {
        let mut txn = self.pool.begin().await?;
        for (key, value) in entries {
            sqlx::query(UPSERT)
                .bind(key)
                .bind(value)
                .execute(&mut *txn)
                .await?;
        }
        txn.commit().await?;
        Ok(())
    }
}

/// Backend picked from `STORAGE_URL`.
#[derive(Debug)]
pub enum Storage {
    Memory(MemoryStore),
    Sqlite(SqliteStore),
}

/// `memory://` keeps everything in process; anything else is handed to SQLite.
pub async fn open_storage(storage_url: &str) -> anyhow::Result<Storage> {
    if storage_url.starts_with("memory:") {
        tracing::info!("using in-memory storage");
        return Ok(Storage::Memory(MemoryStore::new()));
    }
    let store = SqliteStore::connect(storage_url).await?;
    tracing::info!(url = %storage_url, "opened sqlite storage");
    Ok(Storage::Sqlite(store))
}

impl KeyValueStore for Storage {
    async fn get_item(&self, key: &str) -> AppResult<Option<String>> {
        match self {
            Storage::Memory(s) => s.get_item(key).await,
            Storage::Sqlite(s) => s.get_item(key).await,
        }
    }

    async fn set_item(&self, key: &str, value: String) -> AppResult<()> {
        match self {
            Storage::Memory(s) => s.set_item(key, value).await,
            Storage::Sqlite(s) => s.set_item(key, value).await,
        }
    }

    async fn remove_item(&self, key: &str) -> AppResult<()> {
        match self {
            Storage::Memory(s) => s.remove_item(key).await,
            Storage::Sqlite(s) => s.remove_item(key).await,
        }
    }

    async fn set_items(&self, entries: Vec<(String, String)>) -> AppResult<()> {
        match self {
            Storage::Memory(s) => s.set_items(entries).await,
            Storage::Sqlite(s) => s.set_items(entries).await,
        }
    }
}
