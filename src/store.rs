use std::{fmt, sync::Arc};

use serde::{Serialize, de::DeserializeOwned};

use crate::{db::KeyValueStore, error::AppResult};

/// Slot holding the signed-in user snapshot.
pub const SESSION_SLOT: &str = "currentUser";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Users,
    Restaurants,
    Dishes,
    Reviews,
}

impl Collection {
    pub fn key(self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::Restaurants => "restaurants",
            Collection::Dishes => "dishes",
            Collection::Reviews => "reviews",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Whole-collection reads and writes over a [`KeyValueStore`].
///
/// Each collection is one JSON array under its own key. Text that is missing
/// or does not parse reads back as an empty collection.
pub struct RecordStore<S> {
    kv: Arc<S>,
}

impl<S> Clone for RecordStore<S> {
    fn clone(&self) -> Self {
        Self {
            kv: Arc::clone(&self.kv),
        }
    }
}

impl<S: KeyValueStore> RecordStore<S> {
    pub fn new(kv: S) -> Self {
        Self { kv: Arc::new(kv) }
    }

    pub fn backend(&self) -> &S {
        &self.kv
    }

    pub async fn load<T: DeserializeOwned>(&self, collection: Collection) -> AppResult<Vec<T>> {
        let Some(text) = self.kv.get_item(collection.key()).await? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str(&text) {
            Ok(records) => Ok(records),
            Err(err) => {
                tracing::warn!(
                    %collection,
                    error = %err,
                    "unreadable collection, treating as empty"
                );
                Ok(Vec::new())
            }
        }
    }

    pub async fn save<T: Serialize>(&self, collection: Collection, records: &[T]) -> AppResult<()> {
        let text = serde_json::to_string(records)?;
        self.kv.set_item(collection.key(), text).await
    }

    /// Replaces several collections in one atomic write.
    pub async fn save_many(&self, batch: WriteBatch) -> AppResult<()> {
        if batch.entries.is_empty() {
            return Ok(());
        }
        self.kv.set_items(batch.entries).await
    }

    pub async fn load_slot<T: DeserializeOwned>(&self, key: &str) -> AppResult<Option<T>> {
        let Some(text) = self.kv.get_item(key).await? else {
            return Ok(None);
        };
        match serde_json::from_str(&text) {
            Ok(value) => Ok(Some(value)),
            Err(err) => {
                tracing::warn!(slot = key, error = %err, "unreadable slot, ignoring");
                Ok(None)
            }
        }
    }

    pub async fn save_slot<T: Serialize>(&self, key: &str, value: &T) -> AppResult<()> {
        let text = serde_json::to_string(value)?;
        self.kv.set_item(key, text).await
    }

    pub async fn clear_slot(&self, key: &str) -> AppResult<()> {
        self.kv.remove_item(key).await
    }
}

/// Serialized collections waiting to be written together.
#[derive(Debug, Default)]
pub struct WriteBatch {
    entries: Vec<(String, String)>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put<T: Serialize>(mut self, collection: Collection, records: &[T]) -> AppResult<Self> {
        let text = serde_json::to_string(records)?;
        self.entries.push((collection.key().to_string(), text));
        Ok(self)
    }
}
