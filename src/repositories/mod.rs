use std::marker::PhantomData;

use serde::{Serialize, de::DeserializeOwned};
use uuid::Uuid;

use crate::{
    db::KeyValueStore,
    error::{AppError, AppResult},
    models::{Dish, Restaurant, Review, User},
    store::{Collection, RecordStore},
};

pub mod dishes;
pub mod restaurants;
pub mod reviews;
pub mod users;

pub use restaurants::CascadeReport;

/// A record type stored as one collection.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync {
    const COLLECTION: Collection;
    /// Singular noun used in not-found messages.
    const NOUN: &'static str;

    fn id(&self) -> Uuid;
}

impl Record for User {
    const COLLECTION: Collection = Collection::Users;
    const NOUN: &'static str = "User";

    fn id(&self) -> Uuid {
        self.id
    }
}

impl Record for Restaurant {
    const COLLECTION: Collection = Collection::Restaurants;
    const NOUN: &'static str = "Restaurant";

    fn id(&self) -> Uuid {
        self.id
    }
}

impl Record for Dish {
    const COLLECTION: Collection = Collection::Dishes;
    const NOUN: &'static str = "Dish";

    fn id(&self) -> Uuid {
        self.id
    }
}

impl Record for Review {
    const COLLECTION: Collection = Collection::Reviews;
    const NOUN: &'static str = "Review";

    fn id(&self) -> Uuid {
        self.id
    }
}

pub type Users<'a, S> = Repository<'a, S, User>;
pub type Restaurants<'a, S> = Repository<'a, S, Restaurant>;
pub type Dishes<'a, S> = Repository<'a, S, Dish>;
pub type Reviews<'a, S> = Repository<'a, S, Review>;

/// Linear-scan CRUD over the collection owned by `T`.
pub struct Repository<'a, S, T> {
    store: &'a RecordStore<S>,
    _record: PhantomData<fn() -> T>,
}

impl<'a, S: KeyValueStore, T: Record> Repository<'a, S, T> {
    pub fn new(store: &'a RecordStore<S>) -> Self {
        Self {
            store,
            _record: PhantomData,
        }
    }

    pub(crate) fn store(&self) -> &'a RecordStore<S> {
        self.store
    }

    pub async fn find_all(&self) -> AppResult<Vec<T>> {
        self.store.load(T::COLLECTION).await
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<T> {
        self.find_all()
            .await?
            .into_iter()
            .find(|r| r.id() == id)
            .ok_or_else(|| AppError::not_found(T::NOUN))
    }

    pub async fn find_where<P>(&self, predicate: P) -> AppResult<Vec<T>>
    where
        P: Fn(&T) -> bool,
    {
        let mut records = self.find_all().await?;
        records.retain(|r| predicate(r));
        Ok(records)
    }

    pub async fn exists(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.find_all().await?.iter().any(|r| r.id() == id))
    }

    pub async fn insert(&self, record: T) -> AppResult<T> {
        let mut records = self.find_all().await?;
        records.push(record.clone());
        self.store.save(T::COLLECTION, &records).await?;
        Ok(record)
    }

    /// Overwrites the stored record that has the same id.
    pub async fn replace(&self, record: T) -> AppResult<T> {
        let mut records = self.find_all().await?;
        let slot = records
            .iter_mut()
            .find(|r| r.id() == record.id())
            .ok_or_else(|| AppError::not_found(T::NOUN))?;
        *slot = record.clone();
        self.store.save(T::COLLECTION, &records).await?;
        Ok(record)
    }

    pub async fn delete_by_id(&self, id: Uuid) -> AppResult<T> {
        let mut records = self.find_all().await?;
        let position = records
            .iter()
            .position(|r| r.id() == id)
            .ok_or_else(|| AppError::not_found(T::NOUN))?;
        let removed = records.remove(position);
        self.store.save(T::COLLECTION, &records).await?;
        Ok(removed)
    }

    /// Returns how many records were removed.
    pub async fn delete_where<P>(&self, predicate: P) -> AppResult<usize>
    where
        P: Fn(&T) -> bool,
    {
        let mut records = self.find_all().await?;
        let before = records.len();
        records.retain(|r| !predicate(r));
        let removed = before - records.len();
        if removed > 0 {
            self.store.save(T::COLLECTION, &records).await?;
        }
        Ok(removed)
    }
}

impl<S: KeyValueStore> RecordStore<S> {
    pub fn repository<T: Record>(&self) -> Repository<'_, S, T> {
        Repository::new(self)
    }

    pub fn users(&self) -> Users<'_, S> {
        Repository::new(self)
    }

    pub fn restaurants(&self) -> Restaurants<'_, S> {
        Repository::new(self)
    }

    pub fn dishes(&self) -> Dishes<'_, S> {
        Repository::new(self)
    }

    pub fn reviews(&self) -> Reviews<'_, S> {
        Repository::new(self)
    }
}
