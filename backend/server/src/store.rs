//! # Document Store
//!
//! Flat JSON documents grouped into collections and keyed by id.
//!
//! ## Collections
//!
//! - `carousel`: hero slides, ordered by `order`
//! - `projects`: portfolio entries with one or more images
//! - `team`: team members
//! - `contacts`: messages submitted through the public forms
//! - `footer`: a single site-wide document
//!
//! ## Backends
//!
//! - [`RedisStore`](crate::database::RedisStore): one Redis hash per collection
//! - [`MemoryStore`]: process-local map, used by tests and `STORE_BACKEND=memory`
use std::{
    collections::{BTreeMap, HashMap},
    marker::PhantomData,
};

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::warn;

use crate::error::StoreError;

pub const CAROUSEL: &str = "carousel";
pub const PROJECTS: &str = "projects";
pub const TEAM: &str = "team";
pub const CONTACTS: &str = "contacts";
pub const FOOTER: &str = "footer";

#[async_trait]
pub trait Store: Send + Sync {
    async fn list(&self, collection: &str) -> Result<Vec<Value>, StoreError>;

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreError>;

    /// Inserts or replaces.
    async fn put(&self, collection: &str, id: &str, doc: &Value) -> Result<(), StoreError>;

    /// Returns whether a document was removed.
    async fn delete(&self, collection: &str, id: &str) -> Result<bool, StoreError>;

    async fn clear(&self, collection: &str) -> Result<(), StoreError>;
}

#[derive(Default)]
pub struct MemoryStore {
    collections: Mutex<HashMap<String, BTreeMap<String, Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn list(&self, collection: &str) -> Result<Vec<Value>, StoreError> {
        Ok(self
            .collections
            .lock()
            .await
            .get(collection)
            .map(|docs| docs.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreError> {
        Ok(self
            .collections
            .lock()
            .await
            .get(collection)
            .and_then(|docs| docs.get(id).cloned()))
    }

    async fn put(&self, collection: &str, id: &str, doc: &Value) -> Result<(), StoreError> {
        if !doc.is_object() {
            return Err(StoreError::Backend(format!(
                "refusing to store non-object document {id} in {collection}"
            )));
        }

        self.collections
            .lock()
            .await
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), doc.clone());

        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<bool, StoreError> {
        Ok(self
            .collections
            .lock()
            .await
            .get_mut(collection)
            .is_some_and(|docs| docs.remove(id).is_some()))
    }

    async fn clear(&self, collection: &str) -> Result<(), StoreError> {
        self.collections.lock().await.remove(collection);
        Ok(())
    }
}

pub trait Document: Serialize + DeserializeOwned + Send + Sync {
    const COLLECTION: &'static str;

    fn id(&self) -> &str;

    /// Upgrades documents written by older schemas. Runs after every read.
    fn normalize(&mut self) {}
}

/// Typed view over one collection of a [`Store`].
pub struct Repository<'a, T> {
    store: &'a dyn Store,
    _marker: PhantomData<T>,
}

impl<'a, T: Document> Repository<'a, T> {
    pub fn new(store: &'a dyn Store) -> Self {
        Self {
            store,
            _marker: PhantomData,
        }
    }

    /// Documents that no longer decode are skipped with a warning instead of failing the listing.
    pub async fn list(&self) -> Result<Vec<T>, StoreError> {
        let raw = self.store.list(T::COLLECTION).await?;

        Ok(raw
            .into_iter()
            .filter_map(|value| match serde_json::from_value::<T>(value) {
                Ok(mut doc) => {
                    doc.normalize();
                    Some(doc)
                }
                Err(e) => {
                    warn!("Skipping undecodable document in {}: {e}", T::COLLECTION);
                    None
                }
            })
            .collect())
    }

    pub async fn find(&self, id: &str) -> Result<Option<T>, StoreError> {
        match self.store.get(T::COLLECTION, id).await? {
            Some(value) => {
                let mut doc: T = serde_json::from_value(value)?;
                doc.normalize();
                Ok(Some(doc))
            }
            None => Ok(None),
        }
    }

    pub async fn save(&self, doc: &T) -> Result<(), StoreError> {
        let value = serde_json::to_value(doc)?;
        self.store.put(T::COLLECTION, doc.id(), &value).await
    }

    pub async fn remove(&self, id: &str) -> Result<bool, StoreError> {
        self.store.delete(T::COLLECTION, id).await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn test_memory_store_crud() {
        let store = MemoryStore::new();
        let doc = json!({ "_id": "a", "title": "first" });

        store.put(CAROUSEL, "a", &doc).await.unwrap();
        assert_eq!(store.get(CAROUSEL, "a").await.unwrap(), Some(doc.clone()));
        assert_eq!(store.list(CAROUSEL).await.unwrap(), vec![doc]);
        assert!(store.list(PROJECTS).await.unwrap().is_empty());

        assert!(store.delete(CAROUSEL, "a").await.unwrap());
        assert!(!store.delete(CAROUSEL, "a").await.unwrap());
        assert_eq!(store.get(CAROUSEL, "a").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_memory_store_rejects_non_objects() {
        let store = MemoryStore::new();
        assert!(store.put(TEAM, "x", &json!([1, 2])).await.is_err());
    }

    #[tokio::test]
    async fn test_clear_only_touches_one_collection() {
        let store = MemoryStore::new();
        store.put(TEAM, "a", &json!({})).await.unwrap();
        store.put(PROJECTS, "b", &json!({})).await.unwrap();

        store.clear(TEAM).await.unwrap();

        assert!(store.list(TEAM).await.unwrap().is_empty());
        assert_eq!(store.list(PROJECTS).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_repository_list_skips_undecodable() {
        let store = MemoryStore::new();
        store
            .put(
                CAROUSEL,
                "good",
                &json!({
                    "_id": "good",
                    "title": "Hero",
                    "description": "d",
                    "image": "/a.png",
                    "createdAt": "2024-01-01T00:00:00Z",
                    "updatedAt": "2024-01-01T00:00:00Z",
                }),
            )
            .await
            .unwrap();
        store
            .put(CAROUSEL, "broken", &json!({ "_id": "broken" }))
            .await
            .unwrap();

        let items = Repository::<crate::models::CarouselItem>::new(&store)
            .list()
            .await
            .unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "good");
    }
}
