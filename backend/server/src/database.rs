//! # Redis
//!
//! Persistent document store for site content.
//!
//! ## Requirements
//!
//! - Flat documents, no joins
//! - Small dataset: tens of slides, projects and team members, a few thousand messages at most
//! - Lookups by id and full collection scans for listings
//!
//! ## Implementation
//!
//! - Redis hash per collection: `agency:<collection>`
//! - Field is the document id, value is the document as JSON text
//! - Sorting and filtering happen in the handlers after `HGETALL`, collections are small
//! - Connection manager reconnects transparently, one retry, 100ms connect timeout
use std::{collections::HashMap, time::Duration};

use async_trait::async_trait;
use redis::{
    AsyncCommands, Client,
    aio::{ConnectionManager, ConnectionManagerConfig},
};
use serde_json::Value;

use crate::{error::StoreError, store::Store};

pub const KEY_PREFIX: &str = "agency";

pub async fn init_redis(redis_url: &str) -> Result<ConnectionManager, StoreError> {
    let config = ConnectionManagerConfig::new()
        .set_number_of_retries(1)
        .set_connection_timeout(Duration::from_millis(100));

    let client = Client::open(redis_url)?;
    let connection_manager = client.get_connection_manager_with_config(config).await?;

    Ok(connection_manager)
}

#[derive(Clone)]
pub struct RedisStore {
    connection: ConnectionManager,
}

impl RedisStore {
    pub async fn connect(redis_url: &str) -> Result<Self, StoreError> {
        Ok(Self {
            connection: init_redis(redis_url).await?,
        })
    }
}

fn collection_key(collection: &str) -> String {
    format!("{KEY_PREFIX}:{collection}")
}

/// Text that is not JSON comes back as a string value, which no document decodes from.
fn decode_entry(text: String) -> Value {
    serde_json::from_str(&text).unwrap_or(Value::String(text))
}

#[async_trait]
impl Store for RedisStore {
    async fn list(&self, collection: &str) -> Result<Vec<Value>, StoreError> {
        let mut connection = self.connection.clone();
        let raw: HashMap<String, String> = connection.hgetall(collection_key(collection)).await?;

        Ok(raw.into_values().map(decode_entry).collect())
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreError> {
        let mut connection = self.connection.clone();
        let raw: Option<String> = connection.hget(collection_key(collection), id).await?;

        raw.map(|text| serde_json::from_str(&text))
            .transpose()
            .map_err(StoreError::from)
    }

    async fn put(&self, collection: &str, id: &str, doc: &Value) -> Result<(), StoreError> {
        let mut connection = self.connection.clone();
        let text = serde_json::to_string(doc)?;

        let _: () = connection.hset(collection_key(collection), id, text).await?;

        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<bool, StoreError> {
        let mut connection = self.connection.clone();
        let removed: i64 = connection.hdel(collection_key(collection), id).await?;

        Ok(removed > 0)
    }

    async fn clear(&self, collection: &str) -> Result<(), StoreError> {
        let mut connection = self.connection.clone();
        let _: () = connection.del(collection_key(collection)).await?;

        Ok(())
    }
}
