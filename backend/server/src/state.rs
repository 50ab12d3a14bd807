use std::sync::Arc;

use tracing::info;

use super::{
    config::{Config, StoreBackend},
    database::RedisStore,
    error::StoreError,
    store::{MemoryStore, Store},
};

pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn Store>,
}

impl AppState {
    pub async fn new() -> Result<Arc<Self>, StoreError> {
        let config = Config::load();

        let store: Arc<dyn Store> = match config.store_backend {
            StoreBackend::Redis => {
                info!("Connecting to Redis at {}", config.redis_url);
                Arc::new(RedisStore::connect(&config.redis_url).await?)
            }
            StoreBackend::Memory => {
                info!("Using in-memory store, content will not survive a restart");
                Arc::new(MemoryStore::new())
            }
        };

        Ok(Self::with_store(config, store))
    }

    pub fn with_store(config: Config, store: Arc<dyn Store>) -> Arc<Self> {
        Arc::new(Self { config, store })
    }
}
