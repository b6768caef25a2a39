//! Context storage
//!
//! This module defines the storage contract the dispatcher depends on and
//! ships two adapters: an in-process map and a Redis-backed store with
//! expiration.

use std::collections::HashMap;
use std::sync::Arc;
use async_trait::async_trait;
use redis::AsyncCommands;
use tokio::sync::RwLock;
use tracing::{debug, error, info};

use crate::config::{RedisConfig, StorageBackend, StorageConfig};
use crate::utils::errors::Result;
use super::context::HandlingContext;

/// Persists at most one active context per user
///
/// The contract gives no per-user mutual exclusion: concurrent writes for the
/// same user resolve as last-write-wins.
#[async_trait]
pub trait ContextStore: Send + Sync {
    /// Return the user's active context, if any
    async fn get_active(&self, user_id: i64) -> Result<Option<HandlingContext>>;

    /// Create a context at step 0, persist it (replacing any other) and return it
    async fn create_new(&self, user_id: i64, track_name: &str) -> Result<HandlingContext> {
        let context = HandlingContext::new(user_id, track_name);
        self.put(user_id, &context).await?;
        Ok(context)
    }

    /// Overwrite the stored context
    async fn put(&self, user_id: i64, context: &HandlingContext) -> Result<()>;

    /// Delete the stored context; deleting nothing is not an error
    async fn clear(&self, user_id: i64) -> Result<()>;
}

/// In-process store keeping each context in its serialized form
#[derive(Debug, Default, Clone)]
pub struct InMemoryContextStore {
    contexts: Arc<RwLock<HashMap<i64, String>>>,
}

impl InMemoryContextStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of users with an active context
    pub async fn len(&self) -> usize {
        self.contexts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.contexts.read().await.is_empty()
    }

    /// Store raw text for a user, bypassing serialization
    pub async fn put_raw(&self, user_id: i64, raw: impl Into<String>) {
        self.contexts.write().await.insert(user_id, raw.into());
    }
}

#[async_trait]
impl ContextStore for InMemoryContextStore {
    async fn get_active(&self, user_id: i64) -> Result<Option<HandlingContext>> {
        let contexts = self.contexts.read().await;
        contexts
            .get(&user_id)
            .map(|raw| HandlingContext::from_json_string(raw))
            .transpose()
    }

    async fn put(&self, user_id: i64, context: &HandlingContext) -> Result<()> {
        let serialized = context.to_json_string()?;
        self.contexts.write().await.insert(user_id, serialized);
        debug!(user_id = user_id, track = context.track_name(), step = context.step(), "Context stored in memory");
        Ok(())
    }

    async fn clear(&self, user_id: i64) -> Result<()> {
        let removed = self.contexts.write().await.remove(&user_id);
        debug!(user_id = user_id, removed = removed.is_some(), "Context cleared from memory");
        Ok(())
    }
}

/// Redis-based context store
#[derive(Clone)]
pub struct RedisContextStore {
    /// Redis connection manager
    connection_manager: redis::aio::ConnectionManager,
    /// Redis configuration
    config: RedisConfig,
}

impl RedisContextStore {
    /// Connect to Redis
    pub async fn new(config: RedisConfig) -> Result<Self> {
        let client = redis::Client::open(config.url.as_str())?;
        let connection_manager = redis::aio::ConnectionManager::new(client).await?;

        Ok(Self {
            connection_manager,
            config,
        })
    }

    /// Get the Redis key for a user's context
    fn get_context_key(&self, user_id: i64) -> String {
        context_key(&self.config.prefix, user_id)
    }

    /// Test Redis connection
    pub async fn test_connection(&self) -> Result<()> {
        let mut conn = self.connection_manager.clone();
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }
}

fn context_key(prefix: &str, user_id: i64) -> String {
    format!("{}context:{}", prefix, user_id)
}

#[async_trait]
impl ContextStore for RedisContextStore {
    async fn get_active(&self, user_id: i64) -> Result<Option<HandlingContext>> {
        let key = self.get_context_key(user_id);
        debug!(user_id = user_id, key = %key, "Loading context from Redis");

        let mut conn = self.connection_manager.clone();
        let serialized = match conn.get::<_, Option<String>>(&key).await {
            Ok(data) => data,
            Err(e) => {
                error!(user_id = user_id, error = %e, "Failed to get context from Redis");
                return Err(e.into());
            }
        };

        match serialized {
            Some(data) => {
                let context = HandlingContext::from_json_string(&data).map_err(|e| {
                    error!(user_id = user_id, error = %e, "Failed to deserialize context");
                    e
                })?;
                debug!(user_id = user_id, track = context.track_name(), step = context.step(),
                       "Context loaded successfully");
                Ok(Some(context))
            }
            None => {
                debug!(user_id = user_id, "No context found in Redis");
                Ok(None)
            }
        }
    }

    async fn put(&self, user_id: i64, context: &HandlingContext) -> Result<()> {
        let key = self.get_context_key(user_id);
        let serialized = context.to_json_string()?;
        let ttl_seconds = self.config.ttl_seconds;

        let mut conn = self.connection_manager.clone();
        match conn.set_ex::<_, _, ()>(&key, serialized, ttl_seconds).await {
            Ok(_) => {
                debug!(user_id = user_id, track = context.track_name(), step = context.step(),
                       ttl_seconds = ttl_seconds, "Context saved to Redis");
                Ok(())
            }
            Err(e) => {
                error!(user_id = user_id, error = %e, "Failed to save context to Redis");
                Err(e.into())
            }
        }
    }

    async fn clear(&self, user_id: i64) -> Result<()> {
        let key = self.get_context_key(user_id);
        let mut conn = self.connection_manager.clone();

        let deleted: u32 = conn.del(&key).await?;
        debug!(user_id = user_id, deleted = deleted, "Context cleared from Redis");
        Ok(())
    }
}

impl std::fmt::Debug for RedisContextStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisContextStore")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Build the configured store
pub async fn build_store(config: &StorageConfig) -> Result<Arc<dyn ContextStore>> {
    match config.backend {
        StorageBackend::Memory => {
            info!("Using in-memory context store");
            Ok(Arc::new(InMemoryContextStore::new()))
        }
        StorageBackend::Redis => {
            info!(url = %config.redis.url, prefix = %config.redis.prefix, "Using Redis context store");
            let store = RedisContextStore::new(config.redis.clone()).await?;
            store.test_connection().await?;
            Ok(Arc::new(store))
        }
    }
}
