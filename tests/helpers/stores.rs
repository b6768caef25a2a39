//! Context store test doubles

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use async_trait::async_trait;
use botanix::state::{ContextStore, HandlingContext, InMemoryContextStore};
use botanix::Result;

/// Store that fails the test as soon as anything touches it
#[derive(Debug, Default, Clone, Copy)]
pub struct UntouchableStore;

#[async_trait]
impl ContextStore for UntouchableStore {
    async fn get_active(&self, user_id: i64) -> Result<Option<HandlingContext>> {
        panic!("store read for user {}", user_id);
    }

    async fn create_new(&self, user_id: i64, track_name: &str) -> Result<HandlingContext> {
        panic!("store created context for user {} in track {}", user_id, track_name);
    }

    async fn put(&self, user_id: i64, _context: &HandlingContext) -> Result<()> {
        panic!("store written for user {}", user_id);
    }

    async fn clear(&self, user_id: i64) -> Result<()> {
        panic!("store cleared for user {}", user_id);
    }
}

/// In-memory store that counts writes
#[derive(Debug, Default, Clone)]
pub struct CountingStore {
    inner: InMemoryContextStore,
    puts: Arc<AtomicUsize>,
    creates: Arc<AtomicUsize>,
    clears: Arc<AtomicUsize>,
}

impl CountingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn puts(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }

    pub fn creates(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }

    pub fn clears(&self) -> usize {
        self.clears.load(Ordering::SeqCst)
    }

    /// Total number of writes of any kind
    pub fn writes(&self) -> usize {
        self.puts() + self.creates() + self.clears()
    }
}

#[async_trait]
impl ContextStore for CountingStore {
    async fn get_active(&self, user_id: i64) -> Result<Option<HandlingContext>> {
        self.inner.get_active(user_id).await
    }

    async fn create_new(&self, user_id: i64, track_name: &str) -> Result<HandlingContext> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        self.inner.create_new(user_id, track_name).await
    }

    async fn put(&self, user_id: i64, context: &HandlingContext) -> Result<()> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        self.inner.put(user_id, context).await
    }

    async fn clear(&self, user_id: i64) -> Result<()> {
        self.clears.fetch_add(1, Ordering::SeqCst);
        self.inner.clear(user_id).await
    }
}
