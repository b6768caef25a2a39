//! State management module
//!
//! This module handles the per-user handling context, the results step
//! functions produce, and context persistence.

pub mod context;
pub mod result;
pub mod storage;

// Re-export commonly used state components
pub use context::{ContextSummary, HandlingContext, Timestamp};
pub use result::{Disposition, HandlingResult};
pub use storage::{build_store, ContextStore, InMemoryContextStore, RedisContextStore};
