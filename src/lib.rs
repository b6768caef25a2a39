//! Botanix
//!
//! A dispatcher for conversational Telegram workflows. Incoming messages are
//! routed to stateful multi-step "tracks" (registration, help, ...) using a
//! per-user context that records the current track and step, and the context
//! is advanced according to each step's result.

pub mod config;
pub mod handlers;
pub mod routing;
pub mod state;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{BotanixError, Result};

// Re-export main components for easy access
pub use routing::{Dispatcher, TrackHandler, TrackSteps};
pub use state::{ContextStore, HandlingContext, HandlingResult, InMemoryContextStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
