//! Bot handlers module
//!
//! This module contains the Telegram-facing side of the bot:
//! - Command tracks that the dispatcher routes to
//! - The message endpoint that feeds incoming text to the dispatcher
//! - The reply transport step functions talk through

pub mod commands;
pub mod messages;
pub mod reply;

// Re-export commonly used handler types
pub use commands::*;
pub use messages::*;
pub use reply::Replier;
