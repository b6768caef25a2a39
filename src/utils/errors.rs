//! Error handling for Botanix
//!
//! This module defines the main error type used throughout the dispatcher,
//! the storage adapters and the sample tracks.

use thiserror::Error;

/// Main error type for Botanix
#[derive(Error, Debug)]
pub enum BotanixError {
    #[error("Step {step} does not exist in track '{track}' (user {user_id}, input {input:?})")]
    UnknownStep {
        track: String,
        step: u32,
        user_id: i64,
        input: String,
    },

    #[error("Could not find a handler for track '{track}' (user {user_id}, input {input:?})")]
    UnknownTrack {
        track: String,
        user_id: i64,
        input: String,
    },

    #[error("Track '{track}' has no step after {step} (user {user_id})")]
    StepOverflow { track: String, step: u32, user_id: i64 },

    #[error("Malformed context: {0}")]
    MalformedContext(String),

    #[error("Payload key not found: {key}")]
    KeyNotFound { key: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Telegram API error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Botanix operations
pub type Result<T> = std::result::Result<T, BotanixError>;

impl From<config::ConfigError> for BotanixError {
    fn from(err: config::ConfigError) -> Self {
        BotanixError::Config(err.to_string())
    }
}

impl BotanixError {
    /// Check if the error is recoverable
    ///
    /// Routing and state-integrity errors mean deployed code and persisted
    /// state disagree, so retrying the same request cannot help.
    pub fn is_recoverable(&self) -> bool {
        match self {
            BotanixError::UnknownStep { .. } => false,
            BotanixError::UnknownTrack { .. } => false,
            BotanixError::StepOverflow { .. } => false,
            BotanixError::MalformedContext(_) => false,
            BotanixError::KeyNotFound { .. } => false,
            BotanixError::Config(_) => false,
            BotanixError::Redis(_) => true,
            BotanixError::Telegram(_) => true,
            BotanixError::Serialization(_) => false,
            BotanixError::Io(_) => true,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            BotanixError::UnknownStep { .. } => ErrorSeverity::Critical,
            BotanixError::UnknownTrack { .. } => ErrorSeverity::Critical,
            BotanixError::StepOverflow { .. } => ErrorSeverity::Critical,
            BotanixError::MalformedContext(_) => ErrorSeverity::Critical,
            BotanixError::Config(_) => ErrorSeverity::Critical,
            BotanixError::Telegram(_) => ErrorSeverity::Warning,
            _ => ErrorSeverity::Error,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}
