//! Inbound message classification
//!
//! A top-level command is a single token made of the command marker followed
//! by letters and digits, e.g. `/register`. Matching is case-insensitive.
//! Anything else continues whatever track the user is already in.

use once_cell::sync::Lazy;
use regex::Regex;

/// Character every top-level command starts with
pub const COMMAND_MARKER: char = '/';

static COMMAND_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^/([a-z0-9]+)$").expect("command pattern is a valid regex")
});

/// How an inbound message should be routed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    /// Start (or restart) the named track
    TrackStart { track: String },
    /// Input for the user's active track
    Continuation,
}

/// Classify a raw message
pub fn classify(raw: &str) -> Inbound {
    let normalized = raw.trim().to_lowercase();
    match COMMAND_PATTERN.captures(&normalized) {
        Some(caps) => Inbound::TrackStart {
            track: caps[1].to_string(),
        },
        None => Inbound::Continuation,
    }
}

/// Whether `name` can be used as a command token (without the marker)
pub fn is_command_token(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric())
}
