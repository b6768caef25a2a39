//! Handling context management
//!
//! This module holds the per-user cursor of a conversation: which track the
//! user is in, which step of it comes next, and the payload collected so far.

use std::collections::HashMap;
use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::utils::errors::{BotanixError, Result};

const NANOS_PER_SECOND: i128 = 1_000_000_000;

/// Seconds since the Unix epoch with nanosecond precision
///
/// Serialized as a decimal string so that no digit is lost on a round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(Decimal);

impl Timestamp {
    /// Current wall-clock time
    pub fn now() -> Self {
        Self::from_datetime(Utc::now())
    }

    pub fn from_datetime(at: DateTime<Utc>) -> Self {
        let nanos = i128::from(at.timestamp()) * NANOS_PER_SECOND
            + i128::from(at.timestamp_subsec_nanos());
        Self(Decimal::from_i128_with_scale(nanos, 9))
    }

    /// Fractional seconds since the epoch
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// Convert back to a calendar time, if it is representable
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        let nanos = self.0.checked_mul(Decimal::from(NANOS_PER_SECOND as i64))?.trunc().to_i128()?;
        let secs = i64::try_from(nanos.div_euclid(NANOS_PER_SECOND)).ok()?;
        let subsec = u32::try_from(nanos.rem_euclid(NANOS_PER_SECOND)).ok()?;
        DateTime::<Utc>::from_timestamp(secs, subsec)
    }
}

impl From<Decimal> for Timestamp {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

/// Per-user conversation state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandlingContext {
    /// User this context belongs to
    user_id: i64,
    /// Active track
    track_name: String,
    /// Step of the active track that handles the next input
    step: u32,
    /// Values collected by step functions
    payload: HashMap<String, serde_json::Value>,
    /// Fixed at construction, diagnostics only
    created_at: Timestamp,
}

impl HandlingContext {
    /// Create a context at step 0 with an empty payload
    pub fn new(user_id: i64, track_name: impl Into<String>) -> Self {
        Self {
            user_id,
            track_name: track_name.into(),
            step: 0,
            payload: HashMap::new(),
            created_at: Timestamp::now(),
        }
    }

    pub fn user_id(&self) -> i64 {
        self.user_id
    }

    pub fn track_name(&self) -> &str {
        &self.track_name
    }

    pub fn step(&self) -> u32 {
        self.step
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn payload(&self) -> &HashMap<String, serde_json::Value> {
        &self.payload
    }

    /// Store a serializable value under `key`, replacing any previous value
    pub fn set_payload<T: Serialize>(&mut self, key: &str, value: T) -> Result<()> {
        let json_value = serde_json::to_value(value)?;
        self.payload.insert(key.to_string(), json_value);
        Ok(())
    }

    /// Read a value previously stored with [`set_payload`](Self::set_payload)
    pub fn get_payload<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        let value = self.payload_value(key)?;
        Ok(serde_json::from_value(value.clone())?)
    }

    pub fn payload_value(&self, key: &str) -> Result<&serde_json::Value> {
        self.payload.get(key).ok_or_else(|| BotanixError::KeyNotFound {
            key: key.to_string(),
        })
    }

    pub fn has_payload(&self, key: &str) -> bool {
        self.payload.contains_key(key)
    }

    pub fn remove_payload(&mut self, key: &str) -> Option<serde_json::Value> {
        self.payload.remove(key)
    }

    /// Move to the next step; fails at the last representable step
    pub fn advance_step(&mut self) -> Result<()> {
        self.step = self.step.checked_add(1).ok_or_else(|| BotanixError::StepOverflow {
            track: self.track_name.clone(),
            step: self.step,
            user_id: self.user_id,
        })?;
        Ok(())
    }

    /// Jump to `step`, forward or backward
    pub fn override_step(&mut self, step: u32) {
        self.step = step;
    }

    /// Continue in another track from `step`; the payload is kept
    pub fn switch_track(&mut self, track_name: impl Into<String>, step: u32) {
        self.track_name = track_name.into();
        self.step = step;
    }

    /// Encode to the persisted wire format
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode from the persisted wire format
    pub fn from_json_string(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| BotanixError::MalformedContext(e.to_string()))
    }

    /// Create a summary of the context for logging
    pub fn summary(&self) -> ContextSummary {
        let mut payload_keys: Vec<String> = self.payload.keys().cloned().collect();
        payload_keys.sort();
        ContextSummary {
            user_id: self.user_id,
            track_name: self.track_name.clone(),
            step: self.step,
            payload_keys,
            created_at: self.created_at.to_datetime(),
        }
    }
}

/// Context summary for logging and debugging
#[derive(Debug, Clone, Serialize)]
pub struct ContextSummary {
    pub user_id: i64,
    pub track_name: String,
    pub step: u32,
    pub payload_keys: Vec<String>,
    pub created_at: Option<DateTime<Utc>>,
}
