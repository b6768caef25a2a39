//! Test helpers module
//!
//! Test doubles for the reply transport and the context store, plus the
//! small sample tracks the dispatcher tests route to.

#![allow(dead_code)]

pub mod stores;
pub mod tracks;

use std::sync::{Arc, Mutex, Once};
use async_trait::async_trait;
use botanix::handlers::Replier;
use botanix::Result;

pub use stores::*;
pub use tracks::*;

static INIT: Once = Once::new();

/// Initialize test environment
pub fn init_test_env() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    });
}

/// Replier that records every message instead of sending it
#[derive(Debug, Default, Clone)]
pub struct RecordingReplier {
    sent: Arc<Mutex<Vec<(i64, String)>>>,
}

impl RecordingReplier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<(i64, String)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn last_text(&self) -> Option<String> {
        self.sent.lock().unwrap().last().map(|(_, text)| text.clone())
    }

    pub fn count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl Replier for RecordingReplier {
    async fn send_text(&self, user_id: i64, text: &str) -> Result<()> {
        self.sent.lock().unwrap().push((user_id, text.to_string()));
        Ok(())
    }
}
