//! Reply transport used by step functions

use async_trait::async_trait;
use teloxide::{prelude::*, types::ChatId, Bot};
use crate::utils::errors::Result;

/// Sends text back to a user
#[async_trait]
pub trait Replier: Send + Sync {
    async fn send_text(&self, user_id: i64, text: &str) -> Result<()>;
}

#[async_trait]
impl Replier for Bot {
    async fn send_text(&self, user_id: i64, text: &str) -> Result<()> {
        self.send_message(ChatId(user_id), text).await?;
        Ok(())
    }
}
