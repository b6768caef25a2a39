//! Message handlers module
//!
//! Feeds incoming text messages to the dispatcher and tells the user when
//! nothing could handle their input.

use std::sync::Arc;
use teloxide::{types::Message, Bot};
use tracing::{debug, warn};

use crate::handlers::reply::Replier;
use crate::routing::Dispatcher;
use crate::state::HandlingResult;
use crate::utils::errors::Result;

pub const UNHANDLED_REPLY: &str = "Sorry did not get it.";
pub const ERROR_REPLY: &str = "There was an error";

/// Dispatcher specialised to Telegram messages
pub type MessageDispatcher = Dispatcher<Message>;

/// What to tell the user after routing, if anything
pub fn reply_for_outcome(outcome: &Result<HandlingResult>) -> Option<&'static str> {
    match outcome {
        Ok(result) if result.is_handled() => None,
        Ok(_) => Some(UNHANDLED_REPLY),
        Err(_) => Some(ERROR_REPLY),
    }
}

/// Handle incoming text messages
///
/// Routing errors are already logged with full context by the dispatcher; the
/// user gets a generic apology and the update is considered done.
pub async fn handle_message(
    bot: Bot,
    msg: Message,
    dispatcher: Arc<MessageDispatcher>,
) -> Result<()> {
    let Some(user) = msg.from.as_ref() else {
        warn!(chat_id = ?msg.chat.id, "No user for message");
        return Ok(());
    };
    let Some(text) = msg.text() else {
        debug!(chat_id = ?msg.chat.id, "Ignoring message without text");
        return Ok(());
    };

    let user_id = user.id.0 as i64;
    debug!(user_id = user_id, chat_id = ?msg.chat.id, "Processing message");

    let outcome = dispatcher.route(user_id, text, &msg).await;
    if let Ok(result) = &outcome {
        if let Some(reason) = result.unhandled_reason() {
            debug!(user_id = user_id, reason = reason, "Input not handled");
        }
    }

    if let Some(reply) = reply_for_outcome(&outcome) {
        bot.send_text(user_id, reply).await?;
    }

    Ok(())
}
