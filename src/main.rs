//! Botanix Telegram Bot
//!
//! Main application entry point

use std::sync::Arc;
use teloxide::dispatching::{UpdateFilterExt, UpdateHandler};
use teloxide::{prelude::*, types::Update};
use tracing::{error, info, warn};

use botanix::{
    config::Settings,
    handlers::{handle_message, HelpHandler, MessageDispatcher, RegisterHandler, StartHandler},
    routing::Dispatcher as TrackDispatcher,
    state::build_store,
    utils::logging,
};

type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new()?;
    settings.validate()?;

    // Initialize logging
    let _log_guard = logging::init_logging(&settings.logging)?;

    info!("Starting {}...", botanix::info());

    // Initialize context storage
    let store = build_store(&settings.storage).await?;

    // Initialize bot
    let bot = Bot::new(&settings.bot.token);

    // Register tracks
    let router: MessageDispatcher = TrackDispatcher::new(store)
        .with_generic_tracks(&settings.routing.generic_tracks)
        .with_track(HelpHandler::new(bot.clone()))
        .with_track(StartHandler::new(bot.clone()))
        .with_track(RegisterHandler::new(bot.clone()));
    info!(tracks = ?router.track_names(), "Tracks registered");

    let mut dispatcher = Dispatcher::builder(bot, create_handler())
        .dependencies(dptree::deps![Arc::new(router)])
        .default_handler(|upd| async move {
            warn!("Unhandled update: {:?}", upd);
        })
        .enable_ctrlc_handler()
        .build();

    if let Some(webhook_url) = &settings.bot.webhook_url {
        info!("Webhook URL configured: {}", webhook_url);
        info!("Note: Webhook setup not implemented in this version, falling back to polling");
    }

    info!("Starting bot with polling mode...");
    dispatcher.dispatch().await;

    info!("Botanix bot has been shut down.");

    Ok(())
}

/// Create the main update handler
fn create_handler() -> UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>> {
    Update::filter_message().endpoint(handle_messages)
}

/// Handle text messages
async fn handle_messages(
    bot: Bot,
    msg: Message,
    router: Arc<MessageDispatcher>,
) -> HandlerResult {
    if let Err(e) = handle_message(bot, msg, router).await {
        error!(error = %e, "Error handling message");
        return Err(e.into());
    }

    Ok(())
}
