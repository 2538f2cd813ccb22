use teloxide::types::BotCommand;
use teloxide::{dptree, prelude::*, types::Update};
use tracing::{error, info};

pub mod handlers;
pub mod keyboards;
pub mod utils;

pub async fn run_bot(
    bot: Bot,
    mut shutdown_signal: tokio::sync::broadcast::Receiver<()>,
    state: crate::AppState,
) {
    info!("Starting bot dispatcher...");

    let _prev_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(|info| {
        error!("CRITICAL BOT PANIC: {:?}", info);
    }));

    // Connectivity check; a failure here usually means an invalid token.
    match bot.get_me().await {
        Ok(me) => {
            let username = me.username.clone().unwrap_or("unknown".into());
            info!("Bot connected as: @{}", username);
        }
        Err(e) => {
            error!("CRITICAL: Bot failed to connect to Telegram: {}", e);
            return;
        }
    }

    // Menu for the open commands; admin commands stay unlisted.
    let commands = vec![
        BotCommand::new("start", "Start the bot"),
        BotCommand::new("help", "Show command help"),
        BotCommand::new("promo", "Get your personal promo code"),
        BotCommand::new("myid", "Show your Telegram ID"),
    ];
    if let Err(e) = bot.set_my_commands(commands).await {
        error!("Failed to register command menu: {}", e);
    }

    let handler = Update::filter_message().endpoint(handlers::command::message_handler);

    let mut dispatcher = Dispatcher::builder(bot, dptree::entry().branch(handler))
        .dependencies(dptree::deps![state])
        .default_handler(|upd: std::sync::Arc<Update>| async move {
            tracing::debug!("Unhandled update: {:?}", upd);
        })
        .build();

    tokio::select! {
        _ = dispatcher.dispatch() => {
            info!("Bot dispatcher exited naturally");
        }
        _ = shutdown_signal.recv() => {
            info!("Bot received shutdown signal, stopping...");
        }
    }
}
