use chrono::NaiveDate;
use promopal_db::models::NewPromoCode;
use teloxide::prelude::*;
use teloxide::types::{LinkPreviewOptions, ParseMode};
use teloxide::utils::html::escape;
use tracing::info;

use crate::bot::keyboards::webapp_keyboard;
use crate::bot::utils::{assigned_index, chunk_blocks, MAX_MESSAGE_LEN};
use crate::state::AppState;

const ADMIN_COMMANDS: &[&str] = &[
    "/admin",
    "/stats",
    "/channels",
    "/add_promo",
    "/list_promos",
    "/promo_stats",
    "/delete_promo",
    "/add_channel",
    "/delete_channel",
    "/list_channels",
];

fn is_admin_command(command: &str) -> bool {
    ADMIN_COMMANDS.contains(&command)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route {
    Open,
    Admin,
    Denied,
}

/// Routing runs before any handler, so a denied sender never reaches the
/// catalog.
fn route_command(command: &str, is_admin: bool) -> Route {
    if !is_admin_command(command) {
        Route::Open
    } else if is_admin {
        Route::Admin
    } else {
        Route::Denied
    }
}

fn no_preview() -> LinkPreviewOptions {
    LinkPreviewOptions {
        is_disabled: true,
        url: None,
        prefer_small_media: false,
        prefer_large_media: false,
        show_above_text: false,
    }
}

pub async fn message_handler(
    bot: Bot,
    msg: Message,
    state: AppState,
) -> Result<(), teloxide::RequestError> {
    let Some(text) = msg.text() else {
        return Ok(());
    };
    let Some(user_id) = msg.from.as_ref().map(|u| u.id.0) else {
        return Ok(());
    };

    let mut tokens = text.split_whitespace();
    let command = tokens.next().unwrap_or_default();
    // Tolerate the /cmd@botname form used in groups.
    let command = command.split('@').next().unwrap_or(command);
    let args: Vec<&str> = tokens.collect();

    info!("Received command {} from {}", command, user_id);

    match route_command(command, state.config.is_admin(user_id)) {
        Route::Denied => {
            bot.send_message(msg.chat.id, "❌ You don't have administrator rights")
                .await?;
        }
        Route::Admin => match command {
            "/admin" => admin_panel(&bot, &msg).await?,
            "/stats" => stats(&bot, &msg, &state).await?,
            "/channels" => channels_overview(&bot, &msg, &state).await?,
            "/add_promo" => add_promo(&bot, &msg, &state, &args).await?,
            "/list_promos" => list_promos(&bot, &msg, &state).await?,
            "/promo_stats" => promo_stats(&bot, &msg, &state).await?,
            "/delete_promo" => delete_promo(&bot, &msg, &state, &args).await?,
            "/add_channel" => add_channel(&bot, &msg, &state, &args).await?,
            "/delete_channel" => delete_channel(&bot, &msg, &state, &args).await?,
            "/list_channels" => list_channels(&bot, &msg, &state).await?,
            _ => {}
        },
        Route::Open => match command {
            "/start" => start(&bot, &msg, &state).await?,
            "/help" => help(&bot, &msg).await?,
            "/promo" => promo(&bot, &msg, &state, user_id).await?,
            "/myid" => myid(&bot, &msg, user_id).await?,
            _ => {
                // Ignore unknown commands and plain text.
            }
        },
    }

    Ok(())
}

// ---------- open commands ----------

async fn start(bot: &Bot, msg: &Message, state: &AppState) -> Result<(), teloxide::RequestError> {
    let channels = state.catalog.required_channels().await;

    let mut text = String::from(
        "Hi! 👋 I'm PromoPal, your promo code buddy! 🤖\n\n\
         🎁 <b>Get the best promo codes for FREE!</b>\n",
    );
    if !channels.is_empty() {
        text.push_str("\n📢 Support us by joining our channels:\n");
        for channel in &channels {
            text.push_str(&format!("📢 {} - {}\n", escape(&channel.name), channel.link()));
        }
    }
    text.push_str("\n👇 Tap the button below to browse all promo codes!");

    let mut request = bot
        .send_message(msg.chat.id, text)
        .parse_mode(ParseMode::Html)
        .link_preview_options(no_preview());
    if let Some(kb) = state.config.webapp_url.as_deref().and_then(webapp_keyboard) {
        request = request.reply_markup(kb);
    }
    request.await?;
    Ok(())
}

async fn help(bot: &Bot, msg: &Message) -> Result<(), teloxide::RequestError> {
    let help_text = "🤖 <b>Bot help:</b>\n\n\
        /start - Start the bot\n\
        /help - Show this message\n\
        /promo - Show your personal promo code\n\
        /myid - Show your Telegram ID\n\n\
        🎁 <b>How to get promo codes:</b>\n\
        1. Tap the \"Browse promo codes\" button\n\
        2. Pick any promo code from the list\n\
        3. Copy it and save!\n\n\
        📢 <b>Support us:</b> join our channels from /start";
    bot.send_message(msg.chat.id, help_text)
        .parse_mode(ParseMode::Html)
        .await?;
    Ok(())
}

async fn promo(
    bot: &Bot,
    msg: &Message,
    state: &AppState,
    user_id: u64,
) -> Result<(), teloxide::RequestError> {
    let promos = state.catalog.available_promocodes().await;

    if promos.is_empty() {
        bot.send_message(
            msg.chat.id,
            "😔 Promo codes are temporarily unavailable. Try again later!",
        )
        .await?;
        return Ok(());
    }

    let promo = &promos[assigned_index(user_id, promos.len())];
    let expires = promo
        .expires_at
        .map(|d| d.to_string())
        .unwrap_or_else(|| "never expires".to_string());

    bot.send_message(
        msg.chat.id,
        format!(
            "🎁 <b>Your personal promo code:</b>\n\n\
             🏪 <b>Store:</b> {}\n\
             🔑 <b>Code:</b> <code>{}</code>\n\
             📝 <b>Description:</b> {}\n\
             📅 <b>Valid until:</b> {}\n\n\
             ✨ More promo codes in the mini-app!",
            escape(&promo.store),
            escape(&promo.code),
            escape(promo.description.as_deref().unwrap_or("-")),
            expires
        ),
    )
    .parse_mode(ParseMode::Html)
    .await?;
    Ok(())
}

async fn myid(bot: &Bot, msg: &Message, user_id: u64) -> Result<(), teloxide::RequestError> {
    bot.send_message(msg.chat.id, format!("🆔 Your ID: <code>{user_id}</code>"))
        .parse_mode(ParseMode::Html)
        .await?;
    Ok(())
}

// ---------- admin commands ----------

async fn admin_panel(bot: &Bot, msg: &Message) -> Result<(), teloxide::RequestError> {
    let admin_text = "🔧 <b>Admin panel</b>\n\n\
        📊 Statistics:\n\
        /stats - Bot statistics\n\
        /promo_stats - Promo code statistics\n\n\
        🎁 Promo code management:\n\
        /add_promo - Add a promo code\n\
        /delete_promo - Delete a promo code\n\
        /list_promos - List all promo codes\n\n\
        📢 Channel management:\n\
        /add_channel - Add a channel\n\
        /delete_channel - Delete a channel\n\
        /list_channels - List channels";
    bot.send_message(msg.chat.id, admin_text)
        .parse_mode(ParseMode::Html)
        .await?;
    Ok(())
}

async fn stats(bot: &Bot, msg: &Message, state: &AppState) -> Result<(), teloxide::RequestError> {
    let promocodes = state.catalog.available_promocodes().await;
    let channels = state.catalog.required_channels().await;

    bot.send_message(
        msg.chat.id,
        format!(
            "📊 <b>Bot statistics:</b>\n\n\
             🎁 Available promo codes: {}\n\
             📢 Required channels: {}\n\
             🔄 Database: ✅ OK",
            promocodes.len(),
            channels.len()
        ),
    )
    .parse_mode(ParseMode::Html)
    .await?;
    Ok(())
}

async fn channels_overview(
    bot: &Bot,
    msg: &Message,
    state: &AppState,
) -> Result<(), teloxide::RequestError> {
    let channels = state.catalog.required_channels().await;

    if channels.is_empty() {
        bot.send_message(msg.chat.id, "📭 No channels in the catalog")
            .await?;
        return Ok(());
    }

    let mut text = String::from("📢 <b>Our channels:</b>\n\n");
    for channel in &channels {
        text.push_str(&format!("🔹 {}\n🔗 {}\n\n", escape(&channel.name), channel.link()));
    }
    text.push_str("❤️ Join and support us!");

    bot.send_message(msg.chat.id, text)
        .parse_mode(ParseMode::Html)
        .link_preview_options(no_preview())
        .await?;
    Ok(())
}

async fn add_promo(
    bot: &Bot,
    msg: &Message,
    state: &AppState,
    args: &[&str],
) -> Result<(), teloxide::RequestError> {
    let new = match parse_add_promo(args) {
        Ok(new) => new,
        Err(AddPromoError::Usage) => {
            bot.send_message(
                msg.chat.id,
                "📝 Command format:\n\
                 <code>/add_promo store code description date</code>\n\n\
                 Example:\n\
                 <code>/add_promo Wildberries SUMMER100 \"100 off\" 2026-12-31</code>\n\n\
                 📌 Quote the description if it contains spaces!\n\
                 📅 Date format: YYYY-MM-DD",
            )
            .parse_mode(ParseMode::Html)
            .await?;
            return Ok(());
        }
        Err(AddPromoError::BadDate) => {
            bot.send_message(
                msg.chat.id,
                "❌ Invalid date format. Use: YYYY-MM-DD\nExample: 2026-12-31",
            )
            .await?;
            return Ok(());
        }
    };

    match state.catalog.add_promocode(&new).await {
        Ok(promo) => {
            bot.send_message(
                msg.chat.id,
                format!(
                    "✅ Promo code added!\n\n\
                     🏪 Store: {}\n\
                     🔑 Code: <code>{}</code>\n\
                     📝 Description: {}\n\
                     📅 Valid until: {}\n\
                     🆔 ID: {}",
                    escape(&promo.store),
                    escape(&promo.code),
                    escape(promo.description.as_deref().unwrap_or("-")),
                    promo
                        .expires_at
                        .map(|d| d.to_string())
                        .unwrap_or_else(|| "never expires".to_string()),
                    promo.id
                ),
            )
            .parse_mode(ParseMode::Html)
            .await?;
        }
        Err(e) => {
            bot.send_message(msg.chat.id, format!("❌ Failed to add promo code: {e}"))
                .await?;
        }
    }
    Ok(())
}

async fn list_promos(
    bot: &Bot,
    msg: &Message,
    state: &AppState,
) -> Result<(), teloxide::RequestError> {
    let promos = state.catalog.available_promocodes().await;

    if promos.is_empty() {
        bot.send_message(msg.chat.id, "📭 No active promo codes")
            .await?;
        return Ok(());
    }

    let mut blocks = vec!["📋 <b>All active promo codes:</b>".to_string()];
    for (i, promo) in promos.iter().enumerate() {
        blocks.push(format!(
            "{}. <b>{}</b> (ID: {})\n\
                Code: <code>{}</code>\n\
                Description: {}\n\
                Valid until: {}",
            i + 1,
            escape(&promo.store),
            promo.id,
            escape(&promo.code),
            escape(promo.description.as_deref().unwrap_or("-")),
            promo
                .expires_at
                .map(|d| d.to_string())
                .unwrap_or_else(|| "never expires".to_string())
        ));
    }

    for chunk in chunk_blocks(&blocks, MAX_MESSAGE_LEN) {
        bot.send_message(msg.chat.id, chunk)
            .parse_mode(ParseMode::Html)
            .await?;
    }
    Ok(())
}

async fn promo_stats(
    bot: &Bot,
    msg: &Message,
    state: &AppState,
) -> Result<(), teloxide::RequestError> {
    match state.catalog.promo_stats().await {
        Ok(stats) => {
            let mut text = format!(
                "📊 <b>Promo code statistics:</b>\n\n\
                 🎁 Total promo codes: {}\n\
                 ✅ Active: {}\n\
                 ❌ Expired: {}\n\n\
                 🏪 By store:\n",
                stats.total, stats.active, stats.expired
            );
            for entry in &stats.by_store {
                text.push_str(&format!("   • {}: {}\n", escape(&entry.store), entry.count));
            }
            bot.send_message(msg.chat.id, text)
                .parse_mode(ParseMode::Html)
                .await?;
        }
        Err(e) => {
            bot.send_message(msg.chat.id, format!("❌ Failed to fetch statistics: {e}"))
                .await?;
        }
    }
    Ok(())
}

async fn delete_promo(
    bot: &Bot,
    msg: &Message,
    state: &AppState,
    args: &[&str],
) -> Result<(), teloxide::RequestError> {
    let id = match parse_id(args) {
        Ok(id) => id,
        Err(IdError::Usage) => {
            bot.send_message(
                msg.chat.id,
                "🗑 Command format:\n<code>/delete_promo promo_id</code>\n\nUse /list_promos to look up the ID",
            )
            .parse_mode(ParseMode::Html)
            .await?;
            return Ok(());
        }
        Err(IdError::NotANumber) => {
            bot.send_message(msg.chat.id, "❌ The ID must be a number")
                .await?;
            return Ok(());
        }
    };

    match state.catalog.delete_promocode(id).await {
        Ok(0) => {
            bot.send_message(msg.chat.id, format!("❌ Promo code #{id} not found"))
                .await?;
        }
        Ok(_) => {
            bot.send_message(msg.chat.id, format!("✅ Promo code #{id} deleted"))
                .await?;
        }
        Err(e) => {
            bot.send_message(msg.chat.id, format!("❌ Failed to delete: {e}"))
                .await?;
        }
    }
    Ok(())
}

async fn add_channel(
    bot: &Bot,
    msg: &Message,
    state: &AppState,
    args: &[&str],
) -> Result<(), teloxide::RequestError> {
    let Some((name, username)) = parse_add_channel(args) else {
        bot.send_message(
            msg.chat.id,
            "📝 Command format:\n\
             <code>/add_channel \"Channel name\" username</code>\n\n\
             Example:\n\
             <code>/add_channel \"My channel\" mychannel</code>\n\n\
             📌 Quote the name if it contains spaces!\n\
             🔗 Username without @",
        )
        .parse_mode(ParseMode::Html)
        .await?;
        return Ok(());
    };

    match state.catalog.add_channel(&name, &username).await {
        Ok(channel) => {
            bot.send_message(
                msg.chat.id,
                format!(
                    "✅ Channel added!\n\n\
                     📢 Name: {}\n\
                     🔗 Username: @{}\n\
                     🌐 Link: {}\n\
                     🆔 ID: {}",
                    escape(&channel.name),
                    channel.username,
                    channel.link(),
                    channel.id
                ),
            )
            .parse_mode(ParseMode::Html)
            .link_preview_options(no_preview())
            .await?;
        }
        Err(e) => {
            bot.send_message(msg.chat.id, format!("❌ Failed to add channel: {e}"))
                .await?;
        }
    }
    Ok(())
}

async fn delete_channel(
    bot: &Bot,
    msg: &Message,
    state: &AppState,
    args: &[&str],
) -> Result<(), teloxide::RequestError> {
    let id = match parse_id(args) {
        Ok(id) => id,
        Err(IdError::Usage) => {
            bot.send_message(
                msg.chat.id,
                "🗑 Command format:\n<code>/delete_channel channel_id</code>\n\nUse /list_channels to look up the ID",
            )
            .parse_mode(ParseMode::Html)
            .await?;
            return Ok(());
        }
        Err(IdError::NotANumber) => {
            bot.send_message(msg.chat.id, "❌ The ID must be a number")
                .await?;
            return Ok(());
        }
    };

    match state.catalog.delete_channel(id).await {
        Ok(0) => {
            bot.send_message(msg.chat.id, format!("❌ Channel #{id} not found"))
                .await?;
        }
        Ok(_) => {
            bot.send_message(msg.chat.id, format!("✅ Channel #{id} deleted"))
                .await?;
        }
        Err(e) => {
            bot.send_message(msg.chat.id, format!("❌ Failed to delete: {e}"))
                .await?;
        }
    }
    Ok(())
}

async fn list_channels(
    bot: &Bot,
    msg: &Message,
    state: &AppState,
) -> Result<(), teloxide::RequestError> {
    let channels = state.catalog.required_channels().await;

    if channels.is_empty() {
        bot.send_message(msg.chat.id, "📭 No channels in the catalog")
            .await?;
        return Ok(());
    }

    let mut blocks = vec!["📢 <b>Required channels:</b>".to_string()];
    for (i, channel) in channels.iter().enumerate() {
        blocks.push(format!(
            "{}. <b>{}</b> (ID: {})\n\
                Username: @{}\n\
                Link: {}",
            i + 1,
            escape(&channel.name),
            channel.id,
            channel.username,
            channel.link()
        ));
    }

    for chunk in chunk_blocks(&blocks, MAX_MESSAGE_LEN) {
        bot.send_message(msg.chat.id, chunk)
            .parse_mode(ParseMode::Html)
            .link_preview_options(no_preview())
            .await?;
    }
    Ok(())
}

// ---------- argument parsing ----------

#[derive(Debug, PartialEq, Eq)]
enum AddPromoError {
    Usage,
    BadDate,
}

/// `/add_promo <store> <code> <description...> <YYYY-MM-DD>`. The
/// description may span several tokens; the last token is always the date.
fn parse_add_promo(args: &[&str]) -> Result<NewPromoCode, AddPromoError> {
    if args.len() < 4 {
        return Err(AddPromoError::Usage);
    }

    let store = args[0];
    let code = args[1];
    let description = args[2..args.len() - 1].join(" ");
    let description = description.trim_matches('"').to_string();
    let expires_at = NaiveDate::parse_from_str(args[args.len() - 1], "%Y-%m-%d")
        .map_err(|_| AddPromoError::BadDate)?;

    Ok(NewPromoCode {
        store: store.to_string(),
        code: code.to_string(),
        description: Some(description),
        expires_at: Some(expires_at),
    })
}

#[derive(Debug, PartialEq, Eq)]
enum IdError {
    Usage,
    NotANumber,
}

fn parse_id(args: &[&str]) -> Result<i64, IdError> {
    match args {
        [] => Err(IdError::Usage),
        [token] => token.parse::<i64>().map_err(|_| IdError::NotANumber),
        _ => Err(IdError::NotANumber),
    }
}

/// `/add_channel <name> <username>`. Quotes are stripped from the name;
/// the username is lowercased and loses a leading `@`.
fn parse_add_channel(args: &[&str]) -> Option<(String, String)> {
    if args.len() < 2 {
        return None;
    }
    let name = args[0].trim_matches('"').to_string();
    let username = args[1].trim_start_matches('@').to_lowercase();
    Some((name, username))
}
