use dotenvy::dotenv;
use std::sync::Arc;
use teloxide::prelude::*;

mod bot;
mod config;
mod state;

use crate::config::Config;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init();

    log::info!("Starting PromoPal bot...");

    let config = Config::from_env()?;

    let pool = promopal_db::db::init_db(&config.database_url).await?;

    if std::env::var("SEED_SAMPLE_DATA").map(|v| v == "1").unwrap_or(false) {
        promopal_db::seed::seed_sample_data(&pool).await?;
        log::info!("Sample catalog data seeded");
    }

    let catalog = promopal_db::Catalog::new(pool);

    let promocodes = catalog.available_promocodes().await;
    let channels = catalog.required_channels().await;
    log::info!(
        "Catalog check: {} available promo codes, {} required channels",
        promocodes.len(),
        channels.len()
    );
    log::info!("Admin ID: {}", config.admin_id);

    let bot = Bot::new(config.bot_token.clone());
    let state = AppState {
        config: Arc::new(config),
        catalog,
    };

    let (_tx, rx) = tokio::sync::broadcast::channel(1);

    bot::run_bot(bot, rx, state).await;
    Ok(())
}
