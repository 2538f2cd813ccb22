use anyhow::{Context, Result};
use std::env;

/// Process-wide configuration, built once at startup and passed by
/// reference to every component that needs it.
#[derive(Debug, Clone)]
pub struct Config {
    pub bot_token: String,
    /// Telegram ID of the single administrator.
    pub admin_id: u64,
    pub database_url: String,
    /// Mini-app URL for the inline web-app button; button is omitted when
    /// unset.
    pub webapp_url: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let bot_token = env::var("BOT_TOKEN").context("BOT_TOKEN is not set")?;
        let admin_id = env::var("ADMIN_ID")
            .context("ADMIN_ID is not set")?
            .parse::<u64>()
            .context("ADMIN_ID must be a numeric Telegram ID")?;
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://promo_bot.db".to_string());
        let webapp_url = env::var("WEBAPP_URL").ok().filter(|s| !s.is_empty());

        Ok(Self {
            bot_token,
            admin_id,
            database_url,
            webapp_url,
        })
    }

    pub fn is_admin(&self, user_id: u64) -> bool {
        user_id == self.admin_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(admin_id: u64) -> Config {
        Config {
            bot_token: "token".into(),
            admin_id,
            database_url: "sqlite::memory:".into(),
            webapp_url: None,
        }
    }

    #[test]
    fn only_the_configured_id_is_admin() {
        let cfg = config(1234);
        assert!(cfg.is_admin(1234));
        assert!(!cfg.is_admin(1235));
        assert!(!cfg.is_admin(0));
    }
}
