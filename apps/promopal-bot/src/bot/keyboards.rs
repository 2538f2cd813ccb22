use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, WebAppInfo};

/// Inline button opening the mini-app. Returns `None` when the configured
/// URL does not parse.
pub fn webapp_keyboard(url: &str) -> Option<InlineKeyboardMarkup> {
    let url = url.parse().ok()?;
    Some(InlineKeyboardMarkup::new(vec![vec![
        InlineKeyboardButton::web_app("🎁 Browse promo codes", WebAppInfo { url }),
    ]]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyboard_requires_valid_url() {
        assert!(webapp_keyboard("https://promopal.example.com/").is_some());
        assert!(webapp_keyboard("not a url").is_none());
    }
}
