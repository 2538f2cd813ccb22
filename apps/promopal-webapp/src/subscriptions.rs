//! Subscription verification against the chat transport.
//!
//! External collaborator contract: a boolean membership check per
//! (user, channel) pair. The current integration is a stub that always
//! reports "subscribed"; real verification would go through the bot API's
//! getChatMember and should fail closed per channel, not crash the facade.

use promopal_db::models::Channel;

pub async fn is_subscribed(_user_id: &str, _channel: &Channel) -> bool {
    true
}

pub async fn all_subscribed(user_id: &str, channels: &[Channel]) -> bool {
    for channel in channels {
        if !is_subscribed(user_id, channel).await {
            return false;
        }
    }
    true
}
