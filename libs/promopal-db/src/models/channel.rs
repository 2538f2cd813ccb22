use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A channel the operator wants users to join. `username` is stored
/// lowercase without the leading `@` and is unique across the table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Channel {
    pub id: i64,
    pub name: String,
    pub username: String,
    pub is_required: bool,
}

impl Channel {
    pub fn link(&self) -> String {
        format!("https://t.me/{}", self.username)
    }
}
