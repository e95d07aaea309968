//! Message database model

use chrono::{DateTime, Utc};
use ledger_core::Message;
use sqlx::FromRow;

/// Database model for the messages table
#[derive(Debug, Clone, FromRow)]
pub struct MessageModel {
    pub id: i64,
    pub username: String,
    pub content: String,
    pub date: DateTime<Utc>,
    pub time: String,
    pub expires_at: DateTime<Utc>,
}

impl From<MessageModel> for Message {
    fn from(model: MessageModel) -> Self {
        Self {
            id: model.id,
            username: model.username,
            content: model.content,
            date: model.date,
            time: model.time,
            expires_at: model.expires_at,
        }
    }
}
