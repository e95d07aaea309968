//! Session database model

use chrono::{DateTime, Utc};
use ledger_core::Session;
use sqlx::FromRow;

/// Database model for the sessions table
#[derive(Debug, Clone, FromRow)]
pub struct SessionModel {
    pub id: i64,
    pub username: String,
    pub key: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl From<SessionModel> for Session {
    fn from(model: SessionModel) -> Self {
        Self {
            id: model.id,
            username: model.username,
            key: model.key,
            expires_at: model.expires_at,
            created_at: model.created_at,
        }
    }
}
