//! Account database model

use chrono::{DateTime, Utc};
use ledger_core::Account;
use sqlx::FromRow;

/// Database model for the accounts table
#[derive(Debug, Clone, FromRow)]
pub struct AccountModel {
    pub id: i64,
    pub username: String,
    pub phone_number: String,
    pub balance: i64,
    pub grade: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<AccountModel> for Account {
    fn from(model: AccountModel) -> Self {
        Self {
            id: model.id,
            username: model.username,
            phone_number: model.phone_number,
            balance: model.balance,
            grade: model.grade,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
