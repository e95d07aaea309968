//! PostgreSQL implementation of AccountRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use ledger_core::traits::{AccountRepository, RepoResult};
use ledger_core::Account;

use crate::models::AccountModel;

use super::error::map_db_error;

const ACCOUNT_COLUMNS: &str =
    "id, username, phone_number, balance, grade, created_at, updated_at";

/// PostgreSQL implementation of AccountRepository
#[derive(Clone)]
pub struct PgAccountRepository {
    pool: PgPool,
}

impl PgAccountRepository {
    /// Create a new PgAccountRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountRepository for PgAccountRepository {
    #[instrument(skip(self))]
    async fn find_by_username(&self, username: &str) -> RepoResult<Option<Account>> {
        let result = sqlx::query_as::<_, AccountModel>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Account::from))
    }

    #[instrument(skip(self))]
    async fn find_by_phone(&self, phone_number: &str) -> RepoResult<Option<Account>> {
        let result = sqlx::query_as::<_, AccountModel>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE phone_number = $1"
        ))
        .bind(phone_number)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Account::from))
    }
}
