//! PostgreSQL implementation of UserRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use ledger_core::traits::{RepoResult, UserRepository};
use ledger_core::{DomainError, NewUser, User};

use crate::models::UserModel;

use super::error::{map_db_error, map_duplicate_identity, map_unique_violation, user_not_found};

const USER_COLUMNS: &str =
    "id, username, phone_number, display_name, password_hash, created_at, updated_at";

/// PostgreSQL implementation of UserRepository
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Create a new PgUserRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_by_username(&self, username: &str) -> RepoResult<Option<UserModel>> {
        sqlx::query_as::<_, UserModel>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    #[instrument(skip(self))]
    async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        Ok(self.fetch_by_username(username).await?.map(User::from))
    }

    #[instrument(skip(self))]
    async fn find_by_phone(&self, phone_number: &str) -> RepoResult<Option<User>> {
        let result = sqlx::query_as::<_, UserModel>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE phone_number = $1"
        ))
        .bind(phone_number)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(User::from))
    }

    #[instrument(skip(self))]
    async fn username_exists(&self, username: &str) -> RepoResult<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
            .bind(username)
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)
    }

    #[instrument(skip(self))]
    async fn phone_exists(&self, phone_number: &str) -> RepoResult<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE phone_number = $1)")
            .bind(phone_number)
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)
    }

    /// The user row and its zero-balance account row are inserted in one
    /// transaction, so a duplicate-key failure on either leaves nothing behind.
    #[instrument(skip(self, password_hash))]
    async fn create_with_account(&self, user: &NewUser, password_hash: &str) -> RepoResult<User> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let created = sqlx::query_as::<_, UserModel>(&format!(
            r"
            INSERT INTO users (username, phone_number, display_name, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING {USER_COLUMNS}
            ",
        ))
        .bind(&user.username)
        .bind(&user.phone_number)
        .bind(&user.display_name)
        .bind(password_hash)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_duplicate_identity)?;

        sqlx::query(
            r"
            INSERT INTO accounts (username, phone_number, balance)
            VALUES ($1, $2, 0)
            ",
        )
        .bind(&user.username)
        .bind(&user.phone_number)
        .execute(&mut *tx)
        .await
        .map_err(map_duplicate_identity)?;

        tx.commit().await.map_err(map_db_error)?;

        Ok(User::from(created))
    }

    #[instrument(skip(self))]
    async fn get_password_hash(&self, username: &str) -> RepoResult<Option<String>> {
        sqlx::query_scalar::<_, String>("SELECT password_hash FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)
    }

    #[instrument(skip(self, password_hash))]
    async fn update_password(&self, username: &str, password_hash: &str) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE users
            SET password_hash = $2, updated_at = NOW()
            WHERE username = $1
            ",
        )
        .bind(username)
        .bind(password_hash)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(user_not_found(username));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn update_display_name(&self, username: &str, display_name: &str) -> RepoResult<User> {
        let result = sqlx::query_as::<_, UserModel>(&format!(
            r"
            UPDATE users
            SET display_name = $2, updated_at = NOW()
            WHERE username = $1
            RETURNING {USER_COLUMNS}
            ",
        ))
        .bind(username)
        .bind(display_name)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(User::from).ok_or_else(|| user_not_found(username))
    }

    #[instrument(skip(self))]
    async fn update_phone_number(&self, username: &str, phone_number: &str) -> RepoResult<User> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let result = sqlx::query_as::<_, UserModel>(&format!(
            r"
            UPDATE users
            SET phone_number = $2, updated_at = NOW()
            WHERE username = $1
            RETURNING {USER_COLUMNS}
            ",
        ))
        .bind(username)
        .bind(phone_number)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::PhoneNumberTaken))?;

        let Some(updated) = result else {
            return Err(user_not_found(username));
        };

        sqlx::query(
            r"
            UPDATE accounts
            SET phone_number = $2, updated_at = NOW()
            WHERE username = $1
            ",
        )
        .bind(username)
        .bind(phone_number)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::PhoneNumberTaken))?;

        tx.commit().await.map_err(map_db_error)?;

        Ok(User::from(updated))
    }

    /// Renames the user and account rows together. Sessions keyed to the old
    /// username are dropped; messages keep the old recipient name.
    #[instrument(skip(self))]
    async fn rename(&self, username: &str, new_username: &str) -> RepoResult<User> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let result = sqlx::query_as::<_, UserModel>(&format!(
            r"
            UPDATE users
            SET username = $2, updated_at = NOW()
            WHERE username = $1
            RETURNING {USER_COLUMNS}
            ",
        ))
        .bind(username)
        .bind(new_username)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::UsernameTaken))?;

        let Some(updated) = result else {
            return Err(user_not_found(username));
        };

        sqlx::query(
            r"
            UPDATE accounts
            SET username = $2, updated_at = NOW()
            WHERE username = $1
            ",
        )
        .bind(username)
        .bind(new_username)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::UsernameTaken))?;

        sqlx::query("DELETE FROM sessions WHERE username = $1")
            .bind(username)
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;

        Ok(User::from(updated))
    }

    #[instrument(skip(self))]
    async fn list(&self, limit: i64) -> RepoResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserModel>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY id DESC LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(User::from).collect())
    }
}
