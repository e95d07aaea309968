//! PostgreSQL implementation of the balance transaction engine
//!
//! Every operation runs in a single database transaction: the affected
//! account rows are locked with `SELECT ... FOR UPDATE`, invariants are
//! re-checked under the lock, and the audit messages are inserted before the
//! commit. A failure at any step rolls the whole unit back, so a balance can
//! never change without its notification and value can never be lost
//! between a debit and a credit.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use tracing::instrument;

use ledger_core::traits::{LedgerRepository, RepoResult};
use ledger_core::{
    audit, AdjustDirection, BalanceChange, DomainError, GradeChange, Message, TransferReceipt,
};

use crate::models::AccountModel;

use super::error::{account_not_found, map_db_error};

const ACCOUNT_COLUMNS: &str =
    "id, username, phone_number, balance, grade, created_at, updated_at";

/// PostgreSQL implementation of LedgerRepository
#[derive(Clone)]
pub struct PgLedgerRepository {
    pool: PgPool,
}

impl PgLedgerRepository {
    /// Create a new PgLedgerRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Lock one account row for the remainder of the transaction.
async fn lock_account(
    tx: &mut Transaction<'_, Postgres>,
    username: &str,
) -> RepoResult<Option<AccountModel>> {
    sqlx::query_as::<_, AccountModel>(&format!(
        "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE username = $1 FOR UPDATE"
    ))
    .bind(username)
    .fetch_optional(&mut **tx)
    .await
    .map_err(map_db_error)
}

/// Write a new balance to a locked account row.
async fn write_balance(
    tx: &mut Transaction<'_, Postgres>,
    username: &str,
    balance: i64,
) -> RepoResult<()> {
    sqlx::query("UPDATE accounts SET balance = $2, updated_at = NOW() WHERE username = $1")
        .bind(username)
        .bind(balance)
        .execute(&mut **tx)
        .await
        .map_err(map_db_error)?;
    Ok(())
}

/// Append an audit message inside the surrounding transaction.
async fn append_message(
    tx: &mut Transaction<'_, Postgres>,
    username: &str,
    content: &str,
    now: DateTime<Utc>,
) -> RepoResult<()> {
    sqlx::query(
        r"
        INSERT INTO messages (username, content, date, time, expires_at)
        VALUES ($1, $2, $3, $4, $5)
        ",
    )
    .bind(username)
    .bind(content)
    .bind(now)
    .bind(Message::time_of_day(now))
    .bind(Message::expiry_for(now))
    .execute(&mut **tx)
    .await
    .map_err(map_db_error)?;
    Ok(())
}

#[async_trait]
impl LedgerRepository for PgLedgerRepository {
    #[instrument(skip(self))]
    async fn adjust(
        &self,
        username: &str,
        amount: i64,
        direction: AdjustDirection,
    ) -> RepoResult<BalanceChange> {
        if amount <= 0 {
            return Err(DomainError::InvalidAmount);
        }

        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let account = lock_account(&mut tx, username)
            .await?
            .ok_or_else(|| account_not_found(username))?;

        if direction == AdjustDirection::Debit && account.balance < amount {
            return Err(DomainError::InsufficientFunds);
        }

        let old_balance = account.balance;
        let new_balance = old_balance + direction.signed(amount);

        write_balance(&mut tx, username, new_balance).await?;

        let now = Utc::now();
        append_message(
            &mut tx,
            &account.username,
            &audit::balance_adjusted(old_balance, new_balance),
            now,
        )
        .await?;

        tx.commit().await.map_err(map_db_error)?;

        Ok(BalanceChange {
            username: account.username,
            old_balance,
            new_balance,
        })
    }

    #[instrument(skip(self))]
    async fn transfer(
        &self,
        sender: &str,
        recipient: &str,
        amount: i64,
    ) -> RepoResult<TransferReceipt> {
        if amount <= 0 {
            return Err(DomainError::InvalidAmount);
        }
        if sender == recipient {
            return Err(DomainError::SelfTransfer);
        }

        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        // Lock both rows in lexical username order so two opposing transfers
        // cannot deadlock against each other.
        let (first, second) = if sender < recipient {
            (sender, recipient)
        } else {
            (recipient, sender)
        };
        let first_row = lock_account(&mut tx, first)
            .await?
            .ok_or_else(|| account_not_found(first))?;
        let second_row = lock_account(&mut tx, second)
            .await?
            .ok_or_else(|| account_not_found(second))?;

        let (sender_row, recipient_row) = if first_row.username == sender {
            (first_row, second_row)
        } else {
            (second_row, first_row)
        };

        // Re-check funds under the lock; the pre-check in the service layer
        // may have read a stale balance.
        if sender_row.balance < amount {
            return Err(DomainError::InsufficientFunds);
        }

        let sender_balance = sender_row.balance - amount;
        let recipient_balance = recipient_row.balance + amount;

        write_balance(&mut tx, sender, sender_balance).await?;
        write_balance(&mut tx, recipient, recipient_balance).await?;

        let now = Utc::now();
        append_message(
            &mut tx,
            sender,
            &audit::transfer_sent(amount, &recipient_row.username),
            now,
        )
        .await?;
        append_message(
            &mut tx,
            recipient,
            &audit::transfer_received(amount, &sender_row.username),
            now,
        )
        .await?;

        tx.commit().await.map_err(map_db_error)?;

        Ok(TransferReceipt {
            sender: sender_row.username,
            recipient: recipient_row.username,
            amount,
            sender_balance,
            recipient_balance,
        })
    }

    #[instrument(skip(self))]
    async fn set_grade(&self, username: &str, grade: &str) -> RepoResult<GradeChange> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let account = lock_account(&mut tx, username)
            .await?
            .ok_or_else(|| account_not_found(username))?;

        sqlx::query("UPDATE accounts SET grade = $2, updated_at = NOW() WHERE username = $1")
            .bind(username)
            .bind(grade)
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        let now = Utc::now();
        append_message(
            &mut tx,
            &account.username,
            &audit::grade_changed(account.grade.as_deref(), grade),
            now,
        )
        .await?;

        tx.commit().await.map_err(map_db_error)?;

        Ok(GradeChange {
            username: account.username,
            old_grade: account.grade,
            new_grade: grade.to_string(),
        })
    }
}
