//! Response DTOs

use serde::Serialize;

use ledger_core::{Account, Message, User};

/// Public view of a user; never carries the password hash.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub display_name: String,
    pub username: String,
    pub phone_number: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            display_name: user.display_name,
            username: user.username,
            phone_number: user.phone_number,
        }
    }
}

/// Registration outcome
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub user: UserResponse,
}

/// Login outcome; the key authenticates every later self-service call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub key: String,
}

/// Balance with the human-readable grade label
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceResponse {
    pub balance: i64,
    pub grade: String,
}

impl From<&Account> for BalanceResponse {
    fn from(account: &Account) -> Self {
        Self {
            balance: account.balance,
            grade: account.grade_label().to_string(),
        }
    }
}

/// Outcome of an administrative credit or debit
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjustBalanceResponse {
    pub username: String,
    pub balance: i64,
}

/// Both post-transfer balances, so the client needs no follow-up read
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferResponse {
    pub sender_balance: i64,
    pub recipient_balance: i64,
}

/// Full account view for administrative reads
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub username: String,
    pub phone_number: String,
    pub balance: i64,
    pub grade: String,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        let grade = account.grade_label().to_string();
        Self {
            username: account.username,
            phone_number: account.phone_number,
            balance: account.balance,
            grade,
        }
    }
}

/// One audit message as the client sees it
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub content: String,
    pub date: chrono::DateTime<chrono::Utc>,
    pub time: String,
}

impl From<Message> for MessageResponse {
    fn from(message: Message) -> Self {
        Self {
            content: message.content,
            date: message.date,
            time: message.time,
        }
    }
}

/// Recent messages, newest first
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagesResponse {
    pub messages: Vec<MessageResponse>,
}

/// Plain confirmation body for mutations with nothing else to report
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub message: String,
}

impl StatusResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
