//! Account entity - the balance-bearing side of a registered user

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Label reported for accounts that have never been graded.
pub const UNASSIGNED_GRADE: &str = "unassigned";

/// Account entity holding a monetary balance and an optional grade.
///
/// One-to-one with [`super::User`] by username. The balance is an integer
/// number of currency units and must never go negative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: i64,
    pub username: String,
    pub phone_number: String,
    pub balance: i64,
    pub grade: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Grade label, falling back to the unassigned default.
    pub fn grade_label(&self) -> &str {
        self.grade.as_deref().unwrap_or(UNASSIGNED_GRADE)
    }

    /// Check whether a debit of `amount` would be covered.
    #[inline]
    pub fn can_debit(&self, amount: i64) -> bool {
        self.balance >= amount
    }

    /// Check whether `other` refers to the same account holder, by username
    /// or phone-number equality.
    pub fn is_same_holder(&self, other: &Account) -> bool {
        self.username == other.username || self.phone_number == other.phone_number
    }
}

/// Direction of an administrative balance adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdjustDirection {
    Credit,
    Debit,
}

impl AdjustDirection {
    /// Signed delta this direction applies for the given amount.
    #[inline]
    pub fn signed(self, amount: i64) -> i64 {
        match self {
            Self::Credit => amount,
            Self::Debit => -amount,
        }
    }
}

/// Outcome of a committed balance adjustment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceChange {
    pub username: String,
    pub old_balance: i64,
    pub new_balance: i64,
}

/// Outcome of a committed transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferReceipt {
    pub sender: String,
    pub recipient: String,
    pub amount: i64,
    pub sender_balance: i64,
    pub recipient_balance: i64,
}

/// Outcome of a committed grade change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradeChange {
    pub username: String,
    pub old_grade: Option<String>,
    pub new_grade: String,
}
