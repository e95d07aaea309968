//! Audit-message composition
//!
//! Every balance or grade mutation records a human-readable notification for
//! the affected party. The wording is fixed here so the database layer and
//! tests share one source of truth.

use crate::entities::UNASSIGNED_GRADE;

/// Notification for an administrative balance adjustment.
pub fn balance_adjusted(old_balance: i64, new_balance: i64) -> String {
    format!("Your balance was updated from {old_balance} to {new_balance} by an admin.")
}

/// Notification for an administrative grade change.
pub fn grade_changed(old_grade: Option<&str>, new_grade: &str) -> String {
    let old = old_grade.unwrap_or(UNASSIGNED_GRADE);
    format!("Your grade was updated from {old} to {new_grade} by an admin.")
}

/// Notification sent to the sender of a transfer.
pub fn transfer_sent(amount: i64, recipient: &str) -> String {
    format!("You sent {amount} to {recipient}.")
}

/// Notification sent to the recipient of a transfer.
pub fn transfer_received(amount: i64, sender: &str) -> String {
    format!("You received {amount} from {sender}.")
}
