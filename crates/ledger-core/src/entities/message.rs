//! Message entity - an append-only per-user notification record

use chrono::{DateTime, Duration, Utc};

/// Retention horizon for notification messages.
pub const MESSAGE_TTL_DAYS: i64 = 30;

/// Notification message entity. Append-only; never mutated after creation
/// and silently removed once `expires_at` has passed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: i64,
    pub username: String,
    pub content: String,
    pub date: DateTime<Utc>,
    pub time: String,
    pub expires_at: DateTime<Utc>,
}

impl Message {
    /// Expiry horizon for a message created at `created`.
    pub fn expiry_for(created: DateTime<Utc>) -> DateTime<Utc> {
        created + Duration::days(MESSAGE_TTL_DAYS)
    }

    /// Wall-clock time-of-day string stored alongside the date, as the
    /// original records kept them separately.
    pub fn time_of_day(at: DateTime<Utc>) -> String {
        at.format("%H:%M:%S").to_string()
    }
}
