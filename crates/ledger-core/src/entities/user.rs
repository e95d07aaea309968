//! User entity - the credential identity behind an account

use chrono::{DateTime, Utc};

/// User entity representing a registered account holder.
///
/// The password hash is deliberately not part of the entity; repositories
/// expose it separately so it never leaks into responses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub phone_number: String,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to register a new user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub phone_number: String,
    pub display_name: String,
}

/// A caller-supplied pair of alternate identifiers.
///
/// Fields are trimmed on construction; blank values are dropped entirely so
/// they can never match a record by accident.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentifierSet {
    pub username: Option<String>,
    pub phone_number: Option<String>,
}

impl IdentifierSet {
    /// Build an identifier set from optional raw inputs, trimming whitespace
    /// and discarding empty values.
    pub fn new(username: Option<&str>, phone_number: Option<&str>) -> Self {
        Self {
            username: normalize(username),
            phone_number: normalize(phone_number),
        }
    }

    /// True if neither identifier survived normalization.
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.phone_number.is_none()
    }
}

fn normalize(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// Which identifier wins when username and phone number match different
/// records. The source system favored the phone-number match; the policy is
/// configurable here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LookupPrecedence {
    #[default]
    PhoneNumber,
    Username,
}

impl LookupPrecedence {
    /// Parse from a configuration string, falling back to the default.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "username" => Self::Username,
            _ => Self::PhoneNumber,
        }
    }
}
