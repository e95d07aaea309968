//! Request DTOs

use serde::Deserialize;
use validator::{Validate, ValidationError};

use ledger_core::AdjustDirection;

/// Phone numbers are stored as bare digit strings; anything else would break
/// identifier lookups that compare them verbatim.
fn digits_only(value: &str) -> Result<(), ValidationError> {
    if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ValidationError::new("digits_only")
            .with_message("Phone number must contain digits only".into()))
    }
}

/// New user registration
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(min = 3, message = "Display name must be at least 3 characters"))]
    pub display_name: String,

    #[validate(length(min = 4, message = "Username must be at least 4 characters"))]
    pub username: String,

    #[validate(length(min = 5, message = "Password must be at least 5 characters"))]
    pub password: String,

    #[validate(custom(function = digits_only))]
    pub phone_number: String,
}

/// Login by username or phone number plus password. At least one identifier
/// must be present; the service enforces that so the error message can name
/// both fields.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: Option<String>,
    pub phone_number: Option<String>,
    pub password: String,
}

/// Any operation authenticated by a session key alone
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SessionRequest {
    #[validate(length(min = 1, message = "Session key is required"))]
    pub key: String,
}

/// Administrative balance credit or debit
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AdjustBalanceRequest {
    pub master_key: String,
    pub username: Option<String>,
    pub phone_number: Option<String>,
    pub amount: i64,
    pub action: AdjustDirection,
}

/// Administrative balance inspection
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ViewBalanceRequest {
    pub master_key: String,
    pub username: Option<String>,
    pub phone_number: Option<String>,
}

/// Peer-to-peer transfer, authenticated by the sender's session key
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    #[validate(length(min = 1, message = "Session key is required"))]
    pub sender_key: String,

    #[validate(length(min = 1, message = "Recipient is required"))]
    pub recipient_username: String,

    pub amount: i64,
}

/// Administrative grade assignment
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SetGradeRequest {
    pub master_key: String,
    pub username: Option<String>,
    pub phone_number: Option<String>,

    #[validate(length(min = 1, message = "Grade is required"))]
    pub grade: String,
}

/// Self-service password change, authenticated by the current password
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePasswordRequest {
    #[validate(length(min = 4, message = "Username must be at least 4 characters"))]
    pub username: String,

    pub current_password: String,

    #[validate(length(min = 5, message = "Password must be at least 5 characters"))]
    pub new_password: String,
}

/// Administrative password reset
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AdminUpdatePasswordRequest {
    pub master_key: String,
    pub username: String,

    #[validate(length(min = 5, message = "Password must be at least 5 characters"))]
    pub new_password: String,
}

/// Administrative username change
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AdminUpdateUsernameRequest {
    pub master_key: String,
    pub username: String,

    #[validate(length(min = 4, message = "Username must be at least 4 characters"))]
    pub new_username: String,
}

/// Administrative display name change
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AdminUpdateDisplayNameRequest {
    pub master_key: String,
    pub username: String,

    #[validate(length(min = 3, message = "Display name must be at least 3 characters"))]
    pub new_display_name: String,
}

/// Administrative phone number change
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AdminUpdatePhoneRequest {
    pub master_key: String,
    pub username: String,

    #[validate(custom(function = digits_only))]
    pub new_phone_number: String,
}
