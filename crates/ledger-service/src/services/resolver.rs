//! Identifier resolution
//!
//! Callers may address a record by username, phone number, or both. When
//! both are present and point at different records, the configured
//! precedence decides which one wins. Blank identifiers are dropped during
//! [`IdentifierSet`] normalization and can never match anything.

use ledger_core::{Account, DomainError, IdentifierSet, LookupPrecedence, User};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Resolve an account from an identifier set.
pub async fn resolve_account(
    ctx: &ServiceContext,
    identifiers: &IdentifierSet,
) -> ServiceResult<Account> {
    if identifiers.is_empty() {
        return Err(ServiceError::validation(
            "Either username or phoneNumber is required",
        ));
    }

    let (first, second) = ordered(identifiers, ctx.lookup_precedence());

    if let Some(value) = first {
        if let Some(account) = find_account(ctx, value).await? {
            return Ok(account);
        }
    }
    if let Some(value) = second {
        if let Some(account) = find_account(ctx, value).await? {
            return Ok(account);
        }
    }

    Err(DomainError::AccountNotFound(describe(identifiers)).into())
}

/// Resolve a user from an identifier set.
pub async fn resolve_user(
    ctx: &ServiceContext,
    identifiers: &IdentifierSet,
) -> ServiceResult<User> {
    if identifiers.is_empty() {
        return Err(ServiceError::validation(
            "Either username or phoneNumber is required",
        ));
    }

    let (first, second) = ordered(identifiers, ctx.lookup_precedence());

    if let Some(value) = first {
        if let Some(user) = find_user(ctx, value).await? {
            return Ok(user);
        }
    }
    if let Some(value) = second {
        if let Some(user) = find_user(ctx, value).await? {
            return Ok(user);
        }
    }

    Err(DomainError::UserNotFound(describe(identifiers)).into())
}

/// Resolve a transfer recipient from a single free-form identifier: an exact
/// username match wins, then an exact phone-number match.
pub async fn resolve_recipient(ctx: &ServiceContext, identifier: &str) -> ServiceResult<Account> {
    let identifier = identifier.trim();
    if identifier.is_empty() {
        return Err(ServiceError::validation("Recipient is required"));
    }

    if let Some(account) = ctx.accounts.find_by_username(identifier).await? {
        return Ok(account);
    }
    if let Some(account) = ctx.accounts.find_by_phone(identifier).await? {
        return Ok(account);
    }

    Err(DomainError::AccountNotFound(identifier.to_string()).into())
}

/// Order the present identifiers by the configured precedence. Each slot is
/// `(value, is_username)`.
fn ordered(
    identifiers: &IdentifierSet,
    precedence: LookupPrecedence,
) -> (Option<(&str, bool)>, Option<(&str, bool)>) {
    let username = identifiers.username.as_deref().map(|v| (v, true));
    let phone = identifiers.phone_number.as_deref().map(|v| (v, false));

    match precedence {
        LookupPrecedence::PhoneNumber => (phone, username),
        LookupPrecedence::Username => (username, phone),
    }
}

async fn find_account(
    ctx: &ServiceContext,
    (value, is_username): (&str, bool),
) -> ServiceResult<Option<Account>> {
    let found = if is_username {
        ctx.accounts.find_by_username(value).await?
    } else {
        ctx.accounts.find_by_phone(value).await?
    };
    Ok(found)
}

async fn find_user(
    ctx: &ServiceContext,
    (value, is_username): (&str, bool),
) -> ServiceResult<Option<User>> {
    let found = if is_username {
        ctx.users.find_by_username(value).await?
    } else {
        ctx.users.find_by_phone(value).await?
    };
    Ok(found)
}

fn describe(identifiers: &IdentifierSet) -> String {
    match (&identifiers.username, &identifiers.phone_number) {
        (Some(u), Some(p)) => format!("{u} / {p}"),
        (Some(u), None) => u.clone(),
        (None, Some(p)) => p.clone(),
        (None, None) => "unknown".to_string(),
    }
}
