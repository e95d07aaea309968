//! User profile reads and administrative credential edits

use tracing::{info, instrument};
use validator::Validate;

use ledger_common::auth::hash_password;
use ledger_core::DomainError;

use crate::dto::{
    AdminUpdateDisplayNameRequest, AdminUpdatePasswordRequest, AdminUpdatePhoneRequest,
    AdminUpdateUsernameRequest, UserResponse,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::session::SessionService;

/// How many users a directory listing returns at most
pub const USER_LIST_LIMIT: i64 = 100;

/// User profile and administrative credential use cases
#[derive(Clone)]
pub struct UserService {
    ctx: ServiceContext,
    sessions: SessionService,
}

impl UserService {
    pub fn new(ctx: ServiceContext) -> Self {
        let sessions = SessionService::new(ctx.clone());
        Self { ctx, sessions }
    }

    /// The caller's own profile, authenticated by session key.
    #[instrument(skip(self, key))]
    pub async fn profile(&self, key: &str) -> ServiceResult<UserResponse> {
        let session = self.sessions.validate(key).await?;

        let user = self
            .ctx
            .users
            .find_by_username(&session.username)
            .await?
            .ok_or_else(|| DomainError::UserNotFound(session.username.clone()))?;

        Ok(UserResponse::from(user))
    }

    /// Directory of registered users, most recent first.
    #[instrument(skip(self))]
    pub async fn list(&self) -> ServiceResult<Vec<UserResponse>> {
        let users = self.ctx.users.list(USER_LIST_LIMIT).await?;
        Ok(users.into_iter().map(UserResponse::from).collect())
    }

    /// Reset a user's password, gated by the master key.
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn admin_update_password(
        &self,
        request: AdminUpdatePasswordRequest,
    ) -> ServiceResult<()> {
        self.ctx.require_master_key(&request.master_key)?;
        request
            .validate()
            .map_err(|e| ServiceError::validation(e.to_string()))?;

        self.require_user(&request.username).await?;

        let new_hash = hash_password(&request.new_password)?;
        self.ctx
            .users
            .update_password(&request.username, &new_hash)
            .await?;

        info!(username = %request.username, "password reset by admin");
        Ok(())
    }

    /// Rename a user, gated by the master key. Live sessions for the old
    /// name are dropped as part of the rename.
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn admin_update_username(
        &self,
        request: AdminUpdateUsernameRequest,
    ) -> ServiceResult<UserResponse> {
        self.ctx.require_master_key(&request.master_key)?;
        request
            .validate()
            .map_err(|e| ServiceError::validation(e.to_string()))?;

        if self.ctx.users.username_exists(&request.new_username).await? {
            return Err(DomainError::UsernameTaken.into());
        }

        let user = self
            .ctx
            .users
            .rename(&request.username, &request.new_username)
            .await?;

        info!(
            old_username = %request.username,
            new_username = %user.username,
            "username updated by admin"
        );
        Ok(UserResponse::from(user))
    }

    /// Change a user's display name, gated by the master key.
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn admin_update_display_name(
        &self,
        request: AdminUpdateDisplayNameRequest,
    ) -> ServiceResult<UserResponse> {
        self.ctx.require_master_key(&request.master_key)?;
        request
            .validate()
            .map_err(|e| ServiceError::validation(e.to_string()))?;

        let user = self
            .ctx
            .users
            .update_display_name(&request.username, &request.new_display_name)
            .await?;

        info!(username = %user.username, "display name updated by admin");
        Ok(UserResponse::from(user))
    }

    /// Change a user's phone number, gated by the master key.
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn admin_update_phone(
        &self,
        request: AdminUpdatePhoneRequest,
    ) -> ServiceResult<UserResponse> {
        self.ctx.require_master_key(&request.master_key)?;
        request
            .validate()
            .map_err(|e| ServiceError::validation(e.to_string()))?;

        if self.ctx.users.phone_exists(&request.new_phone_number).await? {
            return Err(DomainError::PhoneNumberTaken.into());
        }

        let user = self
            .ctx
            .users
            .update_phone_number(&request.username, &request.new_phone_number)
            .await?;

        info!(username = %user.username, "phone number updated by admin");
        Ok(UserResponse::from(user))
    }

    async fn require_user(&self, username: &str) -> ServiceResult<()> {
        if self.ctx.users.find_by_username(username).await?.is_none() {
            return Err(DomainError::UserNotFound(username.to_string()).into());
        }
        Ok(())
    }
}
