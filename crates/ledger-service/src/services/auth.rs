//! Registration, login, and password changes

use tracing::{info, instrument};
use validator::Validate;

use ledger_common::auth::{hash_password, verify_password};
use ledger_core::{DomainError, IdentifierSet, NewUser};

use crate::dto::{
    LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, UpdatePasswordRequest,
    UserResponse,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::resolver;
use super::session::SessionService;

/// Authentication and credential management
#[derive(Clone)]
pub struct AuthService {
    ctx: ServiceContext,
    sessions: SessionService,
}

impl AuthService {
    pub fn new(ctx: ServiceContext) -> Self {
        let sessions = SessionService::new(ctx.clone());
        Self { ctx, sessions }
    }

    /// Register a new user with a zero-balance account.
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn register(&self, request: RegisterRequest) -> ServiceResult<RegisterResponse> {
        request
            .validate()
            .map_err(|e| ServiceError::validation(e.to_string()))?;

        if self.ctx.users.username_exists(&request.username).await? {
            return Err(DomainError::UsernameTaken.into());
        }
        if self.ctx.users.phone_exists(&request.phone_number).await? {
            return Err(DomainError::PhoneNumberTaken.into());
        }

        let password_hash = hash_password(&request.password)?;
        let new_user = NewUser {
            username: request.username,
            phone_number: request.phone_number,
            display_name: request.display_name,
        };

        let user = self
            .ctx
            .users
            .create_with_account(&new_user, &password_hash)
            .await?;

        info!(username = %user.username, "user registered");
        Ok(RegisterResponse {
            user: UserResponse::from(user),
        })
    }

    /// Authenticate by username or phone number and hand back a session key.
    #[instrument(skip(self, request))]
    pub async fn login(&self, request: LoginRequest) -> ServiceResult<LoginResponse> {
        let identifiers = IdentifierSet::new(
            request.username.as_deref(),
            request.phone_number.as_deref(),
        );

        let user = resolver::resolve_user(&self.ctx, &identifiers).await?;

        let hash = self
            .ctx
            .users
            .get_password_hash(&user.username)
            .await?
            .ok_or_else(|| DomainError::UserNotFound(user.username.clone()))?;

        if !verify_password(&request.password, &hash)? {
            return Err(ServiceError::unauthorized("Invalid password"));
        }

        let session = self.sessions.issue(&user.username).await?;

        info!(username = %user.username, "user logged in");
        Ok(LoginResponse { key: session.key })
    }

    /// Change a password, authenticated by the current one.
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn update_password(&self, request: UpdatePasswordRequest) -> ServiceResult<()> {
        request
            .validate()
            .map_err(|e| ServiceError::validation(e.to_string()))?;

        let user = self
            .ctx
            .users
            .find_by_username(&request.username)
            .await?
            .ok_or_else(|| DomainError::UserNotFound(request.username.clone()))?;

        let hash = self
            .ctx
            .users
            .get_password_hash(&user.username)
            .await?
            .ok_or_else(|| DomainError::UserNotFound(user.username.clone()))?;

        if !verify_password(&request.current_password, &hash)? {
            return Err(ServiceError::unauthorized("Invalid password"));
        }

        let new_hash = hash_password(&request.new_password)?;
        self.ctx
            .users
            .update_password(&user.username, &new_hash)
            .await?;

        info!(username = %user.username, "password updated");
        Ok(())
    }
}
