//! Balance operations: administrative adjustments, peer transfers, grades

use tracing::{info, instrument};
use validator::Validate;

use ledger_core::{DomainError, IdentifierSet};

use crate::dto::{
    AccountResponse, AdjustBalanceRequest, AdjustBalanceResponse, BalanceResponse,
    SetGradeRequest, TransferRequest, TransferResponse, ViewBalanceRequest,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::resolver;
use super::session::SessionService;

/// Balance and grade use cases
#[derive(Clone)]
pub struct LedgerService {
    ctx: ServiceContext,
    sessions: SessionService,
}

impl LedgerService {
    pub fn new(ctx: ServiceContext) -> Self {
        let sessions = SessionService::new(ctx.clone());
        Self { ctx, sessions }
    }

    /// Credit or debit an account, gated by the master key.
    #[instrument(skip(self, request), fields(action = ?request.action, amount = request.amount))]
    pub async fn adjust_balance(
        &self,
        request: AdjustBalanceRequest,
    ) -> ServiceResult<AdjustBalanceResponse> {
        self.ctx.require_master_key(&request.master_key)?;

        if request.amount <= 0 {
            return Err(DomainError::InvalidAmount.into());
        }

        let identifiers = IdentifierSet::new(
            request.username.as_deref(),
            request.phone_number.as_deref(),
        );
        let account = resolver::resolve_account(&self.ctx, &identifiers).await?;

        let change = self
            .ctx
            .ledger
            .adjust(&account.username, request.amount, request.action)
            .await?;

        info!(
            username = %change.username,
            old_balance = change.old_balance,
            new_balance = change.new_balance,
            "balance adjusted"
        );
        Ok(AdjustBalanceResponse {
            username: change.username,
            balance: change.new_balance,
        })
    }

    /// Read any account's balance and grade, gated by the master key.
    #[instrument(skip(self, request))]
    pub async fn view_balance_admin(
        &self,
        request: ViewBalanceRequest,
    ) -> ServiceResult<BalanceResponse> {
        self.ctx.require_master_key(&request.master_key)?;

        let identifiers = IdentifierSet::new(
            request.username.as_deref(),
            request.phone_number.as_deref(),
        );
        let account = resolver::resolve_account(&self.ctx, &identifiers).await?;

        Ok(BalanceResponse::from(&account))
    }

    /// Read the caller's own balance, authenticated by session key.
    #[instrument(skip(self, key))]
    pub async fn view_balance_self(&self, key: &str) -> ServiceResult<BalanceResponse> {
        let session = self.sessions.validate(key).await?;

        let account = self
            .ctx
            .accounts
            .find_by_username(&session.username)
            .await?
            .ok_or_else(|| DomainError::AccountNotFound(session.username.clone()))?;

        Ok(BalanceResponse::from(&account))
    }

    /// Move funds between two accounts.
    ///
    /// Failures surface in a fixed order: bad amount, then bad session, then
    /// missing sender account, then insufficient funds, then unknown
    /// recipient, then self-transfer. The funds check here is a fast
    /// pre-check; the engine re-checks under the row lock before committing.
    #[instrument(skip(self, request), fields(amount = request.amount))]
    pub async fn transfer(&self, request: TransferRequest) -> ServiceResult<TransferResponse> {
        if request.amount <= 0 {
            return Err(DomainError::InvalidAmount.into());
        }

        let session = self.sessions.validate(&request.sender_key).await?;

        let sender = self
            .ctx
            .accounts
            .find_by_username(&session.username)
            .await?
            .ok_or_else(|| DomainError::AccountNotFound(session.username.clone()))?;

        if !sender.can_debit(request.amount) {
            return Err(DomainError::InsufficientFunds.into());
        }

        let recipient =
            resolver::resolve_recipient(&self.ctx, &request.recipient_username).await?;

        if sender.is_same_holder(&recipient) {
            return Err(DomainError::SelfTransfer.into());
        }

        let receipt = self
            .ctx
            .ledger
            .transfer(&sender.username, &recipient.username, request.amount)
            .await?;

        info!(
            sender = %receipt.sender,
            recipient = %receipt.recipient,
            amount = receipt.amount,
            "transfer committed"
        );
        Ok(TransferResponse {
            sender_balance: receipt.sender_balance,
            recipient_balance: receipt.recipient_balance,
        })
    }

    /// Assign a grade to an account, gated by the master key.
    #[instrument(skip(self, request), fields(grade = %request.grade))]
    pub async fn set_grade(&self, request: SetGradeRequest) -> ServiceResult<AccountResponse> {
        self.ctx.require_master_key(&request.master_key)?;
        request
            .validate()
            .map_err(|e| ServiceError::validation(e.to_string()))?;

        let identifiers = IdentifierSet::new(
            request.username.as_deref(),
            request.phone_number.as_deref(),
        );
        let mut account = resolver::resolve_account(&self.ctx, &identifiers).await?;

        let change = self
            .ctx
            .ledger
            .set_grade(&account.username, &request.grade)
            .await?;

        info!(username = %change.username, grade = %change.new_grade, "grade updated");
        account.grade = Some(change.new_grade);
        Ok(AccountResponse::from(account))
    }
}
