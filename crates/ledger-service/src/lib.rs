//! # ledger-service
//!
//! Application layer: request/response DTOs and the services implementing
//! every ledger operation on top of the `ledger-core` repository ports.

pub mod dto;
pub mod services;

#[cfg(test)]
mod test_support;

// Re-export commonly used types at crate root
pub use dto::{
    AccountResponse, AdjustBalanceRequest, AdjustBalanceResponse, AdminUpdateDisplayNameRequest,
    AdminUpdatePasswordRequest, AdminUpdatePhoneRequest, AdminUpdateUsernameRequest,
    BalanceResponse, LoginRequest, LoginResponse, MessageResponse, MessagesResponse,
    RegisterRequest, RegisterResponse, SessionRequest, SetGradeRequest, StatusResponse,
    TransferRequest, TransferResponse, UpdatePasswordRequest, UserResponse, ViewBalanceRequest,
};
pub use services::{
    AuthService, LedgerService, MessageService, ServiceContext, ServiceContextBuilder,
    ServiceError, ServiceResult, SessionService, UserService,
};
