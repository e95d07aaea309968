//! Data Transfer Objects for the HTTP API
//!
//! The wire format is camelCase JSON. Requests carry their own validation
//! rules; responses never expose password hashes or session internals beyond
//! the key itself.

pub mod requests;
pub mod responses;

pub use requests::{
    AdjustBalanceRequest, AdminUpdateDisplayNameRequest, AdminUpdatePasswordRequest,
    AdminUpdatePhoneRequest, AdminUpdateUsernameRequest, LoginRequest, RegisterRequest,
    SessionRequest, SetGradeRequest, TransferRequest, UpdatePasswordRequest, ViewBalanceRequest,
};
pub use responses::{
    AccountResponse, AdjustBalanceResponse, BalanceResponse, LoginResponse, MessageResponse,
    MessagesResponse, RegisterResponse, StatusResponse, TransferResponse, UserResponse,
};
