//! Application services
//!
//! Each service borrows a shared [`ServiceContext`] holding the repository
//! ports and runtime policy (master key, identifier precedence, session TTL).

pub mod auth;
pub mod context;
pub mod error;
pub mod ledger;
pub mod message;
pub mod resolver;
pub mod session;
pub mod user;

pub use auth::AuthService;
pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use ledger::LedgerService;
pub use message::MessageService;
pub use session::SessionService;
pub use user::UserService;
