//! # ledger-core
//!
//! Domain layer containing entities, domain errors, repository traits, and
//! audit-message composition. This crate has zero dependencies on
//! infrastructure (database, web framework, etc.).

pub mod audit;
pub mod entities;
pub mod error;
pub mod traits;

// Re-export commonly used types at crate root
pub use entities::{
    generate_session_key, Account, AdjustDirection, BalanceChange, GradeChange, IdentifierSet,
    LookupPrecedence, Message, NewUser, Session, TransferReceipt, User, MESSAGE_TTL_DAYS,
    UNASSIGNED_GRADE,
};
pub use error::DomainError;
pub use traits::{
    AccountRepository, LedgerRepository, MessageRepository, RepoResult, SessionRepository,
    UserRepository,
};
