//! PostgreSQL repository implementations

mod account;
mod error;
mod ledger;
mod message;
mod session;
mod user;

pub use account::PgAccountRepository;
pub use ledger::PgLedgerRepository;
pub use message::PgMessageRepository;
pub use session::PgSessionRepository;
pub use user::PgUserRepository;
