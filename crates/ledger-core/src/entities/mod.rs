//! Domain entities

mod account;
mod message;
mod session;
mod user;

pub use account::{Account, AdjustDirection, BalanceChange, GradeChange, TransferReceipt, UNASSIGNED_GRADE};
pub use message::{Message, MESSAGE_TTL_DAYS};
pub use session::{generate_session_key, Session};
pub use user::{IdentifierSet, LookupPrecedence, NewUser, User};
