//! Repository traits (ports)

mod repositories;

pub use repositories::{
    AccountRepository, LedgerRepository, MessageRepository, RepoResult, SessionRepository,
    UserRepository,
};
