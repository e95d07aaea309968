//! # ledger-db
//!
//! Database layer implementing repository traits with PostgreSQL via SQLx.
//!
//! ## Overview
//!
//! This crate provides PostgreSQL implementations for all repository traits
//! defined in `ledger-core`. It handles:
//!
//! - Connection pool management
//! - Database models with SQLx `FromRow` derives
//! - Repository implementations, including the transactional ledger engine
//!   (row-locked balance mutations with atomic audit messages)

pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use pool::{create_pool, run_migrations, DatabaseConfig, PgPool};
pub use repositories::{
    PgAccountRepository, PgLedgerRepository, PgMessageRepository, PgSessionRepository,
    PgUserRepository,
};
