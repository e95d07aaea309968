//! Authentication primitives
//!
//! Password hashing and master-key verification.

mod master_key;
mod password;

pub use master_key::verify_master_key;
pub use password::{hash_password, verify_password};
