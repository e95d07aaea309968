//! Database models (SQLx `FromRow` structs) and entity conversions

mod account;
mod message;
mod session;
mod user;

pub use account::AccountModel;
pub use message::MessageModel;
pub use session::SessionModel;
pub use user::UserModel;
