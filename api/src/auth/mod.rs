//! Session and current-user middleware

pub mod current_user;
pub mod session;

pub use current_user::{auth_guard, current_user_middleware};
pub use session::{session_middleware, Session, SessionKey};
