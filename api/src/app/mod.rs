//! Application layer
//!
//! Contains use cases and service orchestration.
//! Services coordinate between domain entities and ports.

pub mod auth_service;
pub mod users_service;

pub use auth_service::{hash_password, AuthService};
pub use users_service::UsersService;
