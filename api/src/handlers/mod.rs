//! HTTP handlers
//!
//! Axum request handlers for the API endpoints.

pub mod users;

pub use users::{
    find_all_users, find_user, remove_user, signin, signout, signup, update_user, whoami,
};
