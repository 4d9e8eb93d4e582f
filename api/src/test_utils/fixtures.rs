//! Test fixtures
//!
//! Factory functions for creating test data with sensible defaults.

use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;

use crate::auth::SessionKey;
use crate::domain::entities::{User, UserId};
use crate::test_utils::InMemoryUserRepository;
use crate::AppState;

static NEXT_FIXTURE_ID: AtomicI32 = AtomicI32::new(10_000);

/// Create a test user with default values
pub fn test_user() -> User {
    test_user_with_email("test@test.com")
}

/// Create a test user with a specific email
///
/// The stored password is a placeholder, not a valid hash.
pub fn test_user_with_email(email: &str) -> User {
    User {
        id: UserId(NEXT_FIXTURE_ID.fetch_add(1, Ordering::Relaxed)),
        email: email.to_string(),
        password: "$argon2id$placeholder".to_string(),
    }
}

/// Build application state over an in-memory repository
pub fn test_state(repo: InMemoryUserRepository) -> AppState<InMemoryUserRepository> {
    AppState::new(Arc::new(repo), SessionKey::new("test-session-key"))
}
