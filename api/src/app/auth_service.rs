//! Auth service
//!
//! Handles signup and signin with salted password hashes. Passwords are
//! stored as Argon2id PHC strings, which carry their own salt and cost
//! parameters.

use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::app::UsersService;
use crate::domain::entities::User;
use crate::domain::ports::UserRepository;
use crate::error::AppError;

/// Service for signing users up and in
pub struct AuthService<UR>
where
    UR: UserRepository,
{
    users: Arc<UsersService<UR>>,
}

impl<UR> AuthService<UR>
where
    UR: UserRepository,
{
    pub fn new(users: Arc<UsersService<UR>>) -> Self {
        Self { users }
    }

    /// Register a new user with a salted and hashed password
    pub async fn signup(&self, email: &str, password: &str) -> Result<User, AppError> {
        if !self.users.find(email).await?.is_empty() {
            return Err(AppError::email_in_use());
        }

        let hashed = hash_password(password)?;
        let user = self.users.create(email, &hashed).await?;

        tracing::info!(user_id = %user.id, "User signed up");
        Ok(user)
    }

    /// Check credentials and return the matching user
    pub async fn signin(&self, email: &str, password: &str) -> Result<User, AppError> {
        let user = self
            .users
            .find(email)
            .await?
            .into_iter()
            .next()
            .ok_or_else(AppError::user_not_found)?;

        if !verify_password(password, &user.password) {
            tracing::debug!(user_id = %user.id, "Rejected signin with bad password");
            return Err(AppError::bad_password());
        }

        tracing::info!(user_id = %user.id, "User signed in");
        Ok(user)
    }
}

/// Hash a password with a fresh random salt
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))
}

/// Check a password against a stored PHC hash
///
/// A stored value that does not parse never verifies.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let parsed = match PasswordHash::new(stored) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::warn!(error = %e, "Stored password hash is malformed");
            return false;
        }
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}
