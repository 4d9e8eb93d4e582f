//! Repository port traits
//!
//! These traits define the interface for data persistence.
//! Implementations are provided by adapters (e.g., SQL via SeaORM).

use async_trait::async_trait;

use crate::domain::entities::{NewUser, User, UserId};
use crate::error::DomainError;

/// Repository for User entities
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Find a user by ID
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError>;

    /// Find every user with exactly this email
    async fn find_by_email(&self, email: &str) -> Result<Vec<User>, DomainError>;

    /// Create a new user; storage assigns the ID
    async fn create(&self, user: &NewUser) -> Result<User, DomainError>;

    /// Overwrite an existing user record
    async fn save(&self, user: &User) -> Result<User, DomainError>;

    /// Delete a user
    async fn delete(&self, id: &UserId) -> Result<(), DomainError>;
}
