//! Mock implementations of port traits
//!
//! These are in-memory implementations that can be configured for testing.
//! They store data in memory and allow tests to verify behavior.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use crate::domain::entities::{NewUser, User, UserId};
use crate::domain::ports::UserRepository;
use crate::error::DomainError;

// ============================================================================
// In-Memory User Repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<BTreeMap<UserId, User>>>,
    next_id: Arc<RwLock<i32>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate with a user for testing
    pub fn with_user(self, user: User) -> Self {
        self.users.write().unwrap().insert(user.id, user);
        self
    }
}

fn email_taken(users: &BTreeMap<UserId, User>, email: &str, except: Option<UserId>) -> bool {
    users
        .values()
        .any(|u| u.email == email && Some(u.id) != except)
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        let users = self.users.read().unwrap();
        Ok(users.get(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Vec<User>, DomainError> {
        let users = self.users.read().unwrap();
        Ok(users.values().filter(|u| u.email == email).cloned().collect())
    }

    async fn create(&self, new_user: &NewUser) -> Result<User, DomainError> {
        let mut users = self.users.write().unwrap();
        if email_taken(&users, &new_user.email, None) {
            return Err(DomainError::AlreadyExists("email in use".to_string()));
        }

        let mut next_id = self.next_id.write().unwrap();
        *next_id += 1;
        let user = User {
            id: UserId(*next_id),
            email: new_user.email.clone(),
            password: new_user.password.clone(),
        };
        users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn save(&self, user: &User) -> Result<User, DomainError> {
        let mut users = self.users.write().unwrap();
        if email_taken(&users, &user.email, Some(user.id)) {
            return Err(DomainError::AlreadyExists("email in use".to_string()));
        }

        match users.get_mut(&user.id) {
            Some(existing) => {
                *existing = user.clone();
                Ok(user.clone())
            }
            None => Err(DomainError::NotFound(format!("User {} not found", user.id))),
        }
    }

    async fn delete(&self, id: &UserId) -> Result<(), DomainError> {
        let mut users = self.users.write().unwrap();
        users
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| DomainError::NotFound(format!("User {} not found", id)))
    }
}

// ============================================================================
// Failing User Repository
// ============================================================================

/// Repository whose every call fails with a database error
pub struct FailingUserRepository;

fn unavailable() -> DomainError {
    DomainError::Database("database unavailable".to_string())
}

#[async_trait]
impl UserRepository for FailingUserRepository {
    async fn find_by_id(&self, _id: &UserId) -> Result<Option<User>, DomainError> {
        Err(unavailable())
    }

    async fn find_by_email(&self, _email: &str) -> Result<Vec<User>, DomainError> {
        Err(unavailable())
    }

    async fn create(&self, _user: &NewUser) -> Result<User, DomainError> {
        Err(unavailable())
    }

    async fn save(&self, _user: &User) -> Result<User, DomainError> {
        Err(unavailable())
    }

    async fn delete(&self, _id: &UserId) -> Result<(), DomainError> {
        Err(unavailable())
    }
}
