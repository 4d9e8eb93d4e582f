//! Users service
//!
//! Lookup, creation, update and removal of user records.

use std::sync::Arc;

use crate::domain::entities::{NewUser, UpdateUser, User, UserId};
use crate::domain::ports::UserRepository;
use crate::error::{AppError, DomainError};

/// Unique email violations from storage become "email in use"
fn email_conflict(err: DomainError) -> AppError {
    match err {
        DomainError::AlreadyExists(_) => AppError::email_in_use(),
        other => other.into(),
    }
}

/// Service for managing users
pub struct UsersService<UR>
where
    UR: UserRepository,
{
    users: Arc<UR>,
}

impl<UR> UsersService<UR>
where
    UR: UserRepository,
{
    pub fn new(users: Arc<UR>) -> Self {
        Self { users }
    }

    /// Create a user. `password` must already be hashed.
    pub async fn create(&self, email: &str, password: &str) -> Result<User, AppError> {
        let user = self
            .users
            .create(&NewUser {
                email: email.to_string(),
                password: password.to_string(),
            })
            .await
            .map_err(email_conflict)?;

        tracing::debug!(user_id = %user.id, "Created user");
        Ok(user)
    }

    /// Find a user by ID
    pub async fn find_one(&self, id: &UserId) -> Result<Option<User>, AppError> {
        Ok(self.users.find_by_id(id).await?)
    }

    /// Find all users with the given email
    pub async fn find(&self, email: &str) -> Result<Vec<User>, AppError> {
        Ok(self.users.find_by_email(email).await?)
    }

    /// Merge `attrs` into an existing user and persist it
    pub async fn update(&self, id: &UserId, attrs: UpdateUser) -> Result<User, AppError> {
        let mut user = self
            .users
            .find_by_id(id)
            .await?
            .ok_or_else(AppError::user_not_found)?;

        if attrs.is_empty() {
            return Ok(user);
        }

        user.apply(attrs);
        let user = self.users.save(&user).await.map_err(email_conflict)?;

        tracing::debug!(user_id = %user.id, "Updated user");
        Ok(user)
    }

    /// Remove a user, returning the record as it was before removal
    pub async fn remove(&self, id: &UserId) -> Result<User, AppError> {
        let user = self
            .users
            .find_by_id(id)
            .await?
            .ok_or_else(AppError::user_not_found)?;

        self.users.delete(id).await?;

        tracing::debug!(user_id = %user.id, "Removed user");
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{test_user, FailingUserRepository, InMemoryUserRepository};

    fn create_service(repo: InMemoryUserRepository) -> UsersService<InMemoryUserRepository> {
        UsersService::new(Arc::new(repo))
    }

    #[tokio::test]
    async fn create_then_find_one() {
        let service = create_service(InMemoryUserRepository::new());

        let user = service.create("a@test.com", "salt.hash").await.unwrap();
        let found = service.find_one(&user.id).await.unwrap();

        assert_eq!(found, Some(user));
    }

    #[tokio::test]
    async fn find_one_missing_returns_none() {
        let service = create_service(InMemoryUserRepository::new());

        let found = service.find_one(&UserId(1)).await.unwrap();

        assert!(found.is_none());
    }

    #[tokio::test]
    async fn find_filters_by_email() {
        let service = create_service(InMemoryUserRepository::new());
        service.create("a@test.com", "x.y").await.unwrap();
        service.create("b@test.com", "x.y").await.unwrap();

        let users = service.find("a@test.com").await.unwrap();

        assert_eq!(users.len(), 1);
        assert_eq!(users[0].email, "a@test.com");
    }

    #[tokio::test]
    async fn update_merges_attributes() {
        let existing = test_user();
        let service = create_service(InMemoryUserRepository::new().with_user(existing.clone()));

        let updated = service
            .update(
                &existing.id,
                UpdateUser {
                    email: Some("changed@test.com".to_string()),
                    password: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.email, "changed@test.com");
        assert_eq!(updated.password, existing.password);
        let stored = service.find_one(&existing.id).await.unwrap().unwrap();
        assert_eq!(stored.email, "changed@test.com");
    }

    #[tokio::test]
    async fn create_with_taken_email_is_email_in_use() {
        let service = create_service(InMemoryUserRepository::new());
        service.create("a@test.com", "x.y").await.unwrap();

        let result = service.create("a@test.com", "x.y").await;

        assert!(matches!(result, Err(AppError::BadRequest(msg)) if msg == "email in use"));
    }

    #[tokio::test]
    async fn update_to_taken_email_is_email_in_use() {
        let service = create_service(InMemoryUserRepository::new());
        service.create("a@test.com", "x.y").await.unwrap();
        let other = service.create("b@test.com", "x.y").await.unwrap();

        let result = service
            .update(
                &other.id,
                UpdateUser {
                    email: Some("a@test.com".to_string()),
                    password: None,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::BadRequest(msg)) if msg == "email in use"));
    }

    #[tokio::test]
    async fn update_missing_user_is_not_found() {
        let service = create_service(InMemoryUserRepository::new());

        let result = service.update(&UserId(5), UpdateUser::default()).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn remove_returns_removed_user() {
        let existing = test_user();
        let service = create_service(InMemoryUserRepository::new().with_user(existing.clone()));

        let removed = service.remove(&existing.id).await.unwrap();

        assert_eq!(removed, existing);
        assert!(service.find_one(&existing.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn remove_missing_user_is_not_found() {
        let service = create_service(InMemoryUserRepository::new());

        let result = service.remove(&UserId(5)).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn storage_failure_propagates() {
        let service = UsersService::new(Arc::new(FailingUserRepository));

        let result = service.find("a@test.com").await;

        assert!(matches!(
            result,
            Err(AppError::Domain(DomainError::Database(_)))
        ));
    }
}
