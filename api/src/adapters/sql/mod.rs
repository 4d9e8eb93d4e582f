//! SQL adapters
//!
//! Implementations of repository traits using SeaORM. Works against
//! SQLite and PostgreSQL, selected by the connection URL.

pub mod user_repo;

use sea_orm::{ConnectionTrait, DatabaseConnection, Schema};

use crate::entity::users;
use crate::error::DomainError;

pub use user_repo::SqlUserRepository;

/// Create the tables this service needs if they do not exist yet
pub async fn ensure_schema(db: &DatabaseConnection) -> Result<(), DomainError> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    let mut create_users = schema.create_table_from_entity(users::Entity);
    create_users.if_not_exists();

    db.execute(backend.build(&create_users))
        .await
        .map_err(|e| DomainError::Database(e.to_string()))?;

    Ok(())
}
