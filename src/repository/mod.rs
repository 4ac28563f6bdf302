//! Store abstractions for users and tasks.
//!
//! The business logic only sees the `UserRepository` and `TaskRepository`
//! traits. `postgres` backs them with sqlx, `memory` keeps everything in
//! process and is what the tests (and a database-less binary) use.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{Role, Task, TaskPatch, User};

pub use memory::{InMemoryTaskRepository, InMemoryUserRepository};
pub use postgres::{PgTaskRepository, PgUserRepository};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The addressed record does not exist.
    #[error("record not found")]
    NotFound,
    /// A uniqueness constraint rejected the write.
    #[error("record already exists")]
    Duplicate,
    /// Any other backend failure, message kept verbatim.
    #[error("{0}")]
    Backend(String),
}

/// Converts `sqlx::Error` into `StoreError`.
///
/// `RowNotFound` maps to `NotFound` and unique violations to `Duplicate`.
impl From<sqlx::Error> for StoreError {
    fn from(error: sqlx::Error) -> StoreError {
        match error {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            sqlx::Error::Database(ref db) if db.is_unique_violation() => StoreError::Duplicate,
            _ => StoreError::Backend(error.to_string()),
        }
    }
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persists a new user. Fails with `Duplicate` if the username is taken.
    async fn create_user(&self, user: &User) -> Result<(), StoreError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    /// Total number of registered users.
    async fn count(&self) -> Result<u64, StoreError>;

    /// Sets the role of an existing user. Fails with `NotFound` if missing.
    async fn update_role(&self, id: Uuid, role: Role) -> Result<(), StoreError>;
}

#[async_trait]
pub trait TaskRepository: Send + Sync {
    async fn create_task(&self, task: Task) -> Result<Task, StoreError>;

    async fn find_all(&self) -> Result<Vec<Task>, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Task>, StoreError>;

    /// Overwrites the supplied fields and returns the updated task.
    async fn update_task(&self, id: Uuid, patch: &TaskPatch) -> Result<Task, StoreError>;

    /// Removes a task. Fails with `NotFound` if nothing was deleted.
    async fn delete_task(&self, id: Uuid) -> Result<(), StoreError>;
}
