//! Persistence ports.
//!
//! Services receive these as `Arc<dyn ...>` handles at construction time.
//! Each method is a single statement against the backing store; nothing here
//! spans an explicit transaction.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{NewTask, NewUser, Task, TaskChanges, User};

/// Failures reported by store adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write.
    #[error("unique constraint violated: {constraint}")]
    UniqueViolation { constraint: String },
    /// Any other backend failure.
    #[error("store failure: {0}")]
    Backend(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Name of the unique constraint on `users.email`, as declared in the migrations.
pub const USERS_EMAIL_KEY: &str = "users_email_key";

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Inserts a user. Fails with [`StoreError::UniqueViolation`] when the
    /// email is already taken.
    async fn insert_user(&self, user: NewUser) -> StoreResult<User>;

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    async fn find_user_by_id(&self, id: &str) -> StoreResult<Option<User>>;
}

#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn count_tasks(&self) -> StoreResult<i64>;

    /// Tasks ordered newest first.
    async fn list_tasks(&self, limit: i64, offset: i64) -> StoreResult<Vec<Task>>;

    async fn find_task(&self, id: &str) -> StoreResult<Option<Task>>;

    async fn insert_task(&self, task: NewTask) -> StoreResult<Task>;

    /// Overwrites the mutable fields and refreshes `updated_at`.
    /// Returns `None` when no task has that id.
    async fn update_task(&self, id: &str, changes: TaskChanges) -> StoreResult<Option<Task>>;

    /// Returns the number of rows removed.
    async fn delete_task(&self, id: &str) -> StoreResult<u64>;
}
