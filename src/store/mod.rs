pub mod manager;
pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Goal, GoalDraft, GoalPatch, Task, TaskPatch, User};

/// Errors from the store adapters.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Goal persistence. Each goal is a single document: task-level mutations are
/// addressed by (goal_id, task_id) and applied as one atomic update against
/// the owning goal, so concurrent mutations on the same goal serialize on the
/// store's per-document atomicity (last write wins, no optimistic check).
#[async_trait]
pub trait GoalStore: Send + Sync {
    /// All goals, optionally restricted to one owner, in stored order.
    async fn list(&self, owner: Option<&str>) -> Result<Vec<Goal>, StoreError>;

    /// Insert a new goal, assigning its id and ids for any seeded tasks.
    async fn create(&self, draft: GoalDraft) -> Result<Goal, StoreError>;

    async fn get(&self, goal_id: Uuid) -> Result<Goal, StoreError>;

    /// Merge-patch title/color; absent fields stay untouched.
    async fn update(&self, goal_id: Uuid, patch: GoalPatch) -> Result<Goal, StoreError>;

    /// Remove the goal and its embedded tasks. Returns whether a record was
    /// actually removed; deleting an absent goal is not an error.
    async fn delete(&self, goal_id: Uuid) -> Result<bool, StoreError>;

    /// Append a task (unconditional append; ids make duplicates distinct).
    /// Returns the updated parent goal.
    async fn add_task(&self, goal_id: Uuid, task: Task) -> Result<Goal, StoreError>;

    /// Merge-patch exactly the task matching (goal_id, task_id). `NotFound`
    /// when either the goal or the task is missing. Returns the updated goal.
    async fn update_task(
        &self,
        goal_id: Uuid,
        task_id: Uuid,
        patch: TaskPatch,
    ) -> Result<Goal, StoreError>;

    /// Strip the matching task. An absent task is success: the postcondition
    /// already holds. `NotFound` only when the goal itself is missing.
    async fn remove_task(&self, goal_id: Uuid, task_id: Uuid) -> Result<Goal, StoreError>;

    /// Connectivity probe for the health endpoint.
    async fn ping(&self) -> Result<(), StoreError>;
}

/// User account persistence, used by registration and basic-auth verification.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new account. `Duplicate` when the username is taken.
    async fn create(&self, username: &str, password_hash: &str) -> Result<User, StoreError>;

    async fn find(&self, username: &str) -> Result<Option<User>, StoreError>;
}
