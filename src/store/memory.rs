use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{Goal, GoalDraft, GoalPatch, Task, TaskPatch, User};
use crate::store::{GoalStore, StoreError, UserStore};

/// In-memory goal adapter with the same per-goal atomicity contract as the
/// Postgres one: each mutation takes the write lock once, so no reader ever
/// observes a half-applied patch. Backed by a Vec to keep insertion order.
#[derive(Default)]
pub struct MemoryGoalStore {
    goals: RwLock<Vec<Goal>>,
}

impl MemoryGoalStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GoalStore for MemoryGoalStore {
    async fn list(&self, owner: Option<&str>) -> Result<Vec<Goal>, StoreError> {
        let goals = self.goals.read().await;
        Ok(goals
            .iter()
            .filter(|g| owner.map_or(true, |o| g.owner == o))
            .cloned()
            .collect())
    }

    async fn create(&self, draft: GoalDraft) -> Result<Goal, StoreError> {
        let now = Utc::now();
        let goal = Goal {
            id: Uuid::new_v4(),
            owner: draft.owner,
            title: draft.title,
            color: draft.color,
            tasks: draft.tasks.into_iter().map(Task::assign).collect(),
            created_at: now,
            updated_at: now,
        };

        let mut goals = self.goals.write().await;
        goals.push(goal.clone());
        Ok(goal)
    }

    async fn get(&self, goal_id: Uuid) -> Result<Goal, StoreError> {
        let goals = self.goals.read().await;
        goals
            .iter()
            .find(|g| g.id == goal_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("goal {} not found", goal_id)))
    }

    async fn update(&self, goal_id: Uuid, patch: GoalPatch) -> Result<Goal, StoreError> {
        let mut goals = self.goals.write().await;
        let goal = goals
            .iter_mut()
            .find(|g| g.id == goal_id)
            .ok_or_else(|| StoreError::NotFound(format!("goal {} not found", goal_id)))?;

        patch.apply(goal);
        goal.updated_at = Utc::now();
        Ok(goal.clone())
    }

    async fn delete(&self, goal_id: Uuid) -> Result<bool, StoreError> {
        let mut goals = self.goals.write().await;
        let before = goals.len();
        goals.retain(|g| g.id != goal_id);
        Ok(goals.len() < before)
    }

    async fn add_task(&self, goal_id: Uuid, task: Task) -> Result<Goal, StoreError> {
        let mut goals = self.goals.write().await;
        let goal = goals
            .iter_mut()
            .find(|g| g.id == goal_id)
            .ok_or_else(|| StoreError::NotFound(format!("goal {} not found", goal_id)))?;

        goal.tasks.push(task);
        goal.updated_at = Utc::now();
        Ok(goal.clone())
    }

    async fn update_task(
        &self,
        goal_id: Uuid,
        task_id: Uuid,
        patch: TaskPatch,
    ) -> Result<Goal, StoreError> {
        let mut goals = self.goals.write().await;
        let goal = goals
            .iter_mut()
            .find(|g| g.id == goal_id)
            .ok_or_else(|| StoreError::NotFound(format!("goal {} not found", goal_id)))?;

        let task = goal
            .tasks
            .iter_mut()
            .find(|t| t.id == task_id)
            .ok_or_else(|| {
                StoreError::NotFound(format!("task {} not found under goal {}", task_id, goal_id))
            })?;

        patch.apply(task);
        goal.updated_at = Utc::now();
        Ok(goal.clone())
    }

    async fn remove_task(&self, goal_id: Uuid, task_id: Uuid) -> Result<Goal, StoreError> {
        let mut goals = self.goals.write().await;
        let goal = goals
            .iter_mut()
            .find(|g| g.id == goal_id)
            .ok_or_else(|| StoreError::NotFound(format!("goal {} not found", goal_id)))?;

        // Absent task is success: the postcondition already holds.
        goal.tasks.retain(|t| t.id != task_id);
        goal.updated_at = Utc::now();
        Ok(goal.clone())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// In-memory user adapter.
#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<Vec<User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create(&self, username: &str, password_hash: &str) -> Result<User, StoreError> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.username == username) {
            return Err(StoreError::Duplicate(format!(
                "username '{}' is taken",
                username
            )));
        }

        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn find(&self, username: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.username == username).cloned())
    }
}
