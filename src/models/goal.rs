use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::task::{Task, TaskDraft};

/// A user-owned goal with its embedded, insertion-ordered task list. The goal
/// row is the unit of update atomicity: every task mutation is expressed as a
/// single update against one goal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    pub id: Uuid,
    /// Owner username. Serialized as `user` to match the public payload shape.
    #[serde(rename = "user")]
    pub owner: String,
    pub title: String,
    pub color: String,
    pub tasks: Vec<Task>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Goal {
    pub fn task(&self, task_id: Uuid) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == task_id)
    }
}

/// Validated input for goal creation. The owner comes from the verified caller
/// identity, never from the request body or a module-level default.
#[derive(Debug, Clone)]
pub struct GoalDraft {
    pub owner: String,
    pub title: String,
    pub color: String,
    pub tasks: Vec<TaskDraft>,
}

/// Partial update for a goal's own fields. `None` means leave untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GoalPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl GoalPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.color.is_none()
    }

    pub fn apply(&self, goal: &mut Goal) {
        if let Some(title) = &self.title {
            goal.title = title.clone();
        }
        if let Some(color) = &self.color {
            goal.color = color.clone();
        }
    }
}
