use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A task embedded in exactly one goal. Tasks have no identity outside the
/// (goal_id, task_id) pair; the id is assigned by the store adapter on append
/// and never reused after removal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub name: String,
    pub completed: bool,
    pub date: NaiveDate,
}

impl Task {
    /// Materialize a validated draft into a stored task. New tasks always
    /// start with `completed = false`.
    pub fn assign(draft: TaskDraft) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: draft.name,
            completed: false,
            date: draft.date,
        }
    }
}

/// Validated input for appending a task: both fields required.
#[derive(Debug, Clone)]
pub struct TaskDraft {
    pub name: String,
    pub date: NaiveDate,
}

/// Partial update for a task. A `None` field is left untouched; `None` fields
/// are also skipped during serialization, so the same struct drives both the
/// in-memory merge below and the jsonb object-merge in the Postgres adapter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.completed.is_none() && self.date.is_none()
    }

    /// Apply only the present fields to `task`.
    pub fn apply(&self, task: &mut Task) {
        if let Some(name) = &self.name {
            task.name = name.clone();
        }
        if let Some(completed) = self.completed {
            task.completed = completed;
        }
        if let Some(date) = self.date {
            task.date = date;
        }
    }
}
