use axum::{
    extract::{Path, State},
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::ApiResponse;
use crate::models::{Goal, Task, TaskDraft, TaskPatch};
use crate::AppState;

/// Task creation payload. Fields arrive optional so absence is reported as a
/// validation error rather than a deserialization failure.
#[derive(Debug, Deserialize)]
pub struct TaskPayload {
    pub name: Option<String>,
    pub date: Option<NaiveDate>,
}

impl TaskPayload {
    /// Validate into a draft, or report which required fields are missing.
    pub fn into_draft(self) -> Result<TaskDraft, Vec<&'static str>> {
        let mut missing = Vec::new();
        if self.name.is_none() {
            missing.push("name");
        }
        if self.date.is_none() {
            missing.push("date");
        }

        match (self.name, self.date) {
            (Some(name), Some(date)) => Ok(TaskDraft { name, date }),
            _ => Err(missing),
        }
    }
}

/// GET /goals/:goal_id/tasks - the goal's task list in stored order
pub async fn list(
    State(state): State<AppState>,
    Path(goal_id): Path<Uuid>,
) -> Result<ApiResponse<Vec<Task>>, ApiError> {
    let goal = state.goals.get(goal_id).await?;
    Ok(ApiResponse::success(goal.tasks))
}

/// POST /goals/:goal_id/tasks - append a task
///
/// Returns the full updated goal so the caller can observe the assigned task
/// id and position; a task has no addressability outside its parent.
pub async fn create(
    State(state): State<AppState>,
    Path(goal_id): Path<Uuid>,
    Json(payload): Json<TaskPayload>,
) -> Result<ApiResponse<Goal>, ApiError> {
    let draft = payload
        .into_draft()
        .map_err(|fields| ApiError::missing_fields(fields.into_iter().map(String::from).collect()))?;

    let goal = state.goals.add_task(goal_id, Task::assign(draft)).await?;
    Ok(ApiResponse::created(goal))
}

/// PUT|PATCH /goals/:goal_id/tasks/:task_id - merge-patch one task
pub async fn update(
    State(state): State<AppState>,
    Path((goal_id, task_id)): Path<(Uuid, Uuid)>,
    Json(patch): Json<TaskPatch>,
) -> Result<ApiResponse<Goal>, ApiError> {
    let goal = state.goals.update_task(goal_id, task_id, patch).await?;
    Ok(ApiResponse::success(goal))
}

/// DELETE /goals/:goal_id/tasks/:task_id - strip one task
///
/// Removing a task that is already gone succeeds: the postcondition holds.
pub async fn remove(
    State(state): State<AppState>,
    Path((goal_id, task_id)): Path<(Uuid, Uuid)>,
) -> Result<ApiResponse<Goal>, ApiError> {
    let goal = state.goals.remove_task(goal_id, task_id).await?;
    Ok(ApiResponse::success(goal))
}
