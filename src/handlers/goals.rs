use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::{ApiResponse, AuthUser};
use crate::models::{Goal, GoalDraft, GoalPatch};
use crate::AppState;

use super::tasks::TaskPayload;

#[derive(Debug, Deserialize)]
pub struct CreateGoalRequest {
    pub title: Option<String>,
    pub color: Option<String>,
    /// Optional seed tasks; they get store-assigned ids like any other task.
    #[serde(default)]
    pub tasks: Vec<TaskPayload>,
}

impl CreateGoalRequest {
    /// Validate required fields before any store call. The owner always comes
    /// from the verified caller identity, never from the body.
    fn into_draft(self, owner: &str) -> Result<GoalDraft, ApiError> {
        let mut missing = Vec::new();
        if self.title.is_none() {
            missing.push("title".to_string());
        }
        if self.color.is_none() {
            missing.push("color".to_string());
        }

        let mut tasks = Vec::with_capacity(self.tasks.len());
        for (index, payload) in self.tasks.into_iter().enumerate() {
            match payload.into_draft() {
                Ok(draft) => tasks.push(draft),
                Err(fields) => {
                    missing.extend(fields.into_iter().map(|f| format!("tasks[{}].{}", index, f)))
                }
            }
        }

        match (self.title, self.color) {
            (Some(title), Some(color)) if missing.is_empty() => Ok(GoalDraft {
                owner: owner.to_string(),
                title,
                color,
                tasks,
            }),
            _ => Err(ApiError::missing_fields(missing)),
        }
    }
}

/// GET /goals - all goals owned by the authenticated user
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<ApiResponse<Vec<Goal>>, ApiError> {
    let goals = state.goals.list(Some(&user.username)).await?;
    Ok(ApiResponse::success(goals))
}

/// POST /goals - create a goal for the authenticated user
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreateGoalRequest>,
) -> Result<ApiResponse<Goal>, ApiError> {
    let draft = payload.into_draft(&user.username)?;
    let goal = state.goals.create(draft).await?;
    Ok(ApiResponse::created(goal))
}

/// PUT|PATCH /goals/:goal_id - merge-patch title/color
pub async fn update(
    State(state): State<AppState>,
    Path(goal_id): Path<Uuid>,
    Json(patch): Json<GoalPatch>,
) -> Result<ApiResponse<Goal>, ApiError> {
    let goal = state.goals.update(goal_id, patch).await?;
    Ok(ApiResponse::success(goal))
}

/// DELETE /goals/:goal_id - remove the goal and its embedded tasks
///
/// Idempotent from the caller's perspective: a second delete of the same id
/// still answers 204.
pub async fn remove(
    State(state): State<AppState>,
    Path(goal_id): Path<Uuid>,
) -> Result<ApiResponse<()>, ApiError> {
    let removed = state.goals.delete(goal_id).await?;
    if !removed {
        tracing::debug!(%goal_id, "delete matched no goal");
    }
    Ok(ApiResponse::<()>::no_content())
}
