use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::{Goal, GoalDraft, GoalPatch, Task, TaskPatch, User};
use crate::store::{GoalStore, StoreError, UserStore};

const GOAL_COLUMNS: &str = "id, owner, title, color, tasks, created_at, updated_at";

/// Goal adapter over a Postgres table with the task list held in a jsonb
/// column. One goal row is the unit of update atomicity: every task mutation
/// below is a single UPDATE statement, so no observer ever sees a
/// half-applied patch and same-goal writes serialize on the row lock.
pub struct PgGoalStore {
    pool: PgPool,
}

impl PgGoalStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn goal_from_row(row: PgRow) -> Result<Goal, StoreError> {
        let tasks: Json<Vec<Task>> = row.try_get("tasks")?;
        Ok(Goal {
            id: row.try_get("id")?,
            owner: row.try_get("owner")?,
            title: row.try_get("title")?,
            color: row.try_get("color")?,
            tasks: tasks.0,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

#[async_trait]
impl GoalStore for PgGoalStore {
    async fn list(&self, owner: Option<&str>) -> Result<Vec<Goal>, StoreError> {
        let rows = match owner {
            Some(owner) => {
                let sql = format!(
                    "SELECT {} FROM goals WHERE owner = $1 ORDER BY created_at",
                    GOAL_COLUMNS
                );
                sqlx::query(&sql).bind(owner).fetch_all(&self.pool).await?
            }
            None => {
                let sql = format!("SELECT {} FROM goals ORDER BY created_at", GOAL_COLUMNS);
                sqlx::query(&sql).fetch_all(&self.pool).await?
            }
        };

        rows.into_iter().map(Self::goal_from_row).collect()
    }

    async fn create(&self, draft: GoalDraft) -> Result<Goal, StoreError> {
        // Seeded tasks get their ids here; the column default covers the
        // empty case but the seed path must go through the same assignment.
        let tasks: Vec<Task> = draft.tasks.into_iter().map(Task::assign).collect();

        let sql = format!(
            "INSERT INTO goals (owner, title, color, tasks) VALUES ($1, $2, $3, $4) RETURNING {}",
            GOAL_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(&draft.owner)
            .bind(&draft.title)
            .bind(&draft.color)
            .bind(Json(&tasks))
            .fetch_one(&self.pool)
            .await?;

        Self::goal_from_row(row)
    }

    async fn get(&self, goal_id: Uuid) -> Result<Goal, StoreError> {
        let sql = format!("SELECT {} FROM goals WHERE id = $1", GOAL_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(goal_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("goal {} not found", goal_id)))?;

        Self::goal_from_row(row)
    }

    async fn update(&self, goal_id: Uuid, patch: GoalPatch) -> Result<Goal, StoreError> {
        let sql = format!(
            "UPDATE goals \
             SET title = COALESCE($2, title), color = COALESCE($3, color), updated_at = now() \
             WHERE id = $1 RETURNING {}",
            GOAL_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(goal_id)
            .bind(&patch.title)
            .bind(&patch.color)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("goal {} not found", goal_id)))?;

        Self::goal_from_row(row)
    }

    async fn delete(&self, goal_id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM goals WHERE id = $1")
            .bind(goal_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn add_task(&self, goal_id: Uuid, task: Task) -> Result<Goal, StoreError> {
        // jsonb array || object appends the object as one element.
        let sql = format!(
            "UPDATE goals SET tasks = tasks || $2, updated_at = now() \
             WHERE id = $1 RETURNING {}",
            GOAL_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(goal_id)
            .bind(Json(&task))
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("goal {} not found", goal_id)))?;

        Self::goal_from_row(row)
    }

    async fn update_task(
        &self,
        goal_id: Uuid,
        task_id: Uuid,
        patch: TaskPatch,
    ) -> Result<Goal, StoreError> {
        // Rebuild the array in element order, object-merging the patch into
        // exactly the matching element. The EXISTS guard keeps "task absent"
        // out of the update so it can be reported as NotFound.
        let sql = format!(
            "UPDATE goals SET tasks = ( \
                 SELECT jsonb_agg(CASE WHEN elem->>'id' = $2 THEN elem || $3 ELSE elem END ORDER BY ord) \
                 FROM jsonb_array_elements(tasks) WITH ORDINALITY AS t(elem, ord) \
             ), updated_at = now() \
             WHERE id = $1 \
               AND EXISTS ( \
                 SELECT 1 FROM jsonb_array_elements(tasks) AS e(elem) WHERE e.elem->>'id' = $2 \
               ) \
             RETURNING {}",
            GOAL_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(goal_id)
            .bind(task_id.to_string())
            .bind(Json(&patch))
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Self::goal_from_row(row),
            // Distinguish which half of the address failed.
            None => {
                self.get(goal_id).await?;
                Err(StoreError::NotFound(format!(
                    "task {} not found under goal {}",
                    task_id, goal_id
                )))
            }
        }
    }

    async fn remove_task(&self, goal_id: Uuid, task_id: Uuid) -> Result<Goal, StoreError> {
        // Removing an absent task is a no-op by contract, so the only match
        // condition is the goal id. COALESCE restores '[]' when the last
        // task goes away (jsonb_agg over zero rows is NULL).
        let sql = format!(
            "UPDATE goals SET tasks = ( \
                 SELECT COALESCE(jsonb_agg(elem ORDER BY ord), '[]'::jsonb) \
                 FROM jsonb_array_elements(tasks) WITH ORDINALITY AS t(elem, ord) \
                 WHERE elem->>'id' <> $2 \
             ), updated_at = now() \
             WHERE id = $1 RETURNING {}",
            GOAL_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(goal_id)
            .bind(task_id.to_string())
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("goal {} not found", goal_id)))?;

        Self::goal_from_row(row)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// User adapter over the users table.
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn user_from_row(row: PgRow) -> Result<User, StoreError> {
        Ok(User {
            id: row.try_get("id")?,
            username: row.try_get("username")?,
            password_hash: row.try_get("password_hash")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn create(&self, username: &str, password_hash: &str) -> Result<User, StoreError> {
        let row = sqlx::query(
            "INSERT INTO users (username, password_hash) VALUES ($1, $2) \
             RETURNING id, username, password_hash, created_at",
        )
        .bind(username)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await;

        match row {
            Ok(row) => Self::user_from_row(row),
            // 23505 = unique_violation on users.username
            Err(sqlx::Error::Database(db)) if db.code().as_deref() == Some("23505") => {
                Err(StoreError::Duplicate(format!("username '{}' is taken", username)))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn find(&self, username: &str) -> Result<Option<User>, StoreError> {
        let row = sqlx::query(
            "SELECT id, username, password_hash, created_at FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::user_from_row).transpose()
    }
}
