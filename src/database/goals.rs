// ABOUTME: Goal database operations
// ABOUTME: Persists user goals and supports completion-state filtered lookups

use super::Database;
use crate::errors::AppError;
use crate::models::Goal;
use anyhow::Result;
use sqlx::Row;
use uuid::Uuid;

impl Database {
    /// Create the goals table
    ///
    /// # Errors
    ///
    /// Returns an error if table or index creation fails
    pub(super) async fn migrate_goals(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS goals (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                name TEXT NOT NULL,
                description TEXT,
                points_required INTEGER NOT NULL CHECK (points_required > 0),
                points_accumulated INTEGER NOT NULL DEFAULT 0 CHECK (points_accumulated >= 0),
                completed BOOLEAN NOT NULL DEFAULT 0,
                reward_id TEXT REFERENCES rewards(id),
                created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_goals_user ON goals(user_id)")
            .execute(&self.pool)
            .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_goals_user_completed ON goals(user_id, completed)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Insert a new goal
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails
    pub async fn create_goal(&self, goal: &Goal) -> Result<Uuid> {
        sqlx::query(
            r"
            INSERT INTO goals (
                id, user_id, name, description, points_required,
                points_accumulated, completed, reward_id, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ",
        )
        .bind(goal.id.to_string())
        .bind(goal.user_id.to_string())
        .bind(&goal.name)
        .bind(&goal.description)
        .bind(goal.points_required)
        .bind(goal.points_accumulated)
        .bind(goal.completed)
        .bind(goal.reward_id.map(|id| id.to_string()))
        .bind(goal.created_at)
        .bind(goal.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(goal.id)
    }

    /// Get a goal by ID
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_goal(&self, goal_id: Uuid) -> Result<Option<Goal>> {
        let row = sqlx::query(
            r"
            SELECT id, user_id, name, description, points_required,
                   points_accumulated, completed, reward_id, created_at, updated_at
            FROM goals WHERE id = $1
            ",
        )
        .bind(goal_id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(Self::row_to_goal).transpose()
    }

    /// Get a goal by ID, failing with a typed not-found error otherwise
    ///
    /// # Errors
    ///
    /// Returns a not-found error when no goal exists with the given ID
    pub async fn get_goal_required(&self, goal_id: Uuid) -> Result<Goal> {
        self.get_goal(goal_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Goal {goal_id}")).into())
    }

    /// All goals for a user, oldest first
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn goals_for_user(&self, user_id: Uuid) -> Result<Vec<Goal>> {
        let rows = sqlx::query(
            r"
            SELECT id, user_id, name, description, points_required,
                   points_accumulated, completed, reward_id, created_at, updated_at
            FROM goals
            WHERE user_id = $1
            ORDER BY created_at ASC
            ",
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::row_to_goal).collect()
    }

    /// Goals for a user filtered by completion state, oldest first
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn goals_for_user_by_completion(
        &self,
        user_id: Uuid,
        completed: bool,
    ) -> Result<Vec<Goal>> {
        let rows = sqlx::query(
            r"
            SELECT id, user_id, name, description, points_required,
                   points_accumulated, completed, reward_id, created_at, updated_at
            FROM goals
            WHERE user_id = $1 AND completed = $2
            ORDER BY created_at ASC
            ",
        )
        .bind(user_id.to_string())
        .bind(completed)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::row_to_goal).collect()
    }

    /// Persist the mutable fields of a goal
    ///
    /// # Errors
    ///
    /// Returns an error if the goal does not exist or the update fails
    pub async fn update_goal(&self, goal: &Goal) -> Result<()> {
        let result = sqlx::query(
            r"
            UPDATE goals SET
                name = $2,
                description = $3,
                points_required = $4,
                points_accumulated = $5,
                completed = $6,
                reward_id = $7,
                updated_at = $8
            WHERE id = $1
            ",
        )
        .bind(goal.id.to_string())
        .bind(&goal.name)
        .bind(&goal.description)
        .bind(goal.points_required)
        .bind(goal.points_accumulated)
        .bind(goal.completed)
        .bind(goal.reward_id.map(|id| id.to_string()))
        .bind(goal.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Goal {}", goal.id)).into());
        }

        Ok(())
    }

    /// Convert a database row to a Goal struct
    fn row_to_goal(row: &sqlx::sqlite::SqliteRow) -> Result<Goal> {
        let id: String = row.get("id");
        let user_id: String = row.get("user_id");
        let reward_id: Option<String> = row.get("reward_id");

        Ok(Goal {
            id: Uuid::parse_str(&id)?,
            user_id: Uuid::parse_str(&user_id)?,
            name: row.get("name"),
            description: row.get("description"),
            points_required: row.get("points_required"),
            points_accumulated: row.get("points_accumulated"),
            completed: row.get("completed"),
            reward_id: reward_id.as_deref().map(Uuid::parse_str).transpose()?,
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }
}
