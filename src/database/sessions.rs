// ABOUTME: Workout session database operations
// ABOUTME: Handles session persistence and per-user, per-week lookups

use super::Database;
use crate::errors::AppError;
use crate::models::{WorkoutSession, WorkoutType};
use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::Row;
use std::str::FromStr;
use uuid::Uuid;

impl Database {
    /// Create the workout sessions table
    ///
    /// # Errors
    ///
    /// Returns an error if table or index creation fails
    pub(super) async fn migrate_sessions(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS workout_sessions (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                workout_type TEXT NOT NULL,
                date DATETIME NOT NULL,
                duration_minutes INTEGER NOT NULL CHECK (duration_minutes > 0),
                program_id TEXT REFERENCES programs(id),
                notes TEXT,
                created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_sessions_user_date ON workout_sessions(user_id, date)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Insert a new workout session
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails
    pub async fn create_session(&self, session: &WorkoutSession) -> Result<Uuid> {
        sqlx::query(
            r"
            INSERT INTO workout_sessions (
                id, user_id, workout_type, date, duration_minutes,
                program_id, notes, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ",
        )
        .bind(session.id.to_string())
        .bind(session.user_id.to_string())
        .bind(session.workout_type.as_str())
        .bind(session.date)
        .bind(session.duration_minutes)
        .bind(session.program_id.map(|id| id.to_string()))
        .bind(&session.notes)
        .bind(session.created_at)
        .bind(session.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(session.id)
    }

    /// Get a session by ID
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_session(&self, session_id: Uuid) -> Result<Option<WorkoutSession>> {
        let row = sqlx::query(
            r"
            SELECT id, user_id, workout_type, date, duration_minutes,
                   program_id, notes, created_at, updated_at
            FROM workout_sessions WHERE id = $1
            ",
        )
        .bind(session_id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(Self::row_to_session).transpose()
    }

    /// Get a session by ID, failing with a typed not-found error otherwise
    ///
    /// # Errors
    ///
    /// Returns a not-found error when no session exists with the given ID
    pub async fn get_session_required(&self, session_id: Uuid) -> Result<WorkoutSession> {
        self.get_session(session_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Workout session {session_id}")).into())
    }

    /// All sessions for a user, oldest first
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn sessions_for_user(&self, user_id: Uuid) -> Result<Vec<WorkoutSession>> {
        let rows = sqlx::query(
            r"
            SELECT id, user_id, workout_type, date, duration_minutes,
                   program_id, notes, created_at, updated_at
            FROM workout_sessions
            WHERE user_id = $1
            ORDER BY date ASC
            ",
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::row_to_session).collect()
    }

    /// Sessions for a user inside `[start, end_exclusive)`, oldest first
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn sessions_for_user_in_range(
        &self,
        user_id: Uuid,
        start: DateTime<Utc>,
        end_exclusive: DateTime<Utc>,
    ) -> Result<Vec<WorkoutSession>> {
        let rows = sqlx::query(
            r"
            SELECT id, user_id, workout_type, date, duration_minutes,
                   program_id, notes, created_at, updated_at
            FROM workout_sessions
            WHERE user_id = $1 AND date >= $2 AND date < $3
            ORDER BY date ASC
            ",
        )
        .bind(user_id.to_string())
        .bind(start)
        .bind(end_exclusive)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::row_to_session).collect()
    }

    /// Number of sessions for a user inside `[start, end_exclusive)`
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn count_sessions_for_user_in_range(
        &self,
        user_id: Uuid,
        start: DateTime<Utc>,
        end_exclusive: DateTime<Utc>,
    ) -> Result<i64> {
        let count = sqlx::query_scalar(
            r"
            SELECT COUNT(*) FROM workout_sessions
            WHERE user_id = $1 AND date >= $2 AND date < $3
            ",
        )
        .bind(user_id.to_string())
        .bind(start)
        .bind(end_exclusive)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// Persist the mutable fields of a session
    ///
    /// # Errors
    ///
    /// Returns an error if the session does not exist or the update fails
    pub async fn update_session(&self, session: &WorkoutSession) -> Result<()> {
        let result = sqlx::query(
            r"
            UPDATE workout_sessions SET
                workout_type = $2,
                date = $3,
                duration_minutes = $4,
                program_id = $5,
                notes = $6,
                updated_at = $7
            WHERE id = $1
            ",
        )
        .bind(session.id.to_string())
        .bind(session.workout_type.as_str())
        .bind(session.date)
        .bind(session.duration_minutes)
        .bind(session.program_id.map(|id| id.to_string()))
        .bind(&session.notes)
        .bind(session.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Workout session {}", session.id)).into());
        }

        Ok(())
    }

    /// Delete a session by ID
    ///
    /// # Errors
    ///
    /// Returns an error if the session does not exist or the delete fails
    pub async fn delete_session(&self, session_id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM workout_sessions WHERE id = $1")
            .bind(session_id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Workout session {session_id}")).into());
        }

        Ok(())
    }

    /// Convert a database row to a WorkoutSession struct
    fn row_to_session(row: &sqlx::sqlite::SqliteRow) -> Result<WorkoutSession> {
        let id: String = row.get("id");
        let user_id: String = row.get("user_id");
        let workout_type: String = row.get("workout_type");
        let program_id: Option<String> = row.get("program_id");

        Ok(WorkoutSession {
            id: Uuid::parse_str(&id)?,
            user_id: Uuid::parse_str(&user_id)?,
            workout_type: WorkoutType::from_str(&workout_type)?,
            date: row.get("date"),
            duration_minutes: row.get("duration_minutes"),
            program_id: program_id.as_deref().map(Uuid::parse_str).transpose()?,
            notes: row.get("notes"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }
}
