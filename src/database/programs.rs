// ABOUTME: Program template database operations
// ABOUTME: Persists programs with their exercise lists stored as a JSON column

use super::Database;
use crate::errors::AppError;
use crate::models::{Program, ProgramExercise, WorkoutType};
use anyhow::Result;
use sqlx::Row;
use std::str::FromStr;
use uuid::Uuid;

impl Database {
    /// Create the programs table
    ///
    /// # Errors
    ///
    /// Returns an error if table or index creation fails
    pub(super) async fn migrate_programs(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS programs (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                name TEXT NOT NULL,
                workout_type TEXT NOT NULL,
                description TEXT,
                exercises TEXT NOT NULL DEFAULT '[]',
                created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_programs_user ON programs(user_id)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Insert a new program
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the insert fails
    pub async fn create_program(&self, program: &Program) -> Result<Uuid> {
        let exercises_json = serde_json::to_string(&program.exercises)?;

        sqlx::query(
            r"
            INSERT INTO programs (
                id, user_id, name, workout_type, description,
                exercises, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ",
        )
        .bind(program.id.to_string())
        .bind(program.user_id.to_string())
        .bind(&program.name)
        .bind(program.workout_type.as_str())
        .bind(&program.description)
        .bind(exercises_json)
        .bind(program.created_at)
        .bind(program.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(program.id)
    }

    /// Get a program by ID
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_program(&self, program_id: Uuid) -> Result<Option<Program>> {
        let row = sqlx::query(
            r"
            SELECT id, user_id, name, workout_type, description,
                   exercises, created_at, updated_at
            FROM programs WHERE id = $1
            ",
        )
        .bind(program_id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(Self::row_to_program).transpose()
    }

    /// Get a program by ID, failing with a typed not-found error otherwise
    ///
    /// # Errors
    ///
    /// Returns a not-found error when no program exists with the given ID
    pub async fn get_program_required(&self, program_id: Uuid) -> Result<Program> {
        self.get_program(program_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Program {program_id}")).into())
    }

    /// Whether a program with the given ID exists
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn program_exists(&self, program_id: Uuid) -> Result<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM programs WHERE id = $1")
            .bind(program_id.to_string())
            .fetch_one(&self.pool)
            .await?;

        Ok(count > 0)
    }

    /// All programs for a user, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn programs_for_user(&self, user_id: Uuid) -> Result<Vec<Program>> {
        let rows = sqlx::query(
            r"
            SELECT id, user_id, name, workout_type, description,
                   exercises, created_at, updated_at
            FROM programs
            WHERE user_id = $1
            ORDER BY created_at DESC
            ",
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::row_to_program).collect()
    }

    /// Persist the mutable fields of a program, including its exercise list
    ///
    /// # Errors
    ///
    /// Returns an error if the program does not exist or the update fails
    pub async fn update_program(&self, program: &Program) -> Result<()> {
        let exercises_json = serde_json::to_string(&program.exercises)?;

        let result = sqlx::query(
            r"
            UPDATE programs SET
                name = $2,
                workout_type = $3,
                description = $4,
                exercises = $5,
                updated_at = $6
            WHERE id = $1
            ",
        )
        .bind(program.id.to_string())
        .bind(&program.name)
        .bind(program.workout_type.as_str())
        .bind(&program.description)
        .bind(exercises_json)
        .bind(program.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Program {}", program.id)).into());
        }

        Ok(())
    }

    /// Delete a program by ID
    ///
    /// # Errors
    ///
    /// Returns an error if the program does not exist or the delete fails
    pub async fn delete_program(&self, program_id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM programs WHERE id = $1")
            .bind(program_id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Program {program_id}")).into());
        }

        Ok(())
    }

    /// Convert a database row to a Program struct
    fn row_to_program(row: &sqlx::sqlite::SqliteRow) -> Result<Program> {
        let id: String = row.get("id");
        let user_id: String = row.get("user_id");
        let workout_type: String = row.get("workout_type");
        let exercises_json: String = row.get("exercises");
        let exercises: Vec<ProgramExercise> = serde_json::from_str(&exercises_json)?;

        Ok(Program {
            id: Uuid::parse_str(&id)?,
            user_id: Uuid::parse_str(&user_id)?,
            name: row.get("name"),
            workout_type: WorkoutType::from_str(&workout_type)?,
            description: row.get("description"),
            exercises,
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }
}
