// ABOUTME: User account database operations
// ABOUTME: Handles user creation, retrieval, and profile updates

use super::Database;
use crate::errors::AppError;
use crate::models::User;
use anyhow::{anyhow, Result};
use sqlx::Row;
use uuid::Uuid;

impl Database {
    /// Create the users table
    ///
    /// # Errors
    ///
    /// Returns an error if table or index creation fails
    pub(super) async fn migrate_users(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                display_name TEXT NOT NULL,
                email TEXT UNIQUE NOT NULL,
                points INTEGER NOT NULL DEFAULT 0 CHECK (points >= 0),
                created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_users_email ON users(email)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Insert a new user
    ///
    /// # Errors
    ///
    /// Returns an error if the email is already in use or the insert fails
    pub async fn create_user(&self, user: &User) -> Result<Uuid> {
        if let Some(existing) = self.get_user_by_email(&user.email).await? {
            if existing.id != user.id {
                return Err(anyhow!("Email already in use by another user"));
            }
        }

        sqlx::query(
            r"
            INSERT INTO users (id, display_name, email, points, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT(id) DO UPDATE SET
                display_name = $2,
                email = $3,
                points = $4,
                updated_at = $6
            ",
        )
        .bind(user.id.to_string())
        .bind(&user.display_name)
        .bind(&user.email)
        .bind(user.points)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(user.id)
    }

    /// Get a user by ID
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_user(&self, user_id: Uuid) -> Result<Option<User>> {
        let row = sqlx::query(
            r"
            SELECT id, display_name, email, points, created_at, updated_at
            FROM users WHERE id = $1
            ",
        )
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(Self::row_to_user).transpose()
    }

    /// Get a user by ID, failing with a typed not-found error otherwise
    ///
    /// # Errors
    ///
    /// Returns a not-found error when no user exists with the given ID
    pub async fn get_user_required(&self, user_id: Uuid) -> Result<User> {
        self.get_user(user_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User {user_id}")).into())
    }

    /// Get a user by email
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query(
            r"
            SELECT id, display_name, email, points, created_at, updated_at
            FROM users WHERE email = $1
            ",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(Self::row_to_user).transpose()
    }

    /// Persist the mutable fields of a user
    ///
    /// # Errors
    ///
    /// Returns an error if the user does not exist or the update fails
    pub async fn update_user(&self, user: &User) -> Result<()> {
        let result = sqlx::query(
            r"
            UPDATE users SET
                display_name = $2,
                email = $3,
                points = $4,
                updated_at = $5
            WHERE id = $1
            ",
        )
        .bind(user.id.to_string())
        .bind(&user.display_name)
        .bind(&user.email)
        .bind(user.points)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("User {}", user.id)).into());
        }

        Ok(())
    }

    /// Convert a database row to a User struct
    pub(super) fn row_to_user(row: &sqlx::sqlite::SqliteRow) -> Result<User> {
        let id: String = row.get("id");
        Ok(User {
            id: Uuid::parse_str(&id)?,
            display_name: row.get("display_name"),
            email: row.get("email"),
            points: row.get("points"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }
}
