// ABOUTME: Weekly point award ledger database operations
// ABOUTME: Tracks points already granted per (user, week) and applies award deltas atomically

use super::Database;
use crate::week::TrainingWeek;
use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use uuid::Uuid;

impl Database {
    /// Create the weekly award ledger table
    ///
    /// # Errors
    ///
    /// Returns an error if table creation fails
    pub(super) async fn migrate_ledger(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS weekly_point_awards (
                user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                week_start TEXT NOT NULL,
                points_granted INTEGER NOT NULL DEFAULT 0 CHECK (points_granted >= 0),
                updated_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
                PRIMARY KEY (user_id, week_start)
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Points already granted to a user for the given week (0 when no row
    /// exists yet)
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn weekly_points_granted(&self, user_id: Uuid, week: TrainingWeek) -> Result<i64> {
        let granted: Option<i64> = sqlx::query_scalar(
            r"
            SELECT points_granted FROM weekly_point_awards
            WHERE user_id = $1 AND week_start = $2
            ",
        )
        .bind(user_id.to_string())
        .bind(week.storage_key())
        .fetch_optional(&self.pool)
        .await?;

        Ok(granted.unwrap_or(0))
    }

    /// Apply a weekly award: raise the balance by `delta` and set the
    /// ledger marker to `new_total` in one transaction.
    ///
    /// The marker is a high-water mark; the check-and-set against the
    /// balance update is what makes re-invocation for an unchanged week a
    /// no-op at the service layer.
    ///
    /// # Errors
    ///
    /// Returns an error when the user does not exist or the transaction
    /// fails.
    pub async fn apply_weekly_award(
        &self,
        user_id: Uuid,
        week: TrainingWeek,
        delta: i64,
        new_total: i64,
        awarded_at: DateTime<Utc>,
    ) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let credited = sqlx::query(
            r"
            UPDATE users SET
                points = points + $2,
                updated_at = $3
            WHERE id = $1
            ",
        )
        .bind(user_id.to_string())
        .bind(delta)
        .bind(awarded_at)
        .execute(&mut *tx)
        .await?;

        if credited.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(anyhow!("user {user_id} not found while applying award"));
        }

        sqlx::query(
            r"
            INSERT INTO weekly_point_awards (user_id, week_start, points_granted, updated_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT(user_id, week_start) DO UPDATE SET
                points_granted = $3,
                updated_at = $4
            ",
        )
        .bind(user_id.to_string())
        .bind(week.storage_key())
        .bind(new_total)
        .bind(awarded_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(())
    }
}
