// ABOUTME: Database management for the Motiv points and rewards engine
// ABOUTME: Owns the SQLite pool, schema migrations, and per-entity operations
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Motiv Fitness

//! # Database Management
//!
//! Storage layer for the engine. One [`Database`] value wraps an SQLite pool
//! and exposes typed operations per entity family; the services layer never
//! touches SQL directly. The engine addresses only this API, so the store
//! behind it stays swappable.

mod goals;
mod ledger;
mod programs;
mod rewards;
mod sessions;
mod users;

/// Test utilities for creating isolated database instances
pub mod test_utils;

use anyhow::Result;
use sqlx::{Pool, Sqlite, SqlitePool};

/// Database manager for engine state
#[derive(Clone)]
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    /// Create a new database connection and run migrations
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established or a
    /// migration fails.
    pub async fn new(database_url: &str) -> Result<Self> {
        // Ensure SQLite creates the database file if it doesn't exist
        let connection_options = if database_url.starts_with("sqlite:") {
            format!("{database_url}?mode=rwc")
        } else {
            database_url.to_string()
        };

        let pool = SqlitePool::connect(&connection_options).await?;

        let db = Self { pool };
        db.migrate().await?;

        Ok(db)
    }

    /// Get a reference to the database pool for advanced operations
    #[must_use]
    pub const fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    /// Run database migrations
    ///
    /// # Errors
    ///
    /// Returns an error if table or index creation fails.
    pub async fn migrate(&self) -> Result<()> {
        self.migrate_users().await?;
        self.migrate_programs().await?;
        self.migrate_sessions().await?;
        self.migrate_rewards().await?;
        self.migrate_goals().await?;
        self.migrate_ledger().await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppResult;

    #[tokio::test]
    async fn test_migrations_are_idempotent() -> AppResult<()> {
        let db = test_utils::create_test_db().await?;
        // Running the full migration set again must be a no-op
        db.migrate().await?;
        Ok(())
    }
}
