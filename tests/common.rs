// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides common database, user, and fixture creation helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Motiv Fitness

#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate
)]

//! Shared test utilities for `motiv_engine`
//!
//! Common setup functions to reduce duplication across integration tests.

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use std::sync::{Arc, Once};
use uuid::Uuid;

use motiv_engine::database::Database;
use motiv_engine::models::{Reward, RewardTier, User, WorkoutSession, WorkoutType};
use motiv_engine::services::CreateWorkoutSessionDto;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN, // Default to WARN for quiet tests
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Standard test database setup
pub async fn create_test_database() -> Result<Arc<Database>> {
    init_test_logging();
    let database = Arc::new(Database::new("sqlite::memory:").await?);
    Ok(database)
}

/// Create a standard test user
pub async fn create_test_user(database: &Database) -> Result<User> {
    create_test_user_with_email(database, "test@example.com").await
}

/// Create a test user with a custom email
pub async fn create_test_user_with_email(database: &Database, email: &str) -> Result<User> {
    let user = User::new("Test Athlete", email);
    database.create_user(&user).await?;
    Ok(user)
}

/// Create a reward with the given cost
pub async fn create_test_reward(database: &Database, cost: i64, tier: RewardTier) -> Result<Reward> {
    let reward = Reward::new(
        format!("Reward costing {cost}"),
        "Test reward",
        tier,
        cost,
        None,
    );
    database.create_reward(&reward).await?;
    Ok(reward)
}

/// A Monday that anchors most week-based fixtures (2025-06-02)
pub fn test_monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()
}

/// A UTC instant on the given date at 07:30
pub fn morning_of(date: NaiveDate) -> DateTime<Utc> {
    date.and_hms_opt(7, 30, 0).unwrap().and_utc()
}

/// DTO for a one-hour running session on the given date
pub fn running_session_dto(user_id: Uuid, date: DateTime<Utc>) -> CreateWorkoutSessionDto {
    CreateWorkoutSessionDto {
        user_id,
        workout_type: WorkoutType::Running,
        date,
        duration_minutes: 60,
        program_id: None,
        notes: None,
    }
}

/// Insert `count` one-hour sessions directly into storage, spread across the
/// week starting at `week_start`
pub async fn insert_sessions_in_week(
    database: &Database,
    user_id: Uuid,
    week_start: NaiveDate,
    count: usize,
) -> Result<Vec<WorkoutSession>> {
    let mut sessions = Vec::with_capacity(count);
    for i in 0..count {
        let day = week_start + chrono::Duration::days((i % 7) as i64);
        let session = WorkoutSession::new(
            user_id,
            WorkoutType::Running,
            morning_of(day),
            60,
            None,
            None,
        );
        database.create_session(&session).await?;
        sessions.push(session);
    }
    Ok(sessions)
}
