// ABOUTME: Integration tests for the storage layer
// ABOUTME: Covers round trips, week-range boundaries, uniqueness constraints, and file persistence
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Motiv Fitness

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use chrono::Duration;
use motiv_engine::database::Database;
use motiv_engine::models::{Program, ProgramExercise, User, WorkoutSession, WorkoutType};
use motiv_engine::week::TrainingWeek;
use uuid::Uuid;

use common::{create_test_database, create_test_user, morning_of, test_monday};

#[tokio::test]
async fn test_session_round_trip() {
    let db = create_test_database().await.unwrap();
    let user = create_test_user(&db).await.unwrap();

    let session = WorkoutSession::new(
        user.id,
        WorkoutType::Swimming,
        morning_of(test_monday()),
        45,
        None,
        Some("Open water".into()),
    );
    db.create_session(&session).await.unwrap();

    let stored = db.get_session(session.id).await.unwrap().unwrap();
    assert_eq!(stored.workout_type, WorkoutType::Swimming);
    assert_eq!(stored.duration_minutes, 45);
    assert_eq!(stored.notes.as_deref(), Some("Open water"));
    assert_eq!(stored.date, session.date);

    db.delete_session(session.id).await.unwrap();
    assert!(db.get_session(session.id).await.unwrap().is_none());

    // Deleting again surfaces the typed not-found error
    let error = db.delete_session(session.id).await.unwrap_err();
    let app_error = motiv_engine::errors::AppError::from(error);
    assert_eq!(app_error.code, motiv_engine::errors::ErrorCode::ResourceNotFound);
}

#[tokio::test]
async fn test_week_range_includes_monday_morning_and_sunday_night() {
    let db = create_test_database().await.unwrap();
    let user = create_test_user(&db).await.unwrap();
    let week = TrainingWeek::containing(test_monday());

    let monday_midnight = test_monday().and_hms_opt(0, 0, 0).unwrap().and_utc();
    let sunday_last_second = (test_monday() + Duration::days(6))
        .and_hms_opt(23, 59, 59)
        .unwrap()
        .and_utc();
    let next_monday_midnight = (test_monday() + Duration::days(7))
        .and_hms_opt(0, 0, 0)
        .unwrap()
        .and_utc();

    for date in [monday_midnight, sunday_last_second, next_monday_midnight] {
        let session = WorkoutSession::new(user.id, WorkoutType::Running, date, 60, None, None);
        db.create_session(&session).await.unwrap();
    }

    let (start, end_exclusive) = week.range_utc();
    let in_week = db
        .sessions_for_user_in_range(user.id, start, end_exclusive)
        .await
        .unwrap();
    assert_eq!(in_week.len(), 2, "Monday 00:00 and Sunday 23:59:59 are in, next Monday is out");

    let count = db
        .count_sessions_for_user_in_range(user.id, start, end_exclusive)
        .await
        .unwrap();
    assert_eq!(count, 2);
}

#[tokio::test]
async fn test_program_exercises_survive_the_json_column() {
    let db = create_test_database().await.unwrap();
    let user = create_test_user(&db).await.unwrap();

    let program = Program::new(
        user.id,
        "Strength block",
        WorkoutType::Gym,
        Some("Winter base".into()),
        vec![
            ProgramExercise {
                name: "Deadlift".into(),
                sets: 5,
                reps: 3,
                weight_kg: Some(120.0),
                duration_minutes: None,
                notes: Some("Belt on last set".into()),
            },
            ProgramExercise {
                name: "Plank".into(),
                sets: 3,
                reps: 1,
                weight_kg: None,
                duration_minutes: Some(2),
                notes: None,
            },
        ],
    );
    db.create_program(&program).await.unwrap();

    let stored = db.get_program(program.id).await.unwrap().unwrap();
    assert_eq!(stored.exercises, program.exercises);
    assert_eq!(stored.description.as_deref(), Some("Winter base"));

    assert!(db.program_exists(program.id).await.unwrap());
    assert!(!db.program_exists(Uuid::new_v4()).await.unwrap());
}

#[tokio::test]
async fn test_user_email_stays_unique() {
    let db = create_test_database().await.unwrap();
    create_test_user(&db).await.unwrap();

    let duplicate = User::new("Impostor", "test@example.com");
    assert!(db.create_user(&duplicate).await.is_err());
}

#[tokio::test]
async fn test_user_reward_pair_stays_unique() {
    let db = create_test_database().await.unwrap();
    let user = create_test_user(&db).await.unwrap();
    let reward = common::create_test_reward(&db, 1, motiv_engine::models::RewardTier::Tier1)
        .await
        .unwrap();

    let first = motiv_engine::models::UserReward::new(user.id, reward.id);
    db.create_user_reward(&first).await.unwrap();

    let second = motiv_engine::models::UserReward::new(user.id, reward.id);
    assert!(db.create_user_reward(&second).await.is_err());
}

#[tokio::test]
async fn test_state_survives_reopening_a_file_database() {
    common::init_test_logging();
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("motiv-test.db");
    let database_url = format!("sqlite:{}", db_path.display());

    let user = {
        let db = Database::new(&database_url).await.unwrap();
        let user = User::new("Persistent Athlete", "keep@example.com");
        db.create_user(&user).await.unwrap();
        db.pool().close().await;
        user
    };

    let reopened = Database::new(&database_url).await.unwrap();
    let stored = reopened.get_user_required(user.id).await.unwrap();
    assert_eq!(stored.email, "keep@example.com");
    assert_eq!(stored.points, 0);
}
