// ABOUTME: Integration tests for the tracking orchestrator
// ABOUTME: Covers boundary awards, goal progression, payout, and the automatic unlock sweep
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Motiv Fitness

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::sync::Arc;

use chrono::Duration;
use motiv_engine::errors::ErrorCode;
use motiv_engine::models::{ProgramExercise, RewardTier, WorkoutType};
use motiv_engine::services::{
    CreateGoalDto, CreateProgramDto, CreateWorkoutSessionDto, GoalService, ProgramService,
    RewardService, TrackingService, UpdateWorkoutSessionDto, WorkoutSessionService,
};
use uuid::Uuid;

use common::{
    create_test_database, create_test_reward, create_test_user, morning_of, running_session_dto,
    test_monday,
};

#[tokio::test]
async fn test_three_sessions_in_a_week_award_one_point() {
    let db = create_test_database().await.unwrap();
    let tracker = TrackingService::new(Arc::clone(&db));
    let user = create_test_user(&db).await.unwrap();

    // Three one-hour running sessions in the same Monday-start week
    for day_offset in 0..3 {
        let date = morning_of(test_monday() + Duration::days(day_offset));
        let outcome = tracker
            .record_session(running_session_dto(user.id, date))
            .await
            .unwrap();

        if day_offset < 2 {
            assert_eq!(outcome.points_awarded, 0, "no award before the boundary");
        } else {
            assert_eq!(outcome.points_awarded, 1, "third session crosses the boundary");
        }
    }

    let user = db.get_user_required(user.id).await.unwrap();
    assert_eq!(user.points, 1);
}

#[tokio::test]
async fn test_sixth_session_awards_exactly_one_more_point() {
    let db = create_test_database().await.unwrap();
    let tracker = TrackingService::new(Arc::clone(&db));
    let user = create_test_user(&db).await.unwrap();

    let mut total_awarded = 0;
    for day_offset in 0..6 {
        let date = morning_of(test_monday() + Duration::days(day_offset));
        let outcome = tracker
            .record_session(running_session_dto(user.id, date))
            .await
            .unwrap();
        total_awarded += outcome.points_awarded;
    }

    // Awards at the 3rd and 6th sessions only, one point each
    assert_eq!(total_awarded, 2);
    let user = db.get_user_required(user.id).await.unwrap();
    assert_eq!(user.points, 2);
}

#[tokio::test]
async fn test_sessions_in_different_weeks_do_not_combine() {
    let db = create_test_database().await.unwrap();
    let tracker = TrackingService::new(Arc::clone(&db));
    let user = create_test_user(&db).await.unwrap();

    let dates = [
        morning_of(test_monday()),
        morning_of(test_monday() + Duration::days(1)),
        // Third session lands in the following week
        morning_of(test_monday() + Duration::weeks(1)),
    ];

    for date in dates {
        let outcome = tracker
            .record_session(running_session_dto(user.id, date))
            .await
            .unwrap();
        assert_eq!(outcome.points_awarded, 0);
    }

    let user = db.get_user_required(user.id).await.unwrap();
    assert_eq!(user.points, 0);
}

#[tokio::test]
async fn test_award_advances_goals_and_pays_out_linked_reward() {
    let db = create_test_database().await.unwrap();
    let tracker = TrackingService::new(Arc::clone(&db));
    let goals = GoalService::new(Arc::clone(&db));
    let user = create_test_user(&db).await.unwrap();
    let reward = create_test_reward(&db, 10, RewardTier::Tier4).await.unwrap();

    let goal = goals
        .create_goal(CreateGoalDto {
            user_id: user.id,
            name: "First point".into(),
            points_required: 1,
            description: None,
            reward_id: Some(reward.id),
        })
        .await
        .unwrap();

    let mut last_outcome = None;
    for day_offset in 0..3 {
        let date = morning_of(test_monday() + Duration::days(day_offset));
        last_outcome = Some(
            tracker
                .record_session(running_session_dto(user.id, date))
                .await
                .unwrap(),
        );
    }

    let outcome = last_outcome.unwrap();
    assert_eq!(outcome.points_awarded, 1);
    assert_eq!(outcome.goals_advanced.len(), 1);
    assert!(outcome.goals_advanced[0].completed);

    // The goal payout unlocked the linked reward without spending the point
    let payout = db.get_user_reward(user.id, reward.id).await.unwrap().unwrap();
    assert!(payout.unlocked);
    assert!(outcome
        .rewards_unlocked
        .iter()
        .any(|unlocked| unlocked.reward_id == reward.id));

    let user = db.get_user_required(user.id).await.unwrap();
    assert_eq!(user.points, 1, "payout is a grant, not a purchase");

    let goal = goals.get_goal(goal.id).await.unwrap();
    assert_eq!(goal.points_accumulated, 1);
}

#[tokio::test]
async fn test_award_sweeps_affordable_rewards_automatically() {
    let db = create_test_database().await.unwrap();
    let tracker = TrackingService::new(Arc::clone(&db));
    let rewards = RewardService::new(Arc::clone(&db));
    let user = create_test_user(&db).await.unwrap();
    let cheap = create_test_reward(&db, 1, RewardTier::Tier1).await.unwrap();
    create_test_reward(&db, 5, RewardTier::Tier3).await.unwrap();

    for day_offset in 0..3 {
        let date = morning_of(test_monday() + Duration::days(day_offset));
        tracker
            .record_session(running_session_dto(user.id, date))
            .await
            .unwrap();
    }

    // The single earned point was immediately spent on the cheapest reward
    let unlocked = rewards.get_unlocked_rewards(user.id).await.unwrap();
    assert_eq!(unlocked.len(), 1);
    assert_eq!(unlocked[0].id, cheap.id);

    let user = db.get_user_required(user.id).await.unwrap();
    assert_eq!(user.points, 0);
}

#[tokio::test]
async fn test_track_weekly_points_returns_earned_delta() {
    let db = create_test_database().await.unwrap();
    let tracker = TrackingService::new(Arc::clone(&db));
    let sessions = WorkoutSessionService::new(Arc::clone(&db));
    let user = create_test_user(&db).await.unwrap();

    for day_offset in 0..4 {
        sessions
            .create_session(running_session_dto(
                user.id,
                morning_of(test_monday() + Duration::days(day_offset)),
            ))
            .await
            .unwrap();
    }

    let earned = tracker
        .track_weekly_points(user.id, test_monday())
        .await
        .unwrap();
    assert_eq!(earned, 1);

    // Unchanged week: nothing further to grant
    let repeat = tracker
        .track_weekly_points(user.id, test_monday())
        .await
        .unwrap();
    assert_eq!(repeat, 0);

    let logged = sessions.sessions_for_user(user.id).await.unwrap();
    assert_eq!(logged.len(), 4);

    let week = motiv_engine::week::TrainingWeek::containing(test_monday());
    let (start, end_exclusive) = week.range_utc();
    let in_week = sessions
        .sessions_for_user_in_range(user.id, start, end_exclusive)
        .await
        .unwrap();
    assert_eq!(in_week.len(), 4);

    // Deleting a session leaves the already-granted point untouched
    sessions.delete_session(logged[0].id).await.unwrap();
    let missing = sessions.get_session(logged[0].id).await.unwrap_err();
    assert_eq!(missing.code, ErrorCode::ResourceNotFound);
    assert_eq!(db.get_user_required(user.id).await.unwrap().points, 1);
}

#[tokio::test]
async fn test_update_goals_progress_guards_non_positive_input() {
    let db = create_test_database().await.unwrap();
    let tracker = TrackingService::new(Arc::clone(&db));
    let goals = GoalService::new(Arc::clone(&db));
    let user = create_test_user(&db).await.unwrap();

    goals
        .create_goal(CreateGoalDto {
            user_id: user.id,
            name: "Untouched".into(),
            points_required: 5,
            description: None,
            reward_id: None,
        })
        .await
        .unwrap();

    assert!(tracker.update_goals_progress(user.id, 0).await.unwrap().is_empty());
    assert!(tracker.update_goals_progress(user.id, -3).await.unwrap().is_empty());

    let advanced = tracker.update_goals_progress(user.id, 2).await.unwrap();
    assert_eq!(advanced.len(), 1);
    assert_eq!(advanced[0].points_accumulated, 2);
}

#[tokio::test]
async fn test_session_validation_and_program_references() {
    let db = create_test_database().await.unwrap();
    let tracker = TrackingService::new(Arc::clone(&db));
    let programs = ProgramService::new(Arc::clone(&db));
    let sessions = WorkoutSessionService::new(Arc::clone(&db));
    let user = create_test_user(&db).await.unwrap();

    let zero_duration = tracker
        .record_session(CreateWorkoutSessionDto {
            duration_minutes: 0,
            ..running_session_dto(user.id, morning_of(test_monday()))
        })
        .await
        .unwrap_err();
    assert_eq!(zero_duration.code, ErrorCode::ValidationFailed);

    let dangling_program = tracker
        .record_session(CreateWorkoutSessionDto {
            program_id: Some(Uuid::new_v4()),
            ..running_session_dto(user.id, morning_of(test_monday()))
        })
        .await
        .unwrap_err();
    assert_eq!(dangling_program.code, ErrorCode::ResourceNotFound);

    let program = programs
        .create_program(CreateProgramDto {
            user_id: user.id,
            name: "Intervals".into(),
            workout_type: WorkoutType::Running,
            description: None,
            exercises: vec![ProgramExercise {
                name: "400m repeats".into(),
                sets: 8,
                reps: 1,
                weight_kg: None,
                duration_minutes: Some(2),
                notes: None,
            }],
        })
        .await
        .unwrap();

    let outcome = tracker
        .record_session(CreateWorkoutSessionDto {
            program_id: Some(program.id),
            ..running_session_dto(user.id, morning_of(test_monday()))
        })
        .await
        .unwrap();
    assert_eq!(outcome.session.program_id, Some(program.id));

    // Explicit update re-stamps and can clear the program link
    let updated = sessions
        .update_session(
            outcome.session.id,
            UpdateWorkoutSessionDto {
                workout_type: Some(WorkoutType::Gym),
                program_id: Some(None),
                ..UpdateWorkoutSessionDto::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.workout_type, WorkoutType::Gym);
    assert_eq!(updated.program_id, None);
    assert!(updated.updated_at >= outcome.session.updated_at);

    // Re-attach via apply_program
    let reattached = sessions.apply_program(updated.id, program.id).await.unwrap();
    assert_eq!(reattached.program_id, Some(program.id));
}

#[tokio::test]
async fn test_program_exercise_validation() {
    let db = create_test_database().await.unwrap();
    let programs = ProgramService::new(Arc::clone(&db));
    let user = create_test_user(&db).await.unwrap();

    let bad_reps = programs
        .create_program(CreateProgramDto {
            user_id: user.id,
            name: "Broken".into(),
            workout_type: WorkoutType::Gym,
            description: None,
            exercises: vec![ProgramExercise {
                name: "Squat".into(),
                sets: 3,
                reps: 0,
                weight_kg: None,
                duration_minutes: None,
                notes: None,
            }],
        })
        .await
        .unwrap_err();
    assert_eq!(bad_reps.code, ErrorCode::ValidationFailed);

    let program = programs
        .create_program(CreateProgramDto {
            user_id: user.id,
            name: "Leg day".into(),
            workout_type: WorkoutType::Gym,
            description: None,
            exercises: Vec::new(),
        })
        .await
        .unwrap();

    let with_exercise = programs
        .add_exercise(
            program.id,
            ProgramExercise {
                name: "Squat".into(),
                sets: 5,
                reps: 5,
                weight_kg: Some(100.0),
                duration_minutes: None,
                notes: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(with_exercise.exercises.len(), 1);

    let missing = programs
        .remove_exercise(program.id, "Deadlift")
        .await
        .unwrap_err();
    assert_eq!(missing.code, ErrorCode::ResourceNotFound);

    let heavier = programs
        .update_exercise(
            program.id,
            "Squat",
            ProgramExercise {
                name: "Squat".into(),
                sets: 3,
                reps: 3,
                weight_kg: Some(120.0),
                duration_minutes: None,
                notes: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(heavier.exercises[0].weight_kg, Some(120.0));

    let renamed = programs
        .update_program(
            program.id,
            motiv_engine::services::UpdateProgramDto {
                name: Some("Lower body".into()),
                ..motiv_engine::services::UpdateProgramDto::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(renamed.name, "Lower body");

    assert_eq!(programs.programs_for_user(user.id).await.unwrap().len(), 1);

    programs.delete_program(program.id).await.unwrap();
    let gone = programs.get_program(program.id).await.unwrap_err();
    assert_eq!(gone.code, ErrorCode::ResourceNotFound);
}
