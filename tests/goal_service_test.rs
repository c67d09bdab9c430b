// ABOUTME: Integration tests for goal CRUD, progress accumulation, and completion payout
// ABOUTME: Covers completion monotonicity, reset semantics, and reward payout paths
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Motiv Fitness

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::sync::Arc;

use motiv_engine::errors::ErrorCode;
use motiv_engine::models::{RewardTier, UserReward};
use motiv_engine::services::{CreateGoalDto, GoalService, UpdateGoalDto};
use uuid::Uuid;

use common::{create_test_database, create_test_reward, create_test_user};

fn goal_dto(user_id: Uuid, points_required: i64, reward_id: Option<Uuid>) -> CreateGoalDto {
    CreateGoalDto {
        user_id,
        name: "Stay consistent".into(),
        points_required,
        description: None,
        reward_id,
    }
}

#[tokio::test]
async fn test_create_goal_validation() {
    let db = create_test_database().await.unwrap();
    let goals = GoalService::new(Arc::clone(&db));
    let user = create_test_user(&db).await.unwrap();

    let empty_name = goals
        .create_goal(CreateGoalDto {
            name: "  ".into(),
            ..goal_dto(user.id, 10, None)
        })
        .await
        .unwrap_err();
    assert_eq!(empty_name.code, ErrorCode::ValidationFailed);

    let zero_threshold = goals.create_goal(goal_dto(user.id, 0, None)).await.unwrap_err();
    assert_eq!(zero_threshold.code, ErrorCode::ValidationFailed);

    let missing_user = goals
        .create_goal(goal_dto(Uuid::new_v4(), 10, None))
        .await
        .unwrap_err();
    assert_eq!(missing_user.code, ErrorCode::ResourceNotFound);

    let missing_reward = goals
        .create_goal(goal_dto(user.id, 10, Some(Uuid::new_v4())))
        .await
        .unwrap_err();
    assert_eq!(missing_reward.code, ErrorCode::ResourceNotFound);
}

#[tokio::test]
async fn test_progress_crosses_threshold_and_unlocks_linked_reward() {
    let db = create_test_database().await.unwrap();
    let goals = GoalService::new(Arc::clone(&db));
    let user = create_test_user(&db).await.unwrap();
    let reward = create_test_reward(&db, 5, RewardTier::Tier3).await.unwrap();

    let mut goal = goals
        .create_goal(goal_dto(user.id, 10, Some(reward.id)))
        .await
        .unwrap();

    // A locked join row already exists for (user, reward)
    let user_reward = UserReward::new(user.id, reward.id);
    db.create_user_reward(&user_reward).await.unwrap();

    goals.update_goal_progress(&mut goal, 8);
    assert_eq!(goal.points_accumulated, 8);
    assert!(!goals.check_goal_completion(&goal));

    goals.update_goal_progress(&mut goal, 3);
    assert_eq!(goal.points_accumulated, 11);
    assert!(goals.check_goal_completion(&goal));

    let payout = goals
        .assign_reward_for_completed_goal(&goal)
        .await
        .unwrap()
        .expect("completed goal with linked reward pays out");
    assert_eq!(payout.id, user_reward.id);
    assert!(payout.unlocked);

    let stored = db.get_user_reward(user.id, reward.id).await.unwrap().unwrap();
    assert!(stored.unlocked);
    assert!(stored.unlocked_at.is_some());
}

#[tokio::test]
async fn test_payout_creates_missing_join_row_without_deducting_points() {
    let db = create_test_database().await.unwrap();
    let goals = GoalService::new(Arc::clone(&db));
    let mut user = create_test_user(&db).await.unwrap();
    let reward = create_test_reward(&db, 5, RewardTier::Tier3).await.unwrap();

    user.add_points(2).unwrap();
    db.update_user(&user).await.unwrap();

    let mut goal = goals
        .create_goal(goal_dto(user.id, 2, Some(reward.id)))
        .await
        .unwrap();
    goals.update_goal_progress(&mut goal, 2);
    assert!(goal.is_completed());

    let payout = goals
        .assign_reward_for_completed_goal(&goal)
        .await
        .unwrap()
        .expect("payout creates the missing row");
    assert!(payout.unlocked);

    // A payout is a grant: no cost check and no deduction
    let user = db.get_user_required(user.id).await.unwrap();
    assert_eq!(user.points, 2);
}

#[tokio::test]
async fn test_payout_is_idempotent_for_already_unlocked_rewards() {
    let db = create_test_database().await.unwrap();
    let goals = GoalService::new(Arc::clone(&db));
    let user = create_test_user(&db).await.unwrap();
    let reward = create_test_reward(&db, 1, RewardTier::Tier1).await.unwrap();

    let mut goal = goals
        .create_goal(goal_dto(user.id, 1, Some(reward.id)))
        .await
        .unwrap();
    goals.update_goal_progress(&mut goal, 1);

    let first = goals
        .assign_reward_for_completed_goal(&goal)
        .await
        .unwrap()
        .unwrap();
    let second = goals
        .assign_reward_for_completed_goal(&goal)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(first.unlocked_at, second.unlocked_at);
}

#[tokio::test]
async fn test_incomplete_or_rewardless_goals_pay_nothing() {
    let db = create_test_database().await.unwrap();
    let goals = GoalService::new(Arc::clone(&db));
    let user = create_test_user(&db).await.unwrap();
    let reward = create_test_reward(&db, 1, RewardTier::Tier1).await.unwrap();

    let incomplete = goals
        .create_goal(goal_dto(user.id, 10, Some(reward.id)))
        .await
        .unwrap();
    assert!(goals
        .assign_reward_for_completed_goal(&incomplete)
        .await
        .unwrap()
        .is_none());

    let mut no_reward = goals.create_goal(goal_dto(user.id, 1, None)).await.unwrap();
    goals.update_goal_progress(&mut no_reward, 1);
    assert!(no_reward.is_completed());
    assert!(goals
        .assign_reward_for_completed_goal(&no_reward)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_completed_flag_is_monotonic_and_reset_is_explicit() {
    let db = create_test_database().await.unwrap();
    let goals = GoalService::new(Arc::clone(&db));
    let user = create_test_user(&db).await.unwrap();

    let mut goal = goals.create_goal(goal_dto(user.id, 2, None)).await.unwrap();
    goals.update_goal_progress(&mut goal, 5);
    assert!(goal.is_completed());
    db.update_goal(&goal).await.unwrap();

    // Progress on a completed goal is a no-op, never a rollback
    goals.update_goal_progress(&mut goal, 5);
    assert!(goal.is_completed());
    assert_eq!(goal.points_accumulated, 5);

    let reset = goals.reset_goal(goal.id).await.unwrap();
    assert!(!reset.completed);
    assert_eq!(reset.points_accumulated, 0);
}

#[tokio::test]
async fn test_reset_does_not_revoke_an_unlocked_reward() {
    let db = create_test_database().await.unwrap();
    let goals = GoalService::new(Arc::clone(&db));
    let user = create_test_user(&db).await.unwrap();
    let reward = create_test_reward(&db, 1, RewardTier::Tier1).await.unwrap();

    let mut goal = goals
        .create_goal(goal_dto(user.id, 1, Some(reward.id)))
        .await
        .unwrap();
    goals.update_goal_progress(&mut goal, 1);
    goals.assign_reward_for_completed_goal(&goal).await.unwrap();
    db.update_goal(&goal).await.unwrap();

    let reset = goals.reset_goal(goal.id).await.unwrap();
    assert!(!reset.completed);

    let still_unlocked = db.get_user_reward(user.id, reward.id).await.unwrap().unwrap();
    assert!(still_unlocked.unlocked);
}

#[tokio::test]
async fn test_goal_update_and_completion_filters() {
    let db = create_test_database().await.unwrap();
    let goals = GoalService::new(Arc::clone(&db));
    let user = create_test_user(&db).await.unwrap();

    let goal = goals.create_goal(goal_dto(user.id, 10, None)).await.unwrap();
    let updated = goals
        .update_goal(
            goal.id,
            UpdateGoalDto {
                name: Some("Marathon block".into()),
                points_required: Some(20),
                description: Some(Some("Sixteen weeks".into())),
                ..UpdateGoalDto::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Marathon block");
    assert_eq!(updated.points_required, 20);

    let mut done = goals.create_goal(goal_dto(user.id, 1, None)).await.unwrap();
    goals.update_goal_progress(&mut done, 1);
    db.update_goal(&done).await.unwrap();

    let completed = goals.completed_goals_for_user(user.id).await.unwrap();
    assert_eq!(completed.len(), 1);
    assert_eq!(completed[0].id, done.id);

    let all = goals.goals_for_user(user.id).await.unwrap();
    assert_eq!(all.len(), 2);
}
