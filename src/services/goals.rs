// ABOUTME: Goal management service with progress accumulation and completion payout
// ABOUTME: Handles goal CRUD, reset, and unlocking of goal-linked rewards
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Motiv Fitness

//! Goal service.
//!
//! Goals accumulate earned points until their threshold is crossed, at which
//! point `completed` flips and stays set until an explicit reset. A goal
//! completing with a linked reward pays that reward out: the (user, reward)
//! join row is created if missing and unlocked without any point deduction,
//! since a payout is a grant rather than a purchase.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::models::{Goal, UserReward};

/// Input for creating a goal
#[derive(Debug, Clone)]
pub struct CreateGoalDto {
    /// Owning user
    pub user_id: Uuid,
    /// Goal name, non-empty
    pub name: String,
    /// Points needed to complete, positive
    pub points_required: i64,
    /// Optional description
    pub description: Option<String>,
    /// Optional reward paid out on completion
    pub reward_id: Option<Uuid>,
}

/// Input for updating a goal. `None` leaves a field untouched; the inner
/// options on `description` and `reward_id` clear the field when `None`.
#[derive(Debug, Clone, Default)]
pub struct UpdateGoalDto {
    /// New name
    pub name: Option<String>,
    /// New completion threshold
    pub points_required: Option<i64>,
    /// New description
    pub description: Option<Option<String>>,
    /// New linked reward
    pub reward_id: Option<Option<Uuid>>,
}

/// Goal CRUD, progress, and payout
#[derive(Clone)]
pub struct GoalService {
    db: Arc<Database>,
}

impl GoalService {
    /// Create a new goal service
    #[must_use]
    pub const fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Create a goal in its initial unearned state
    ///
    /// # Errors
    ///
    /// Fails with a validation error for an empty name or non-positive
    /// threshold, and a not-found error when the user or linked reward does
    /// not exist.
    pub async fn create_goal(&self, dto: CreateGoalDto) -> AppResult<Goal> {
        if dto.name.trim().is_empty() {
            return Err(AppError::validation("goal name must not be empty"));
        }
        if dto.points_required <= 0 {
            return Err(AppError::validation(format!(
                "goal points requirement must be positive, got {}",
                dto.points_required
            )));
        }

        self.db.get_user_required(dto.user_id).await?;
        if let Some(reward_id) = dto.reward_id {
            self.db.get_reward_required(reward_id).await?;
        }

        let goal = Goal::new(
            dto.user_id,
            dto.name,
            dto.points_required,
            dto.description,
            dto.reward_id,
        );
        self.db.create_goal(&goal).await?;

        Ok(goal)
    }

    /// Update an existing goal's details
    ///
    /// # Errors
    ///
    /// Fails with a not-found error when the goal or a newly linked reward
    /// does not exist, or a validation error for bad field values.
    pub async fn update_goal(&self, goal_id: Uuid, dto: UpdateGoalDto) -> AppResult<Goal> {
        let mut goal = self.db.get_goal_required(goal_id).await?;

        if let Some(name) = &dto.name {
            if name.trim().is_empty() {
                return Err(AppError::validation("goal name must not be empty"));
            }
        }
        if let Some(points_required) = dto.points_required {
            if points_required <= 0 {
                return Err(AppError::validation(format!(
                    "goal points requirement must be positive, got {points_required}"
                )));
            }
        }
        if let Some(Some(reward_id)) = dto.reward_id {
            self.db.get_reward_required(reward_id).await?;
        }

        goal.update_details(dto.name, dto.points_required, dto.description, dto.reward_id);
        self.db.update_goal(&goal).await?;

        Ok(goal)
    }

    /// Get a goal by ID
    ///
    /// # Errors
    ///
    /// Fails with a not-found error when the goal does not exist.
    pub async fn get_goal(&self, goal_id: Uuid) -> AppResult<Goal> {
        Ok(self.db.get_goal_required(goal_id).await?)
    }

    /// All goals for a user
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup fails.
    pub async fn goals_for_user(&self, user_id: Uuid) -> AppResult<Vec<Goal>> {
        Ok(self.db.goals_for_user(user_id).await?)
    }

    /// Completed goals for a user
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup fails.
    pub async fn completed_goals_for_user(&self, user_id: Uuid) -> AppResult<Vec<Goal>> {
        Ok(self.db.goals_for_user_by_completion(user_id, true).await?)
    }

    /// Return a goal to its initial unearned state.
    ///
    /// Explicit user action only. Resetting never revokes rewards the goal
    /// already paid out.
    ///
    /// # Errors
    ///
    /// Fails with a not-found error when the goal does not exist.
    pub async fn reset_goal(&self, goal_id: Uuid) -> AppResult<Goal> {
        let mut goal = self.db.get_goal_required(goal_id).await?;
        goal.reset();
        self.db.update_goal(&goal).await?;

        info!(goal_id = %goal.id, user_id = %goal.user_id, "goal reset");

        Ok(goal)
    }

    /// Push earned points into a goal. No-op when the goal has already
    /// completed. The caller guards against non-positive `points_added`.
    pub fn update_goal_progress(&self, goal: &mut Goal, points_added: i64) {
        if goal.completed {
            return;
        }
        goal.add_points(points_added);
    }

    /// Pure observer for goal completion
    #[must_use]
    pub fn check_goal_completion(&self, goal: &Goal) -> bool {
        goal.is_completed()
    }

    /// Pay out the reward linked to a completed goal.
    ///
    /// Returns `None` when the goal is incomplete or has no linked reward.
    /// Otherwise the (user, reward) join row is created if missing and
    /// unlocked without deducting points; an already-unlocked row passes
    /// through unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if a storage operation fails.
    pub async fn assign_reward_for_completed_goal(
        &self,
        goal: &Goal,
    ) -> AppResult<Option<UserReward>> {
        let Some(reward_id) = goal.reward_id else {
            return Ok(None);
        };
        if !goal.completed {
            return Ok(None);
        }

        match self.db.get_user_reward(goal.user_id, reward_id).await? {
            None => {
                let mut user_reward = UserReward::new(goal.user_id, reward_id);
                user_reward.unlock();
                self.db.create_user_reward(&user_reward).await?;

                info!(
                    goal_id = %goal.id,
                    user_id = %goal.user_id,
                    reward_id = %reward_id,
                    "goal payout created and unlocked reward"
                );

                Ok(Some(user_reward))
            }
            Some(mut user_reward) => {
                if !user_reward.unlocked {
                    let now = Utc::now();
                    self.db.mark_user_reward_unlocked(user_reward.id, now).await?;
                    user_reward.unlocked = true;
                    user_reward.unlocked_at = Some(now);
                    user_reward.updated_at = now;

                    info!(
                        goal_id = %goal.id,
                        user_id = %goal.user_id,
                        reward_id = %reward_id,
                        "goal payout unlocked existing reward"
                    );
                }
                Ok(Some(user_reward))
            }
        }
    }
}
