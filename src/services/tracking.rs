// ABOUTME: Orchestration service sequencing session recording through scoring and unlocks
// ABOUTME: Owns the session-added use case and its partial-failure handling
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Motiv Fitness

//! Tracking orchestrator.
//!
//! Sequences the session-added use case: persist the session, recount the
//! affected training week, award points when an exact positive multiple of
//! three sessions is reached, push earned points through every open goal,
//! pay out goal-linked rewards, then sweep-unlock everything the new balance
//! affords. Steps run sequentially because later steps read state the
//! earlier ones mutated.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::info;
use uuid::Uuid;

use crate::constants::scoring::SESSIONS_PER_POINT;
use crate::database::Database;
use crate::errors::AppResult;
use crate::models::{Goal, UserReward, WorkoutSession};
use crate::services::goals::GoalService;
use crate::services::points::PointsService;
use crate::services::rewards::{RewardService, SweepFailure, SweepOutcome};
use crate::services::sessions::{CreateWorkoutSessionDto, WorkoutSessionService};
use crate::week::TrainingWeek;

/// Everything that happened while recording one session
#[derive(Debug, Clone)]
pub struct SessionOutcome {
    /// The persisted session
    pub session: WorkoutSession,
    /// The training week the session landed in
    pub week: TrainingWeek,
    /// Points newly awarded by this recording (0 off the 3-session boundary)
    pub points_awarded: i64,
    /// Open goals that received the award, in storage order
    pub goals_advanced: Vec<Goal>,
    /// Rewards unlocked this pass, goal payouts first, then sweep unlocks
    pub rewards_unlocked: Vec<UserReward>,
    /// Sweep failures; each is isolated and never aborts the batch
    pub sweep_failures: Vec<SweepFailure>,
}

/// External-facing orchestrator for the scoring pipeline
#[derive(Clone)]
pub struct TrackingService {
    db: Arc<Database>,
    points: PointsService,
    goals: GoalService,
    rewards: RewardService,
    sessions: WorkoutSessionService,
}

impl TrackingService {
    /// Create a new tracking service over one database handle
    #[must_use]
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            points: PointsService::new(Arc::clone(&db)),
            goals: GoalService::new(Arc::clone(&db)),
            rewards: RewardService::new(Arc::clone(&db)),
            sessions: WorkoutSessionService::new(Arc::clone(&db)),
            db,
        }
    }

    /// Record a session and run the full scoring pipeline.
    ///
    /// Points are only awarded when the week's session count lands exactly
    /// on a positive multiple of three; the ledger inside the points service
    /// keeps repeated or off-boundary invocations from over-granting.
    ///
    /// # Errors
    ///
    /// Propagates validation and not-found errors from session creation and
    /// any storage failure from the pipeline. Per-reward sweep failures are
    /// reported in the outcome, not as an error.
    pub async fn record_session(&self, dto: CreateWorkoutSessionDto) -> AppResult<SessionOutcome> {
        let session = self.sessions.create_session(dto).await?;
        let user_id = session.user_id;
        let week = TrainingWeek::containing(session.date.date_naive());

        let (start, end_exclusive) = week.range_utc();
        let session_count = self
            .db
            .count_sessions_for_user_in_range(user_id, start, end_exclusive)
            .await?;

        let mut outcome = SessionOutcome {
            session,
            week,
            points_awarded: 0,
            goals_advanced: Vec::new(),
            rewards_unlocked: Vec::new(),
            sweep_failures: Vec::new(),
        };

        let on_boundary = session_count > 0 && session_count % SESSIONS_PER_POINT == 0;
        if !on_boundary {
            return Ok(outcome);
        }

        let award = self.points.award_points_for_week(user_id, week).await?;
        outcome.points_awarded = award.points_awarded;

        if award.points_awarded > 0 {
            let (goals_advanced, payouts) =
                self.advance_goals(user_id, award.points_awarded).await?;
            outcome.goals_advanced = goals_advanced;
            outcome.rewards_unlocked = payouts;

            // Unlock everything the new balance affords
            let sweep = self.rewards.sweep_unlockable(user_id).await?;
            outcome.rewards_unlocked.extend(sweep.unlocked);
            outcome.sweep_failures = sweep.failures;

            info!(
                user_id = %user_id,
                %week,
                session_count,
                points_awarded = award.points_awarded,
                goals_advanced = outcome.goals_advanced.len(),
                rewards_unlocked = outcome.rewards_unlocked.len(),
                "session recorded with award"
            );
        }

        Ok(outcome)
    }

    /// Award whatever the given week has earned but not yet granted, then
    /// push the award through the user's open goals. Returns the points
    /// earned by this invocation.
    ///
    /// # Errors
    ///
    /// Fails with a not-found error when the user does not exist.
    pub async fn track_weekly_points(
        &self,
        user_id: Uuid,
        week_start: NaiveDate,
    ) -> AppResult<i64> {
        let week = TrainingWeek::starting(week_start);
        let award = self.points.award_points_for_week(user_id, week).await?;

        if award.points_awarded > 0 {
            self.advance_goals(user_id, award.points_awarded).await?;
        }

        Ok(award.points_awarded)
    }

    /// Distribute newly earned points across the user's open goals.
    ///
    /// Guard for the goal tracker: non-positive `points_earned` is a no-op
    /// returning no goals, never an error.
    ///
    /// # Errors
    ///
    /// Returns an error if a storage operation fails.
    pub async fn update_goals_progress(
        &self,
        user_id: Uuid,
        points_earned: i64,
    ) -> AppResult<Vec<Goal>> {
        if points_earned <= 0 {
            return Ok(Vec::new());
        }

        let (goals_advanced, _payouts) = self.advance_goals(user_id, points_earned).await?;
        Ok(goals_advanced)
    }

    /// Sweep-unlock every reward the user's current balance affords.
    ///
    /// # Errors
    ///
    /// Fails with a not-found error when the user does not exist.
    pub async fn sweep_unlockable_rewards(&self, user_id: Uuid) -> AppResult<SweepOutcome> {
        self.rewards.sweep_unlockable(user_id).await
    }

    /// Push an award through every open goal, persisting each, and pay out
    /// rewards for goals that newly complete
    async fn advance_goals(
        &self,
        user_id: Uuid,
        points_earned: i64,
    ) -> AppResult<(Vec<Goal>, Vec<UserReward>)> {
        let open_goals = self.db.goals_for_user_by_completion(user_id, false).await?;

        let mut advanced = Vec::with_capacity(open_goals.len());
        let mut payouts = Vec::new();

        for mut goal in open_goals {
            self.goals.update_goal_progress(&mut goal, points_earned);

            if goal.is_completed() {
                info!(
                    goal_id = %goal.id,
                    user_id = %user_id,
                    accumulated = goal.points_accumulated,
                    required = goal.points_required,
                    "goal completed"
                );
                if let Some(user_reward) =
                    self.goals.assign_reward_for_completed_goal(&goal).await?
                {
                    if user_reward.unlocked {
                        payouts.push(user_reward);
                    }
                }
            }

            self.db.update_goal(&goal).await?;
            advanced.push(goal);
        }

        Ok((advanced, payouts))
    }
}
