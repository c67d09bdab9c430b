// ABOUTME: Weekly points calculation and ledgered award service
// ABOUTME: Converts session counts into points and applies not-yet-granted deltas exactly once
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Motiv Fitness

//! Points calculator and ledger service.
//!
//! The calculator is a pure read: one point per three sessions inside a
//! training week, integer division, no carry-over between weeks. The ledger
//! service turns a calculation into a balance change by granting only the
//! delta the week has not been granted yet, recorded in the
//! `weekly_point_awards` marker inside the same transaction as the balance
//! update, so re-invocation for an unchanged week awards nothing.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::constants::scoring::SESSIONS_PER_POINT;
use crate::database::Database;
use crate::errors::AppResult;
use crate::models::User;
use crate::week::TrainingWeek;

/// Result of a weekly award pass
#[derive(Debug, Clone)]
pub struct WeeklyAward {
    /// The user after the award was applied (unchanged when nothing was due)
    pub user: User,
    /// Points newly granted by this invocation; zero is not an error
    pub points_awarded: i64,
}

/// Weekly points calculation and awarding
#[derive(Clone)]
pub struct PointsService {
    db: Arc<Database>,
}

impl PointsService {
    /// Create a new points service
    #[must_use]
    pub const fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Points earned by the sessions inside one training week:
    /// `floor(session_count / 3)`. Zero sessions yield zero points.
    ///
    /// Pure with respect to persisted state; nothing is mutated.
    ///
    /// # Errors
    ///
    /// Returns an error if the session lookup fails.
    pub async fn calculate_weekly_points(
        &self,
        user_id: Uuid,
        week: TrainingWeek,
    ) -> AppResult<i64> {
        let (start, end_exclusive) = week.range_utc();
        let session_count = self
            .db
            .count_sessions_for_user_in_range(user_id, start, end_exclusive)
            .await?;

        Ok(session_count / SESSIONS_PER_POINT)
    }

    /// Award the user whatever the given week has earned but not yet been
    /// granted.
    ///
    /// The ledger marker is a high-water mark: when sessions disappear after
    /// an award the computed total can fall below the granted total, and the
    /// difference is neither clawed back nor re-grantable later.
    ///
    /// # Errors
    ///
    /// Fails with a not-found error when the user does not exist; a zero
    /// award is a success, not an error.
    pub async fn award_points_for_week(
        &self,
        user_id: Uuid,
        week: TrainingWeek,
    ) -> AppResult<WeeklyAward> {
        let user = self.db.get_user_required(user_id).await?;

        let computed = self.calculate_weekly_points(user_id, week).await?;
        let granted = self.db.weekly_points_granted(user_id, week).await?;
        let delta = computed - granted;

        if delta <= 0 {
            debug!(
                user_id = %user_id,
                %week,
                computed,
                granted,
                "no new points due for week"
            );
            return Ok(WeeklyAward {
                user,
                points_awarded: 0,
            });
        }

        self.db
            .apply_weekly_award(user_id, week, delta, computed, Utc::now())
            .await?;

        let user = self.db.get_user_required(user_id).await?;
        info!(
            user_id = %user_id,
            %week,
            points_awarded = delta,
            balance = user.points,
            "weekly points awarded"
        );

        Ok(WeeklyAward {
            user,
            points_awarded: delta,
        })
    }
}
