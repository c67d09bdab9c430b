// ABOUTME: Reward catalog service with spend-path unlocking and affordability sweep
// ABOUTME: Guarantees at-most-once unlocks and a never-negative point balance
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Motiv Fitness

//! Reward service.
//!
//! The spend path verifies sufficiency and deducts in one transactional
//! step, so `user.points >= 0` holds after any sequence of unlocks and a
//! reward is unlocked at most once per user. Re-unlocking an unlocked reward
//! is a safe no-op returning the existing state. The sweep unlocks every
//! affordable locked reward, cheapest first, isolating per-reward failures
//! so one bad reward cannot abort the batch.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::constants::catalog;
use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::models::{Reward, RewardTier, UserReward};

/// Input for creating a reward
#[derive(Debug, Clone)]
pub struct CreateRewardDto {
    /// Reward name, non-empty
    pub name: String,
    /// Reward description
    pub description: String,
    /// Tier ordinal
    pub tier: RewardTier,
    /// Unlock cost in points, positive
    pub points_cost: i64,
    /// Optional image reference
    pub image_path: Option<String>,
}

/// Input for the administrative reward update. `None` leaves a field
/// untouched; the inner option on `image_path` clears it when `None`.
#[derive(Debug, Clone, Default)]
pub struct UpdateRewardDto {
    /// New name
    pub name: Option<String>,
    /// New description
    pub description: Option<String>,
    /// New tier
    pub tier: Option<RewardTier>,
    /// New cost
    pub points_cost: Option<i64>,
    /// New image reference
    pub image_path: Option<Option<String>>,
}

/// One reward the sweep failed to unlock; the batch continues past it
#[derive(Debug, Clone)]
pub struct SweepFailure {
    /// The reward whose unlock failed
    pub reward_id: Uuid,
    /// Why it failed
    pub message: String,
}

/// Result of an affordability sweep
#[derive(Debug, Clone, Default)]
pub struct SweepOutcome {
    /// Rewards newly unlocked by the sweep, cheapest first
    pub unlocked: Vec<UserReward>,
    /// Per-reward failures; never fatal to the batch
    pub failures: Vec<SweepFailure>,
}

/// Reward catalog and unlock management
#[derive(Clone)]
pub struct RewardService {
    db: Arc<Database>,
}

impl RewardService {
    /// Create a new reward service
    #[must_use]
    pub const fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Create a reward
    ///
    /// # Errors
    ///
    /// Fails with a validation error for an empty name or non-positive cost.
    pub async fn create_reward(&self, dto: CreateRewardDto) -> AppResult<Reward> {
        if dto.name.trim().is_empty() {
            return Err(AppError::validation("reward name must not be empty"));
        }
        if dto.points_cost <= 0 {
            return Err(AppError::validation(format!(
                "reward cost must be positive, got {}",
                dto.points_cost
            )));
        }

        let reward = Reward::new(
            dto.name,
            dto.description,
            dto.tier,
            dto.points_cost,
            dto.image_path,
        );
        self.db.create_reward(&reward).await?;

        Ok(reward)
    }

    /// Apply an administrative update to a reward
    ///
    /// # Errors
    ///
    /// Fails with a not-found error when the reward does not exist, or a
    /// validation error for bad field values.
    pub async fn update_reward(&self, reward_id: Uuid, dto: UpdateRewardDto) -> AppResult<Reward> {
        let mut reward = self.db.get_reward_required(reward_id).await?;

        if let Some(name) = &dto.name {
            if name.trim().is_empty() {
                return Err(AppError::validation("reward name must not be empty"));
            }
        }
        if let Some(points_cost) = dto.points_cost {
            if points_cost <= 0 {
                return Err(AppError::validation(format!(
                    "reward cost must be positive, got {points_cost}"
                )));
            }
        }

        reward.update_details(
            dto.name,
            dto.description,
            dto.tier,
            dto.points_cost,
            dto.image_path,
        );
        self.db.update_reward(&reward).await?;

        Ok(reward)
    }

    /// Get a reward by ID
    ///
    /// # Errors
    ///
    /// Fails with a not-found error when the reward does not exist.
    pub async fn get_reward(&self, reward_id: Uuid) -> AppResult<Reward> {
        Ok(self.db.get_reward_required(reward_id).await?)
    }

    /// All rewards, cheapest first
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup fails.
    pub async fn all_rewards(&self) -> AppResult<Vec<Reward>> {
        Ok(self.db.all_rewards().await?)
    }

    /// Rewards in one tier
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup fails.
    pub async fn rewards_by_tier(&self, tier: RewardTier) -> AppResult<Vec<Reward>> {
        Ok(self.db.rewards_by_tier(tier).await?)
    }

    /// All (user, reward) join rows for a user, locked and unlocked alike
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup fails.
    pub async fn user_rewards(&self, user_id: Uuid) -> AppResult<Vec<UserReward>> {
        Ok(self.db.user_rewards_for_user(user_id).await?)
    }

    /// Rewards the user has unlocked, for display. Rewards with no join row
    /// are implicitly locked.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup fails.
    pub async fn get_unlocked_rewards(&self, user_id: Uuid) -> AppResult<Vec<Reward>> {
        Ok(self.db.unlocked_rewards_for_user(user_id).await?)
    }

    /// Unlock a reward by spending points.
    ///
    /// Loads user and reward (not-found errors), lazily creates the join
    /// row, returns the row unchanged when already unlocked, verifies
    /// sufficiency, then deducts and unlocks in one transaction so the
    /// balance can never go negative and a crash cannot consume points
    /// without granting the reward.
    ///
    /// # Errors
    ///
    /// Fails with a not-found error when the user or reward is missing and
    /// an insufficient-points error (carrying required and available
    /// amounts) when the balance does not cover the cost.
    pub async fn unlock_reward(&self, user_id: Uuid, reward_id: Uuid) -> AppResult<UserReward> {
        let user = self.db.get_user_required(user_id).await?;
        let reward = self.db.get_reward_required(reward_id).await?;

        let user_reward = match self.db.get_user_reward(user_id, reward_id).await? {
            Some(user_reward) => user_reward,
            None => {
                let user_reward = UserReward::new(user_id, reward_id);
                self.db.create_user_reward(&user_reward).await?;
                user_reward
            }
        };

        // Idempotent: multiple unlock attempts are safe
        if user_reward.unlocked {
            return Ok(user_reward);
        }

        if !user.can_afford(reward.points_cost) {
            return Err(
                AppError::insufficient_points(reward.points_cost, user.points)
                    .with_user_id(user_id)
                    .with_resource_id(reward_id.to_string()),
            );
        }

        let now = Utc::now();
        self.db
            .spend_points_and_unlock(user_id, user_reward.id, reward.points_cost, now)
            .await?;

        info!(
            user_id = %user_id,
            reward_id = %reward_id,
            cost = reward.points_cost,
            "reward unlocked"
        );

        let mut unlocked = user_reward;
        unlocked.unlocked = true;
        unlocked.unlocked_at = Some(now);
        unlocked.updated_at = now;

        Ok(unlocked)
    }

    /// Unlock every reward the user can now afford and has not unlocked
    /// yet, cheapest first.
    ///
    /// Models "unlock as soon as affordable": called after any point
    /// balance change, independent of explicit user action. Each unlock
    /// attempt is isolated; a failure is recorded per reward and the sweep
    /// moves on.
    ///
    /// # Errors
    ///
    /// Fails with a not-found error when the user does not exist; individual
    /// unlock failures never fail the sweep.
    pub async fn sweep_unlockable(&self, user_id: Uuid) -> AppResult<SweepOutcome> {
        let user = self.db.get_user_required(user_id).await?;
        let rewards = self.db.all_rewards().await?;

        let mut outcome = SweepOutcome::default();
        let mut available = user.points;

        for reward in rewards {
            if reward.points_cost > available {
                continue;
            }

            let already_unlocked = self
                .db
                .get_user_reward(user_id, reward.id)
                .await?
                .is_some_and(|user_reward| user_reward.unlocked);
            if already_unlocked {
                continue;
            }

            match self.unlock_reward(user_id, reward.id).await {
                Ok(user_reward) => {
                    available -= reward.points_cost;
                    outcome.unlocked.push(user_reward);
                }
                Err(error) => {
                    warn!(
                        user_id = %user_id,
                        reward_id = %reward.id,
                        %error,
                        "sweep failed to unlock reward"
                    );
                    outcome.failures.push(SweepFailure {
                        reward_id: reward.id,
                        message: error.to_string(),
                    });
                }
            }
        }

        Ok(outcome)
    }

    /// Seed the predefined five-tier reward catalog, skipping any reward
    /// that already exists by name. Returns the catalog as stored.
    ///
    /// # Errors
    ///
    /// Returns an error if a storage operation fails.
    pub async fn seed_default_rewards(&self) -> AppResult<Vec<Reward>> {
        let defaults = default_catalog();

        let mut stored = Vec::with_capacity(defaults.len());
        for (name, description, tier) in defaults {
            match self.db.get_reward_by_name(name).await? {
                Some(existing) => stored.push(existing),
                None => {
                    let cost = catalog::TIER_COSTS[(tier.ordinal() - 1) as usize];
                    let reward = self
                        .create_reward(CreateRewardDto {
                            name: name.to_string(),
                            description: description.to_string(),
                            tier,
                            points_cost: cost,
                            image_path: None,
                        })
                        .await?;
                    stored.push(reward);
                }
            }
        }

        Ok(stored)
    }
}

/// The predefined catalog: one reward per tier, cheapest first
const fn default_catalog() -> [(&'static str, &'static str, RewardTier); 5] {
    [
        (
            "Workout Playlist",
            "An exclusive playlist of training music for your sessions.",
            RewardTier::Tier1,
        ),
        (
            "30-Minute Massage",
            "A relaxing half-hour massage to recover from training.",
            RewardTier::Tier2,
        ),
        (
            "Dinner Out",
            "A meal at a favorite restaurant to celebrate your consistency.",
            RewardTier::Tier3,
        ),
        (
            "Weekend Getaway",
            "A surprise weekend escape to unwind and recharge.",
            RewardTier::Tier4,
        ),
        (
            "Dream Vacation",
            "The ultimate reward for long-term dedication.",
            RewardTier::Tier5,
        ),
    ]
}
