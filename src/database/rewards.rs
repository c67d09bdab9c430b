// ABOUTME: Reward catalog and per-user unlock-state database operations
// ABOUTME: Includes the transactional spend-and-unlock write path

use super::Database;
use crate::errors::AppError;
use crate::models::{Reward, RewardTier, UserReward};
use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use sqlx::Row;
use uuid::Uuid;

impl Database {
    /// Create the rewards and user rewards tables
    ///
    /// # Errors
    ///
    /// Returns an error if table or index creation fails
    pub(super) async fn migrate_rewards(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS rewards (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                description TEXT NOT NULL,
                tier INTEGER NOT NULL CHECK (tier BETWEEN 1 AND 5),
                points_cost INTEGER NOT NULL CHECK (points_cost > 0),
                image_path TEXT,
                created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS user_rewards (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                reward_id TEXT NOT NULL REFERENCES rewards(id) ON DELETE CASCADE,
                unlocked BOOLEAN NOT NULL DEFAULT 0,
                unlocked_at DATETIME,
                created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        // At most one join row per (user, reward) pair
        sqlx::query(
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_user_rewards_pair
             ON user_rewards(user_id, reward_id)",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_rewards_cost ON rewards(points_cost)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Insert a new reward
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails
    pub async fn create_reward(&self, reward: &Reward) -> Result<Uuid> {
        sqlx::query(
            r"
            INSERT INTO rewards (
                id, name, description, tier, points_cost,
                image_path, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ",
        )
        .bind(reward.id.to_string())
        .bind(&reward.name)
        .bind(&reward.description)
        .bind(reward.tier.ordinal())
        .bind(reward.points_cost)
        .bind(&reward.image_path)
        .bind(reward.created_at)
        .bind(reward.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(reward.id)
    }

    /// Get a reward by ID
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_reward(&self, reward_id: Uuid) -> Result<Option<Reward>> {
        let row = sqlx::query(
            r"
            SELECT id, name, description, tier, points_cost,
                   image_path, created_at, updated_at
            FROM rewards WHERE id = $1
            ",
        )
        .bind(reward_id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(Self::row_to_reward).transpose()
    }

    /// Get a reward by ID, failing with a typed not-found error otherwise
    ///
    /// # Errors
    ///
    /// Returns a not-found error when no reward exists with the given ID
    pub async fn get_reward_required(&self, reward_id: Uuid) -> Result<Reward> {
        self.get_reward(reward_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Reward {reward_id}")).into())
    }

    /// Look up a reward by its exact name
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_reward_by_name(&self, name: &str) -> Result<Option<Reward>> {
        let row = sqlx::query(
            r"
            SELECT id, name, description, tier, points_cost,
                   image_path, created_at, updated_at
            FROM rewards WHERE name = $1
            ",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(Self::row_to_reward).transpose()
    }

    /// All rewards, cheapest first
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn all_rewards(&self) -> Result<Vec<Reward>> {
        let rows = sqlx::query(
            r"
            SELECT id, name, description, tier, points_cost,
                   image_path, created_at, updated_at
            FROM rewards
            ORDER BY points_cost ASC, name ASC
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::row_to_reward).collect()
    }

    /// Rewards in a given tier, cheapest first
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn rewards_by_tier(&self, tier: RewardTier) -> Result<Vec<Reward>> {
        let rows = sqlx::query(
            r"
            SELECT id, name, description, tier, points_cost,
                   image_path, created_at, updated_at
            FROM rewards
            WHERE tier = $1
            ORDER BY points_cost ASC, name ASC
            ",
        )
        .bind(tier.ordinal())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::row_to_reward).collect()
    }

    /// Persist the mutable fields of a reward
    ///
    /// # Errors
    ///
    /// Returns an error if the reward does not exist or the update fails
    pub async fn update_reward(&self, reward: &Reward) -> Result<()> {
        let result = sqlx::query(
            r"
            UPDATE rewards SET
                name = $2,
                description = $3,
                tier = $4,
                points_cost = $5,
                image_path = $6,
                updated_at = $7
            WHERE id = $1
            ",
        )
        .bind(reward.id.to_string())
        .bind(&reward.name)
        .bind(&reward.description)
        .bind(reward.tier.ordinal())
        .bind(reward.points_cost)
        .bind(&reward.image_path)
        .bind(reward.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Reward {}", reward.id)).into());
        }

        Ok(())
    }

    /// Insert a new user reward join row
    ///
    /// # Errors
    ///
    /// Returns an error if a row already exists for the (user, reward) pair
    pub async fn create_user_reward(&self, user_reward: &UserReward) -> Result<Uuid> {
        sqlx::query(
            r"
            INSERT INTO user_rewards (
                id, user_id, reward_id, unlocked, unlocked_at, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(user_reward.id.to_string())
        .bind(user_reward.user_id.to_string())
        .bind(user_reward.reward_id.to_string())
        .bind(user_reward.unlocked)
        .bind(user_reward.unlocked_at)
        .bind(user_reward.created_at)
        .bind(user_reward.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(user_reward.id)
    }

    /// Get the join row for a (user, reward) pair
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_user_reward(
        &self,
        user_id: Uuid,
        reward_id: Uuid,
    ) -> Result<Option<UserReward>> {
        let row = sqlx::query(
            r"
            SELECT id, user_id, reward_id, unlocked, unlocked_at, created_at, updated_at
            FROM user_rewards
            WHERE user_id = $1 AND reward_id = $2
            ",
        )
        .bind(user_id.to_string())
        .bind(reward_id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(Self::row_to_user_reward).transpose()
    }

    /// All join rows for a user
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn user_rewards_for_user(&self, user_id: Uuid) -> Result<Vec<UserReward>> {
        let rows = sqlx::query(
            r"
            SELECT id, user_id, reward_id, unlocked, unlocked_at, created_at, updated_at
            FROM user_rewards
            WHERE user_id = $1
            ORDER BY created_at ASC
            ",
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::row_to_user_reward).collect()
    }

    /// Rewards the user has unlocked, joined to the catalog, cheapest first
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn unlocked_rewards_for_user(&self, user_id: Uuid) -> Result<Vec<Reward>> {
        let rows = sqlx::query(
            r"
            SELECT r.id, r.name, r.description, r.tier, r.points_cost,
                   r.image_path, r.created_at, r.updated_at
            FROM rewards r
            INNER JOIN user_rewards ur ON ur.reward_id = r.id
            WHERE ur.user_id = $1 AND ur.unlocked = 1
            ORDER BY r.points_cost ASC, r.name ASC
            ",
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::row_to_reward).collect()
    }

    /// Mark a join row unlocked without touching any balance.
    ///
    /// Used by the goal payout path, where the reward is a grant rather than
    /// a purchase. Idempotent: an already-unlocked row is left unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if the row does not exist or the update fails
    pub async fn mark_user_reward_unlocked(
        &self,
        user_reward_id: Uuid,
        unlocked_at: DateTime<Utc>,
    ) -> Result<()> {
        let result = sqlx::query(
            r"
            UPDATE user_rewards SET
                unlocked = 1,
                unlocked_at = COALESCE(unlocked_at, $2),
                updated_at = $2
            WHERE id = $1
            ",
        )
        .bind(user_reward_id.to_string())
        .bind(unlocked_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("UserReward {user_reward_id}")).into());
        }

        Ok(())
    }

    /// Spend points and unlock a reward in one transaction.
    ///
    /// The deduction carries a `points >= cost` guard in SQL so the balance
    /// can never go negative, and the unlock flag flips in the same
    /// transaction so a crash cannot consume points without granting the
    /// reward.
    ///
    /// # Errors
    ///
    /// Returns an error when the balance no longer covers the cost, when the
    /// row is already unlocked, or when the transaction fails.
    pub async fn spend_points_and_unlock(
        &self,
        user_id: Uuid,
        user_reward_id: Uuid,
        cost: i64,
        unlocked_at: DateTime<Utc>,
    ) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let deducted = sqlx::query(
            r"
            UPDATE users SET
                points = points - $2,
                updated_at = $3
            WHERE id = $1 AND points >= $2
            ",
        )
        .bind(user_id.to_string())
        .bind(cost)
        .bind(unlocked_at)
        .execute(&mut *tx)
        .await?;

        if deducted.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(anyhow!(
                "balance for user {user_id} no longer covers cost {cost}"
            ));
        }

        let unlocked = sqlx::query(
            r"
            UPDATE user_rewards SET
                unlocked = 1,
                unlocked_at = $2,
                updated_at = $2
            WHERE id = $1 AND unlocked = 0
            ",
        )
        .bind(user_reward_id.to_string())
        .bind(unlocked_at)
        .execute(&mut *tx)
        .await?;

        if unlocked.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(anyhow!("user reward {user_reward_id} is already unlocked"));
        }

        tx.commit().await?;

        Ok(())
    }

    /// Convert a database row to a Reward struct
    fn row_to_reward(row: &sqlx::sqlite::SqliteRow) -> Result<Reward> {
        let id: String = row.get("id");
        let tier: i64 = row.get("tier");

        Ok(Reward {
            id: Uuid::parse_str(&id)?,
            name: row.get("name"),
            description: row.get("description"),
            tier: RewardTier::from_ordinal(tier)?,
            points_cost: row.get("points_cost"),
            image_path: row.get("image_path"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }

    /// Convert a database row to a UserReward struct
    fn row_to_user_reward(row: &sqlx::sqlite::SqliteRow) -> Result<UserReward> {
        let id: String = row.get("id");
        let user_id: String = row.get("user_id");
        let reward_id: String = row.get("reward_id");

        Ok(UserReward {
            id: Uuid::parse_str(&id)?,
            user_id: Uuid::parse_str(&user_id)?,
            reward_id: Uuid::parse_str(&reward_id)?,
            unlocked: row.get("unlocked"),
            unlocked_at: row.get("unlocked_at"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }
}
