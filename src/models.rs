// ABOUTME: Core data models for the Motiv points and rewards engine
// ABOUTME: Defines User, WorkoutSession, Program, Reward, UserReward and Goal entities
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Motiv Fitness

//! # Data Models
//!
//! Domain entities for the engine. Each entity is one concrete struct that
//! owns its mutation methods; state transitions (point deltas, unlocks, goal
//! completion) go through those methods so the invariants live next to the
//! data they protect.
//!
//! ## Core Models
//!
//! - [`User`]: account identity and the authoritative point balance
//! - [`WorkoutSession`]: one logged workout occurrence
//! - [`Program`]: reusable named exercise template
//! - [`Reward`]: tiered, point-priced unlockable item
//! - [`UserReward`]: per-user unlock state for a reward
//! - [`Goal`]: user-defined point-accumulation target

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::week::TrainingWeek;

/// Category of a workout session
#[non_exhaustive]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum WorkoutType {
    /// High-intensity functional training
    Crossfit,
    /// Pilates practice
    Pilates,
    /// Gym / strength training
    Gym,
    /// Running session
    Running,
    /// Swimming session
    Swimming,
    /// Yoga practice
    Yoga,
    /// Anything that does not fit the fixed categories
    Other,
}

impl WorkoutType {
    /// Convert to string for database storage
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Crossfit => "crossfit",
            Self::Pilates => "pilates",
            Self::Gym => "gym",
            Self::Running => "running",
            Self::Swimming => "swimming",
            Self::Yoga => "yoga",
            Self::Other => "other",
        }
    }
}

impl FromStr for WorkoutType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "crossfit" => Ok(Self::Crossfit),
            "pilates" => Ok(Self::Pilates),
            "gym" => Ok(Self::Gym),
            "running" => Ok(Self::Running),
            "swimming" => Ok(Self::Swimming),
            "yoga" => Ok(Self::Yoga),
            "other" => Ok(Self::Other),
            _ => Err(AppError::validation(format!("Invalid workout type: {s}")).into()),
        }
    }
}

impl Display for WorkoutType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

/// A user account with its gamification point balance.
///
/// `points` never goes negative. Every balance mutation funnels through
/// [`User::apply_points_delta`], which enforces the `points + delta >= 0`
/// precondition and re-stamps `updated_at`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier
    pub id: Uuid,
    /// Display name
    pub display_name: String,
    /// User email address (used for identification)
    pub email: String,
    /// Current gamification point balance, never negative
    pub points: i64,
    /// When the user account was created
    pub created_at: DateTime<Utc>,
    /// Last time the account was mutated
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with a zero point balance
    #[must_use]
    pub fn new(display_name: impl Into<String>, email: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            display_name: display_name.into(),
            email: email.into(),
            points: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a signed delta to the point balance.
    ///
    /// This is the single authoritative balance mutator. Precondition:
    /// `self.points + delta >= 0`.
    ///
    /// # Errors
    ///
    /// Returns an insufficient-points error (carrying required and available
    /// amounts) when the delta would take the balance below zero.
    pub fn apply_points_delta(&mut self, delta: i64) -> AppResult<()> {
        let next = self.points + delta;
        if next < 0 {
            return Err(AppError::insufficient_points(-delta, self.points).with_user_id(self.id));
        }
        self.points = next;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Add earned points to the balance
    ///
    /// # Errors
    ///
    /// Returns a validation error when `points` is not positive.
    pub fn add_points(&mut self, points: i64) -> AppResult<()> {
        if points <= 0 {
            return Err(AppError::validation(format!(
                "point award must be positive, got {points}"
            )));
        }
        self.apply_points_delta(points)
    }

    /// Spend points from the balance
    ///
    /// # Errors
    ///
    /// Returns a validation error when `points` is not positive, or an
    /// insufficient-points error when the balance does not cover the spend.
    pub fn spend_points(&mut self, points: i64) -> AppResult<()> {
        if points <= 0 {
            return Err(AppError::validation(format!(
                "point spend must be positive, got {points}"
            )));
        }
        self.apply_points_delta(-points)
    }

    /// Whether the balance covers the given cost
    #[must_use]
    pub const fn can_afford(&self, cost: i64) -> bool {
        self.points >= cost
    }
}

/// One logged workout occurrence.
///
/// Immutable once created except through [`WorkoutSession::update_details`],
/// which re-stamps `updated_at`. Sessions are never auto-deleted by the
/// engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutSession {
    /// Unique session identifier
    pub id: Uuid,
    /// Owning user
    pub user_id: Uuid,
    /// Workout category
    pub workout_type: WorkoutType,
    /// When the session took place
    pub date: DateTime<Utc>,
    /// Duration in minutes, always positive
    pub duration_minutes: i64,
    /// Optional link to the program this session followed
    pub program_id: Option<Uuid>,
    /// Optional free-text note
    pub notes: Option<String>,
    /// When the record was created
    pub created_at: DateTime<Utc>,
    /// Last explicit update
    pub updated_at: DateTime<Utc>,
}

impl WorkoutSession {
    /// Create a new workout session
    #[must_use]
    pub fn new(
        user_id: Uuid,
        workout_type: WorkoutType,
        date: DateTime<Utc>,
        duration_minutes: i64,
        program_id: Option<Uuid>,
        notes: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            workout_type,
            date,
            duration_minutes,
            program_id,
            notes,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply an explicit update, re-stamping `updated_at`.
    ///
    /// `program_id` and `notes` use double-`Option` semantics: `None` leaves
    /// the field untouched, `Some(None)` clears it.
    pub fn update_details(
        &mut self,
        workout_type: Option<WorkoutType>,
        date: Option<DateTime<Utc>>,
        duration_minutes: Option<i64>,
        program_id: Option<Option<Uuid>>,
        notes: Option<Option<String>>,
    ) {
        if let Some(workout_type) = workout_type {
            self.workout_type = workout_type;
        }
        if let Some(date) = date {
            self.date = date;
        }
        if let Some(duration_minutes) = duration_minutes {
            self.duration_minutes = duration_minutes;
        }
        if let Some(program_id) = program_id {
            self.program_id = program_id;
        }
        if let Some(notes) = notes {
            self.notes = notes;
        }
        self.updated_at = Utc::now();
    }

    /// Whether this session falls inside the given training week
    #[must_use]
    pub fn is_in_week(&self, week: TrainingWeek) -> bool {
        week.contains(self.date.date_naive())
    }
}

/// One exercise inside a program template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramExercise {
    /// Exercise name, unique within its program
    pub name: String,
    /// Number of sets, always positive
    pub sets: i64,
    /// Repetitions per set, always positive
    pub reps: i64,
    /// Working weight in kilograms, where applicable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<f64>,
    /// Timed-exercise duration in minutes, where applicable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<i64>,
    /// Optional free-text note
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A reusable named workout template with an ordered exercise list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Program {
    /// Unique program identifier
    pub id: Uuid,
    /// Owning user
    pub user_id: Uuid,
    /// Program name
    pub name: String,
    /// Workout category the program targets
    pub workout_type: WorkoutType,
    /// Optional description
    pub description: Option<String>,
    /// Ordered exercise list
    pub exercises: Vec<ProgramExercise>,
    /// When the program was created
    pub created_at: DateTime<Utc>,
    /// Last update
    pub updated_at: DateTime<Utc>,
}

impl Program {
    /// Create a new program
    #[must_use]
    pub fn new(
        user_id: Uuid,
        name: impl Into<String>,
        workout_type: WorkoutType,
        description: Option<String>,
        exercises: Vec<ProgramExercise>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            name: name.into(),
            workout_type,
            description,
            exercises,
            created_at: now,
            updated_at: now,
        }
    }

    /// Append an exercise to the program
    pub fn add_exercise(&mut self, exercise: ProgramExercise) {
        self.exercises.push(exercise);
        self.updated_at = Utc::now();
    }

    /// Remove an exercise by name. Returns whether anything was removed.
    pub fn remove_exercise(&mut self, exercise_name: &str) -> bool {
        let before = self.exercises.len();
        self.exercises.retain(|e| e.name != exercise_name);
        let removed = self.exercises.len() != before;
        if removed {
            self.updated_at = Utc::now();
        }
        removed
    }

    /// Replace an exercise by name. Returns whether a match was found.
    pub fn update_exercise(&mut self, exercise_name: &str, updated: ProgramExercise) -> bool {
        match self.exercises.iter_mut().find(|e| e.name == exercise_name) {
            Some(slot) => {
                *slot = updated;
                self.updated_at = Utc::now();
                true
            }
            None => false,
        }
    }

    /// Apply an explicit metadata update, re-stamping `updated_at`
    pub fn update_details(
        &mut self,
        name: Option<String>,
        workout_type: Option<WorkoutType>,
        description: Option<Option<String>>,
    ) {
        if let Some(name) = name {
            self.name = name;
        }
        if let Some(workout_type) = workout_type {
            self.workout_type = workout_type;
        }
        if let Some(description) = description {
            self.description = description;
        }
        self.updated_at = Utc::now();
    }
}

/// Reward tier ordinal, cheapest to most exclusive
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RewardTier {
    /// Entry tier
    Tier1,
    /// Second tier
    Tier2,
    /// Third tier
    Tier3,
    /// Fourth tier
    Tier4,
    /// Top tier
    Tier5,
}

impl RewardTier {
    /// Tier ordinal in the range 1..=5
    #[must_use]
    pub const fn ordinal(&self) -> i64 {
        match self {
            Self::Tier1 => 1,
            Self::Tier2 => 2,
            Self::Tier3 => 3,
            Self::Tier4 => 4,
            Self::Tier5 => 5,
        }
    }

    /// Parse a tier from its 1-based ordinal
    ///
    /// # Errors
    ///
    /// Returns a validation error for ordinals outside 1..=5.
    pub fn from_ordinal(ordinal: i64) -> AppResult<Self> {
        match ordinal {
            1 => Ok(Self::Tier1),
            2 => Ok(Self::Tier2),
            3 => Ok(Self::Tier3),
            4 => Ok(Self::Tier4),
            5 => Ok(Self::Tier5),
            _ => Err(AppError::validation(format!(
                "reward tier ordinal must be 1..=5, got {ordinal}"
            ))),
        }
    }

    /// All tiers, cheapest first
    #[must_use]
    pub const fn all() -> [Self; 5] {
        [
            Self::Tier1,
            Self::Tier2,
            Self::Tier3,
            Self::Tier4,
            Self::Tier5,
        ]
    }
}

impl Display for RewardTier {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "tier{}", self.ordinal())
    }
}

/// A tiered, point-priced unlockable item.
///
/// Read-mostly: the engine only mutates rewards through the administrative
/// [`Reward::update_details`] operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reward {
    /// Unique reward identifier
    pub id: Uuid,
    /// Reward name
    pub name: String,
    /// Reward description
    pub description: String,
    /// Tier ordinal
    pub tier: RewardTier,
    /// Unlock cost in points, always positive
    pub points_cost: i64,
    /// Optional image reference for display
    pub image_path: Option<String>,
    /// When the reward was created
    pub created_at: DateTime<Utc>,
    /// Last administrative update
    pub updated_at: DateTime<Utc>,
}

impl Reward {
    /// Create a new reward
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        tier: RewardTier,
        points_cost: i64,
        image_path: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: description.into(),
            tier,
            points_cost,
            image_path,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply an administrative update, re-stamping `updated_at`
    pub fn update_details(
        &mut self,
        name: Option<String>,
        description: Option<String>,
        tier: Option<RewardTier>,
        points_cost: Option<i64>,
        image_path: Option<Option<String>>,
    ) {
        if let Some(name) = name {
            self.name = name;
        }
        if let Some(description) = description {
            self.description = description;
        }
        if let Some(tier) = tier {
            self.tier = tier;
        }
        if let Some(points_cost) = points_cost {
            self.points_cost = points_cost;
        }
        if let Some(image_path) = image_path {
            self.image_path = image_path;
        }
        self.updated_at = Utc::now();
    }
}

/// Per-user unlock state for one reward.
///
/// At most one row exists per (user, reward) pair; `unlocked` is a one-way
/// transition under normal operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserReward {
    /// Unique row identifier
    pub id: Uuid,
    /// Owning user
    pub user_id: Uuid,
    /// Referenced reward
    pub reward_id: Uuid,
    /// Whether the reward has been unlocked for this user
    pub unlocked: bool,
    /// When the unlock happened, if it did
    pub unlocked_at: Option<DateTime<Utc>>,
    /// When the row was created
    pub created_at: DateTime<Utc>,
    /// Last update
    pub updated_at: DateTime<Utc>,
}

impl UserReward {
    /// Create a new, still-locked join row
    #[must_use]
    pub fn new(user_id: Uuid, reward_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            reward_id,
            unlocked: false,
            unlocked_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Mark the reward unlocked. Idempotent: an already-unlocked row keeps
    /// its original `unlocked_at`.
    pub fn unlock(&mut self) {
        if !self.unlocked {
            let now = Utc::now();
            self.unlocked = true;
            self.unlocked_at = Some(now);
            self.updated_at = now;
        }
    }

    /// Whether the reward is unlocked
    #[must_use]
    pub const fn is_unlocked(&self) -> bool {
        self.unlocked
    }
}

/// A user-defined point-accumulation target.
///
/// `completed` flips to true the first time `points_accumulated` reaches
/// `points_required` and stays true until an explicit [`Goal::reset`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    /// Unique goal identifier
    pub id: Uuid,
    /// Owning user
    pub user_id: Uuid,
    /// Goal name
    pub name: String,
    /// Optional description
    pub description: Option<String>,
    /// Points needed to complete the goal, always positive
    pub points_required: i64,
    /// Points accumulated so far, never negative
    pub points_accumulated: i64,
    /// Whether the goal has completed
    pub completed: bool,
    /// Optional reward paid out on completion
    pub reward_id: Option<Uuid>,
    /// When the goal was created
    pub created_at: DateTime<Utc>,
    /// Last update
    pub updated_at: DateTime<Utc>,
}

impl Goal {
    /// Create a new goal in its initial unearned state
    #[must_use]
    pub fn new(
        user_id: Uuid,
        name: impl Into<String>,
        points_required: i64,
        description: Option<String>,
        reward_id: Option<Uuid>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            name: name.into(),
            description,
            points_required,
            points_accumulated: 0,
            completed: false,
            reward_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Accumulate earned points, flipping `completed` the first time the
    /// threshold is crossed
    pub fn add_points(&mut self, points: i64) {
        self.points_accumulated += points;
        if self.points_accumulated >= self.points_required && !self.completed {
            self.completed = true;
        }
        self.updated_at = Utc::now();
    }

    /// Return the goal to its initial unearned state. Explicit user action
    /// only; the scoring path never calls this.
    pub fn reset(&mut self) {
        self.points_accumulated = 0;
        self.completed = false;
        self.updated_at = Utc::now();
    }

    /// Apply an explicit update, re-stamping `updated_at`
    pub fn update_details(
        &mut self,
        name: Option<String>,
        points_required: Option<i64>,
        description: Option<Option<String>>,
        reward_id: Option<Option<Uuid>>,
    ) {
        if let Some(name) = name {
            self.name = name;
        }
        if let Some(points_required) = points_required {
            self.points_required = points_required;
        }
        if let Some(description) = description {
            self.description = description;
        }
        if let Some(reward_id) = reward_id {
            self.reward_id = reward_id;
        }
        self.updated_at = Utc::now();
    }

    /// Whether the goal has completed
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.completed
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::errors::ErrorCode;

    #[test]
    fn test_points_delta_enforces_non_negative_balance() {
        let mut user = User::new("Test User", "test@example.com");
        user.add_points(5).unwrap();
        assert_eq!(user.points, 5);

        let error = user.spend_points(6).unwrap_err();
        assert_eq!(error.code, ErrorCode::InsufficientPoints);
        assert_eq!(error.required_points(), Some(6));
        assert_eq!(error.available_points(), Some(5));
        assert_eq!(user.points, 5);

        user.spend_points(5).unwrap();
        assert_eq!(user.points, 0);
    }

    #[test]
    fn test_zero_award_is_rejected_by_wrapper() {
        let mut user = User::new("Test User", "test@example.com");
        assert_eq!(
            user.add_points(0).unwrap_err().code,
            ErrorCode::ValidationFailed
        );
    }

    #[test]
    fn test_goal_completion_is_one_way_until_reset() {
        let mut goal = Goal::new(Uuid::new_v4(), "Summer shape", 10, None, None);
        goal.add_points(8);
        assert!(!goal.is_completed());

        goal.add_points(3);
        assert!(goal.is_completed());
        assert_eq!(goal.points_accumulated, 11);

        // Further awards never clear the flag
        goal.add_points(1);
        assert!(goal.is_completed());

        goal.reset();
        assert!(!goal.is_completed());
        assert_eq!(goal.points_accumulated, 0);
    }

    #[test]
    fn test_user_reward_unlock_is_idempotent() {
        let mut user_reward = UserReward::new(Uuid::new_v4(), Uuid::new_v4());
        assert!(!user_reward.is_unlocked());

        user_reward.unlock();
        let first_unlock = user_reward.unlocked_at;
        assert!(user_reward.is_unlocked());
        assert!(first_unlock.is_some());

        user_reward.unlock();
        assert_eq!(user_reward.unlocked_at, first_unlock);
    }

    #[test]
    fn test_workout_type_round_trip() {
        for workout_type in [
            WorkoutType::Crossfit,
            WorkoutType::Pilates,
            WorkoutType::Gym,
            WorkoutType::Running,
            WorkoutType::Swimming,
            WorkoutType::Yoga,
            WorkoutType::Other,
        ] {
            let restored: WorkoutType = workout_type.as_str().parse().unwrap();
            assert_eq!(restored, workout_type);
        }
        assert!("spelunking".parse::<WorkoutType>().is_err());
    }

    #[test]
    fn test_reward_tier_ordinals() {
        assert_eq!(RewardTier::Tier1.ordinal(), 1);
        assert_eq!(RewardTier::from_ordinal(5).unwrap(), RewardTier::Tier5);
        assert!(RewardTier::from_ordinal(0).is_err());
        assert!(RewardTier::from_ordinal(6).is_err());
        assert_eq!(RewardTier::Tier3.to_string(), "tier3");
    }

    #[test]
    fn test_program_exercise_editing() {
        let mut program = Program::new(
            Uuid::new_v4(),
            "Push day",
            WorkoutType::Gym,
            None,
            vec![ProgramExercise {
                name: "Bench press".into(),
                sets: 3,
                reps: 8,
                weight_kg: Some(60.0),
                duration_minutes: None,
                notes: None,
            }],
        );

        program.add_exercise(ProgramExercise {
            name: "Overhead press".into(),
            sets: 3,
            reps: 10,
            weight_kg: Some(35.0),
            duration_minutes: None,
            notes: None,
        });
        assert_eq!(program.exercises.len(), 2);

        assert!(program.update_exercise(
            "Bench press",
            ProgramExercise {
                name: "Bench press".into(),
                sets: 5,
                reps: 5,
                weight_kg: Some(70.0),
                duration_minutes: None,
                notes: None,
            },
        ));
        assert_eq!(program.exercises[0].sets, 5);

        assert!(program.remove_exercise("Overhead press"));
        assert!(!program.remove_exercise("Overhead press"));
        assert_eq!(program.exercises.len(), 1);
    }

    #[test]
    fn test_session_week_membership() {
        let monday = chrono::NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        let week = TrainingWeek::containing(monday);
        let in_week = WorkoutSession::new(
            Uuid::new_v4(),
            WorkoutType::Running,
            monday.and_hms_opt(7, 30, 0).unwrap().and_utc(),
            60,
            None,
            None,
        );
        assert!(in_week.is_in_week(week));

        let next_monday = chrono::NaiveDate::from_ymd_opt(2025, 6, 9).unwrap();
        let out_of_week = WorkoutSession::new(
            Uuid::new_v4(),
            WorkoutType::Running,
            next_monday.and_hms_opt(7, 30, 0).unwrap().and_utc(),
            60,
            None,
            None,
        );
        assert!(!out_of_week.is_in_week(week));
    }
}
