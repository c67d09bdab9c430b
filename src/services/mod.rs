// ABOUTME: Domain service layer for the points and rewards engine
// ABOUTME: Provides storage-agnostic business logic reusable by any calling surface
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Motiv Fitness

//! Domain service layer
//!
//! Business logic for the engine, kept free of any transport or UI concerns.
//! Each service owns one area of the domain; [`tracking::TrackingService`]
//! sequences them for the session-added use case.

/// Goal CRUD, progress accumulation, and completion payout
pub mod goals;

/// Weekly points calculation and ledgered awarding
pub mod points;

/// Program template CRUD and exercise editing
pub mod programs;

/// Reward catalog, spend-path unlocking, and the affordability sweep
pub mod rewards;

/// Workout session CRUD with program reference validation
pub mod sessions;

/// Orchestration of session recording through awarding, goals, and unlocks
pub mod tracking;

pub use goals::{CreateGoalDto, GoalService, UpdateGoalDto};
pub use points::{PointsService, WeeklyAward};
pub use programs::{CreateProgramDto, ProgramService, UpdateProgramDto};
pub use rewards::{CreateRewardDto, RewardService, SweepFailure, SweepOutcome, UpdateRewardDto};
pub use sessions::{CreateWorkoutSessionDto, UpdateWorkoutSessionDto, WorkoutSessionService};
pub use tracking::{SessionOutcome, TrackingService};
