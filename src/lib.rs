// ABOUTME: Main library entry point for the Motiv points and rewards engine
// ABOUTME: Exposes models, storage, and the scoring service layer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Motiv Fitness

//! # Motiv Engine
//!
//! The points-accrual and reward/goal-unlock core of a personal fitness
//! tracker. Workout sessions feed a weekly points calculator, points feed a
//! ledger, and the ledger feeds goal progress and reward unlocks.
//!
//! ## Guarantees
//!
//! - **Monotonic balances**: `user.points` never goes negative; every
//!   mutation funnels through one guarded delta operation.
//! - **At-most-once unlocks**: a reward unlocks at most once per user, and
//!   re-unlocking is a safe no-op.
//! - **Idempotent weekly awards**: a persisted per-(user, week) ledger
//!   marker makes re-awarding an unchanged week a no-op.
//!
//! ## Architecture
//!
//! - **Models**: concrete entities owning their mutation methods
//! - **Database**: SQLite storage behind one typed API
//! - **Services**: storage-agnostic business logic, sequenced by the
//!   tracking orchestrator
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use motiv_engine::database::Database;
//! use motiv_engine::errors::AppResult;
//! use motiv_engine::services::TrackingService;
//!
//! #[tokio::main]
//! async fn main() -> AppResult<()> {
//!     let db = Arc::new(Database::new("sqlite:./data/motiv.db").await?);
//!     let _tracker = TrackingService::new(db);
//!     Ok(())
//! }
//! ```

/// Engine configuration from environment variables
pub mod config;

/// Scoring rules and service constants
pub mod constants;

/// SQLite storage layer behind one typed API
pub mod database;

/// Unified error handling with standard error codes
pub mod errors;

/// Logging configuration and structured output
pub mod logging;

/// Domain entities owning their mutation methods
pub mod models;

/// Storage-agnostic business logic and the tracking orchestrator
pub mod services;

/// Monday-anchored training-week boundary math
pub mod week;
