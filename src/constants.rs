// ABOUTME: System-wide constants for the Motiv points and rewards engine
// ABOUTME: Contains scoring rules, catalog defaults, and service identification
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Motiv Fitness

//! # Constants Module
//!
//! Fixed rules and defaults for the engine. The scoring rule is part of the
//! product contract (one point per three sessions in a training week) and is
//! deliberately not configurable at runtime.

/// Scoring rule constants
pub mod scoring {
    /// Completed sessions required in one training week to earn one point
    pub const SESSIONS_PER_POINT: i64 = 3;

    /// Days spanned by a training week (Monday through Sunday inclusive)
    pub const DAYS_PER_WEEK: i64 = 7;
}

/// Service identification
pub mod service {
    /// Service name used in logs and startup banners
    pub const SERVICE_NAME: &str = "motiv-engine";

    /// Service version from Cargo.toml
    pub const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");
}

/// Default reward catalog tiers.
///
/// Point costs for the five seeded reward tiers, cheapest first. Matches the
/// tier ordinals of [`crate::models::RewardTier`].
pub mod catalog {
    /// Point costs for tiers 1 through 5
    pub const TIER_COSTS: [i64; 5] = [1, 2, 5, 10, 15];
}
