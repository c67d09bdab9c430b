// ABOUTME: Training-week boundary math anchored on Monday week starts
// ABOUTME: Provides containing-week resolution and UTC query bounds for session lookups
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Motiv Fitness

//! # Training Weeks
//!
//! A training week runs Monday 00:00:00 through Sunday 23:59:59 inclusive
//! (ISO week, not calendar-Sunday-start). All weekly scoring operates on
//! [`TrainingWeek`] values so the boundary rule lives in exactly one place.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::scoring::DAYS_PER_WEEK;

/// One Monday-anchored training week
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrainingWeek {
    start: NaiveDate,
}

impl TrainingWeek {
    /// The week containing the given date, snapped to its Monday
    #[must_use]
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            start: date.week(Weekday::Mon).first_day(),
        }
    }

    /// A week spanning exactly `start` through `start + 6 days`.
    ///
    /// The caller supplies the boundary; no Monday snapping is applied, so a
    /// mid-week start produces a mid-week-to-mid-week span. Use
    /// [`TrainingWeek::containing`] when the Monday convention is wanted.
    #[must_use]
    pub const fn starting(start: NaiveDate) -> Self {
        Self { start }
    }

    /// First day of the week
    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the week (start + 6 days, inclusive)
    #[must_use]
    pub fn end(&self) -> NaiveDate {
        self.start + Duration::days(DAYS_PER_WEEK - 1)
    }

    /// Whether the given date falls inside this week
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end()
    }

    /// UTC instant range covering the whole week: `[start 00:00:00, next
    /// Monday 00:00:00)`. The half-open upper bound keeps Sunday 23:59:59
    /// (and any sub-second tail) inside the week.
    #[must_use]
    pub fn range_utc(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        let start = self.start.and_time(NaiveTime::MIN).and_utc();
        let end_exclusive = (self.start + Duration::days(DAYS_PER_WEEK))
            .and_time(NaiveTime::MIN)
            .and_utc();
        (start, end_exclusive)
    }

    /// Stable key used for the weekly award ledger (ISO date of the start day)
    #[must_use]
    pub fn storage_key(&self) -> String {
        self.start.format("%Y-%m-%d").to_string()
    }
}

impl fmt::Display for TrainingWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "week of {}", self.start)
    }
}
