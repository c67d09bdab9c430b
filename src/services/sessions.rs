// ABOUTME: Workout session management service with DTO validation
// ABOUTME: Handles session CRUD and program reference checks
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Motiv Fitness

//! Workout session service.
//!
//! Sessions are the raw material of the scoring pipeline. This service
//! validates inputs (positive duration, existing user and program
//! references) and persists; it never awards points itself. The engine
//! never auto-deletes sessions; deletion is always an explicit call.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::models::{WorkoutSession, WorkoutType};

/// Input for logging a workout session
#[derive(Debug, Clone)]
pub struct CreateWorkoutSessionDto {
    /// Owning user
    pub user_id: Uuid,
    /// Workout category
    pub workout_type: WorkoutType,
    /// When the session took place
    pub date: DateTime<Utc>,
    /// Duration in minutes, positive
    pub duration_minutes: i64,
    /// Optional program the session followed
    pub program_id: Option<Uuid>,
    /// Optional free-text note
    pub notes: Option<String>,
}

/// Input for the explicit session update. `None` leaves a field untouched;
/// the inner options on `program_id` and `notes` clear the field when `None`.
#[derive(Debug, Clone, Default)]
pub struct UpdateWorkoutSessionDto {
    /// New workout category
    pub workout_type: Option<WorkoutType>,
    /// New date
    pub date: Option<DateTime<Utc>>,
    /// New duration in minutes
    pub duration_minutes: Option<i64>,
    /// New program link
    pub program_id: Option<Option<Uuid>>,
    /// New note
    pub notes: Option<Option<String>>,
}

/// Workout session CRUD
#[derive(Clone)]
pub struct WorkoutSessionService {
    db: Arc<Database>,
}

impl WorkoutSessionService {
    /// Create a new session service
    #[must_use]
    pub const fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Persist a new workout session
    ///
    /// # Errors
    ///
    /// Fails with a validation error for a non-positive duration, and a
    /// not-found error when the user or referenced program does not exist.
    pub async fn create_session(&self, dto: CreateWorkoutSessionDto) -> AppResult<WorkoutSession> {
        if dto.duration_minutes <= 0 {
            return Err(AppError::validation(format!(
                "session duration must be positive, got {}",
                dto.duration_minutes
            )));
        }

        self.db.get_user_required(dto.user_id).await?;
        if let Some(program_id) = dto.program_id {
            if !self.db.program_exists(program_id).await? {
                return Err(AppError::not_found(format!("Program {program_id}")));
            }
        }

        let session = WorkoutSession::new(
            dto.user_id,
            dto.workout_type,
            dto.date,
            dto.duration_minutes,
            dto.program_id,
            dto.notes,
        );
        self.db.create_session(&session).await?;

        Ok(session)
    }

    /// Apply an explicit update to a session
    ///
    /// # Errors
    ///
    /// Fails with a not-found error when the session or newly referenced
    /// program does not exist, or a validation error for a non-positive
    /// duration.
    pub async fn update_session(
        &self,
        session_id: Uuid,
        dto: UpdateWorkoutSessionDto,
    ) -> AppResult<WorkoutSession> {
        let mut session = self.db.get_session_required(session_id).await?;

        if let Some(duration_minutes) = dto.duration_minutes {
            if duration_minutes <= 0 {
                return Err(AppError::validation(format!(
                    "session duration must be positive, got {duration_minutes}"
                )));
            }
        }
        if let Some(Some(program_id)) = dto.program_id {
            if !self.db.program_exists(program_id).await? {
                return Err(AppError::not_found(format!("Program {program_id}")));
            }
        }

        session.update_details(
            dto.workout_type,
            dto.date,
            dto.duration_minutes,
            dto.program_id,
            dto.notes,
        );
        self.db.update_session(&session).await?;

        Ok(session)
    }

    /// Get a session by ID
    ///
    /// # Errors
    ///
    /// Fails with a not-found error when the session does not exist.
    pub async fn get_session(&self, session_id: Uuid) -> AppResult<WorkoutSession> {
        Ok(self.db.get_session_required(session_id).await?)
    }

    /// All sessions for a user, oldest first
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup fails.
    pub async fn sessions_for_user(&self, user_id: Uuid) -> AppResult<Vec<WorkoutSession>> {
        Ok(self.db.sessions_for_user(user_id).await?)
    }

    /// Sessions for a user inside `[start, end_exclusive)`
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup fails.
    pub async fn sessions_for_user_in_range(
        &self,
        user_id: Uuid,
        start: DateTime<Utc>,
        end_exclusive: DateTime<Utc>,
    ) -> AppResult<Vec<WorkoutSession>> {
        Ok(self
            .db
            .sessions_for_user_in_range(user_id, start, end_exclusive)
            .await?)
    }

    /// Delete a session
    ///
    /// # Errors
    ///
    /// Fails with a not-found error when the session does not exist.
    pub async fn delete_session(&self, session_id: Uuid) -> AppResult<()> {
        Ok(self.db.delete_session(session_id).await?)
    }

    /// Attach a program to an existing session
    ///
    /// # Errors
    ///
    /// Fails with a not-found error when the session or program does not
    /// exist.
    pub async fn apply_program(
        &self,
        session_id: Uuid,
        program_id: Uuid,
    ) -> AppResult<WorkoutSession> {
        let mut session = self.db.get_session_required(session_id).await?;
        self.db.get_program_required(program_id).await?;

        session.update_details(None, None, None, Some(Some(program_id)), None);
        self.db.update_session(&session).await?;

        Ok(session)
    }
}
