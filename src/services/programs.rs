// ABOUTME: Program template management service
// ABOUTME: Handles program CRUD and per-exercise editing with validation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Motiv Fitness

//! Program service.
//!
//! Programs are read-only to the scoring pipeline; the engine consults them
//! only to validate that a session's program reference exists. This service
//! owns their lifecycle for the surrounding application.

use std::sync::Arc;

use uuid::Uuid;

use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::models::{Program, ProgramExercise, WorkoutType};

/// Input for creating a program
#[derive(Debug, Clone)]
pub struct CreateProgramDto {
    /// Owning user
    pub user_id: Uuid,
    /// Program name, non-empty
    pub name: String,
    /// Workout category the program targets
    pub workout_type: WorkoutType,
    /// Optional description
    pub description: Option<String>,
    /// Initial exercise list
    pub exercises: Vec<ProgramExercise>,
}

/// Input for updating a program. `None` leaves a field untouched; the inner
/// option on `description` clears it when `None`.
#[derive(Debug, Clone, Default)]
pub struct UpdateProgramDto {
    /// New name
    pub name: Option<String>,
    /// New workout category
    pub workout_type: Option<WorkoutType>,
    /// New description
    pub description: Option<Option<String>>,
    /// Replacement exercise list
    pub exercises: Option<Vec<ProgramExercise>>,
}

/// Program CRUD and exercise editing
#[derive(Clone)]
pub struct ProgramService {
    db: Arc<Database>,
}

impl ProgramService {
    /// Create a new program service
    #[must_use]
    pub const fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Create a program
    ///
    /// # Errors
    ///
    /// Fails with a validation error for an empty name or malformed
    /// exercises, and a not-found error when the user does not exist.
    pub async fn create_program(&self, dto: CreateProgramDto) -> AppResult<Program> {
        if dto.name.trim().is_empty() {
            return Err(AppError::validation("program name must not be empty"));
        }
        validate_exercises(&dto.exercises)?;

        self.db.get_user_required(dto.user_id).await?;

        let program = Program::new(
            dto.user_id,
            dto.name,
            dto.workout_type,
            dto.description,
            dto.exercises,
        );
        self.db.create_program(&program).await?;

        Ok(program)
    }

    /// Update a program's details and, optionally, replace its exercises
    ///
    /// # Errors
    ///
    /// Fails with a not-found error when the program does not exist, or a
    /// validation error for bad field values.
    pub async fn update_program(&self, program_id: Uuid, dto: UpdateProgramDto) -> AppResult<Program> {
        let mut program = self.db.get_program_required(program_id).await?;

        if let Some(name) = &dto.name {
            if name.trim().is_empty() {
                return Err(AppError::validation("program name must not be empty"));
            }
        }
        if let Some(exercises) = &dto.exercises {
            validate_exercises(exercises)?;
        }

        program.update_details(dto.name, dto.workout_type, dto.description);
        if let Some(exercises) = dto.exercises {
            program.exercises = exercises;
        }
        self.db.update_program(&program).await?;

        Ok(program)
    }

    /// Get a program by ID
    ///
    /// # Errors
    ///
    /// Fails with a not-found error when the program does not exist.
    pub async fn get_program(&self, program_id: Uuid) -> AppResult<Program> {
        Ok(self.db.get_program_required(program_id).await?)
    }

    /// All programs for a user, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup fails.
    pub async fn programs_for_user(&self, user_id: Uuid) -> AppResult<Vec<Program>> {
        Ok(self.db.programs_for_user(user_id).await?)
    }

    /// Delete a program
    ///
    /// # Errors
    ///
    /// Fails with a not-found error when the program does not exist.
    pub async fn delete_program(&self, program_id: Uuid) -> AppResult<()> {
        Ok(self.db.delete_program(program_id).await?)
    }

    /// Append an exercise to a program
    ///
    /// # Errors
    ///
    /// Fails with a not-found error when the program does not exist, or a
    /// validation error for a malformed exercise.
    pub async fn add_exercise(
        &self,
        program_id: Uuid,
        exercise: ProgramExercise,
    ) -> AppResult<Program> {
        validate_exercises(std::slice::from_ref(&exercise))?;

        let mut program = self.db.get_program_required(program_id).await?;
        program.add_exercise(exercise);
        self.db.update_program(&program).await?;

        Ok(program)
    }

    /// Remove an exercise from a program by name
    ///
    /// # Errors
    ///
    /// Fails with a not-found error when the program or the named exercise
    /// does not exist.
    pub async fn remove_exercise(
        &self,
        program_id: Uuid,
        exercise_name: &str,
    ) -> AppResult<Program> {
        let mut program = self.db.get_program_required(program_id).await?;

        if !program.remove_exercise(exercise_name) {
            return Err(AppError::not_found(format!(
                "Exercise {exercise_name} in program {program_id}"
            )));
        }
        self.db.update_program(&program).await?;

        Ok(program)
    }

    /// Replace an exercise in a program by name
    ///
    /// # Errors
    ///
    /// Fails with a not-found error when the program or the named exercise
    /// does not exist, or a validation error for a malformed replacement.
    pub async fn update_exercise(
        &self,
        program_id: Uuid,
        exercise_name: &str,
        updated: ProgramExercise,
    ) -> AppResult<Program> {
        validate_exercises(std::slice::from_ref(&updated))?;

        let mut program = self.db.get_program_required(program_id).await?;

        if !program.update_exercise(exercise_name, updated) {
            return Err(AppError::not_found(format!(
                "Exercise {exercise_name} in program {program_id}"
            )));
        }
        self.db.update_program(&program).await?;

        Ok(program)
    }
}

/// Reject exercises with empty names or non-positive sets/reps
fn validate_exercises(exercises: &[ProgramExercise]) -> AppResult<()> {
    for exercise in exercises {
        if exercise.name.trim().is_empty() {
            return Err(AppError::validation("exercise name must not be empty"));
        }
        if exercise.sets <= 0 {
            return Err(AppError::validation(format!(
                "exercise '{}' must have positive sets, got {}",
                exercise.name, exercise.sets
            )));
        }
        if exercise.reps <= 0 {
            return Err(AppError::validation(format!(
                "exercise '{}' must have positive reps, got {}",
                exercise.name, exercise.reps
            )));
        }
    }
    Ok(())
}
