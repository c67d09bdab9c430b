// ABOUTME: Unified error handling for the Motiv points and rewards engine
// ABOUTME: Defines standard error codes and the AppError type shared by all modules
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Motiv Fitness

//! # Unified Error Handling
//!
//! Centralized error types for the engine. Every fallible operation in the
//! services and database layers resolves to an [`AppError`] carrying a
//! machine-readable [`ErrorCode`], a human-readable message, and optional
//! context. The engine performs no silent recovery: errors surface to the
//! caller unchanged.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Standard error codes used throughout the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    /// A referenced entity (user, reward, goal, program, session) does not exist
    #[serde(rename = "RESOURCE_NOT_FOUND")]
    ResourceNotFound,
    /// An unlock was attempted with a balance below the reward's cost
    #[serde(rename = "INSUFFICIENT_POINTS")]
    InsufficientPoints,
    /// A malformed DTO: non-positive duration, empty name, bad reference
    #[serde(rename = "VALIDATION_FAILED")]
    ValidationFailed,
    /// A storage operation failed
    #[serde(rename = "DATABASE_ERROR")]
    DatabaseError,
    /// Configuration could not be loaded or is invalid
    #[serde(rename = "CONFIG_ERROR")]
    ConfigError,
    /// An unexpected internal failure
    #[serde(rename = "INTERNAL_ERROR")]
    InternalError,
}

impl ErrorCode {
    /// Get a user-friendly description of this error
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::ResourceNotFound => "The requested resource was not found",
            Self::InsufficientPoints => "The point balance is below the required cost",
            Self::ValidationFailed => "The provided input is invalid",
            Self::DatabaseError => "Database operation failed",
            Self::ConfigError => "Configuration error encountered",
            Self::InternalError => "An internal error occurred",
        }
    }
}

/// Additional context that can be attached to errors
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorContext {
    /// User ID if available
    pub user_id: Option<Uuid>,
    /// Resource ID if applicable
    pub resource_id: Option<String>,
    /// Additional key-value context
    pub details: serde_json::Value,
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self {
            user_id: None,
            resource_id: None,
            details: serde_json::Value::Object(serde_json::Map::new()),
        }
    }
}

/// Unified error type for the engine
#[derive(Debug, Error)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Additional context
    pub context: ErrorContext,
    /// Source error for error chaining
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new `AppError` with the given code and message
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: ErrorContext::default(),
            source: None,
        }
    }

    /// Add a user ID to the error context
    #[must_use]
    pub fn with_user_id(mut self, user_id: Uuid) -> Self {
        self.context.user_id = Some(user_id);
        self
    }

    /// Add a resource ID to the error context
    #[must_use]
    pub fn with_resource_id(mut self, resource_id: impl Into<String>) -> Self {
        self.context.resource_id = Some(resource_id.into());
        self
    }

    /// Add details to the error context
    #[must_use]
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.context.details = details;
        self
    }

    /// Add a source error for error chaining
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.description(), self.message)
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// Convenience constructors for the engine's error taxonomy
impl AppError {
    /// Referenced entity does not exist
    #[must_use]
    pub fn not_found(resource: impl Into<String>) -> Self {
        let resource = resource.into();
        Self::new(ErrorCode::ResourceNotFound, format!("{resource} not found"))
            .with_resource_id(resource)
    }

    /// Unlock attempted with a balance below the reward's cost.
    /// Carries both amounts in the error details.
    #[must_use]
    pub fn insufficient_points(required: i64, available: i64) -> Self {
        Self::new(
            ErrorCode::InsufficientPoints,
            format!("insufficient points: required {required}, available {available}"),
        )
        .with_details(serde_json::json!({
            "required": required,
            "available": available,
        }))
    }

    /// Malformed input
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationFailed, message)
    }

    /// Storage failure
    #[must_use]
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    /// Configuration failure
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    /// Unexpected internal failure
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// The required amount attached to an insufficient-points error, if any
    #[must_use]
    pub fn required_points(&self) -> Option<i64> {
        self.context
            .details
            .get("required")
            .and_then(serde_json::Value::as_i64)
    }

    /// The available amount attached to an insufficient-points error, if any
    #[must_use]
    pub fn available_points(&self) -> Option<i64> {
        self.context
            .details
            .get("available")
            .and_then(serde_json::Value::as_i64)
    }
}

/// Conversion from `anyhow::Error` to `AppError`.
///
/// A typed `AppError` raised inside a database operation passes through
/// unchanged; anything else becomes a `DatabaseError` wrapping the cause.
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        match error.downcast::<Self>() {
            Ok(app_error) => app_error,
            Err(other) => Self::new(ErrorCode::DatabaseError, other.to_string()),
        }
    }
}
