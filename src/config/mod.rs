// ABOUTME: Configuration management module for centralized engine settings
// ABOUTME: Handles environment-driven configuration and runtime options
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Motiv Fitness

//! Configuration module for the Motiv engine
//!
//! Environment-only configuration: every setting comes from environment
//! variables with sensible defaults, so a deployment needs no config files.

/// Environment and engine configuration
pub mod environment;

pub use environment::{DatabaseUrl, EngineConfig, Environment, LogLevel};
