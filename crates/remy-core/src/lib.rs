// ABOUTME: Foundation crate for the Remy nutrition assistant
// ABOUTME: Domain models, nutrient definitions, and the unified error taxonomy
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Remy Nutrition Intelligence

//! # remy-core
//!
//! Core types shared by the Remy server, CLI, and integration tests:
//!
//! - **Models**: nutrients and their goal directionality, meals, daily
//!   totals, goals, and custom foods
//! - **Errors**: the unified [`errors::AppError`] taxonomy used across
//!   every module boundary

/// Unified error handling with standard error codes
pub mod errors;

/// Domain models for nutrition tracking
pub mod models;
