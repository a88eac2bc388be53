// ABOUTME: Configuration management module for the Remy assistant
// ABOUTME: Environment-only configuration for storage, USDA access, and defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Remy Nutrition Intelligence

//! Configuration module.
//!
//! Configuration is environment-only: no config files, no flags beyond the
//! CLI's explicit overrides. [`environment::ServerConfig::from_env`] is the
//! single entry point.

/// Environment-based server configuration
pub mod environment;

pub use environment::ServerConfig;
