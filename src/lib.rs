// ABOUTME: Main library entry point for the Remy nutrition assistant
// ABOUTME: Provides meal logging, USDA food search, goal tracking, and an MCP tool server
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Remy Nutrition Intelligence

#![deny(unsafe_code)]

//! # Remy MCP Server
//!
//! A nutrition-tracking assistant exposed as a Model Context Protocol (MCP)
//! server and a companion CLI. Users and AI agents can log meals, search the
//! USDA FoodData Central database, set macro/micronutrient goals with a
//! tolerance band, and review progress and streak history.
//!
//! ## Architecture
//!
//! - **intelligence**: the core engines: daily totals aggregation, the
//!   tolerance-band classifier, the streak engine, and the progress report
//!   builder. Pure computation over already-fetched data.
//! - **database**: the narrow [`database::NutritionStore`] seam with SQLite
//!   and in-memory implementations.
//! - **external**: USDA FoodData Central client (search, details, barcode).
//! - **mcp**: JSON-RPC 2.0 stdio transport and tool handlers.
//! - **config**: environment-only server configuration.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use remy_mcp_server::config::environment::ServerConfig;
//! use remy_mcp_server::errors::AppResult;
//!
//! fn main() -> AppResult<()> {
//!     let config = ServerConfig::from_env()?;
//!     println!("Remy configured with database: {}", config.database_url);
//!     Ok(())
//! }
//! ```

// ── Public API ──────────────────────────────────────────────────────────
// These modules are used by the binary crates (src/bin/) and integration
// tests (tests/). They must remain `pub`.

/// Configuration management
pub mod config;

/// Application constants and defaults
pub mod constants;

/// Storage abstraction with SQLite and in-memory backends
pub mod database;

/// External API clients (USDA FoodData Central)
pub mod external;

/// Core engines: aggregation, tolerance bands, streaks, progress reports
pub mod intelligence;

/// JSON-RPC 2.0 foundation shared by the MCP transport
pub mod jsonrpc;

/// Logging configuration and setup
pub mod logging;

/// MCP protocol server and tool handlers
pub mod mcp;

// Re-export the foundation crate's modules at the crate root so call sites
// read `crate::errors::AppError` / `crate::models::Nutrient`.
pub use remy_core::{errors, models};
