// ABOUTME: System-wide constants and configuration defaults for the Remy assistant
// ABOUTME: Protocol constants, tool identifiers, limits, and environment-overridable values
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Remy Nutrition Intelligence

//! # Constants Module
//!
//! Application constants and environment-overridable configuration values.

use std::env;

/// Protocol-related constants
pub mod protocol {
    use std::env;

    /// Get MCP protocol version from environment or default
    #[must_use]
    pub fn mcp_protocol_version() -> String {
        env::var("MCP_PROTOCOL_VERSION").unwrap_or_else(|_| MCP_PROTOCOL_VERSION.into())
    }

    /// `JSON-RPC` version (standard, not configurable)
    pub const JSONRPC_VERSION: &str = "2.0";

    /// Default MCP protocol revision
    pub const MCP_PROTOCOL_VERSION: &str = "2025-06-18";

    /// Server name advertised during MCP initialize
    pub const SERVER_NAME: &str = "remy-mcp-server";

    /// Server version from Cargo.toml
    pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");
}

/// MCP tool identifiers
///
/// Single source of truth: the schema definitions, the dispatch table, and
/// the tests all reference these.
pub mod tools {
    pub const SET_NUTRITION_GOALS: &str = "set_nutrition_goals";
    pub const GET_NUTRITION_GOALS: &str = "get_nutrition_goals";
    pub const GET_PROGRESS: &str = "get_progress";
    pub const GET_DAILY_TOTALS: &str = "get_daily_totals";
    pub const LOG_MEAL: &str = "log_meal";
    pub const DELETE_MEAL: &str = "delete_meal";
    pub const GET_MEAL_HISTORY: &str = "get_meal_history";
    pub const SEARCH_MEAL_LOGS: &str = "search_meal_logs";
    pub const SEARCH_FOODS: &str = "search_foods";
    pub const GET_FOOD_DETAILS: &str = "get_food_details";
    pub const LOOKUP_BARCODE: &str = "lookup_barcode";
}

/// Default values
pub mod defaults {
    /// Streak lookback window in days
    pub const LOOKBACK_DAYS: u32 = 30;

    /// User id used when no explicit user is configured
    pub const USER_ID: &str = "default";

    /// Default page size for USDA food search
    pub const FOOD_SEARCH_PAGE_SIZE: u32 = 10;

    /// Default result count for meal log search
    pub const MEAL_SEARCH_LIMIT: u32 = 20;

    /// Default meal history window in days
    pub const MEAL_HISTORY_DAYS: u32 = 7;
}

/// Hard limits
pub mod limits {
    /// Maximum USDA search page size (API contract)
    pub const MAX_FOOD_SEARCH_PAGE_SIZE: u32 = 200;

    /// Maximum streak lookback window in days
    pub const MAX_LOOKBACK_DAYS: u32 = 365;

    /// Inclusive tolerance percentage bounds
    pub const TOLERANCE_MIN: i64 = 0;
    pub const TOLERANCE_MAX: i64 = 100;
}

/// Environment-based configuration getters
pub mod env_config {
    use super::env;

    /// Get database URL from environment or default
    #[must_use]
    pub fn database_url() -> Option<String> {
        env::var("DATABASE_URL").ok()
    }

    /// Get USDA FoodData Central API key from environment
    #[must_use]
    pub fn usda_api_key() -> Option<String> {
        env::var("USDA_API_KEY").ok().filter(|k| !k.is_empty())
    }

    /// Get the active user id from environment or default
    #[must_use]
    pub fn user_id() -> String {
        env::var("REMY_USER").unwrap_or_else(|_| super::defaults::USER_ID.into())
    }
}
