// ABOUTME: Environment configuration management for runtime settings
// ABOUTME: Resolves database location, USDA credentials, and lookback defaults from env vars
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Remy Nutrition Intelligence

//! Environment-based configuration management.

use std::env;
use std::path::PathBuf;

use remy_core::errors::{AppError, AppResult};
use tracing::debug;

use crate::constants::{defaults, env_config, limits};

/// Runtime configuration resolved from the environment
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// SQLite database URL (`sqlite:/path/to/remy.db`)
    pub database_url: String,
    /// USDA FoodData Central API key; food search is unavailable without it
    pub usda_api_key: Option<String>,
    /// User id all operations are scoped to
    pub user_id: String,
    /// Streak lookback window in days
    pub lookback_days: u32,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// `DATABASE_URL` defaults to `remy.db` under the platform data
    /// directory, which is created on demand.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when the data directory cannot be resolved or
    /// created, or `REMY_LOOKBACK_DAYS` is out of range.
    pub fn from_env() -> AppResult<Self> {
        let database_url = match env_config::database_url() {
            Some(url) => url,
            None => format!("sqlite:{}", Self::default_database_path()?.display()),
        };

        let lookback_days = match env::var("REMY_LOOKBACK_DAYS") {
            Ok(raw) => {
                let days: u32 = raw.parse().map_err(|_| {
                    AppError::config(format!("REMY_LOOKBACK_DAYS is not a number: {raw}"))
                })?;
                if days == 0 || days > limits::MAX_LOOKBACK_DAYS {
                    return Err(AppError::config(format!(
                        "REMY_LOOKBACK_DAYS must be 1-{}",
                        limits::MAX_LOOKBACK_DAYS
                    )));
                }
                days
            }
            Err(_) => defaults::LOOKBACK_DAYS,
        };

        let config = Self {
            database_url,
            usda_api_key: env_config::usda_api_key(),
            user_id: env_config::user_id(),
            lookback_days,
        };
        debug!(database_url = %config.database_url, user_id = %config.user_id, "configuration loaded");
        Ok(config)
    }

    /// Default on-disk location for the SQLite database
    fn default_database_path() -> AppResult<PathBuf> {
        let base = dirs::data_dir()
            .ok_or_else(|| AppError::config("cannot determine platform data directory"))?;
        let dir = base.join("remy");
        std::fs::create_dir_all(&dir)
            .map_err(|e| AppError::config(format!("cannot create data directory: {e}")))?;
        Ok(dir.join("remy.db"))
    }
}
