// ABOUTME: Remy CLI - command-line surface for meal logging, goals, and progress
// ABOUTME: Subcommands: goals, progress, today, meal (log/edit/delete/history/search), food
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Remy Nutrition Intelligence
//!
//! Usage:
//! ```bash
//! # Set goals (targets plus optional tolerance percentages)
//! remy-cli goals --calories 2000 --calories-tolerance 10 --protein 120
//!
//! # Review today's progress with streaks
//! remy-cli progress --human
//!
//! # Log a meal and inspect the day
//! remy-cli meal log --name "Grilled chicken salad" --calories 420 --protein 38
//! remy-cli today
//! remy-cli today --date -1
//!
//! # Search the USDA food database (requires USDA_API_KEY)
//! remy-cli food search "greek yogurt"
//! remy-cli food barcode 0894700010137
//! ```

mod commands;

use clap::{Parser, Subcommand};

use remy_mcp_server::config::environment::ServerConfig;
use remy_mcp_server::database::SqliteStore;
use remy_mcp_server::errors::AppResult;
use remy_mcp_server::logging::LoggingConfig;

type Result<T> = AppResult<T>;

#[derive(Parser)]
#[command(
    name = "remy-cli",
    about = "Remy nutrition assistant CLI",
    long_about = "Log meals, search the USDA food database, set nutrient goals with \
                  tolerance bands, and review progress and streaks."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Database URL override
    #[arg(long, global = true)]
    database_url: Option<String>,

    /// User id override
    #[arg(long, global = true)]
    user: Option<String>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[non_exhaustive]
#[derive(Subcommand)]
enum Command {
    /// Show or update nutrition goals
    Goals(commands::goals::GoalsArgs),

    /// Today's goal progress with streaks
    Progress {
        /// Render a human-readable summary instead of JSON
        #[arg(long)]
        human: bool,

        /// Streak lookback window in days
        #[arg(long)]
        lookback_days: Option<u32>,
    },

    /// Totals and meals for one day
    Today {
        /// Day offset (e.g. -1) or ISO date (defaults to today)
        #[arg(long)]
        date: Option<String>,
    },

    /// Meal log commands
    Meal {
        #[command(subcommand)]
        action: commands::meal::MealCommand,
    },

    /// USDA food database commands
    Food {
        #[command(subcommand)]
        action: commands::food::FoodCommand,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut logging = LoggingConfig::from_env();
    if cli.verbose {
        logging.level = "debug".into();
    }
    logging
        .init()
        .map_err(|e| remy_mcp_server::errors::AppError::config(e.to_string()))?;

    let mut config = ServerConfig::from_env()?;
    if let Some(url) = cli.database_url {
        config.database_url = url;
    }
    if let Some(user) = cli.user {
        config.user_id = user;
    }

    let store = SqliteStore::new(&config.database_url).await?;
    store.migrate().await?;

    match cli.command {
        Command::Goals(args) => commands::goals::run(&store, &config.user_id, &args).await?,
        Command::Progress {
            human,
            lookback_days,
        } => {
            commands::progress::run(
                &store,
                &config.user_id,
                human,
                lookback_days.unwrap_or(config.lookback_days),
            )
            .await?;
        }
        Command::Today { date } => {
            commands::today::run(&store, &config.user_id, date.as_deref()).await?;
        }
        Command::Meal { action } => {
            commands::meal::run(&store, &config.user_id, action).await?;
        }
        Command::Food { action } => {
            commands::food::run(config.usda_api_key.as_deref(), action).await?;
        }
    }

    Ok(())
}
