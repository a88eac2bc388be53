// ABOUTME: `meal` commands - log, edit, delete, history, search
// ABOUTME: Meal CRUD against the store; edit/delete exit non-zero on unknown ids
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Remy Nutrition Intelligence

use chrono::{Local, Utc};
use clap::Subcommand;
use serde_json::json;
use uuid::Uuid;

use remy_mcp_server::constants::defaults;
use remy_mcp_server::database::NutritionStore;
use remy_mcp_server::errors::{AppError, AppResult};
use remy_mcp_server::models::{Meal, MealUpdate};

use super::{print_json, resolve_date, NutrientArgs};

#[non_exhaustive]
#[derive(Subcommand)]
pub enum MealCommand {
    /// Log a meal
    Log {
        /// Meal description (e.g. "Grilled chicken salad")
        #[arg(long)]
        name: String,

        /// Day offset (e.g. -1) or ISO date (defaults to today)
        #[arg(long)]
        date: Option<String>,

        #[command(flatten)]
        nutrients: NutrientArgs,
    },

    /// Edit a logged meal
    Edit {
        /// Meal id to edit
        id: String,

        /// New meal description
        #[arg(long)]
        name: Option<String>,

        #[command(flatten)]
        nutrients: NutrientArgs,
    },

    /// Delete a logged meal
    Delete {
        /// Meal id to delete
        id: String,
    },

    /// Recently logged meals
    History {
        /// Window in days
        #[arg(long, default_value_t = defaults::MEAL_HISTORY_DAYS)]
        days: u32,
    },

    /// Search logged meals by name
    Search {
        /// Substring to look for
        query: String,

        /// Maximum results
        #[arg(long, default_value_t = defaults::MEAL_SEARCH_LIMIT)]
        limit: u32,
    },
}

fn parse_meal_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::invalid_input(format!("invalid meal id: {raw}")))
}

/// Dispatch a `meal` subcommand
pub async fn run(store: &dyn NutritionStore, user_id: &str, action: MealCommand) -> AppResult<()> {
    match action {
        MealCommand::Log {
            name,
            date,
            nutrients,
        } => {
            let meal = Meal {
                id: Uuid::new_v4(),
                user_id: user_id.to_owned(),
                name,
                logged_at: Utc::now(),
                date: resolve_date(date.as_deref())?,
                nutrients: nutrients.to_nutrients(),
            };
            store.log_meal(&meal).await?;
            print_json(&json!({"success": true, "meal": meal}))
        }
        MealCommand::Edit {
            id,
            name,
            nutrients,
        } => {
            let update = MealUpdate {
                name,
                nutrients: nutrients.to_nutrients(),
            };
            let meal = store
                .edit_meal(user_id, parse_meal_id(&id)?, &update)
                .await?;
            print_json(&json!({"success": true, "meal": meal}))
        }
        MealCommand::Delete { id } => {
            store.delete_meal(user_id, parse_meal_id(&id)?).await?;
            print_json(&json!({"success": true}))
        }
        MealCommand::History { days } => {
            let as_of = Local::now().date_naive();
            let meals = store.get_meal_history(user_id, days, as_of).await?;
            print_json(&json!({"days": days, "count": meals.len(), "meals": meals}))
        }
        MealCommand::Search { query, limit } => {
            let meals = store.search_meal_logs(user_id, &query, limit).await?;
            print_json(&json!({"query": query, "count": meals.len(), "meals": meals}))
        }
    }
}
