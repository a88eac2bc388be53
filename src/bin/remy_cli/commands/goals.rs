// ABOUTME: `goals` command - show or update nutrition goals
// ABOUTME: Target and tolerance flags per nutrient, validated before storage
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Remy Nutrition Intelligence

use std::collections::BTreeMap;

use chrono::Utc;
use serde_json::json;

use remy_mcp_server::database::NutritionStore;
use remy_mcp_server::errors::AppResult;
use remy_mcp_server::intelligence::apply_goal_updates;
use remy_mcp_server::models::{GoalUpdate, Nutrient};

use super::print_json;

/// Flags for `goals`
///
/// Tolerances are validated downstream so out-of-range values produce the
/// store's "must be 0-100" error rather than an argument-parse failure.
#[derive(Debug, clap::Args)]
pub struct GoalsArgs {
    /// Calorie target (kcal/day)
    #[arg(long)]
    calories: Option<f64>,
    /// Calorie tolerance percentage (0-100)
    #[arg(long)]
    calories_tolerance: Option<i64>,

    /// Protein target (g/day)
    #[arg(long)]
    protein: Option<f64>,
    /// Protein tolerance percentage (0-100)
    #[arg(long)]
    protein_tolerance: Option<i64>,

    /// Carbohydrate target (g/day)
    #[arg(long)]
    carbs: Option<f64>,
    /// Carbohydrate tolerance percentage (0-100)
    #[arg(long)]
    carbs_tolerance: Option<i64>,

    /// Fat target (g/day)
    #[arg(long)]
    fat: Option<f64>,
    /// Fat tolerance percentage (0-100)
    #[arg(long)]
    fat_tolerance: Option<i64>,

    /// Fiber target (g/day)
    #[arg(long)]
    fiber: Option<f64>,
    /// Fiber tolerance percentage (0-100)
    #[arg(long)]
    fiber_tolerance: Option<i64>,

    /// Sugar target (g/day)
    #[arg(long)]
    sugar: Option<f64>,
    /// Sugar tolerance percentage (0-100)
    #[arg(long)]
    sugar_tolerance: Option<i64>,

    /// Sodium target (mg/day)
    #[arg(long)]
    sodium: Option<f64>,
    /// Sodium tolerance percentage (0-100)
    #[arg(long)]
    sodium_tolerance: Option<i64>,

    /// Net carb target (g/day)
    #[arg(long = "net-carbs")]
    net_carbs: Option<f64>,
    /// Net carb tolerance percentage (0-100)
    #[arg(long = "net-carbs-tolerance")]
    net_carbs_tolerance: Option<i64>,

    /// Saturated fat target (g/day)
    #[arg(long = "saturated-fat")]
    saturated_fat: Option<f64>,
    /// Saturated fat tolerance percentage (0-100)
    #[arg(long = "saturated-fat-tolerance")]
    saturated_fat_tolerance: Option<i64>,

    /// Cholesterol target (mg/day)
    #[arg(long)]
    cholesterol: Option<f64>,
    /// Cholesterol tolerance percentage (0-100)
    #[arg(long)]
    cholesterol_tolerance: Option<i64>,
}

impl GoalsArgs {
    /// Collect the present flags into per-nutrient updates
    fn updates(&self) -> BTreeMap<Nutrient, GoalUpdate> {
        let pairs = [
            (Nutrient::Calories, self.calories, self.calories_tolerance),
            (Nutrient::Protein, self.protein, self.protein_tolerance),
            (Nutrient::Carbs, self.carbs, self.carbs_tolerance),
            (Nutrient::Fat, self.fat, self.fat_tolerance),
            (Nutrient::Fiber, self.fiber, self.fiber_tolerance),
            (Nutrient::Sugar, self.sugar, self.sugar_tolerance),
            (Nutrient::Sodium, self.sodium, self.sodium_tolerance),
            (Nutrient::NetCarbs, self.net_carbs, self.net_carbs_tolerance),
            (
                Nutrient::SaturatedFat,
                self.saturated_fat,
                self.saturated_fat_tolerance,
            ),
            (
                Nutrient::Cholesterol,
                self.cholesterol,
                self.cholesterol_tolerance,
            ),
        ];

        pairs
            .into_iter()
            .filter(|(_, target, tolerance)| target.is_some() || tolerance.is_some())
            .map(|(nutrient, target, tolerance_percent)| {
                (
                    nutrient,
                    GoalUpdate {
                        target,
                        tolerance_percent,
                    },
                )
            })
            .collect()
    }
}

/// Show goals (no flags) or apply updates and print `{success, goals}`
pub async fn run(store: &dyn NutritionStore, user_id: &str, args: &GoalsArgs) -> AppResult<()> {
    let updates = args.updates();

    if updates.is_empty() {
        let goals = store.get_user_goals(user_id).await?;
        return print_json(&json!({"hasGoals": !goals.is_empty(), "goals": goals}));
    }

    let existing = store.get_user_goals(user_id).await?;
    let merged = apply_goal_updates(&existing, &updates, Utc::now())?;
    store.set_user_goals(user_id, &merged).await?;

    print_json(&json!({"success": true, "goals": merged}))
}
