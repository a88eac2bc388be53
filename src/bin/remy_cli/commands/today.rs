// ABOUTME: `today` command - totals and meals for one day
// ABOUTME: Accepts a day offset or ISO date, defaults to today
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Remy Nutrition Intelligence

use serde_json::json;

use remy_mcp_server::database::NutritionStore;
use remy_mcp_server::errors::AppResult;
use remy_mcp_server::intelligence::sum_meals;

use super::{print_json, resolve_date};

/// Print `{date, totals, meals}` for the requested day
pub async fn run(store: &dyn NutritionStore, user_id: &str, date: Option<&str>) -> AppResult<()> {
    let date = resolve_date(date)?;
    let meals = store.get_meals_by_date(user_id, date).await?;
    let totals = sum_meals(date, &meals);

    print_json(&json!({
        "date": date,
        "totals": totals,
        "meals": meals,
    }))
}
