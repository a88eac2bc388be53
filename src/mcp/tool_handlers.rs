// ABOUTME: Tool execution handlers for MCP tool calls
// ABOUTME: Routes tool names to the intelligence engines, stores, and the USDA client
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Remy Nutrition Intelligence

//! Tool dispatch.
//!
//! Each handler parses its parameters, calls into the store/engines, and
//! returns a JSON value. Validation failures surface as `AppError`s that
//! the transport maps to JSON-RPC error responses.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use remy_core::errors::{AppError, AppResult};
use remy_core::models::{GoalUpdate, Meal, MealNutrients, Nutrient};

use crate::constants::{defaults, tools};
use crate::database::NutritionStore;
use crate::external::FoodSource;
use crate::intelligence::{build_progress_report, goals::apply_goal_updates, sum_meals};

/// Tool dispatcher
///
/// Holds the store and (optionally) a food source. All operations are
/// scoped to the configured user unless the request carries `user_id`.
pub struct ToolHandlers {
    store: Arc<dyn NutritionStore>,
    foods: Option<Arc<dyn FoodSource>>,
    user_id: String,
    lookback_days: u32,
}

impl ToolHandlers {
    /// Create a dispatcher over the given collaborators
    #[must_use]
    pub fn new(
        store: Arc<dyn NutritionStore>,
        foods: Option<Arc<dyn FoodSource>>,
        user_id: impl Into<String>,
        lookback_days: u32,
    ) -> Self {
        Self {
            store,
            foods,
            user_id: user_id.into(),
            lookback_days,
        }
    }

    /// Execute one tool call
    ///
    /// # Errors
    ///
    /// `InvalidInput`/`MissingRequiredField` for bad parameters or an
    /// unknown tool, otherwise whatever the underlying operation raises.
    pub async fn call(&self, name: &str, args: &Value) -> AppResult<Value> {
        debug!(tool = name, "dispatching tool call");
        match name {
            tools::SET_NUTRITION_GOALS => self.set_nutrition_goals(args).await,
            tools::GET_NUTRITION_GOALS => self.get_nutrition_goals(args).await,
            tools::GET_PROGRESS => self.get_progress(args).await,
            tools::GET_DAILY_TOTALS => self.get_daily_totals(args).await,
            tools::LOG_MEAL => self.log_meal(args).await,
            tools::DELETE_MEAL => self.delete_meal(args).await,
            tools::GET_MEAL_HISTORY => self.get_meal_history(args).await,
            tools::SEARCH_MEAL_LOGS => self.search_meal_logs(args).await,
            tools::SEARCH_FOODS => self.search_foods(args).await,
            tools::GET_FOOD_DETAILS => self.get_food_details(args).await,
            tools::LOOKUP_BARCODE => self.lookup_barcode(args).await,
            other => Err(AppError::invalid_input(format!("Unknown tool: {other}"))),
        }
    }

    fn user<'a>(&'a self, args: &'a Value) -> &'a str {
        args.get("user_id")
            .and_then(Value::as_str)
            .unwrap_or(&self.user_id)
    }

    fn food_source(&self) -> AppResult<&Arc<dyn FoodSource>> {
        self.foods.as_ref().ok_or_else(|| {
            AppError::config("USDA API key not configured. Set USDA_API_KEY environment variable.")
        })
    }

    /// Resolve the `date` parameter: ISO date, or today when absent
    fn date_param(args: &Value) -> AppResult<NaiveDate> {
        match args.get("date").and_then(Value::as_str) {
            Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map_err(|_| AppError::invalid_input(format!("invalid date: {raw} (want YYYY-MM-DD)"))),
            None => Ok(chrono::Local::now().date_naive()),
        }
    }

    async fn set_nutrition_goals(&self, args: &Value) -> AppResult<Value> {
        let goal_entries = args
            .get("goals")
            .and_then(Value::as_object)
            .ok_or_else(|| AppError::missing_field("goals"))?;

        let mut updates = BTreeMap::new();
        for (key, value) in goal_entries {
            let nutrient = Nutrient::from_key(key)
                .ok_or_else(|| AppError::invalid_input(format!("unknown nutrient: {key}")))?;
            let update: GoalUpdate = serde_json::from_value(value.clone()).map_err(|e| {
                AppError::invalid_input(format!("invalid goal update for {key}: {e}"))
            })?;
            updates.insert(nutrient, update);
        }

        let user = self.user(args);
        let existing = self.store.get_user_goals(user).await?;
        let merged = apply_goal_updates(&existing, &updates, Utc::now())?;
        self.store.set_user_goals(user, &merged).await?;

        Ok(json!({"success": true, "goals": merged}))
    }

    async fn get_nutrition_goals(&self, args: &Value) -> AppResult<Value> {
        let goals = self.store.get_user_goals(self.user(args)).await?;
        Ok(json!({"hasGoals": !goals.is_empty(), "goals": goals}))
    }

    async fn get_progress(&self, args: &Value) -> AppResult<Value> {
        let date = Self::date_param(args)?;
        let lookback_days = match args.get("lookback_days").and_then(Value::as_u64) {
            Some(days) if (1..=u64::from(crate::constants::limits::MAX_LOOKBACK_DAYS))
                .contains(&days) =>
            {
                u32::try_from(days).unwrap_or(self.lookback_days)
            }
            Some(days) => {
                return Err(AppError::out_of_range(format!(
                    "lookback_days must be 1-{} (got {days})",
                    crate::constants::limits::MAX_LOOKBACK_DAYS
                )))
            }
            None => self.lookback_days,
        };

        let report =
            build_progress_report(self.store.as_ref(), self.user(args), date, lookback_days)
                .await?;
        Ok(serde_json::to_value(report)?)
    }

    async fn get_daily_totals(&self, args: &Value) -> AppResult<Value> {
        let date = Self::date_param(args)?;
        let meals = self.store.get_meals_by_date(self.user(args), date).await?;
        let totals = sum_meals(date, &meals);
        Ok(json!({"date": date, "totals": totals, "meals": meals}))
    }

    async fn log_meal(&self, args: &Value) -> AppResult<Value> {
        let name = args
            .get("name")
            .and_then(Value::as_str)
            .filter(|n| !n.trim().is_empty())
            .ok_or_else(|| AppError::missing_field("name"))?;

        let nutrients: MealNutrients = serde_json::from_value(args.clone())
            .map_err(|e| AppError::invalid_input(format!("invalid nutrient amounts: {e}")))?;

        let meal = Meal {
            id: Uuid::new_v4(),
            user_id: self.user(args).to_owned(),
            name: name.trim().to_owned(),
            logged_at: Utc::now(),
            date: Self::date_param(args)?,
            nutrients,
        };
        self.store.log_meal(&meal).await?;

        Ok(json!({"success": true, "meal": meal}))
    }

    async fn delete_meal(&self, args: &Value) -> AppResult<Value> {
        let raw_id = args
            .get("meal_id")
            .and_then(Value::as_str)
            .ok_or_else(|| AppError::missing_field("meal_id"))?;
        let meal_id = Uuid::parse_str(raw_id)
            .map_err(|_| AppError::invalid_input(format!("invalid meal id: {raw_id}")))?;

        self.store.delete_meal(self.user(args), meal_id).await?;
        Ok(json!({"success": true}))
    }

    async fn get_meal_history(&self, args: &Value) -> AppResult<Value> {
        let days = args
            .get("days")
            .and_then(Value::as_u64)
            .map_or(defaults::MEAL_HISTORY_DAYS, |d| {
                u32::try_from(d).unwrap_or(defaults::MEAL_HISTORY_DAYS)
            });
        let as_of = chrono::Local::now().date_naive();
        let meals = self
            .store
            .get_meal_history(self.user(args), days, as_of)
            .await?;
        Ok(json!({"days": days, "count": meals.len(), "meals": meals}))
    }

    async fn search_meal_logs(&self, args: &Value) -> AppResult<Value> {
        let query = args
            .get("query")
            .and_then(Value::as_str)
            .filter(|q| !q.is_empty())
            .ok_or_else(|| AppError::missing_field("query"))?;
        let limit = args
            .get("limit")
            .and_then(Value::as_u64)
            .map_or(defaults::MEAL_SEARCH_LIMIT, |l| {
                u32::try_from(l).unwrap_or(defaults::MEAL_SEARCH_LIMIT)
            });

        let meals = self
            .store
            .search_meal_logs(self.user(args), query, limit)
            .await?;
        Ok(json!({"query": query, "count": meals.len(), "meals": meals}))
    }

    async fn search_foods(&self, args: &Value) -> AppResult<Value> {
        let query = args
            .get("query")
            .and_then(Value::as_str)
            .ok_or_else(|| AppError::missing_field("query"))?;
        let page_size = args
            .get("page_size")
            .and_then(Value::as_u64)
            .map_or(defaults::FOOD_SEARCH_PAGE_SIZE, |p| {
                u32::try_from(p).unwrap_or(defaults::FOOD_SEARCH_PAGE_SIZE)
            });

        let foods = self.food_source()?.search_foods(query, page_size).await?;
        Ok(json!({"total": foods.len(), "foods": foods}))
    }

    async fn get_food_details(&self, args: &Value) -> AppResult<Value> {
        let fdc_id = args
            .get("fdc_id")
            .and_then(Value::as_u64)
            .ok_or_else(|| AppError::missing_field("fdc_id"))?;

        let details = self.food_source()?.get_food_details(fdc_id).await?;
        Ok(serde_json::to_value(details)?)
    }

    async fn lookup_barcode(&self, args: &Value) -> AppResult<Value> {
        let barcode = args
            .get("barcode")
            .and_then(Value::as_str)
            .ok_or_else(|| AppError::missing_field("barcode"))?;

        let hit = self.food_source()?.lookup_barcode(barcode).await?;
        Ok(match hit {
            Some(food) => json!({"found": true, "food": food}),
            None => json!({"found": false}),
        })
    }
}
