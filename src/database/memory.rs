// ABOUTME: In-memory NutritionStore implementation
// ABOUTME: Process-local fake used by tests and demos, no persistence
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Remy Nutrition Intelligence

//! In-memory store.
//!
//! Behaviorally equivalent to the SQLite store for everything the core
//! engines care about, so the classifier, streak engine, and tool handlers
//! can be exercised without touching a database file.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use remy_core::errors::{AppError, AppResult};
use remy_core::models::{CustomFood, GoalMap, Meal, MealUpdate};

use super::NutritionStore;

#[derive(Default)]
struct Inner {
    meals: Vec<Meal>,
    goals: HashMap<String, GoalMap>,
    foods: Vec<CustomFood>,
}

/// In-process nutrition store
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> AppResult<std::sync::MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| AppError::internal("memory store mutex poisoned"))
    }
}

#[async_trait]
impl NutritionStore for MemoryStore {
    async fn get_meals_by_date(&self, user_id: &str, date: NaiveDate) -> AppResult<Vec<Meal>> {
        let inner = self.lock()?;
        let mut meals: Vec<Meal> = inner
            .meals
            .iter()
            .filter(|m| m.user_id == user_id && m.date == date)
            .cloned()
            .collect();
        meals.sort_by_key(|m| m.logged_at);
        Ok(meals)
    }

    async fn get_meal_history(
        &self,
        user_id: &str,
        days: u32,
        as_of: NaiveDate,
    ) -> AppResult<Vec<Meal>> {
        let start = as_of - chrono::Duration::days(i64::from(days.saturating_sub(1)));
        let inner = self.lock()?;
        let mut meals: Vec<Meal> = inner
            .meals
            .iter()
            .filter(|m| m.user_id == user_id && m.date >= start && m.date <= as_of)
            .cloned()
            .collect();
        meals.sort_by_key(|m| (m.date, m.logged_at));
        Ok(meals)
    }

    async fn search_meal_logs(
        &self,
        user_id: &str,
        query: &str,
        limit: u32,
    ) -> AppResult<Vec<Meal>> {
        let needle = query.to_lowercase();
        let inner = self.lock()?;
        let mut meals: Vec<Meal> = inner
            .meals
            .iter()
            .filter(|m| m.user_id == user_id && m.name.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        meals.sort_by_key(|m| std::cmp::Reverse(m.logged_at));
        meals.truncate(limit as usize);
        Ok(meals)
    }

    async fn log_meal(&self, meal: &Meal) -> AppResult<()> {
        self.lock()?.meals.push(meal.clone());
        Ok(())
    }

    async fn edit_meal(
        &self,
        user_id: &str,
        meal_id: Uuid,
        update: &MealUpdate,
    ) -> AppResult<Meal> {
        let mut inner = self.lock()?;
        let meal = inner
            .meals
            .iter_mut()
            .find(|m| m.id == meal_id && m.user_id == user_id)
            .ok_or_else(|| AppError::not_found(format!("Meal {meal_id}")))?;
        if let Some(name) = &update.name {
            meal.name.clone_from(name);
        }
        meal.nutrients = meal.nutrients.merged_with(&update.nutrients);
        Ok(meal.clone())
    }

    async fn delete_meal(&self, user_id: &str, meal_id: Uuid) -> AppResult<()> {
        let mut inner = self.lock()?;
        let before = inner.meals.len();
        inner
            .meals
            .retain(|m| !(m.id == meal_id && m.user_id == user_id));
        if inner.meals.len() == before {
            return Err(AppError::not_found(format!("Meal {meal_id}")));
        }
        Ok(())
    }

    async fn get_user_goals(&self, user_id: &str) -> AppResult<GoalMap> {
        Ok(self.lock()?.goals.get(user_id).cloned().unwrap_or_default())
    }

    async fn set_user_goals(&self, user_id: &str, goals: &GoalMap) -> AppResult<()> {
        self.lock()?
            .goals
            .insert(user_id.to_owned(), goals.clone());
        Ok(())
    }

    async fn create_custom_food(&self, food: &CustomFood) -> AppResult<()> {
        let mut inner = self.lock()?;
        if inner
            .foods
            .iter()
            .any(|f| f.user_id == food.user_id && f.name.eq_ignore_ascii_case(&food.name))
        {
            return Err(AppError::already_exists(format!(
                "Custom food \"{}\"",
                food.name
            )));
        }
        inner.foods.push(food.clone());
        Ok(())
    }

    async fn get_custom_food_by_name(
        &self,
        user_id: &str,
        name: &str,
    ) -> AppResult<Option<CustomFood>> {
        Ok(self
            .lock()?
            .foods
            .iter()
            .find(|f| f.user_id == user_id && f.name.eq_ignore_ascii_case(name))
            .cloned())
    }

    async fn list_custom_foods(&self, user_id: &str) -> AppResult<Vec<CustomFood>> {
        let inner = self.lock()?;
        let mut foods: Vec<CustomFood> = inner
            .foods
            .iter()
            .filter(|f| f.user_id == user_id)
            .cloned()
            .collect();
        foods.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(foods)
    }

    async fn delete_custom_food(&self, user_id: &str, food_id: Uuid) -> AppResult<()> {
        let mut inner = self.lock()?;
        let before = inner.foods.len();
        inner
            .foods
            .retain(|f| !(f.id == food_id && f.user_id == user_id));
        if inner.foods.len() == before {
            return Err(AppError::not_found(format!("Custom food {food_id}")));
        }
        Ok(())
    }
}
