// ABOUTME: Storage abstraction for the Remy nutrition assistant
// ABOUTME: Narrow NutritionStore trait with SQLite and in-memory implementations
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Remy Nutrition Intelligence

//! # Storage Abstraction
//!
//! The core engines never touch a database directly; they consume data
//! through the narrow [`NutritionStore`] seam defined here. This keeps the
//! classifier and streak engine testable with the in-memory fake,
//! independent of any concrete storage engine.
//!
//! Two implementations ship in-tree:
//! - [`sqlite::SqliteStore`]: the production store (sqlx over SQLite)
//! - [`memory::MemoryStore`]: an in-process fake for tests and demos

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use async_trait::async_trait;
use chrono::NaiveDate;
use remy_core::errors::AppResult;
use remy_core::models::{CustomFood, GoalMap, Meal, MealUpdate};
use uuid::Uuid;

/// Core storage trait
///
/// All operations are scoped to one user; different users' data is fully
/// independent. Implementations return whatever is committed at call time;
/// no cross-call snapshot or atomicity is promised beyond single
/// operations.
#[async_trait]
pub trait NutritionStore: Send + Sync {
    // ================================
    // Meal Log
    // ================================

    /// All meals logged on one user-local day, oldest first
    async fn get_meals_by_date(&self, user_id: &str, date: NaiveDate) -> AppResult<Vec<Meal>>;

    /// Meals within the `days`-day window ending at `as_of` (inclusive),
    /// chronological
    async fn get_meal_history(
        &self,
        user_id: &str,
        days: u32,
        as_of: NaiveDate,
    ) -> AppResult<Vec<Meal>>;

    /// Case-insensitive substring search over meal names, newest first
    async fn search_meal_logs(
        &self,
        user_id: &str,
        query: &str,
        limit: u32,
    ) -> AppResult<Vec<Meal>>;

    /// Append a meal to the log
    async fn log_meal(&self, meal: &Meal) -> AppResult<()>;

    /// Apply a partial edit to an existing meal
    ///
    /// Fails with `ResourceNotFound` when the id does not belong to the user.
    async fn edit_meal(&self, user_id: &str, meal_id: Uuid, update: &MealUpdate)
        -> AppResult<Meal>;

    /// Delete a logged meal
    ///
    /// Fails with `ResourceNotFound` when the id does not belong to the user.
    async fn delete_meal(&self, user_id: &str, meal_id: Uuid) -> AppResult<()>;

    // ================================
    // Goals
    // ================================

    /// The user's full goal map; empty if none set
    async fn get_user_goals(&self, user_id: &str) -> AppResult<GoalMap>;

    /// Replace the user's goal map with an already-merged, validated map
    ///
    /// Merging partial updates into the stored map is
    /// [`crate::intelligence::goals::apply_goal_updates`]'s job; the store
    /// persists the result atomically.
    async fn set_user_goals(&self, user_id: &str, goals: &GoalMap) -> AppResult<()>;

    // ================================
    // Custom Foods
    // ================================

    /// Save a user-defined food; fails if the name is already taken
    async fn create_custom_food(&self, food: &CustomFood) -> AppResult<()>;

    /// Look up a custom food by its exact name
    async fn get_custom_food_by_name(
        &self,
        user_id: &str,
        name: &str,
    ) -> AppResult<Option<CustomFood>>;

    /// All custom foods for a user, by name
    async fn list_custom_foods(&self, user_id: &str) -> AppResult<Vec<CustomFood>>;

    /// Delete a custom food
    ///
    /// Fails with `ResourceNotFound` when the id does not belong to the user.
    async fn delete_custom_food(&self, user_id: &str, food_id: Uuid) -> AppResult<()>;
}
