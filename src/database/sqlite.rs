// ABOUTME: SQLite implementation of the NutritionStore trait
// ABOUTME: sqlx-backed persistence for meals, goals, and custom foods
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Remy Nutrition Intelligence

//! SQLite store.
//!
//! Schema is created on demand by [`SqliteStore::migrate`]; all statements
//! are idempotent so re-running migrations is always safe. Nutrient values
//! are stored as nullable REAL columns; NULL is "not recorded", which the
//! aggregator later treats as 0.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use tracing::{debug, warn};
use uuid::Uuid;

use remy_core::errors::{AppError, AppResult};
use remy_core::models::{CustomFood, GoalMap, Meal, MealNutrients, MealUpdate, Nutrient, NutrientGoal};

use super::NutritionStore;

/// SQLite-backed nutrition store
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (and create if missing) the database at `database_url`
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` when the database cannot be opened.
    pub async fn new(database_url: &str) -> AppResult<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;
        debug!(database_url, "opened sqlite store");
        Ok(Self { pool })
    }

    /// Create the schema if it does not exist yet
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` when a DDL statement fails.
    pub async fn migrate(&self) -> AppResult<()> {
        sqlx::query(
            r"CREATE TABLE IF NOT EXISTS meals (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                name TEXT NOT NULL,
                logged_at TEXT NOT NULL,
                date TEXT NOT NULL,
                calories REAL,
                protein_g REAL,
                carbs_g REAL,
                fat_g REAL,
                fiber_g REAL,
                sugar_g REAL,
                sodium_mg REAL,
                saturated_fat_g REAL,
                cholesterol_mg REAL
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_meals_user_date ON meals (user_id, date)",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"CREATE TABLE IF NOT EXISTS goals (
                user_id TEXT NOT NULL,
                nutrient TEXT NOT NULL,
                target REAL NOT NULL,
                tolerance_percent INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                PRIMARY KEY (user_id, nutrient)
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"CREATE TABLE IF NOT EXISTS custom_foods (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                name TEXT NOT NULL,
                serving TEXT,
                calories REAL,
                protein_g REAL,
                carbs_g REAL,
                fat_g REAL,
                fiber_g REAL,
                sugar_g REAL,
                sodium_mg REAL,
                saturated_fat_g REAL,
                cholesterol_mg REAL,
                UNIQUE (user_id, name)
            )",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_meal(&self, user_id: &str, meal_id: Uuid) -> AppResult<Option<Meal>> {
        let row = sqlx::query("SELECT * FROM meals WHERE id = ? AND user_id = ?")
            .bind(meal_id.to_string())
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(|r| meal_from_row(&r)).transpose()
    }
}

const MEAL_COLUMNS: &str = "SELECT id, user_id, name, logged_at, date, calories, protein_g, \
     carbs_g, fat_g, fiber_g, sugar_g, sodium_mg, saturated_fat_g, cholesterol_mg FROM meals";

fn nutrients_from_row(row: &SqliteRow) -> AppResult<MealNutrients> {
    Ok(MealNutrients {
        calories: row.try_get("calories")?,
        protein_g: row.try_get("protein_g")?,
        carbs_g: row.try_get("carbs_g")?,
        fat_g: row.try_get("fat_g")?,
        fiber_g: row.try_get("fiber_g")?,
        sugar_g: row.try_get("sugar_g")?,
        sodium_mg: row.try_get("sodium_mg")?,
        saturated_fat_g: row.try_get("saturated_fat_g")?,
        cholesterol_mg: row.try_get("cholesterol_mg")?,
    })
}

fn meal_from_row(row: &SqliteRow) -> AppResult<Meal> {
    let id: String = row.try_get("id")?;
    let id = Uuid::parse_str(&id)
        .map_err(|e| AppError::internal(format!("corrupt meal id {id}: {e}")))?;
    Ok(Meal {
        id,
        user_id: row.try_get("user_id")?,
        name: row.try_get("name")?,
        logged_at: row.try_get::<DateTime<Utc>, _>("logged_at")?,
        date: row.try_get::<NaiveDate, _>("date")?,
        nutrients: nutrients_from_row(row)?,
    })
}

fn custom_food_from_row(row: &SqliteRow) -> AppResult<CustomFood> {
    let id: String = row.try_get("id")?;
    let id = Uuid::parse_str(&id)
        .map_err(|e| AppError::internal(format!("corrupt food id {id}: {e}")))?;
    Ok(CustomFood {
        id,
        user_id: row.try_get("user_id")?,
        name: row.try_get("name")?,
        serving: row.try_get("serving")?,
        nutrients: nutrients_from_row(row)?,
    })
}

#[async_trait]
impl NutritionStore for SqliteStore {
    async fn get_meals_by_date(&self, user_id: &str, date: NaiveDate) -> AppResult<Vec<Meal>> {
        let rows = sqlx::query(&format!(
            "{MEAL_COLUMNS} WHERE user_id = ? AND date = ? ORDER BY logged_at"
        ))
        .bind(user_id)
        .bind(date)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(meal_from_row).collect()
    }

    async fn get_meal_history(
        &self,
        user_id: &str,
        days: u32,
        as_of: NaiveDate,
    ) -> AppResult<Vec<Meal>> {
        let start = as_of - chrono::Duration::days(i64::from(days.saturating_sub(1)));
        let rows = sqlx::query(&format!(
            "{MEAL_COLUMNS} WHERE user_id = ? AND date >= ? AND date <= ? ORDER BY date, logged_at"
        ))
        .bind(user_id)
        .bind(start)
        .bind(as_of)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(meal_from_row).collect()
    }

    async fn search_meal_logs(
        &self,
        user_id: &str,
        query: &str,
        limit: u32,
    ) -> AppResult<Vec<Meal>> {
        let pattern = format!("%{}%", query.replace('%', "\\%").replace('_', "\\_"));
        let rows = sqlx::query(&format!(
            "{MEAL_COLUMNS} WHERE user_id = ? AND name LIKE ? ESCAPE '\\' \
             ORDER BY logged_at DESC LIMIT ?"
        ))
        .bind(user_id)
        .bind(pattern)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(meal_from_row).collect()
    }

    async fn log_meal(&self, meal: &Meal) -> AppResult<()> {
        sqlx::query(
            r"INSERT INTO meals (
                id, user_id, name, logged_at, date,
                calories, protein_g, carbs_g, fat_g, fiber_g,
                sugar_g, sodium_mg, saturated_fat_g, cholesterol_mg
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(meal.id.to_string())
        .bind(&meal.user_id)
        .bind(&meal.name)
        .bind(meal.logged_at)
        .bind(meal.date)
        .bind(meal.nutrients.calories)
        .bind(meal.nutrients.protein_g)
        .bind(meal.nutrients.carbs_g)
        .bind(meal.nutrients.fat_g)
        .bind(meal.nutrients.fiber_g)
        .bind(meal.nutrients.sugar_g)
        .bind(meal.nutrients.sodium_mg)
        .bind(meal.nutrients.saturated_fat_g)
        .bind(meal.nutrients.cholesterol_mg)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn edit_meal(
        &self,
        user_id: &str,
        meal_id: Uuid,
        update: &MealUpdate,
    ) -> AppResult<Meal> {
        let mut meal = self
            .get_meal(user_id, meal_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Meal {meal_id}")))?;

        if let Some(name) = &update.name {
            meal.name.clone_from(name);
        }
        meal.nutrients = meal.nutrients.merged_with(&update.nutrients);

        sqlx::query(
            r"UPDATE meals SET
                name = ?, calories = ?, protein_g = ?, carbs_g = ?, fat_g = ?,
                fiber_g = ?, sugar_g = ?, sodium_mg = ?, saturated_fat_g = ?,
                cholesterol_mg = ?
              WHERE id = ? AND user_id = ?",
        )
        .bind(&meal.name)
        .bind(meal.nutrients.calories)
        .bind(meal.nutrients.protein_g)
        .bind(meal.nutrients.carbs_g)
        .bind(meal.nutrients.fat_g)
        .bind(meal.nutrients.fiber_g)
        .bind(meal.nutrients.sugar_g)
        .bind(meal.nutrients.sodium_mg)
        .bind(meal.nutrients.saturated_fat_g)
        .bind(meal.nutrients.cholesterol_mg)
        .bind(meal_id.to_string())
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(meal)
    }

    async fn delete_meal(&self, user_id: &str, meal_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM meals WHERE id = ? AND user_id = ?")
            .bind(meal_id.to_string())
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Meal {meal_id}")));
        }
        Ok(())
    }

    async fn get_user_goals(&self, user_id: &str) -> AppResult<GoalMap> {
        let rows = sqlx::query(
            "SELECT nutrient, target, tolerance_percent, created_at, updated_at \
             FROM goals WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let mut goals = GoalMap::new();
        for row in rows {
            let key: String = row.try_get("nutrient")?;
            let Some(nutrient) = Nutrient::from_key(&key) else {
                warn!(nutrient = %key, "skipping goal row with unknown nutrient");
                continue;
            };
            let tolerance: i64 = row.try_get("tolerance_percent")?;
            goals.insert(
                nutrient,
                NutrientGoal {
                    target: row.try_get("target")?,
                    tolerance_percent: u8::try_from(tolerance).unwrap_or(0),
                    created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
                    updated_at: row.try_get::<DateTime<Utc>, _>("updated_at")?,
                },
            );
        }
        Ok(goals)
    }

    async fn set_user_goals(&self, user_id: &str, goals: &GoalMap) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM goals WHERE user_id = ?")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        for (nutrient, goal) in goals {
            sqlx::query(
                r"INSERT INTO goals (
                    user_id, nutrient, target, tolerance_percent, created_at, updated_at
                ) VALUES (?, ?, ?, ?, ?, ?)",
            )
            .bind(user_id)
            .bind(nutrient.as_key())
            .bind(goal.target)
            .bind(i64::from(goal.tolerance_percent))
            .bind(goal.created_at)
            .bind(goal.updated_at)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn create_custom_food(&self, food: &CustomFood) -> AppResult<()> {
        if self
            .get_custom_food_by_name(&food.user_id, &food.name)
            .await?
            .is_some()
        {
            return Err(AppError::already_exists(format!(
                "Custom food \"{}\"",
                food.name
            )));
        }

        sqlx::query(
            r"INSERT INTO custom_foods (
                id, user_id, name, serving,
                calories, protein_g, carbs_g, fat_g, fiber_g,
                sugar_g, sodium_mg, saturated_fat_g, cholesterol_mg
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(food.id.to_string())
        .bind(&food.user_id)
        .bind(&food.name)
        .bind(&food.serving)
        .bind(food.nutrients.calories)
        .bind(food.nutrients.protein_g)
        .bind(food.nutrients.carbs_g)
        .bind(food.nutrients.fat_g)
        .bind(food.nutrients.fiber_g)
        .bind(food.nutrients.sugar_g)
        .bind(food.nutrients.sodium_mg)
        .bind(food.nutrients.saturated_fat_g)
        .bind(food.nutrients.cholesterol_mg)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_custom_food_by_name(
        &self,
        user_id: &str,
        name: &str,
    ) -> AppResult<Option<CustomFood>> {
        let row = sqlx::query(
            "SELECT * FROM custom_foods WHERE user_id = ? AND name = ? COLLATE NOCASE",
        )
        .bind(user_id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;
        row.map(|r| custom_food_from_row(&r)).transpose()
    }

    async fn list_custom_foods(&self, user_id: &str) -> AppResult<Vec<CustomFood>> {
        let rows = sqlx::query("SELECT * FROM custom_foods WHERE user_id = ? ORDER BY name")
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(custom_food_from_row).collect()
    }

    async fn delete_custom_food(&self, user_id: &str, food_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM custom_foods WHERE id = ? AND user_id = ?")
            .bind(food_id.to_string())
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Custom food {food_id}")));
        }
        Ok(())
    }
}
