// ABOUTME: Shared test utilities and builders for integration tests
// ABOUTME: Quiet logging setup plus meal and goal construction helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Remy Nutrition Intelligence
#![allow(dead_code)]

//! Shared test utilities for `remy_mcp_server` integration tests.

use std::sync::Once;

use chrono::{NaiveDate, TimeZone, Utc};
use uuid::Uuid;

use remy_mcp_server::models::{GoalMap, Meal, MealNutrients, Nutrient, NutrientGoal};

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_test_writer()
            .init();
    });
}

/// The test user everything is scoped to
pub const TEST_USER: &str = "test_user";

/// A calendar day helper
pub fn day(year: i32, month: u32, dom: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, dom).unwrap()
}

/// Build a meal for `TEST_USER` on the given day, logged at noon UTC
pub fn meal_on(date: NaiveDate, name: &str, nutrients: MealNutrients) -> Meal {
    Meal {
        id: Uuid::new_v4(),
        user_id: TEST_USER.to_owned(),
        name: name.to_owned(),
        logged_at: Utc.from_utc_datetime(&date.and_hms_opt(12, 0, 0).unwrap()),
        date,
        nutrients,
    }
}

/// Nutrients with only calories set
pub fn calories_only(calories: f64) -> MealNutrients {
    MealNutrients {
        calories: Some(calories),
        ..MealNutrients::default()
    }
}

/// Nutrients with only protein set
pub fn protein_only(protein_g: f64) -> MealNutrients {
    MealNutrients {
        protein_g: Some(protein_g),
        ..MealNutrients::default()
    }
}

/// A goal created at noon UTC on the given day
pub fn goal_created_on(target: f64, tolerance_percent: u8, created: NaiveDate) -> NutrientGoal {
    let created_at = Utc.from_utc_datetime(&created.and_hms_opt(12, 0, 0).unwrap());
    NutrientGoal {
        target,
        tolerance_percent,
        created_at,
        updated_at: created_at,
    }
}

/// A single-nutrient goal map
pub fn single_goal(
    nutrient: Nutrient,
    target: f64,
    tolerance_percent: u8,
    created: NaiveDate,
) -> GoalMap {
    let mut goals = GoalMap::new();
    goals.insert(nutrient, goal_created_on(target, tolerance_percent, created));
    goals
}
