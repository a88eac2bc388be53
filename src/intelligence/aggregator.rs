// ABOUTME: Nutrient totals aggregator
// ABOUTME: Sums a day's logged meals into per-nutrient daily totals
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Remy Nutrition Intelligence

//! Daily totals aggregation.
//!
//! Totals are derived on demand from the meal log and never persisted.
//! A missing per-meal nutrient value contributes 0 to the sum.

use chrono::NaiveDate;
use remy_core::models::{DailyTotals, Meal};

/// Sum a day's meals into per-nutrient totals plus a meal count.
///
/// Pure function; store failures belong to the caller's fetch. Net carbs
/// are derived from the summed carbs and fiber, clamped at zero.
#[must_use]
pub fn sum_meals(date: NaiveDate, meals: &[Meal]) -> DailyTotals {
    let mut totals = DailyTotals::empty(date);

    for meal in meals {
        let n = &meal.nutrients;
        totals.calories += n.calories.unwrap_or(0.0);
        totals.protein_g += n.protein_g.unwrap_or(0.0);
        totals.carbs_g += n.carbs_g.unwrap_or(0.0);
        totals.fat_g += n.fat_g.unwrap_or(0.0);
        totals.fiber_g += n.fiber_g.unwrap_or(0.0);
        totals.sugar_g += n.sugar_g.unwrap_or(0.0);
        totals.sodium_mg += n.sodium_mg.unwrap_or(0.0);
        totals.saturated_fat_g += n.saturated_fat_g.unwrap_or(0.0);
        totals.cholesterol_mg += n.cholesterol_mg.unwrap_or(0.0);
    }

    totals.net_carbs_g = (totals.carbs_g - totals.fiber_g).max(0.0);
    totals.meal_count = u32::try_from(meals.len()).unwrap_or(u32::MAX);

    totals
}
