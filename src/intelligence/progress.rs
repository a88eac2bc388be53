// ABOUTME: Progress report builder
// ABOUTME: Composes daily totals, goal classifications, and streak summaries into the response shape
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Remy Nutrition Intelligence

//! Progress report assembly.
//!
//! Composition only: totals come from the aggregator, zones from the
//! classifier, streaks from the streak engine. Nutrients without a goal
//! appear in the totals but not in the zone/band/streak sections. A user
//! with no goals at all gets `hasGoals: false` rather than an error.
//!
//! The serialized field names (`target`, `tolerance`, `band`, `zone`,
//! `actual`, `streaks.<nutrient>.current/.longest`, `hasGoals`,
//! `totals.mealCount`) are part of the external contract.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use remy_core::errors::AppResult;
use remy_core::models::{DailyTotals, Meal, Nutrient};
use serde::Serialize;

use crate::database::NutritionStore;

use super::aggregator::sum_meals;
use super::streaks::{compute_streaks, day_compliance, Streak};
use super::tolerance::{classify_for_goal, Zone};

/// Today's standing for one nutrient with a goal
#[derive(Debug, Clone, Copy, Serialize)]
pub struct NutrientProgress {
    pub target: f64,
    pub tolerance: u8,
    pub band: f64,
    pub zone: Zone,
    pub actual: f64,
}

/// The full progress response
#[derive(Debug, Clone, Serialize)]
pub struct ProgressReport {
    pub date: NaiveDate,
    #[serde(rename = "hasGoals")]
    pub has_goals: bool,
    /// Today's totals, including nutrients without goals
    pub totals: DailyTotals,
    /// Zone classification per goal nutrient
    pub nutrients: BTreeMap<Nutrient, NutrientProgress>,
    /// Current and longest streaks per goal nutrient
    pub streaks: BTreeMap<Nutrient, Streak>,
}

/// Build the progress report for `as_of`, with streaks over the
/// `lookback_days`-day window ending at `as_of`.
///
/// # Errors
///
/// Propagates store failures; a goal-less user is not an error.
pub async fn build_progress_report(
    store: &dyn NutritionStore,
    user_id: &str,
    as_of: NaiveDate,
    lookback_days: u32,
) -> AppResult<ProgressReport> {
    let goals = store.get_user_goals(user_id).await?;
    let todays_meals = store.get_meals_by_date(user_id, as_of).await?;
    let totals = sum_meals(as_of, &todays_meals);

    if goals.is_empty() {
        return Ok(ProgressReport {
            date: as_of,
            has_goals: false,
            totals,
            nutrients: BTreeMap::new(),
            streaks: BTreeMap::new(),
        });
    }

    let mut nutrients = BTreeMap::new();
    for (&nutrient, goal) in &goals {
        let actual = totals.get(nutrient);
        let classification = classify_for_goal(actual, nutrient, goal);
        nutrients.insert(
            nutrient,
            NutrientProgress {
                target: goal.target,
                tolerance: classification.tolerance,
                band: classification.band,
                zone: classification.zone,
                actual,
            },
        );
    }

    // One history fetch for the whole window, summed once per day
    let history = store.get_meal_history(user_id, lookback_days, as_of).await?;
    let mut buckets: HashMap<NaiveDate, Vec<Meal>> = HashMap::new();
    for meal in history {
        buckets.entry(meal.date).or_default().push(meal);
    }
    let per_day: HashMap<NaiveDate, DailyTotals> = buckets
        .into_iter()
        .map(|(date, meals)| (date, sum_meals(date, &meals)))
        .collect();

    let window_start = as_of - chrono::Duration::days(i64::from(lookback_days.saturating_sub(1)));

    let mut streaks = BTreeMap::new();
    for (&nutrient, goal) in &goals {
        let mut days = Vec::with_capacity(lookback_days as usize);
        let mut date = window_start;
        while date <= as_of {
            let compliance = match per_day.get(&date) {
                Some(day_totals) => day_compliance(
                    date,
                    day_totals.meal_count,
                    day_totals.get(nutrient),
                    nutrient,
                    goal,
                ),
                None => day_compliance(date, 0, 0.0, nutrient, goal),
            };
            days.push(compliance);
            let Some(next) = date.succ_opt() else { break };
            date = next;
        }
        streaks.insert(nutrient, compute_streaks(&days));
    }

    Ok(ProgressReport {
        date: as_of,
        has_goals: true,
        totals,
        nutrients,
        streaks,
    })
}
