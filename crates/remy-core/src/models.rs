// ABOUTME: Domain models for nutrition tracking
// ABOUTME: Nutrient definitions with goal directionality, meals, daily totals, goals, custom foods
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Remy Nutrition Intelligence

//! Domain models shared across the server, CLI, and stores.
//!
//! The central type is [`Nutrient`]: the closed set of tracked nutrients,
//! each with a fixed [`GoalDirection`] (stay-under vs. reach). Directionality
//! is domain convention, encoded once here and never inferred at runtime.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// Whether a goal is satisfied by staying under the target or reaching it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalDirection {
    /// Staying at or under the target is desirable (e.g. sodium)
    Ceiling,
    /// Reaching or exceeding the target is desirable (e.g. protein)
    Floor,
}

/// The tracked nutrients
///
/// Serialized by name (`calories`, `net_carbs`, ...); the same keys are used
/// in the goals table, the progress report, and tool parameters. Unknown
/// names are rejected at the boundary via [`Nutrient::from_key`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Nutrient {
    Calories,
    Protein,
    Carbs,
    Fat,
    Fiber,
    Sugar,
    Sodium,
    NetCarbs,
    SaturatedFat,
    Cholesterol,
}

impl Nutrient {
    /// Every tracked nutrient, in canonical display order
    pub const ALL: [Nutrient; 10] = [
        Nutrient::Calories,
        Nutrient::Protein,
        Nutrient::Carbs,
        Nutrient::Fat,
        Nutrient::Fiber,
        Nutrient::Sugar,
        Nutrient::Sodium,
        Nutrient::NetCarbs,
        Nutrient::SaturatedFat,
        Nutrient::Cholesterol,
    ];

    /// Canonical string key (matches the serde representation)
    #[must_use]
    pub const fn as_key(&self) -> &'static str {
        match self {
            Nutrient::Calories => "calories",
            Nutrient::Protein => "protein",
            Nutrient::Carbs => "carbs",
            Nutrient::Fat => "fat",
            Nutrient::Fiber => "fiber",
            Nutrient::Sugar => "sugar",
            Nutrient::Sodium => "sodium",
            Nutrient::NetCarbs => "net_carbs",
            Nutrient::SaturatedFat => "saturated_fat",
            Nutrient::Cholesterol => "cholesterol",
        }
    }

    /// Parse a nutrient from its canonical key
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|n| n.as_key() == key)
    }

    /// Goal directionality, fixed per nutrient by domain convention
    ///
    /// Protein and fiber are "reach" nutrients; everything else is
    /// "stay at or under".
    #[must_use]
    pub const fn direction(&self) -> GoalDirection {
        match self {
            Nutrient::Protein | Nutrient::Fiber => GoalDirection::Floor,
            Nutrient::Calories
            | Nutrient::Carbs
            | Nutrient::Fat
            | Nutrient::Sugar
            | Nutrient::Sodium
            | Nutrient::NetCarbs
            | Nutrient::SaturatedFat
            | Nutrient::Cholesterol => GoalDirection::Ceiling,
        }
    }

    /// Display unit for human-readable output
    #[must_use]
    pub const fn unit(&self) -> &'static str {
        match self {
            Nutrient::Calories => "kcal",
            Nutrient::Sodium | Nutrient::Cholesterol => "mg",
            _ => "g",
        }
    }
}

impl fmt::Display for Nutrient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_key())
    }
}

/// A stored goal for one nutrient
///
/// `created_at` anchors the streak engine's exclusion window: days before
/// the goal existed are excluded from streaks, not counted as breaks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutrientGoal {
    /// Desired value, in the nutrient's unit
    pub target: f64,
    /// Percentage grace margin around the target, 0-100 (0 = exact threshold)
    #[serde(rename = "tolerance")]
    pub tolerance_percent: u8,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Goals keyed by nutrient; ordered for deterministic output
pub type GoalMap = BTreeMap<Nutrient, NutrientGoal>;

/// A partial goal update for one nutrient
///
/// Tolerance is accepted as a signed integer so out-of-range input can be
/// represented and rejected with a proper validation error instead of a
/// deserialization failure.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct GoalUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<f64>,
    #[serde(
        rename = "tolerance",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub tolerance_percent: Option<i64>,
}

/// Per-meal nutrient amounts; every field is optional on input
///
/// Missing values contribute 0 when summing a day (the aggregator's rule),
/// but are stored as NULL so "not recorded" stays distinct from "zero".
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MealNutrients {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calories: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protein_g: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carbs_g: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fat_g: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fiber_g: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sugar_g: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sodium_mg: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saturated_fat_g: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cholesterol_mg: Option<f64>,
}

impl MealNutrients {
    /// True if no nutrient field is present at all
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.calories.is_none()
            && self.protein_g.is_none()
            && self.carbs_g.is_none()
            && self.fat_g.is_none()
            && self.fiber_g.is_none()
            && self.sugar_g.is_none()
            && self.sodium_mg.is_none()
            && self.saturated_fat_g.is_none()
            && self.cholesterol_mg.is_none()
    }

    /// Merge: fields present in `other` replace the corresponding fields here
    #[must_use]
    pub fn merged_with(&self, other: &MealNutrients) -> MealNutrients {
        MealNutrients {
            calories: other.calories.or(self.calories),
            protein_g: other.protein_g.or(self.protein_g),
            carbs_g: other.carbs_g.or(self.carbs_g),
            fat_g: other.fat_g.or(self.fat_g),
            fiber_g: other.fiber_g.or(self.fiber_g),
            sugar_g: other.sugar_g.or(self.sugar_g),
            sodium_mg: other.sodium_mg.or(self.sodium_mg),
            saturated_fat_g: other.saturated_fat_g.or(self.saturated_fat_g),
            cholesterol_mg: other.cholesterol_mg.or(self.cholesterol_mg),
        }
    }
}

/// One logged meal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meal {
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    /// Instant the meal was logged
    pub logged_at: DateTime<Utc>,
    /// User-local day the meal counts toward
    pub date: NaiveDate,
    #[serde(flatten)]
    pub nutrients: MealNutrients,
}

/// A partial edit to an existing meal
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MealUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub nutrients: MealNutrients,
}

/// Summed nutrient totals for one day, derived on demand from the meal log
///
/// Never persisted; recomputed whenever requested. `net_carbs` is derived
/// as `max(carbs - fiber, 0)`.
#[derive(Debug, Clone, Serialize)]
pub struct DailyTotals {
    #[serde(skip)]
    pub date: NaiveDate,
    pub calories: f64,
    #[serde(rename = "protein")]
    pub protein_g: f64,
    #[serde(rename = "carbs")]
    pub carbs_g: f64,
    #[serde(rename = "fat")]
    pub fat_g: f64,
    #[serde(rename = "fiber")]
    pub fiber_g: f64,
    #[serde(rename = "sugar")]
    pub sugar_g: f64,
    #[serde(rename = "sodium")]
    pub sodium_mg: f64,
    #[serde(rename = "net_carbs")]
    pub net_carbs_g: f64,
    #[serde(rename = "saturated_fat")]
    pub saturated_fat_g: f64,
    #[serde(rename = "cholesterol")]
    pub cholesterol_mg: f64,
    #[serde(rename = "mealCount")]
    pub meal_count: u32,
}

impl DailyTotals {
    /// Empty totals for a day with no meals logged
    #[must_use]
    pub const fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            calories: 0.0,
            protein_g: 0.0,
            carbs_g: 0.0,
            fat_g: 0.0,
            fiber_g: 0.0,
            sugar_g: 0.0,
            sodium_mg: 0.0,
            net_carbs_g: 0.0,
            saturated_fat_g: 0.0,
            cholesterol_mg: 0.0,
            meal_count: 0,
        }
    }

    /// The summed value for one nutrient
    #[must_use]
    pub const fn get(&self, nutrient: Nutrient) -> f64 {
        match nutrient {
            Nutrient::Calories => self.calories,
            Nutrient::Protein => self.protein_g,
            Nutrient::Carbs => self.carbs_g,
            Nutrient::Fat => self.fat_g,
            Nutrient::Fiber => self.fiber_g,
            Nutrient::Sugar => self.sugar_g,
            Nutrient::Sodium => self.sodium_mg,
            Nutrient::NetCarbs => self.net_carbs_g,
            Nutrient::SaturatedFat => self.saturated_fat_g,
            Nutrient::Cholesterol => self.cholesterol_mg,
        }
    }
}

/// A user-defined food with per-serving nutrients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomFood {
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    /// Human description of one serving (e.g. "1 cup cooked")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serving: Option<String>,
    #[serde(flatten)]
    pub nutrients: MealNutrients,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nutrient_key_roundtrip() {
        for nutrient in Nutrient::ALL {
            assert_eq!(Nutrient::from_key(nutrient.as_key()), Some(nutrient));
        }
        assert_eq!(Nutrient::from_key("caffeine"), None);
    }

    #[test]
    fn test_nutrient_serde_matches_key() {
        for nutrient in Nutrient::ALL {
            let json = serde_json::to_string(&nutrient).unwrap();
            assert_eq!(json, format!("\"{}\"", nutrient.as_key()));
        }
    }

    #[test]
    fn test_directionality_table() {
        assert_eq!(Nutrient::Calories.direction(), GoalDirection::Ceiling);
        assert_eq!(Nutrient::Sodium.direction(), GoalDirection::Ceiling);
        assert_eq!(Nutrient::SaturatedFat.direction(), GoalDirection::Ceiling);
        assert_eq!(Nutrient::Protein.direction(), GoalDirection::Floor);
        assert_eq!(Nutrient::Fiber.direction(), GoalDirection::Floor);
    }

    #[test]
    fn test_goal_map_serializes_with_nutrient_keys() {
        let mut goals = GoalMap::new();
        goals.insert(
            Nutrient::Calories,
            NutrientGoal {
                target: 2000.0,
                tolerance_percent: 10,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
        );
        let json = serde_json::to_value(&goals).unwrap();
        assert_eq!(json["calories"]["target"], 2000.0);
        assert_eq!(json["calories"]["tolerance"], 10);
    }

    #[test]
    fn test_meal_nutrients_merge_keeps_unset_fields() {
        let base = MealNutrients {
            calories: Some(500.0),
            protein_g: Some(30.0),
            ..MealNutrients::default()
        };
        let patch = MealNutrients {
            protein_g: Some(35.0),
            ..MealNutrients::default()
        };
        let merged = base.merged_with(&patch);
        assert_eq!(merged.calories, Some(500.0));
        assert_eq!(merged.protein_g, Some(35.0));
    }
}
