// ABOUTME: CLI subcommand modules and shared argument helpers
// ABOUTME: Date resolution and nutrient flag parsing used by several commands
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Remy Nutrition Intelligence

pub mod food;
pub mod goals;
pub mod meal;
pub mod progress;
pub mod today;

use chrono::{Local, NaiveDate};
use remy_mcp_server::errors::{AppError, AppResult};
use remy_mcp_server::models::MealNutrients;

/// Resolve a `--date` value: a signed day offset (`-1` = yesterday) or an
/// ISO date; today when absent.
pub fn resolve_date(raw: Option<&str>) -> AppResult<NaiveDate> {
    let today = Local::now().date_naive();
    match raw {
        None => Ok(today),
        Some(s) => {
            if let Ok(offset) = s.parse::<i64>() {
                today
                    .checked_add_signed(chrono::Duration::days(offset))
                    .ok_or_else(|| AppError::invalid_input(format!("date offset out of range: {s}")))
            } else {
                NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| {
                    AppError::invalid_input(format!(
                        "invalid date: {s} (want an offset like -1 or YYYY-MM-DD)"
                    ))
                })
            }
        }
    }
}

/// Per-meal nutrient amount flags, shared by `meal log` and `meal edit`
#[derive(Debug, clap::Args)]
pub struct NutrientArgs {
    /// Energy in kcal
    #[arg(long)]
    pub calories: Option<f64>,

    /// Protein in grams
    #[arg(long)]
    pub protein: Option<f64>,

    /// Carbohydrates in grams
    #[arg(long)]
    pub carbs: Option<f64>,

    /// Total fat in grams
    #[arg(long)]
    pub fat: Option<f64>,

    /// Fiber in grams
    #[arg(long)]
    pub fiber: Option<f64>,

    /// Sugar in grams
    #[arg(long)]
    pub sugar: Option<f64>,

    /// Sodium in milligrams
    #[arg(long)]
    pub sodium: Option<f64>,

    /// Saturated fat in grams
    #[arg(long = "saturated-fat")]
    pub saturated_fat: Option<f64>,

    /// Cholesterol in milligrams
    #[arg(long)]
    pub cholesterol: Option<f64>,
}

impl NutrientArgs {
    /// Convert the flags into the storage representation
    #[must_use]
    pub const fn to_nutrients(&self) -> MealNutrients {
        MealNutrients {
            calories: self.calories,
            protein_g: self.protein,
            carbs_g: self.carbs,
            fat_g: self.fat,
            fiber_g: self.fiber,
            sugar_g: self.sugar,
            sodium_mg: self.sodium,
            saturated_fat_g: self.saturated_fat,
            cholesterol_mg: self.cholesterol,
        }
    }
}

/// Print a value as pretty JSON on stdout
pub fn print_json<T: serde::Serialize>(value: &T) -> AppResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
