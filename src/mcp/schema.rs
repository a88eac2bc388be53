// ABOUTME: MCP tool schema definitions
// ABOUTME: Declares the nutrition tool surface advertised by tools/list
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Remy Nutrition Intelligence

//! MCP tool schemas.
//!
//! One [`ToolDef`] per tool, with a JSON Schema for its parameters. Tool
//! names come from [`crate::constants::tools`] so the schema, dispatch, and
//! tests cannot drift apart.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::constants::tools;

/// A tool definition for the MCP tools/list response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDef {
    /// Tool name (e.g. "log_meal")
    pub name: String,
    /// Tool description shown to the model
    pub description: String,
    /// JSON Schema for the input parameters
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

impl ToolDef {
    /// Create a new tool definition
    #[must_use]
    pub fn new(name: &str, description: &str, input_schema: Value) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            input_schema,
        }
    }
}

/// Schema fragment for per-meal nutrient amounts
fn nutrient_amount_properties() -> Value {
    json!({
        "calories": {"type": "number", "description": "Energy in kcal"},
        "protein_g": {"type": "number", "description": "Protein in grams"},
        "carbs_g": {"type": "number", "description": "Carbohydrates in grams"},
        "fat_g": {"type": "number", "description": "Total fat in grams"},
        "fiber_g": {"type": "number", "description": "Fiber in grams"},
        "sugar_g": {"type": "number", "description": "Sugar in grams"},
        "sodium_mg": {"type": "number", "description": "Sodium in milligrams"},
        "saturated_fat_g": {"type": "number", "description": "Saturated fat in grams"},
        "cholesterol_mg": {"type": "number", "description": "Cholesterol in milligrams"}
    })
}

/// Schema for `log_meal`: name and date plus every nutrient amount field
fn log_meal_schema() -> Value {
    let mut properties = json!({
        "name": {"type": "string", "description": "Meal description"},
        "date": {"type": "string", "description": "ISO date (defaults to today)"}
    });
    if let (Some(base), Some(nutrients)) = (
        properties.as_object_mut(),
        nutrient_amount_properties().as_object(),
    ) {
        base.extend(nutrients.clone());
    }
    json!({
        "type": "object",
        "properties": properties,
        "required": ["name"]
    })
}

/// The full tool surface advertised via tools/list
#[must_use]
pub fn tool_definitions() -> Vec<ToolDef> {
    vec![
        ToolDef::new(
            tools::SET_NUTRITION_GOALS,
            "Set or update nutrition goals. Each goal has a target and an optional \
             tolerance percentage (0-100) that widens the target into a grace band. \
             Partial updates are allowed; a tolerance requires an existing target.",
            json!({
                "type": "object",
                "properties": {
                    "goals": {
                        "type": "object",
                        "description": "Map of nutrient name to {target, tolerance}",
                        "additionalProperties": {
                            "type": "object",
                            "properties": {
                                "target": {"type": "number", "minimum": 0},
                                "tolerance": {"type": "integer", "minimum": 0, "maximum": 100}
                            }
                        }
                    }
                },
                "required": ["goals"]
            }),
        ),
        ToolDef::new(
            tools::GET_NUTRITION_GOALS,
            "Get the current nutrition goals (target and tolerance per nutrient).",
            json!({"type": "object", "properties": {}}),
        ),
        ToolDef::new(
            tools::GET_PROGRESS,
            "Get today's goal progress: per-nutrient target, tolerance, band, zone \
             (met/near/over/under), and actual total, plus current and longest \
             compliance streaks over the lookback window.",
            json!({
                "type": "object",
                "properties": {
                    "date": {"type": "string", "description": "ISO date (defaults to today)"},
                    "lookback_days": {"type": "integer", "minimum": 1, "maximum": 365}
                }
            }),
        ),
        ToolDef::new(
            tools::GET_DAILY_TOTALS,
            "Get summed nutrient totals and the list of meals for one day.",
            json!({
                "type": "object",
                "properties": {
                    "date": {"type": "string", "description": "ISO date (defaults to today)"}
                }
            }),
        ),
        ToolDef::new(
            tools::LOG_MEAL,
            "Log a meal with its nutrient amounts. Unknown amounts can be omitted.",
            log_meal_schema(),
        ),
        ToolDef::new(
            tools::DELETE_MEAL,
            "Delete a logged meal by id.",
            json!({
                "type": "object",
                "properties": {
                    "meal_id": {"type": "string", "description": "Meal UUID"}
                },
                "required": ["meal_id"]
            }),
        ),
        ToolDef::new(
            tools::GET_MEAL_HISTORY,
            "Get logged meals over the last N days.",
            json!({
                "type": "object",
                "properties": {
                    "days": {"type": "integer", "minimum": 1, "maximum": 365}
                }
            }),
        ),
        ToolDef::new(
            tools::SEARCH_MEAL_LOGS,
            "Search previously logged meals by name.",
            json!({
                "type": "object",
                "properties": {
                    "query": {"type": "string"},
                    "limit": {"type": "integer", "minimum": 1}
                },
                "required": ["query"]
            }),
        ),
        ToolDef::new(
            tools::SEARCH_FOODS,
            "Search the USDA FoodData Central database by food name.",
            json!({
                "type": "object",
                "properties": {
                    "query": {"type": "string", "description": "e.g. \"chicken breast\""},
                    "page_size": {"type": "integer", "minimum": 1, "maximum": 200}
                },
                "required": ["query"]
            }),
        ),
        ToolDef::new(
            tools::GET_FOOD_DETAILS,
            "Get full nutrient details for a USDA food by FoodData Central ID.",
            json!({
                "type": "object",
                "properties": {
                    "fdc_id": {"type": "integer"}
                },
                "required": ["fdc_id"]
            }),
        ),
        ToolDef::new(
            tools::LOOKUP_BARCODE,
            "Look up a branded food by its GTIN/UPC barcode.",
            json!({
                "type": "object",
                "properties": {
                    "barcode": {"type": "string", "description": "GTIN/UPC digits"}
                },
                "required": ["barcode"]
            }),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_tool_has_object_schema() {
        let defs = tool_definitions();
        assert_eq!(defs.len(), 11);
        for def in &defs {
            assert_eq!(def.input_schema["type"], "object", "{}", def.name);
        }
    }

    #[test]
    fn test_tool_names_are_unique() {
        let defs = tool_definitions();
        let mut names: Vec<&str> = defs.iter().map(|d| d.name.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), defs.len());
    }

    #[test]
    fn test_log_meal_schema_includes_nutrient_fields() {
        let defs = tool_definitions();
        let log_meal = defs
            .iter()
            .find(|d| d.name == crate::constants::tools::LOG_MEAL)
            .unwrap();
        let properties = log_meal.input_schema["properties"].as_object().unwrap();
        assert!(properties.contains_key("name"));
        assert!(properties.contains_key("calories"));
        assert!(properties.contains_key("saturated_fat_g"));
    }
}
