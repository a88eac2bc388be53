// ABOUTME: External API client modules (USDA FoodData Central)
// ABOUTME: Food search, detail, and barcode lookup behind the FoodSource seam
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Remy Nutrition Intelligence

//! External API Clients
//!
//! The USDA FoodData Central client, behind the [`usda_client::FoodSource`]
//! trait so tool handlers can be tested against the mock.

pub mod usda_client;

// Re-export commonly used types
pub use usda_client::{
    FoodDetails, FoodNutrient, FoodSearchResult, FoodSource, MockUsdaClient, UsdaClient,
    UsdaClientConfig,
};
