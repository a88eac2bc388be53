// ABOUTME: `food` commands - USDA FoodData Central search, details, and barcode lookup
// ABOUTME: Requires USDA_API_KEY; fails with a config error otherwise
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Remy Nutrition Intelligence

use clap::Subcommand;
use serde_json::json;

use remy_mcp_server::constants::defaults;
use remy_mcp_server::errors::{AppError, AppResult};
use remy_mcp_server::external::{FoodSource, UsdaClient, UsdaClientConfig};

use super::print_json;

#[non_exhaustive]
#[derive(Subcommand)]
pub enum FoodCommand {
    /// Search foods by name
    Search {
        /// Free-text query (e.g. "chicken breast")
        query: String,

        /// Number of results
        #[arg(long, default_value_t = defaults::FOOD_SEARCH_PAGE_SIZE)]
        page_size: u32,
    },

    /// Full nutrient details for one food
    Details {
        /// FoodData Central ID
        fdc_id: u64,
    },

    /// Look up a branded food by GTIN/UPC barcode
    Barcode {
        /// Barcode digits
        code: String,
    },
}

fn client(api_key: Option<&str>) -> AppResult<UsdaClient> {
    let api_key = api_key.ok_or_else(|| {
        AppError::config("USDA API key not configured. Set USDA_API_KEY environment variable.")
    })?;
    Ok(UsdaClient::new(UsdaClientConfig {
        api_key: api_key.to_owned(),
        ..UsdaClientConfig::default()
    }))
}

/// Dispatch a `food` subcommand
pub async fn run(api_key: Option<&str>, action: FoodCommand) -> AppResult<()> {
    let client = client(api_key)?;
    match action {
        FoodCommand::Search { query, page_size } => {
            let foods = client.search_foods(&query, page_size).await?;
            print_json(&json!({"total": foods.len(), "foods": foods}))
        }
        FoodCommand::Details { fdc_id } => {
            let details = client.get_food_details(fdc_id).await?;
            print_json(&details)
        }
        FoodCommand::Barcode { code } => {
            let hit = client.lookup_barcode(&code).await?;
            match hit {
                Some(food) => print_json(&json!({"found": true, "food": food})),
                None => print_json(&json!({"found": false})),
            }
        }
    }
}
