// ABOUTME: USDA FoodData Central API client for nutritional data retrieval
// ABOUTME: Implements food search, detail retrieval, barcode lookup, caching, and rate limiting
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Remy Nutrition Intelligence

//! USDA `FoodData` Central API Client
//!
//! Client for the USDA `FoodData` Central API, the food database behind
//! `search_foods`, `get_food_details`, and `lookup_barcode`. The API is
//! free and requires only an API key.
//!
//! # Features
//! - Food search with page-size control
//! - Detailed nutrient retrieval per FDC ID
//! - Barcode (GTIN/UPC) lookup against branded foods
//! - 24-hour caching to minimize API calls
//! - Rate limiting (30 requests per minute)
//! - Mock client for testing
//!
//! # API Reference
//! USDA `FoodData` Central API: <https://fdc.nal.usda.gov/api-guide.html>

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use remy_core::errors::{AppError, AppResult};

/// USDA API client configuration
#[derive(Debug, Clone)]
pub struct UsdaClientConfig {
    /// USDA API key (free from <https://fdc.nal.usda.gov/api-key-signup.html>)
    pub api_key: String,
    /// Base URL for USDA API
    pub base_url: String,
    /// Cache TTL in seconds (default: 86400 = 24 hours)
    pub cache_ttl_secs: u64,
    /// Rate limit per minute (default: 30)
    pub rate_limit_per_minute: u32,
}

impl Default for UsdaClientConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://api.nal.usda.gov/fdc/v1".to_string(),
            cache_ttl_secs: 86400,
            rate_limit_per_minute: 30,
        }
    }
}

/// One hit from a food search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodSearchResult {
    /// `FoodData` Central ID
    pub fdc_id: u64,
    /// Food description
    pub description: String,
    /// Data type (e.g. "Foundation", "SR Legacy", "Branded")
    pub data_type: String,
    /// Brand owner (branded foods only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand_owner: Option<String>,
    /// GTIN/UPC barcode (branded foods only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gtin_upc: Option<String>,
}

/// One nutrient amount within a food record (per 100g)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodNutrient {
    /// USDA nutrient ID
    pub nutrient_id: u32,
    /// Nutrient name (e.g. "Protein", "Energy")
    pub name: String,
    /// Amount per 100g
    pub amount: f64,
    /// Unit (e.g. "g", "kcal", "mg")
    pub unit: String,
}

/// Detailed food record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodDetails {
    pub fdc_id: u64,
    pub description: String,
    pub data_type: String,
    pub nutrients: Vec<FoodNutrient>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serving_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serving_size_unit: Option<String>,
}

// ── USDA wire format ────────────────────────────────────────────────────
// The API speaks camelCase; these private structs absorb it so the public
// types above stay in our own naming.

#[derive(Debug, Deserialize)]
struct SearchResponse {
    foods: Vec<SearchResponseFood>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResponseFood {
    fdc_id: u64,
    description: String,
    data_type: String,
    #[serde(default)]
    brand_owner: Option<String>,
    #[serde(default)]
    gtin_upc: Option<String>,
}

impl From<SearchResponseFood> for FoodSearchResult {
    fn from(food: SearchResponseFood) -> Self {
        Self {
            fdc_id: food.fdc_id,
            description: food.description,
            data_type: food.data_type,
            brand_owner: food.brand_owner,
            gtin_upc: food.gtin_upc,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FoodDetailsResponse {
    fdc_id: u64,
    description: String,
    data_type: String,
    food_nutrients: Vec<FoodNutrientResponse>,
    #[serde(default)]
    serving_size: Option<f64>,
    #[serde(default)]
    serving_size_unit: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FoodNutrientResponse {
    nutrient: Option<NutrientInfo>,
    amount: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NutrientInfo {
    id: u32,
    name: String,
    unit_name: String,
}

/// The food database seam consumed by tool handlers and the CLI
#[async_trait]
pub trait FoodSource: Send + Sync {
    /// Search for foods by free-text query
    async fn search_foods(&self, query: &str, page_size: u32)
        -> AppResult<Vec<FoodSearchResult>>;

    /// Get detailed nutrients for a specific food by FDC ID
    async fn get_food_details(&self, fdc_id: u64) -> AppResult<FoodDetails>;

    /// Look up a branded food by its GTIN/UPC barcode
    async fn lookup_barcode(&self, gtin: &str) -> AppResult<Option<FoodSearchResult>>;
}

/// Cache entry with expiration
#[derive(Debug, Clone)]
struct CacheEntry<T> {
    data: T,
    expires_at: Instant,
}

/// Rate limiter for API requests
#[derive(Debug)]
struct RateLimiter {
    requests: Vec<Instant>,
    limit: u32,
    window: Duration,
}

impl RateLimiter {
    const fn new(limit: u32, window: Duration) -> Self {
        Self {
            requests: Vec::new(),
            limit,
            window,
        }
    }

    /// Check if a request can be made, removing expired entries
    fn can_request(&mut self) -> bool {
        let now = Instant::now();
        self.requests
            .retain(|&t| now.duration_since(t) < self.window);
        self.requests.len() < self.limit as usize
    }

    fn record_request(&mut self) {
        self.requests.push(Instant::now());
    }

    /// Wait until a request can be made
    async fn wait_if_needed(&mut self) {
        while !self.can_request() {
            tokio::time::sleep(Duration::from_secs(1)).await;
        }
    }
}

/// USDA `FoodData` Central API Client
pub struct UsdaClient {
    config: UsdaClientConfig,
    http_client: reqwest::Client,
    search_cache: Arc<RwLock<HashMap<String, CacheEntry<Vec<FoodSearchResult>>>>>,
    details_cache: Arc<RwLock<HashMap<u64, CacheEntry<FoodDetails>>>>,
    rate_limiter: Arc<RwLock<RateLimiter>>,
}

impl UsdaClient {
    /// Create a new USDA API client
    #[must_use]
    pub fn new(config: UsdaClientConfig) -> Self {
        let rate_limiter = RateLimiter::new(config.rate_limit_per_minute, Duration::from_secs(60));
        Self {
            config,
            http_client: reqwest::Client::new(),
            search_cache: Arc::new(RwLock::new(HashMap::new())),
            details_cache: Arc::new(RwLock::new(HashMap::new())),
            rate_limiter: Arc::new(RwLock::new(rate_limiter)),
        }
    }

    async fn cached_search(&self, cache_key: &str) -> Option<Vec<FoodSearchResult>> {
        let cache = self.search_cache.read().await;
        cache
            .get(cache_key)
            .and_then(|entry| (Instant::now() < entry.expires_at).then(|| entry.data.clone()))
    }

    async fn store_search(&self, cache_key: String, data: Vec<FoodSearchResult>) {
        let mut cache = self.search_cache.write().await;
        cache.insert(
            cache_key,
            CacheEntry {
                data,
                expires_at: Instant::now() + Duration::from_secs(self.config.cache_ttl_secs),
            },
        );
    }

    async fn throttle(&self) {
        let mut limiter = self.rate_limiter.write().await;
        limiter.wait_if_needed().await;
        limiter.record_request();
    }

    /// One GET against the search endpoint with the given query parameters
    async fn fetch_search(&self, params: &[(&str, &str)]) -> AppResult<Vec<FoodSearchResult>> {
        self.throttle().await;

        let url = format!("{}/foods/search", self.config.base_url);
        let response = self
            .http_client
            .get(&url)
            .query(params)
            .query(&[("api_key", self.config.api_key.as_str())])
            .send()
            .await
            .map_err(|e| AppError::external_service("USDA API", e.to_string()))?;

        if !response.status().is_success() {
            return Err(AppError::external_service(
                "USDA API",
                format!(
                    "HTTP {}: {}",
                    response.status(),
                    response.text().await.unwrap_or_default()
                ),
            ));
        }

        let search_response: SearchResponse = response.json().await.map_err(|e| {
            AppError::external_service("USDA API", format!("JSON parse error: {e}"))
        })?;

        Ok(search_response
            .foods
            .into_iter()
            .map(FoodSearchResult::from)
            .collect())
    }
}

#[async_trait]
impl FoodSource for UsdaClient {
    async fn search_foods(
        &self,
        query: &str,
        page_size: u32,
    ) -> AppResult<Vec<FoodSearchResult>> {
        if query.is_empty() {
            return Err(AppError::invalid_input("Search query cannot be empty"));
        }
        if page_size == 0 || page_size > crate::constants::limits::MAX_FOOD_SEARCH_PAGE_SIZE {
            return Err(AppError::invalid_input(
                "Page size must be between 1 and 200",
            ));
        }

        let cache_key = format!("{query}:{page_size}");
        if let Some(hit) = self.cached_search(&cache_key).await {
            return Ok(hit);
        }

        let foods = self
            .fetch_search(&[("query", query), ("pageSize", &page_size.to_string())])
            .await?;

        self.store_search(cache_key, foods.clone()).await;
        Ok(foods)
    }

    async fn get_food_details(&self, fdc_id: u64) -> AppResult<FoodDetails> {
        {
            let cache = self.details_cache.read().await;
            if let Some(entry) = cache.get(&fdc_id) {
                if Instant::now() < entry.expires_at {
                    return Ok(entry.data.clone());
                }
            }
        }

        self.throttle().await;

        let url = format!("{}/food/{fdc_id}", self.config.base_url);
        let response = self
            .http_client
            .get(&url)
            .query(&[("api_key", self.config.api_key.as_str())])
            .send()
            .await
            .map_err(|e| AppError::external_service("USDA API", e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(AppError::not_found(format!("Food with FDC ID {fdc_id}")));
        }
        if !response.status().is_success() {
            return Err(AppError::external_service(
                "USDA API",
                format!(
                    "HTTP {}: {}",
                    response.status(),
                    response.text().await.unwrap_or_default()
                ),
            ));
        }

        let details: FoodDetailsResponse = response.json().await.map_err(|e| {
            AppError::external_service("USDA API", format!("JSON parse error: {e}"))
        })?;

        let nutrients: Vec<FoodNutrient> = details
            .food_nutrients
            .into_iter()
            .filter_map(|n| {
                let nutrient = n.nutrient?;
                Some(FoodNutrient {
                    nutrient_id: nutrient.id,
                    name: nutrient.name,
                    amount: n.amount.unwrap_or(0.0),
                    unit: nutrient.unit_name,
                })
            })
            .collect();

        let food_details = FoodDetails {
            fdc_id: details.fdc_id,
            description: details.description,
            data_type: details.data_type,
            nutrients,
            serving_size: details.serving_size,
            serving_size_unit: details.serving_size_unit,
        };

        {
            let mut cache = self.details_cache.write().await;
            cache.insert(
                fdc_id,
                CacheEntry {
                    data: food_details.clone(),
                    expires_at: Instant::now() + Duration::from_secs(self.config.cache_ttl_secs),
                },
            );
        }

        Ok(food_details)
    }

    async fn lookup_barcode(&self, gtin: &str) -> AppResult<Option<FoodSearchResult>> {
        let gtin = gtin.trim();
        if gtin.is_empty() || !gtin.chars().all(|c| c.is_ascii_digit()) {
            return Err(AppError::invalid_input(
                "Barcode must be a non-empty string of digits",
            ));
        }

        let cache_key = format!("barcode:{gtin}");
        if let Some(hit) = self.cached_search(&cache_key).await {
            return Ok(hit.into_iter().next());
        }

        // Branded foods carry the GTIN; the query term matches it verbatim
        let foods = self
            .fetch_search(&[("query", gtin), ("dataType", "Branded"), ("pageSize", "10")])
            .await?;

        // Label and database codes disagree on zero padding; compare with
        // leading zeros stripped on both sides
        let wanted = gtin.trim_start_matches('0');
        let matched: Vec<FoodSearchResult> = foods
            .into_iter()
            .filter(|f| {
                f.gtin_upc
                    .as_deref()
                    .is_some_and(|code| code.trim_start_matches('0') == wanted)
            })
            .collect();

        self.store_search(cache_key, matched.clone()).await;
        Ok(matched.into_iter().next())
    }
}

/// Mock USDA client for testing (no API calls)
pub struct MockUsdaClient {
    mock_foods: HashMap<u64, FoodDetails>,
    mock_barcodes: HashMap<String, u64>,
}

impl MockUsdaClient {
    /// Create a new mock client with predefined test data
    #[must_use]
    pub fn new() -> Self {
        let mut mock_foods = HashMap::new();
        let mut mock_barcodes = HashMap::new();

        // Chicken breast (SR Legacy)
        mock_foods.insert(
            171_477,
            FoodDetails {
                fdc_id: 171_477,
                description: "Chicken, breast, meat only, cooked, roasted".to_string(),
                data_type: "SR Legacy".to_string(),
                nutrients: vec![
                    FoodNutrient {
                        nutrient_id: 1003,
                        name: "Protein".to_string(),
                        amount: 31.02,
                        unit: "g".to_string(),
                    },
                    FoodNutrient {
                        nutrient_id: 1004,
                        name: "Total lipid (fat)".to_string(),
                        amount: 3.57,
                        unit: "g".to_string(),
                    },
                    FoodNutrient {
                        nutrient_id: 1005,
                        name: "Carbohydrate, by difference".to_string(),
                        amount: 0.0,
                        unit: "g".to_string(),
                    },
                    FoodNutrient {
                        nutrient_id: 1008,
                        name: "Energy".to_string(),
                        amount: 165.0,
                        unit: "kcal".to_string(),
                    },
                ],
                serving_size: Some(100.0),
                serving_size_unit: Some("g".to_string()),
            },
        );

        // Apple (SR Legacy)
        mock_foods.insert(
            171_688,
            FoodDetails {
                fdc_id: 171_688,
                description: "Apples, raw, with skin".to_string(),
                data_type: "SR Legacy".to_string(),
                nutrients: vec![
                    FoodNutrient {
                        nutrient_id: 1003,
                        name: "Protein".to_string(),
                        amount: 0.26,
                        unit: "g".to_string(),
                    },
                    FoodNutrient {
                        nutrient_id: 1005,
                        name: "Carbohydrate, by difference".to_string(),
                        amount: 13.81,
                        unit: "g".to_string(),
                    },
                    FoodNutrient {
                        nutrient_id: 1008,
                        name: "Energy".to_string(),
                        amount: 52.0,
                        unit: "kcal".to_string(),
                    },
                ],
                serving_size: Some(182.0),
                serving_size_unit: Some("g".to_string()),
            },
        );

        // A branded yogurt with a barcode
        mock_foods.insert(
            2_101_955,
            FoodDetails {
                fdc_id: 2_101_955,
                description: "Greek Yogurt, Plain, Nonfat".to_string(),
                data_type: "Branded".to_string(),
                nutrients: vec![
                    FoodNutrient {
                        nutrient_id: 1003,
                        name: "Protein".to_string(),
                        amount: 10.2,
                        unit: "g".to_string(),
                    },
                    FoodNutrient {
                        nutrient_id: 1008,
                        name: "Energy".to_string(),
                        amount: 59.0,
                        unit: "kcal".to_string(),
                    },
                ],
                serving_size: Some(170.0),
                serving_size_unit: Some("g".to_string()),
            },
        );
        mock_barcodes.insert("0894700010137".to_string(), 2_101_955);

        Self {
            mock_foods,
            mock_barcodes,
        }
    }

    fn search_result_for(&self, details: &FoodDetails) -> FoodSearchResult {
        let gtin_upc = self
            .mock_barcodes
            .iter()
            .find(|(_, &id)| id == details.fdc_id)
            .map(|(code, _)| code.clone());
        FoodSearchResult {
            fdc_id: details.fdc_id,
            description: details.description.clone(),
            data_type: details.data_type.clone(),
            brand_owner: None,
            gtin_upc,
        }
    }
}

impl Default for MockUsdaClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FoodSource for MockUsdaClient {
    async fn search_foods(
        &self,
        query: &str,
        _page_size: u32,
    ) -> AppResult<Vec<FoodSearchResult>> {
        if query.is_empty() {
            return Err(AppError::invalid_input("Search query cannot be empty"));
        }
        let query_lower = query.to_lowercase();
        let mut results: Vec<FoodSearchResult> = self
            .mock_foods
            .values()
            .filter(|food| food.description.to_lowercase().contains(&query_lower))
            .map(|food| self.search_result_for(food))
            .collect();
        results.sort_by_key(|f| f.fdc_id);
        Ok(results)
    }

    async fn get_food_details(&self, fdc_id: u64) -> AppResult<FoodDetails> {
        self.mock_foods
            .get(&fdc_id)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("Food with FDC ID {fdc_id}")))
    }

    async fn lookup_barcode(&self, gtin: &str) -> AppResult<Option<FoodSearchResult>> {
        let wanted = gtin.trim().trim_start_matches('0');
        Ok(self
            .mock_barcodes
            .iter()
            .find(|(code, _)| code.trim_start_matches('0') == wanted)
            .and_then(|(_, id)| self.mock_foods.get(id))
            .map(|details| self.search_result_for(details)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_search_filters_by_description() {
        let client = MockUsdaClient::new();
        let results = client.search_foods("chicken", 10).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].fdc_id, 171_477);
    }

    #[tokio::test]
    async fn test_mock_empty_query_is_rejected() {
        let client = MockUsdaClient::new();
        assert!(client.search_foods("", 10).await.is_err());
    }

    #[tokio::test]
    async fn test_mock_barcode_lookup_ignores_leading_zeros() {
        let client = MockUsdaClient::new();
        let hit = client.lookup_barcode("894700010137").await.unwrap();
        assert_eq!(hit.unwrap().fdc_id, 2_101_955);
        assert!(client
            .lookup_barcode("000000000000")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_mock_details_not_found() {
        let client = MockUsdaClient::new();
        let err = client.get_food_details(42).await.unwrap_err();
        assert!(err.message.contains("not found"));
    }
}
