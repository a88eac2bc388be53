// ABOUTME: Integration tests for the MCP tool surface and JSON contract
// ABOUTME: Drives ToolHandlers and McpServer with the in-memory store and mock USDA client
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Remy Nutrition Intelligence

mod common;

use std::sync::Arc;

use common::{calories_only, day, init_test_logging, meal_on, single_goal, TEST_USER};
use serde_json::{json, Value};

use remy_mcp_server::constants::tools;
use remy_mcp_server::database::{MemoryStore, NutritionStore};
use remy_mcp_server::external::MockUsdaClient;
use remy_mcp_server::jsonrpc::JsonRpcRequest;
use remy_mcp_server::mcp::{McpServer, ToolHandlers};
use remy_mcp_server::models::Nutrient;

fn handlers_with(store: Arc<MemoryStore>) -> ToolHandlers {
    ToolHandlers::new(store, Some(Arc::new(MockUsdaClient::new())), TEST_USER, 30)
}

fn handlers() -> ToolHandlers {
    handlers_with(Arc::new(MemoryStore::new()))
}

#[tokio::test]
async fn test_set_and_get_goals_contract() {
    init_test_logging();
    let handlers = handlers();

    let result = handlers
        .call(
            tools::SET_NUTRITION_GOALS,
            &json!({"goals": {"calories": {"target": 2000, "tolerance": 10}}}),
        )
        .await
        .unwrap();
    assert_eq!(result["success"], true);
    assert_eq!(result["goals"]["calories"]["target"], 2000.0);
    assert_eq!(result["goals"]["calories"]["tolerance"], 10);

    let goals = handlers
        .call(tools::GET_NUTRITION_GOALS, &json!({}))
        .await
        .unwrap();
    assert_eq!(goals["hasGoals"], true);
    assert_eq!(goals["goals"]["calories"]["tolerance"], 10);
}

#[tokio::test]
async fn test_out_of_range_tolerance_surfaces_the_message() {
    init_test_logging();
    let handlers = handlers();

    let err = handlers
        .call(
            tools::SET_NUTRITION_GOALS,
            &json!({"goals": {"calories": {"target": 2000, "tolerance": 120}}}),
        )
        .await
        .unwrap_err();
    assert!(err.message.contains("must be 0-100"), "{}", err.message);
}

#[tokio::test]
async fn test_tolerance_without_target_fails_through_the_tool() {
    init_test_logging();
    let handlers = handlers();

    let err = handlers
        .call(
            tools::SET_NUTRITION_GOALS,
            &json!({"goals": {"protein": {"tolerance": 20}}}),
        )
        .await
        .unwrap_err();
    assert!(err.message.contains("no target"), "{}", err.message);

    // and nothing was stored
    let goals = handlers
        .call(tools::GET_NUTRITION_GOALS, &json!({}))
        .await
        .unwrap();
    assert_eq!(goals["hasGoals"], false);
}

#[tokio::test]
async fn test_unknown_nutrient_is_rejected() {
    init_test_logging();
    let handlers = handlers();

    let err = handlers
        .call(
            tools::SET_NUTRITION_GOALS,
            &json!({"goals": {"caffeine": {"target": 200}}}),
        )
        .await
        .unwrap_err();
    assert!(err.message.contains("unknown nutrient"));
}

#[tokio::test]
async fn test_log_meal_then_daily_totals_meal_count() {
    init_test_logging();
    let handlers = handlers();

    handlers
        .call(
            tools::LOG_MEAL,
            &json!({"name": "Oatmeal", "date": "2025-06-01", "calories": 320, "protein_g": 12}),
        )
        .await
        .unwrap();
    handlers
        .call(
            tools::LOG_MEAL,
            &json!({"name": "Salad", "date": "2025-06-01", "calories": 410}),
        )
        .await
        .unwrap();

    let totals = handlers
        .call(tools::GET_DAILY_TOTALS, &json!({"date": "2025-06-01"}))
        .await
        .unwrap();
    assert_eq!(totals["date"], "2025-06-01");
    assert_eq!(totals["totals"]["mealCount"], 2);
    assert_eq!(totals["totals"]["calories"], 730.0);
    assert_eq!(totals["totals"]["protein"], 12.0);
    assert_eq!(totals["meals"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_progress_contract_fields_and_streaks() {
    init_test_logging();
    let store = Arc::new(MemoryStore::new());
    store
        .set_user_goals(
            TEST_USER,
            &single_goal(Nutrient::Calories, 2000.0, 10, day(2025, 1, 1)),
        )
        .await
        .unwrap();
    for dom in 1..=5 {
        store
            .log_meal(&meal_on(day(2025, 6, dom), "Meals", calories_only(2100.0)))
            .await
            .unwrap();
    }
    let handlers = handlers_with(store);

    let progress = handlers
        .call(
            tools::GET_PROGRESS,
            &json!({"date": "2025-06-05", "lookback_days": 5}),
        )
        .await
        .unwrap();

    assert_eq!(progress["hasGoals"], true);
    let calories = &progress["nutrients"]["calories"];
    assert_eq!(calories["target"], 2000.0);
    assert_eq!(calories["tolerance"], 10);
    assert_eq!(calories["band"], 2200.0);
    assert_eq!(calories["zone"], "near");
    assert_eq!(calories["actual"], 2100.0);
    assert_eq!(progress["streaks"]["calories"]["current"], 5);
    assert_eq!(progress["streaks"]["calories"]["longest"], 5);
}

#[tokio::test]
async fn test_delete_meal_requires_valid_id() {
    init_test_logging();
    let handlers = handlers();

    let err = handlers
        .call(tools::DELETE_MEAL, &json!({}))
        .await
        .unwrap_err();
    assert!(err.message.contains("meal_id"));

    let err = handlers
        .call(tools::DELETE_MEAL, &json!({"meal_id": "not-a-uuid"}))
        .await
        .unwrap_err();
    assert!(err.message.contains("invalid meal id"));

    let err = handlers
        .call(
            tools::DELETE_MEAL,
            &json!({"meal_id": "00000000-0000-4000-8000-000000000000"}),
        )
        .await
        .unwrap_err();
    assert!(err.message.contains("not found"));
}

#[tokio::test]
async fn test_food_search_and_barcode_through_mock() {
    init_test_logging();
    let handlers = handlers();

    let foods = handlers
        .call(tools::SEARCH_FOODS, &json!({"query": "apple"}))
        .await
        .unwrap();
    assert_eq!(foods["total"], 1);
    assert_eq!(foods["foods"][0]["fdc_id"], 171_688);

    let hit = handlers
        .call(tools::LOOKUP_BARCODE, &json!({"barcode": "0894700010137"}))
        .await
        .unwrap();
    assert_eq!(hit["found"], true);
    assert_eq!(hit["food"]["data_type"], "Branded");

    let miss = handlers
        .call(tools::LOOKUP_BARCODE, &json!({"barcode": "1111111"}))
        .await
        .unwrap();
    assert_eq!(miss["found"], false);
}

#[tokio::test]
async fn test_food_tools_fail_without_a_source() {
    init_test_logging();
    let handlers = ToolHandlers::new(Arc::new(MemoryStore::new()), None, TEST_USER, 30);

    let err = handlers
        .call(tools::SEARCH_FOODS, &json!({"query": "apple"}))
        .await
        .unwrap_err();
    assert!(err.message.contains("USDA_API_KEY"));
}

#[tokio::test]
async fn test_unknown_tool_is_rejected() {
    init_test_logging();
    let handlers = handlers();
    let err = handlers
        .call("fly_to_the_moon", &json!({}))
        .await
        .unwrap_err();
    assert!(err.message.contains("Unknown tool"));
}

// ── Transport-level checks ──────────────────────────────────────────────

fn request(method: &str, params: Value) -> JsonRpcRequest {
    JsonRpcRequest::new(method, Some(params))
}

#[tokio::test]
async fn test_initialize_and_tools_list() {
    init_test_logging();
    let server = McpServer::new(handlers());

    let response = server
        .handle_request(request("initialize", json!({})))
        .await
        .unwrap();
    assert!(response.is_success());
    let result = response.result.unwrap();
    assert_eq!(result["serverInfo"]["name"], "remy-mcp-server");
    assert!(result["protocolVersion"].as_str().is_some());

    let response = server
        .handle_request(request("tools/list", json!({})))
        .await
        .unwrap();
    let result = response.result.unwrap();
    let listed = result["tools"].as_array().unwrap();
    assert_eq!(listed.len(), 11);
    assert!(listed
        .iter()
        .any(|t| t["name"] == tools::GET_PROGRESS && t["inputSchema"]["type"] == "object"));
}

#[tokio::test]
async fn test_tools_call_wraps_result_in_content() {
    init_test_logging();
    let server = McpServer::new(handlers());

    let response = server
        .handle_request(request(
            "tools/call",
            json!({"name": tools::GET_NUTRITION_GOALS, "arguments": {}}),
        ))
        .await
        .unwrap();
    assert!(response.is_success());
    let result = response.result.unwrap();
    assert_eq!(result["isError"], false);
    let text = result["content"][0]["text"].as_str().unwrap();
    let payload: Value = serde_json::from_str(text).unwrap();
    assert_eq!(payload["hasGoals"], false);
}

#[tokio::test]
async fn test_tools_call_validation_error_maps_to_invalid_params() {
    init_test_logging();
    let server = McpServer::new(handlers());

    let response = server
        .handle_request(request(
            "tools/call",
            json!({
                "name": tools::SET_NUTRITION_GOALS,
                "arguments": {"goals": {"calories": {"target": 2000, "tolerance": 400}}}
            }),
        ))
        .await
        .unwrap();
    let error = response.error.unwrap();
    assert_eq!(error.code, -32602);
    assert!(error.message.contains("must be 0-100"));
}

#[tokio::test]
async fn test_notifications_get_no_response() {
    init_test_logging();
    let server = McpServer::new(handlers());

    let response = server
        .handle_line(r#"{"jsonrpc": "2.0", "method": "notifications/initialized"}"#)
        .await;
    assert!(response.is_none());
}

#[tokio::test]
async fn test_unparseable_line_yields_parse_error() {
    init_test_logging();
    let server = McpServer::new(handlers());

    let response = server.handle_line("this is not json").await.unwrap();
    assert_eq!(response.error.unwrap().code, -32700);
}
