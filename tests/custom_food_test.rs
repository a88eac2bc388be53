// ABOUTME: Integration tests for user-defined custom foods
// ABOUTME: Create, lookup, list, and delete against memory and SQLite stores
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Remy Nutrition Intelligence

mod common;

use common::{init_test_logging, TEST_USER};
use tempfile::TempDir;
use uuid::Uuid;

use remy_mcp_server::database::{NutritionStore, SqliteStore};
use remy_mcp_server::models::{CustomFood, MealNutrients};

fn overnight_oats() -> CustomFood {
    CustomFood {
        id: Uuid::new_v4(),
        user_id: TEST_USER.to_owned(),
        name: "Overnight oats".to_owned(),
        serving: Some("1 jar".to_owned()),
        nutrients: MealNutrients {
            calories: Some(380.0),
            protein_g: Some(14.0),
            carbs_g: Some(58.0),
            fiber_g: Some(8.0),
            ..MealNutrients::default()
        },
    }
}

async fn store(dir: &TempDir) -> SqliteStore {
    let url = format!("sqlite:{}", dir.path().join("foods-test.db").display());
    let store = SqliteStore::new(&url).await.unwrap();
    store.migrate().await.unwrap();
    store
}

#[tokio::test]
async fn test_create_and_lookup_by_name() {
    init_test_logging();
    let dir = TempDir::new().unwrap();
    let store = store(&dir).await;

    store.create_custom_food(&overnight_oats()).await.unwrap();

    // lookup ignores case
    let found = store
        .get_custom_food_by_name(TEST_USER, "overnight OATS")
        .await
        .unwrap()
        .expect("food should exist");
    assert_eq!(found.nutrients.calories, Some(380.0));
    assert_eq!(found.serving.as_deref(), Some("1 jar"));

    let missing = store
        .get_custom_food_by_name(TEST_USER, "unicorn stew")
        .await
        .unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn test_duplicate_name_is_rejected() {
    init_test_logging();
    let dir = TempDir::new().unwrap();
    let store = store(&dir).await;

    store.create_custom_food(&overnight_oats()).await.unwrap();
    let err = store.create_custom_food(&overnight_oats()).await.unwrap_err();
    assert!(err.message.contains("already exists"));
}

#[tokio::test]
async fn test_list_is_sorted_and_scoped_to_user() {
    init_test_logging();
    let dir = TempDir::new().unwrap();
    let store = store(&dir).await;

    let mut second = overnight_oats();
    second.id = Uuid::new_v4();
    second.name = "Banana bread".to_owned();
    store.create_custom_food(&overnight_oats()).await.unwrap();
    store.create_custom_food(&second).await.unwrap();

    let mut foreign = overnight_oats();
    foreign.id = Uuid::new_v4();
    foreign.user_id = "someone_else".to_owned();
    store.create_custom_food(&foreign).await.unwrap();

    let foods = store.list_custom_foods(TEST_USER).await.unwrap();
    let names: Vec<&str> = foods.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, ["Banana bread", "Overnight oats"]);
}

#[tokio::test]
async fn test_delete_unknown_food_is_not_found() {
    init_test_logging();
    let dir = TempDir::new().unwrap();
    let store = store(&dir).await;

    let err = store
        .delete_custom_food(TEST_USER, Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(err.message.contains("not found"));
}

#[tokio::test]
async fn test_delete_removes_the_food() {
    init_test_logging();
    let dir = TempDir::new().unwrap();
    let store = store(&dir).await;

    let food = overnight_oats();
    store.create_custom_food(&food).await.unwrap();
    store.delete_custom_food(TEST_USER, food.id).await.unwrap();

    assert!(store
        .get_custom_food_by_name(TEST_USER, &food.name)
        .await
        .unwrap()
        .is_none());
}
