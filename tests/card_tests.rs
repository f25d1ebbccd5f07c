//! Tests for the flashcard API and snapshot consistency over HTTP.

mod common;

use axum::http::StatusCode;
use common::{create_authenticated_account, create_test_app, send};
use serde_json::json;

async fn create_list(app: &axum::Router, token: &str, name: &str) -> String {
    let (status, body) = send(app, "POST", "/api/lists", Some(token), Some(json!({"name": name}))).await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

/// Full lifecycle: register over the API, create a list, add a card,
/// observe the embedded snapshot, delete the card, observe both
/// representations emptied.
#[tokio::test]
async fn test_card_lifecycle_keeps_list_snapshot_in_step() {
    let (app, _db, _keys) = create_test_app().await;

    let (status, account) = send(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({"name": "A", "email": "a@x.com", "password": "123456"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let access = account["accessToken"].as_str().unwrap().to_string();
    assert!(!access.is_empty());
    assert!(!account["refreshToken"].as_str().unwrap().is_empty());

    let list_id = create_list(&app, &access, "L1").await;

    let (status, card) = send(
        &app,
        "POST",
        "/api/cards",
        Some(&access),
        Some(json!({"listId": list_id, "front": "Hello", "back": "Xin chào"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(card["listId"], list_id);
    assert_eq!(card["front"], "Hello");
    assert_eq!(card["back"], "Xin chào");
    let card_id = card["id"].as_str().unwrap().to_string();

    // The list now carries one embedded flashcard matching the record.
    let (status, list) = send(
        &app,
        "GET",
        &format!("/api/lists/{}", list_id),
        Some(&access),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let embedded = list["flashcards"].as_array().unwrap();
    assert_eq!(embedded.len(), 1);
    assert_eq!(embedded[0]["id"], card_id);
    assert_eq!(embedded[0]["front"], "Hello");
    assert_eq!(embedded[0]["back"], "Xin chào");

    let (status, body) = send(
        &app,
        "DELETE",
        &format!("/api/cards/{}", card_id),
        Some(&access),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (status, list) = send(
        &app,
        "GET",
        &format!("/api/lists/{}", list_id),
        Some(&access),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(list["flashcards"].as_array().unwrap().is_empty());

    let (status, _) = send(
        &app,
        "GET",
        &format!("/api/cards/{}", card_id),
        Some(&access),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_card_in_unknown_list_not_found() {
    let (app, db, keys) = create_test_app().await;
    let (_, access, _) = create_authenticated_account(&db, &keys, "Alice", "alice@x.com").await;

    let unknown = uuid::Uuid::new_v4().to_string();
    let (status, body) = send(
        &app,
        "POST",
        "/api/cards",
        Some(&access),
        Some(json!({"listId": unknown, "front": "a", "back": "b"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Flashcard list not found");
}

#[tokio::test]
async fn test_create_card_with_malformed_list_id_rejected() {
    let (app, db, keys) = create_test_app().await;
    let (_, access, _) = create_authenticated_account(&db, &keys, "Alice", "alice@x.com").await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/cards",
        Some(&access),
        Some(json!({"listId": "not-a-uuid", "front": "a", "back": "b"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_card_requires_front_and_back() {
    let (app, db, keys) = create_test_app().await;
    let (_, access, _) = create_authenticated_account(&db, &keys, "Alice", "alice@x.com").await;
    let list_id = create_list(&app, &access, "L1").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/cards",
        Some(&access),
        Some(json!({"listId": list_id, "front": "", "back": "b"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Both front and back are required");
}

#[tokio::test]
async fn test_update_card_requires_both_fields() {
    let (app, db, keys) = create_test_app().await;
    let (_, access, _) = create_authenticated_account(&db, &keys, "Alice", "alice@x.com").await;
    let list_id = create_list(&app, &access, "L1").await;

    let (_, card) = send(
        &app,
        "POST",
        "/api/cards",
        Some(&access),
        Some(json!({"listId": list_id, "front": "a", "back": "b"})),
    )
    .await;
    let card_id = card["id"].as_str().unwrap();

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/cards/{}", card_id),
        Some(&access),
        Some(json!({"front": "only-front"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Both front and back are required");
}

#[tokio::test]
async fn test_update_card_reflected_in_list_snapshot() {
    let (app, db, keys) = create_test_app().await;
    let (_, access, _) = create_authenticated_account(&db, &keys, "Alice", "alice@x.com").await;
    let list_id = create_list(&app, &access, "L1").await;

    let (_, card) = send(
        &app,
        "POST",
        "/api/cards",
        Some(&access),
        Some(json!({"listId": list_id, "front": "Hello", "back": "Xin chào"})),
    )
    .await;
    let card_id = card["id"].as_str().unwrap().to_string();

    let (status, updated) = send(
        &app,
        "PUT",
        &format!("/api/cards/{}", card_id),
        Some(&access),
        Some(json!({"front": "Goodbye", "back": "Tạm biệt"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["front"], "Goodbye");

    let (_, fetched) = send(
        &app,
        "GET",
        &format!("/api/cards/{}", card_id),
        Some(&access),
        None,
    )
    .await;
    assert_eq!(fetched["front"], "Goodbye");
    assert_eq!(fetched["back"], "Tạm biệt");

    let (_, list) = send(
        &app,
        "GET",
        &format!("/api/lists/{}", list_id),
        Some(&access),
        None,
    )
    .await;
    let embedded = list["flashcards"].as_array().unwrap();
    assert_eq!(embedded[0]["front"], "Goodbye");
    assert_eq!(embedded[0]["back"], "Tạm biệt");
}

#[tokio::test]
async fn test_batch_update_cards() {
    let (app, db, keys) = create_test_app().await;
    let (_, access, _) = create_authenticated_account(&db, &keys, "Alice", "alice@x.com").await;
    let list_id = create_list(&app, &access, "L1").await;

    let mut ids = Vec::new();
    for (front, back) in [("a", "1"), ("b", "2")] {
        let (_, card) = send(
            &app,
            "POST",
            "/api/cards",
            Some(&access),
            Some(json!({"listId": list_id, "front": front, "back": back})),
        )
        .await;
        ids.push(card["id"].as_str().unwrap().to_string());
    }

    let (status, body) = send(
        &app,
        "PUT",
        "/api/cards",
        Some(&access),
        Some(json!([
            {"id": ids[0], "listId": list_id, "front": "a2", "back": "12"},
            {"id": ids[1], "listId": list_id, "front": "b2", "back": "22"},
        ])),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["updated"], 2);

    let (_, list) = send(
        &app,
        "GET",
        &format!("/api/lists/{}", list_id),
        Some(&access),
        None,
    )
    .await;
    let embedded = list["flashcards"].as_array().unwrap();
    assert_eq!(embedded[0]["front"], "a2");
    assert_eq!(embedded[1]["front"], "b2");
}

#[tokio::test]
async fn test_batch_update_rejects_empty_fields() {
    let (app, db, keys) = create_test_app().await;
    let (_, access, _) = create_authenticated_account(&db, &keys, "Alice", "alice@x.com").await;
    let list_id = create_list(&app, &access, "L1").await;

    let (_, card) = send(
        &app,
        "POST",
        "/api/cards",
        Some(&access),
        Some(json!({"listId": list_id, "front": "a", "back": "1"})),
    )
    .await;
    let card_id = card["id"].as_str().unwrap();

    let (status, body) = send(
        &app,
        "PUT",
        "/api/cards",
        Some(&access),
        Some(json!([
            {"id": card_id, "listId": list_id, "front": "", "back": "12"},
        ])),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Both front and back are required");

    // Nothing was applied.
    let (_, fetched) = send(
        &app,
        "GET",
        &format!("/api/cards/{}", card_id),
        Some(&access),
        None,
    )
    .await;
    assert_eq!(fetched["front"], "a");
}

#[tokio::test]
async fn test_cannot_touch_other_owners_card() {
    let (app, db, keys) = create_test_app().await;
    let (_, alice, _) = create_authenticated_account(&db, &keys, "Alice", "alice@x.com").await;
    let (_, bob, _) = create_authenticated_account(&db, &keys, "Bob", "bob@x.com").await;
    let list_id = create_list(&app, &alice, "L1").await;

    let (_, card) = send(
        &app,
        "POST",
        "/api/cards",
        Some(&alice),
        Some(json!({"listId": list_id, "front": "a", "back": "1"})),
    )
    .await;
    let card_id = card["id"].as_str().unwrap();

    let (status, _) = send(
        &app,
        "GET",
        &format!("/api/cards/{}", card_id),
        Some(&bob),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/cards/{}", card_id),
        Some(&bob),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cards_require_authentication() {
    let (app, _db, _keys) = create_test_app().await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/cards",
        None,
        Some(json!({"listId": "x", "front": "a", "back": "b"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
