//! Tests for the refresh flow.

mod common;

use axum::http::StatusCode;
use common::{create_authenticated_account, create_test_app, send};
use flashdeck::db::AccountRole;
use flashdeck::jwt::TokenClaims;
use jsonwebtoken::{EncodingKey, Header};
use std::time::{SystemTime, UNIX_EPOCH};

/// Craft an access token whose expiry is already in the past and store
/// it on the account, simulating an account whose access token lapsed.
async fn expire_stored_access_token(
    db: &flashdeck::db::Database,
    uuid: &str,
    email: &str,
    name: &str,
    refresh_token: &str,
) {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs();
    let claims = TokenClaims {
        sub: uuid.to_string(),
        email: email.to_string(),
        name: name.to_string(),
        role: AccountRole::User,
        iat: now - 90_000,
        exp: now - 3_600,
    };
    let expired = jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(common::ACCESS_SECRET),
    )
    .unwrap();

    db.accounts()
        .set_tokens(uuid, &expired, refresh_token)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_refresh_rejected_while_access_token_still_valid() {
    let (app, db, keys) = create_test_app().await;
    let (_, _, refresh) = create_authenticated_account(&db, &keys, "Alice", "alice@x.com").await;

    let (status, body) = send(&app, "POST", "/api/tokens/refresh", Some(&refresh), None).await;
    assert_eq!(status, StatusCode::PRECONDITION_FAILED);
    assert_eq!(body["error"], "Access token still valid");
}

#[tokio::test]
async fn test_refresh_with_unknown_token_rejected() {
    let (app, _db, _keys) = create_test_app().await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/tokens/refresh",
        Some("no-such-refresh-token"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid refresh token");
}

#[tokio::test]
async fn test_refresh_without_token_rejected() {
    let (app, _db, _keys) = create_test_app().await;

    let (status, _) = send(&app, "POST", "/api/tokens/refresh", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_after_expiry_rotates_pair() {
    let (app, db, keys) = create_test_app().await;
    let (uuid, old_access, refresh) =
        create_authenticated_account(&db, &keys, "Alice", "alice@x.com").await;

    expire_stored_access_token(&db, &uuid, "alice@x.com", "Alice", &refresh).await;

    let (status, body) = send(&app, "POST", "/api/tokens/refresh", Some(&refresh), None).await;
    assert_eq!(status, StatusCode::OK);

    let new_access = body["accessToken"].as_str().unwrap();
    let new_refresh = body["refreshToken"].as_str().unwrap();
    assert!(!new_access.is_empty());
    assert_ne!(new_access, old_access);
    assert_ne!(new_refresh, refresh);

    // The pair on the account record matches the response.
    let account = db.accounts().get_by_uuid(&uuid).await.unwrap().unwrap();
    assert_eq!(account.access_token, new_access);
    assert_eq!(account.refresh_token, new_refresh);

    // The fresh access token authenticates.
    let (status, profile) = send(&app, "GET", "/api/account/profile", Some(new_access), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["email"], "alice@x.com");
}

#[tokio::test]
async fn test_old_refresh_token_unusable_after_rotation() {
    let (app, db, keys) = create_test_app().await;
    let (uuid, _, refresh) = create_authenticated_account(&db, &keys, "Alice", "alice@x.com").await;

    expire_stored_access_token(&db, &uuid, "alice@x.com", "Alice", &refresh).await;

    let (status, _) = send(&app, "POST", "/api/tokens/refresh", Some(&refresh), None).await;
    assert_eq!(status, StatusCode::OK);

    // Rotation replaced the stored value; the old token no longer matches.
    let (status, _) = send(&app, "POST", "/api/tokens/refresh", Some(&refresh), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_malformed_stored_access_token_also_permits_refresh() {
    let (app, db, keys) = create_test_app().await;
    let (uuid, _, refresh) = create_authenticated_account(&db, &keys, "Alice", "alice@x.com").await;

    // A corrupted stored access token is treated like an expired one.
    db.accounts()
        .set_tokens(&uuid, "garbage", &refresh)
        .await
        .unwrap();

    let (status, body) = send(&app, "POST", "/api/tokens/refresh", Some(&refresh), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(!body["accessToken"].as_str().unwrap().is_empty());
}
