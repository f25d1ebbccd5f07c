#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use flashdeck::db::AccountRole;
use flashdeck::jwt::{TokenKeys, TokenSubject};
use flashdeck::{ServerConfig, create_app, db::Database, password};
use tower::ServiceExt;

pub const ACCESS_SECRET: &[u8] = b"access-secret-for-integration-tests!";
pub const REFRESH_SECRET: &[u8] = b"refresh-secret-for-integration-tests";

/// Password used for every account created by the test helpers.
pub const TEST_PASSWORD: &str = "123456";

/// Create a test app and return (app, db, keys).
pub async fn create_test_app() -> (Router, Database, TokenKeys) {
    let db = Database::open(":memory:")
        .await
        .expect("Failed to open test database");
    let keys = TokenKeys::new(ACCESS_SECRET, REFRESH_SECRET);
    let config = ServerConfig {
        db: db.clone(),
        access_secret: ACCESS_SECRET.to_vec(),
        refresh_secret: REFRESH_SECRET.to_vec(),
    };
    (create_app(&config), db, keys)
}

/// Create an account with a freshly issued, persisted token pair.
/// Returns (account_uuid, access_token, refresh_token).
pub async fn create_authenticated_account(
    db: &Database,
    keys: &TokenKeys,
    name: &str,
    email: &str,
) -> (String, String, String) {
    let uuid = uuid::Uuid::new_v4().to_string();
    let hash = password::hash_password(TEST_PASSWORD.to_string())
        .await
        .unwrap();
    db.accounts().create(&uuid, name, email, &hash).await.unwrap();

    let pair = keys
        .issue_pair(&TokenSubject {
            account_uuid: &uuid,
            email,
            name,
            role: AccountRole::User,
        })
        .unwrap();
    db.accounts()
        .set_tokens(&uuid, &pair.access_token, &pair.refresh_token)
        .await
        .unwrap();

    (uuid, pair.access_token, pair.refresh_token)
}

/// Send a JSON request and return (status, parsed body).
/// The body is Null when the response has no content.
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}
