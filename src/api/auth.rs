//! Registration and login endpoints.
//!
//! Both issue a fresh access/refresh token pair and persist it onto the
//! account record before responding.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, OnceLock};
use tracing::error;

use super::error::{ApiError, ResultExt};
use crate::db::{Account, AccountRole, Database};
use crate::jwt::{TokenKeys, TokenSubject};
use crate::password::{self, PasswordError};

#[derive(Clone)]
pub struct AuthState {
    pub db: Database,
    pub keys: Arc<TokenKeys>,
}

pub fn router(state: AuthState) -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .with_state(state)
}

/// Structural email check, same shape as the mongoose validator this
/// replaces: local part, "@", dotted domain with a 2+ character TLD.
fn is_valid_email(email: &str) -> bool {
    static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
    let re = EMAIL_RE.get_or_init(|| {
        Regex::new(
            r#"^[^<>()\[\].,;:\s@"]+(\.[^<>()\[\].,;:\s@"]+)*@([^<>()\[\].,;:\s@"]+\.)+[^<>()\[\].,;:\s@"]{2,}$"#,
        )
        .expect("email regex must compile")
    });
    re.is_match(email)
}

/// Account as returned to clients; never includes the password hash.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: AccountRole,
    pub avatar_url: String,
    pub access_token: String,
    pub refresh_token: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.uuid,
            name: account.name,
            email: account.email,
            role: account.role,
            avatar_url: account.avatar_url,
            access_token: account.access_token,
            refresh_token: account.refresh_token,
            created_at: account.created_at,
            updated_at: account.updated_at,
        }
    }
}

/// Issue a fresh token pair for the account and persist it. Returns the
/// account with the new pair applied.
pub async fn rotate_tokens(
    db: &Database,
    keys: &TokenKeys,
    mut account: Account,
) -> Result<Account, ApiError> {
    let pair = keys
        .issue_pair(&TokenSubject {
            account_uuid: &account.uuid,
            email: &account.email,
            name: &account.name,
            role: account.role,
        })
        .map_err(|e| {
            error!(error = %e, "Failed to issue token pair");
            ApiError::internal(e.to_string())
        })?;

    db.accounts()
        .set_tokens(&account.uuid, &pair.access_token, &pair.refresh_token)
        .await
        .db_err("Failed to persist token pair")?;

    account.access_token = pair.access_token;
    account.refresh_token = pair.refresh_token;
    Ok(account)
}

#[derive(Deserialize)]
struct RegisterRequest {
    name: String,
    email: String,
    password: String,
}

async fn register(
    State(state): State<AuthState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::bad_request("Name is required"));
    }
    if !is_valid_email(&payload.email) {
        return Err(ApiError::bad_request("Please enter a valid email address"));
    }
    if payload.password.is_empty() {
        return Err(ApiError::bad_request("Password is required"));
    }

    let existing = state
        .db
        .accounts()
        .get_by_email(&payload.email)
        .await
        .db_err("Failed to check for existing account")?;
    if existing.is_some() {
        return Err(ApiError::bad_request("This email was already used"));
    }

    let password_hash = password::hash_password(payload.password)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;

    let uuid = uuid::Uuid::new_v4().to_string();
    state
        .db
        .accounts()
        .create(&uuid, payload.name.trim(), &payload.email, &password_hash)
        .await
        .db_err("Failed to create account")?;

    let account = state
        .db
        .accounts()
        .get_by_uuid(&uuid)
        .await
        .db_err("Failed to load new account")?
        .ok_or_else(|| ApiError::internal("Account vanished after insert"))?;

    let account = rotate_tokens(&state.db, &state.keys, account).await?;

    Ok((StatusCode::CREATED, Json(AccountResponse::from(account))))
}

#[derive(Deserialize)]
struct LoginRequest {
    email: String,
    password: String,
}

async fn login(
    State(state): State<AuthState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let account = state
        .db
        .accounts()
        .get_by_email(&payload.email)
        .await
        .db_err("Failed to look up account")?
        .ok_or_else(|| ApiError::unauthorized("Invalid email or password"))?;

    match password::verify_password(payload.password, account.password_hash.clone()).await {
        Ok(()) => {}
        Err(PasswordError::Mismatch) => {
            return Err(ApiError::unauthorized("Invalid email or password"));
        }
        Err(PasswordError::Internal(msg)) => {
            error!(error = %msg, "Password verification failed");
            return Err(ApiError::internal(msg));
        }
    }

    let account = rotate_tokens(&state.db, &state.keys, account).await?;

    Ok((StatusCode::OK, Json(AccountResponse::from(account))))
}
