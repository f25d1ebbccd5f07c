//! Token refresh endpoint.
//!
//! POST `/refresh` - Exchange the stored refresh token for a fresh pair.
//!
//! This is a sibling entry point to the auth extractor, not gated by it:
//! the bearer credential is matched against accounts' stored refresh
//! tokens by exact value, not verified as an access token.

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::post,
};
use std::sync::Arc;

use super::auth::{AccountResponse, rotate_tokens};
use super::error::{ApiError, ResultExt};
use crate::auth::bearer_token;
use crate::db::Database;
use crate::jwt::{TokenError, TokenKeys};

#[derive(Clone)]
pub struct TokensState {
    pub db: Database,
    pub keys: Arc<TokenKeys>,
}

pub fn router(state: TokensState) -> Router {
    Router::new()
        .route("/refresh", post(refresh))
        .with_state(state)
}

/// Rotate the token pair for the account owning the presented refresh
/// token.
///
/// Refresh is only permitted once the stored access token has actually
/// expired; a still-valid access token is a precondition failure, which
/// keeps clients from rotating on every request. Any verification
/// failure other than expiry (e.g. a corrupted stored token) also
/// permits reissuance.
async fn refresh(
    State(state): State<TokensState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let presented = bearer_token(&headers)
        .ok_or_else(|| ApiError::unauthorized("No auth token, access denied"))?;

    let account = state
        .db
        .accounts()
        .get_by_refresh_token(presented)
        .await
        .db_err("Failed to look up refresh token")?
        .ok_or_else(|| ApiError::unauthorized("Invalid refresh token"))?;

    match state.keys.verify_access_token(&account.access_token) {
        Ok(_) => {
            return Err(ApiError::precondition_failed("Access token still valid"));
        }
        Err(TokenError::Expired) => {}
        // Anything else (malformed, wrong signature) also falls through
        // to reissuance.
        Err(_) => {}
    }

    let account = rotate_tokens(&state.db, &state.keys, account).await?;

    Ok((StatusCode::OK, Json(AccountResponse::from(account))))
}
