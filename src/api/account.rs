//! Account profile endpoint.

use axum::{Json, Router, extract::State, response::IntoResponse, routing::get};
use serde::Serialize;
use std::sync::Arc;

use super::auth::AccountResponse;
use super::error::{ApiError, ResultExt};
use crate::auth::Auth;
use crate::db::Database;
use crate::impl_has_auth_backend;
use crate::jwt::TokenKeys;

#[derive(Clone)]
pub struct AccountState {
    pub db: Database,
    pub keys: Arc<TokenKeys>,
}

impl_has_auth_backend!(AccountState);

pub fn router(state: AccountState) -> Router {
    Router::new()
        .route("/profile", get(profile))
        .with_state(state)
}

#[derive(Serialize)]
struct ProfileResponse {
    #[serde(flatten)]
    account: AccountResponse,
    /// The token the request authenticated with.
    token: String,
}

/// Get the authenticated account, echoing the presented token.
async fn profile(
    State(state): State<AccountState>,
    Auth(auth): Auth,
) -> Result<impl IntoResponse, ApiError> {
    let account = state
        .db
        .accounts()
        .get_by_uuid(auth.account_uuid())
        .await
        .db_err("Failed to load account")?
        .ok_or_else(|| ApiError::not_found("Account not found"))?;

    Ok(Json(ProfileResponse {
        account: AccountResponse::from(account),
        token: auth.token,
    }))
}
