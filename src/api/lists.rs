//! Flashcard list endpoints.
//!
//! All endpoints require bearer authentication. Reads serve the list's
//! embedded snapshot array; they never join against the canonical card
//! table.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::error::{ApiError, ResultExt, validate_uuid};
use crate::auth::Auth;
use crate::db::{CardSnapshot, Database, FlashcardList};
use crate::impl_has_auth_backend;
use crate::jwt::TokenKeys;
use crate::sync::CardSync;

#[derive(Clone)]
pub struct ListsState {
    pub db: Database,
    pub keys: Arc<TokenKeys>,
    pub sync: CardSync,
}

impl_has_auth_backend!(ListsState);

pub fn router(state: ListsState) -> Router {
    Router::new()
        .route("/", get(list_lists))
        .route("/", post(create_list))
        .route("/{uuid}", get(get_list))
        .route("/{uuid}", delete(delete_list))
        .with_state(state)
}

#[derive(Deserialize)]
struct CreateListRequest {
    name: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ListResponse {
    id: String,
    owner_id: String,
    name: String,
    flashcards: Vec<CardSnapshot>,
    created_at: String,
}

impl From<FlashcardList> for ListResponse {
    fn from(list: FlashcardList) -> Self {
        Self {
            id: list.uuid,
            owner_id: list.owner_uuid,
            name: list.name,
            flashcards: list.cards,
            created_at: list.created_at,
        }
    }
}

async fn list_lists(
    State(state): State<ListsState>,
    Auth(auth): Auth,
) -> Result<impl IntoResponse, ApiError> {
    let lists = state
        .db
        .lists()
        .list_by_owner(auth.account_uuid())
        .await
        .db_err("Failed to list flashcard lists")?;

    let response: Vec<ListResponse> = lists.into_iter().map(ListResponse::from).collect();
    Ok(Json(response))
}

async fn create_list(
    State(state): State<ListsState>,
    Auth(auth): Auth,
    Json(payload): Json<CreateListRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::bad_request("List name is required"));
    }

    let list = state
        .sync
        .create_list(auth.account_uuid(), payload.name.trim())
        .await?;

    Ok((StatusCode::CREATED, Json(ListResponse::from(list))))
}

async fn get_list(
    State(state): State<ListsState>,
    Auth(auth): Auth,
    Path(uuid): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    validate_uuid(&uuid)?;

    let list = state
        .db
        .lists()
        .get_by_uuid(&uuid, auth.account_uuid())
        .await
        .db_err("Failed to get flashcard list")?
        .ok_or_else(|| ApiError::not_found("Flashcard list not found"))?;

    Ok(Json(ListResponse::from(list)))
}

async fn delete_list(
    State(state): State<ListsState>,
    Auth(auth): Auth,
    Path(uuid): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    validate_uuid(&uuid)?;

    state.sync.delete_list(auth.account_uuid(), &uuid).await?;

    Ok((StatusCode::OK, Json(serde_json::json!({ "success": true }))))
}
