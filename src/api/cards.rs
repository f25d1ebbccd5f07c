//! Flashcard endpoints.
//!
//! All endpoints require bearer authentication. Every mutation goes
//! through the sync coordinator so the owning list's embedded snapshots
//! track the canonical records.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::error::{ApiError, ResultExt, validate_uuid};
use crate::auth::Auth;
use crate::db::{Database, Flashcard};
use crate::impl_has_auth_backend;
use crate::jwt::TokenKeys;
use crate::sync::{CardEdit, CardSync};

#[derive(Clone)]
pub struct CardsState {
    pub db: Database,
    pub keys: Arc<TokenKeys>,
    pub sync: CardSync,
}

impl_has_auth_backend!(CardsState);

pub fn router(state: CardsState) -> Router {
    Router::new()
        .route("/", post(create_card))
        .route("/", put(update_cards))
        .route("/{uuid}", get(get_card))
        .route("/{uuid}", put(update_card))
        .route("/{uuid}", delete(delete_card))
        .with_state(state)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateCardRequest {
    list_id: String,
    front: String,
    back: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CardResponse {
    id: String,
    list_id: String,
    owner_id: String,
    front: String,
    back: String,
}

impl From<Flashcard> for CardResponse {
    fn from(card: Flashcard) -> Self {
        Self {
            id: card.uuid,
            list_id: card.list_uuid,
            owner_id: card.owner_uuid,
            front: card.front,
            back: card.back,
        }
    }
}

async fn create_card(
    State(state): State<CardsState>,
    Auth(auth): Auth,
    Json(payload): Json<CreateCardRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_uuid(&payload.list_id)?;
    if payload.front.is_empty() || payload.back.is_empty() {
        return Err(ApiError::bad_request("Both front and back are required"));
    }

    let card = state
        .sync
        .create_card(
            auth.account_uuid(),
            &payload.list_id,
            &payload.front,
            &payload.back,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(CardResponse::from(card))))
}

async fn get_card(
    State(state): State<CardsState>,
    Auth(auth): Auth,
    Path(uuid): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    validate_uuid(&uuid)?;

    let card = state
        .db
        .cards()
        .get_by_uuid(&uuid, auth.account_uuid())
        .await
        .db_err("Failed to get flashcard")?
        .ok_or_else(|| ApiError::not_found("Flashcard not found"))?;

    Ok(Json(CardResponse::from(card)))
}

#[derive(Deserialize)]
struct UpdateCardRequest {
    front: Option<String>,
    back: Option<String>,
}

async fn update_card(
    State(state): State<CardsState>,
    Auth(auth): Auth,
    Path(uuid): Path<String>,
    Json(payload): Json<UpdateCardRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_uuid(&uuid)?;

    let (Some(front), Some(back)) = (payload.front, payload.back) else {
        return Err(ApiError::bad_request("Both front and back are required"));
    };
    if front.is_empty() || back.is_empty() {
        return Err(ApiError::bad_request("Both front and back are required"));
    }

    let card = state
        .sync
        .update_card(auth.account_uuid(), &uuid, &front, &back)
        .await?;

    Ok(Json(CardResponse::from(card)))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BatchEditItem {
    id: String,
    list_id: String,
    front: String,
    back: String,
}

#[derive(Serialize)]
struct BatchEditResponse {
    updated: usize,
}

/// Batch edit. The owning list is taken from the first item's listId;
/// all items are expected to belong to that list.
async fn update_cards(
    State(state): State<CardsState>,
    Auth(auth): Auth,
    Json(payload): Json<Vec<BatchEditItem>>,
) -> Result<impl IntoResponse, ApiError> {
    for item in &payload {
        validate_uuid(&item.id)?;
        validate_uuid(&item.list_id)?;
        if item.front.is_empty() || item.back.is_empty() {
            return Err(ApiError::bad_request("Both front and back are required"));
        }
    }

    let edits: Vec<CardEdit> = payload
        .into_iter()
        .map(|item| CardEdit {
            id: item.id,
            list_id: item.list_id,
            front: item.front,
            back: item.back,
        })
        .collect();

    let updated = state.sync.update_cards(auth.account_uuid(), &edits).await?;

    Ok(Json(BatchEditResponse { updated }))
}

async fn delete_card(
    State(state): State<CardsState>,
    Auth(auth): Auth,
    Path(uuid): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    validate_uuid(&uuid)?;

    state.sync.delete_card(auth.account_uuid(), &uuid).await?;

    Ok((StatusCode::OK, Json(serde_json::json!({ "success": true }))))
}
