mod account;
mod auth;
mod cards;
mod error;
mod lists;
mod tokens;

use axum::Router;
use std::sync::Arc;

use crate::db::Database;
use crate::jwt::TokenKeys;
use crate::sync::CardSync;

/// Create the API router.
pub fn create_api_router(db: Database, keys: Arc<TokenKeys>) -> Router {
    let sync = CardSync::new(db.clone());

    let auth_state = auth::AuthState {
        db: db.clone(),
        keys: keys.clone(),
    };

    let account_state = account::AccountState {
        db: db.clone(),
        keys: keys.clone(),
    };

    let tokens_state = tokens::TokensState {
        db: db.clone(),
        keys: keys.clone(),
    };

    let lists_state = lists::ListsState {
        db: db.clone(),
        keys: keys.clone(),
        sync: sync.clone(),
    };

    let cards_state = cards::CardsState { db, keys, sync };

    Router::new()
        .nest("/auth", auth::router(auth_state))
        .nest("/account", account::router(account_state))
        .nest("/tokens", tokens::router(tokens_state))
        .nest("/lists", lists::router(lists_state))
        .nest("/cards", cards::router(cards_state))
}
