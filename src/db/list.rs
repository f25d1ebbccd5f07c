//! Flashcard list aggregates.
//!
//! Each list embeds an ordered array of card snapshots, persisted as a
//! JSON column. The snapshots duplicate the canonical flashcard records;
//! every write path that touches one side goes through `sync` so the two
//! do not diverge.

use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqlitePool;

#[derive(Clone)]
pub struct FlashcardListStore {
    pool: SqlitePool,
}

/// An embedded point-in-time copy of a flashcard, same shape as the
/// canonical record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardSnapshot {
    pub id: String,
    #[serde(rename = "listId")]
    pub list_id: String,
    #[serde(rename = "ownerId")]
    pub owner_id: String,
    pub front: String,
    pub back: String,
}

#[derive(Debug, Clone)]
pub struct FlashcardList {
    pub uuid: String,
    pub owner_uuid: String,
    pub name: String,
    /// Embedded snapshots in insertion order.
    pub cards: Vec<CardSnapshot>,
    pub created_at: String,
}

#[derive(sqlx::FromRow)]
struct ListRow {
    uuid: String,
    owner_uuid: String,
    name: String,
    cards_json: String,
    created_at: String,
}

impl TryFrom<ListRow> for FlashcardList {
    type Error = serde_json::Error;

    fn try_from(row: ListRow) -> Result<Self, Self::Error> {
        Ok(Self {
            uuid: row.uuid,
            owner_uuid: row.owner_uuid,
            name: row.name,
            cards: serde_json::from_str(&row.cards_json)?,
            created_at: row.created_at,
        })
    }
}

/// Errors from the list store: either the query failed or a stored
/// snapshot array could not be decoded.
#[derive(Debug)]
pub enum ListStoreError {
    Sqlx(sqlx::Error),
    Decode(serde_json::Error),
}

impl std::fmt::Display for ListStoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListStoreError::Sqlx(e) => write!(f, "{}", e),
            ListStoreError::Decode(e) => write!(f, "Failed to decode card snapshots: {}", e),
        }
    }
}

impl std::error::Error for ListStoreError {}

impl From<sqlx::Error> for ListStoreError {
    fn from(e: sqlx::Error) -> Self {
        ListStoreError::Sqlx(e)
    }
}

impl From<serde_json::Error> for ListStoreError {
    fn from(e: serde_json::Error) -> Self {
        ListStoreError::Decode(e)
    }
}

impl FlashcardListStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new empty list with the given UUID.
    pub async fn insert(
        &self,
        uuid: &str,
        owner_uuid: &str,
        name: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("INSERT INTO flashcard_lists (uuid, owner_uuid, name) VALUES (?, ?, ?)")
            .bind(uuid)
            .bind(owner_uuid)
            .bind(name)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Get a list by UUID. Only returns the list if it belongs to the given owner.
    pub async fn get_by_uuid(
        &self,
        uuid: &str,
        owner_uuid: &str,
    ) -> Result<Option<FlashcardList>, ListStoreError> {
        let row: Option<ListRow> = sqlx::query_as(
            "SELECT uuid, owner_uuid, name, cards_json, created_at
             FROM flashcard_lists WHERE uuid = ? AND owner_uuid = ?",
        )
        .bind(uuid)
        .bind(owner_uuid)
        .fetch_optional(&self.pool)
        .await?;
        row.map(FlashcardList::try_from).transpose().map_err(Into::into)
    }

    /// Look up a list by owner and name, for the duplicate-name check.
    pub async fn get_by_owner_and_name(
        &self,
        owner_uuid: &str,
        name: &str,
    ) -> Result<Option<FlashcardList>, ListStoreError> {
        let row: Option<ListRow> = sqlx::query_as(
            "SELECT uuid, owner_uuid, name, cards_json, created_at
             FROM flashcard_lists WHERE owner_uuid = ? AND name = ?",
        )
        .bind(owner_uuid)
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;
        row.map(FlashcardList::try_from).transpose().map_err(Into::into)
    }

    /// List all lists belonging to an owner.
    pub async fn list_by_owner(&self, owner_uuid: &str) -> Result<Vec<FlashcardList>, ListStoreError> {
        let rows: Vec<ListRow> = sqlx::query_as(
            "SELECT uuid, owner_uuid, name, cards_json, created_at
             FROM flashcard_lists WHERE owner_uuid = ? ORDER BY id ASC",
        )
        .bind(owner_uuid)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter()
            .map(|r| FlashcardList::try_from(r).map_err(Into::into))
            .collect()
    }

    /// Overwrite a list's embedded snapshot array.
    /// Returns true if the list was updated.
    pub async fn save_cards(
        &self,
        uuid: &str,
        cards: &[CardSnapshot],
    ) -> Result<bool, ListStoreError> {
        let json = serde_json::to_string(cards)?;
        let result = sqlx::query("UPDATE flashcard_lists SET cards_json = ? WHERE uuid = ?")
            .bind(json)
            .bind(uuid)
            .execute(&self.pool)
            .await
            .map_err(ListStoreError::Sqlx)?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a list by UUID. Only deletes if it belongs to the given owner.
    /// Returns true if a row was deleted.
    pub async fn delete(&self, uuid: &str, owner_uuid: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM flashcard_lists WHERE uuid = ? AND owner_uuid = ?")
            .bind(uuid)
            .bind(owner_uuid)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
