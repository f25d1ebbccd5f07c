//! Canonical flashcard records.
//!
//! This table is the source of truth for individual cards. The owning
//! list additionally embeds a snapshot of each card; `sync` keeps the two
//! in step.

use sqlx::sqlite::SqlitePool;

#[derive(Clone)]
pub struct FlashcardStore {
    pool: SqlitePool,
}

#[derive(Debug, Clone)]
pub struct Flashcard {
    pub uuid: String,
    pub list_uuid: String,
    pub owner_uuid: String,
    pub front: String,
    pub back: String,
}

#[derive(sqlx::FromRow)]
struct FlashcardRow {
    uuid: String,
    list_uuid: String,
    owner_uuid: String,
    front: String,
    back: String,
}

impl From<FlashcardRow> for Flashcard {
    fn from(row: FlashcardRow) -> Self {
        Self {
            uuid: row.uuid,
            list_uuid: row.list_uuid,
            owner_uuid: row.owner_uuid,
            front: row.front,
            back: row.back,
        }
    }
}

impl FlashcardStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new canonical card record. Returns the card UUID.
    pub async fn insert(
        &self,
        list_uuid: &str,
        owner_uuid: &str,
        front: &str,
        back: &str,
    ) -> Result<String, sqlx::Error> {
        let uuid = uuid::Uuid::new_v4().to_string();
        sqlx::query(
            "INSERT INTO flashcards (uuid, list_uuid, owner_uuid, front, back) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&uuid)
        .bind(list_uuid)
        .bind(owner_uuid)
        .bind(front)
        .bind(back)
        .execute(&self.pool)
        .await?;
        Ok(uuid)
    }

    /// Get a card by UUID. Only returns the card if it belongs to the given owner.
    pub async fn get_by_uuid(
        &self,
        uuid: &str,
        owner_uuid: &str,
    ) -> Result<Option<Flashcard>, sqlx::Error> {
        let row: Option<FlashcardRow> = sqlx::query_as(
            "SELECT uuid, list_uuid, owner_uuid, front, back
             FROM flashcards WHERE uuid = ? AND owner_uuid = ?",
        )
        .bind(uuid)
        .bind(owner_uuid)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Flashcard::from))
    }

    /// List all canonical cards belonging to a list, in insertion order.
    pub async fn list_by_list(&self, list_uuid: &str) -> Result<Vec<Flashcard>, sqlx::Error> {
        let rows: Vec<FlashcardRow> = sqlx::query_as(
            "SELECT uuid, list_uuid, owner_uuid, front, back
             FROM flashcards WHERE list_uuid = ? ORDER BY id ASC",
        )
        .bind(list_uuid)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Flashcard::from).collect())
    }

    /// Update the front/back of a card. Only updates if the card belongs
    /// to the given owner. Returns true if a row was updated.
    pub async fn update(
        &self,
        uuid: &str,
        owner_uuid: &str,
        front: &str,
        back: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE flashcards SET front = ?, back = ? WHERE uuid = ? AND owner_uuid = ?",
        )
        .bind(front)
        .bind(back)
        .bind(uuid)
        .bind(owner_uuid)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a card by UUID. Only deletes if it belongs to the given owner.
    /// Returns true if a row was deleted.
    pub async fn delete(&self, uuid: &str, owner_uuid: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM flashcards WHERE uuid = ? AND owner_uuid = ?")
            .bind(uuid)
            .bind(owner_uuid)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
