//! Coordination between canonical flashcard records and the snapshot
//! arrays embedded in their owning lists.
//!
//! The store has no cross-collection transaction, so every mutation here
//! is a fixed sequence of independent writes: the canonical record first,
//! the owning list's embedded snapshots second. A failure between the two
//! writes surfaces as an error and leaves the partial state in place;
//! there is no rollback. Centralizing the sequence in one place keeps
//! call sites from updating the two representations ad hoc.

use tracing::warn;

use crate::db::{CardSnapshot, Database, Flashcard, FlashcardList, ListStoreError};

/// One entry of a batch edit request.
#[derive(Debug, Clone)]
pub struct CardEdit {
    pub id: String,
    pub list_id: String,
    pub front: String,
    pub back: String,
}

/// Errors from coordinated mutations.
#[derive(Debug)]
pub enum SyncError {
    /// The referenced list does not exist (or belongs to someone else).
    ListNotFound,
    /// The referenced card does not exist (or belongs to someone else).
    CardNotFound,
    /// A list with this name already exists for the owner.
    DuplicateListName,
    /// Underlying store failure; the message is passed through.
    Store(String),
}

impl std::fmt::Display for SyncError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncError::ListNotFound => write!(f, "Flashcard list not found"),
            SyncError::CardNotFound => write!(f, "Flashcard not found"),
            SyncError::DuplicateListName => {
                write!(f, "Flashcard list with this name already exists")
            }
            SyncError::Store(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for SyncError {}

impl From<sqlx::Error> for SyncError {
    fn from(e: sqlx::Error) -> Self {
        SyncError::Store(e.to_string())
    }
}

impl From<ListStoreError> for SyncError {
    fn from(e: ListStoreError) -> Self {
        SyncError::Store(e.to_string())
    }
}

/// Owns every write path that touches both a canonical card record and
/// its list's embedded snapshot array.
#[derive(Clone)]
pub struct CardSync {
    db: Database,
}

impl CardSync {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Create a new empty list after checking (owner, name) uniqueness.
    ///
    /// The check-then-insert is not atomic against concurrent creators;
    /// a unique index on (owner_uuid, name) backstops the race, in which
    /// case the loser sees a store error instead of a duplicate.
    pub async fn create_list(
        &self,
        owner_uuid: &str,
        name: &str,
    ) -> Result<FlashcardList, SyncError> {
        if self
            .db
            .lists()
            .get_by_owner_and_name(owner_uuid, name)
            .await?
            .is_some()
        {
            return Err(SyncError::DuplicateListName);
        }

        let uuid = uuid::Uuid::new_v4().to_string();
        self.db.lists().insert(&uuid, owner_uuid, name).await?;

        self.db
            .lists()
            .get_by_uuid(&uuid, owner_uuid)
            .await?
            .ok_or(SyncError::ListNotFound)
    }

    /// Delete a list, cascading to its canonical card records.
    ///
    /// Each embedded snapshot's canonical record is deleted one at a
    /// time before the list itself. A failure partway leaves the
    /// remaining records in place.
    pub async fn delete_list(&self, owner_uuid: &str, list_uuid: &str) -> Result<(), SyncError> {
        let list = self
            .db
            .lists()
            .get_by_uuid(list_uuid, owner_uuid)
            .await?
            .ok_or(SyncError::ListNotFound)?;

        for snapshot in &list.cards {
            self.db.cards().delete(&snapshot.id, owner_uuid).await?;
        }

        self.db.lists().delete(list_uuid, owner_uuid).await?;
        Ok(())
    }

    /// Create a card: canonical record first, then append a snapshot to
    /// the owning list.
    ///
    /// If the snapshot append fails after the canonical insert succeeded,
    /// the orphan canonical record remains and the error is surfaced.
    pub async fn create_card(
        &self,
        owner_uuid: &str,
        list_uuid: &str,
        front: &str,
        back: &str,
    ) -> Result<Flashcard, SyncError> {
        let mut list = self
            .db
            .lists()
            .get_by_uuid(list_uuid, owner_uuid)
            .await?
            .ok_or(SyncError::ListNotFound)?;

        let uuid = self
            .db
            .cards()
            .insert(list_uuid, owner_uuid, front, back)
            .await?;

        list.cards.push(CardSnapshot {
            id: uuid.clone(),
            list_id: list_uuid.to_string(),
            owner_id: owner_uuid.to_string(),
            front: front.to_string(),
            back: back.to_string(),
        });
        self.db.lists().save_cards(&list.uuid, &list.cards).await?;

        Ok(Flashcard {
            uuid,
            list_uuid: list_uuid.to_string(),
            owner_uuid: owner_uuid.to_string(),
            front: front.to_string(),
            back: back.to_string(),
        })
    }

    /// Edit a card: canonical record first, then overwrite the matching
    /// embedded snapshot in place, preserving its position.
    ///
    /// A missing snapshot does not fail the edit; it is logged as a
    /// divergence between the two representations.
    pub async fn update_card(
        &self,
        owner_uuid: &str,
        card_uuid: &str,
        front: &str,
        back: &str,
    ) -> Result<Flashcard, SyncError> {
        let card = self
            .db
            .cards()
            .get_by_uuid(card_uuid, owner_uuid)
            .await?
            .ok_or(SyncError::CardNotFound)?;

        self.db
            .cards()
            .update(card_uuid, owner_uuid, front, back)
            .await?;

        match self
            .db
            .lists()
            .get_by_uuid(&card.list_uuid, owner_uuid)
            .await?
        {
            Some(mut list) => {
                if !overwrite_snapshot(&mut list.cards, card_uuid, front, back) {
                    warn!(
                        card = %card_uuid,
                        list = %card.list_uuid,
                        "Card has no embedded snapshot in its list"
                    );
                }
                self.db.lists().save_cards(&list.uuid, &list.cards).await?;
            }
            None => {
                warn!(
                    card = %card_uuid,
                    list = %card.list_uuid,
                    "Card references a missing list"
                );
            }
        }

        Ok(Flashcard {
            uuid: card_uuid.to_string(),
            list_uuid: card.list_uuid,
            owner_uuid: owner_uuid.to_string(),
            front: front.to_string(),
            back: back.to_string(),
        })
    }

    /// Batch edit. The owning list is resolved once from the FIRST
    /// item's list id; batches are expected to stay within one list.
    /// Items whose canonical record cannot be found are skipped, not
    /// reported. Returns the number of cards updated.
    pub async fn update_cards(
        &self,
        owner_uuid: &str,
        edits: &[CardEdit],
    ) -> Result<usize, SyncError> {
        let Some(first) = edits.first() else {
            return Ok(0);
        };

        let mut list = self
            .db
            .lists()
            .get_by_uuid(&first.list_id, owner_uuid)
            .await?
            .ok_or(SyncError::ListNotFound)?;

        let mut updated = 0;
        for edit in edits {
            if self
                .db
                .cards()
                .get_by_uuid(&edit.id, owner_uuid)
                .await?
                .is_none()
            {
                continue;
            }

            self.db
                .cards()
                .update(&edit.id, owner_uuid, &edit.front, &edit.back)
                .await?;
            overwrite_snapshot(&mut list.cards, &edit.id, &edit.front, &edit.back);
            updated += 1;
        }

        self.db.lists().save_cards(&list.uuid, &list.cards).await?;
        Ok(updated)
    }

    /// Delete a card: canonical record first, then filter its id out of
    /// the owning list's snapshot array.
    pub async fn delete_card(&self, owner_uuid: &str, card_uuid: &str) -> Result<(), SyncError> {
        let card = self
            .db
            .cards()
            .get_by_uuid(card_uuid, owner_uuid)
            .await?
            .ok_or(SyncError::CardNotFound)?;

        self.db.cards().delete(card_uuid, owner_uuid).await?;

        match self
            .db
            .lists()
            .get_by_uuid(&card.list_uuid, owner_uuid)
            .await?
        {
            Some(mut list) => {
                list.cards.retain(|s| s.id != card_uuid);
                self.db.lists().save_cards(&list.uuid, &list.cards).await?;
            }
            None => {
                warn!(
                    card = %card_uuid,
                    list = %card.list_uuid,
                    "Deleted card referenced a missing list"
                );
            }
        }

        Ok(())
    }
}

/// Overwrite the front/back of the snapshot with the given id, keeping
/// its position. Returns false when no snapshot matches.
fn overwrite_snapshot(cards: &mut [CardSnapshot], id: &str, front: &str, back: &str) -> bool {
    match cards.iter_mut().find(|s| s.id == id) {
        Some(snapshot) => {
            snapshot.front = front.to_string();
            snapshot.back = back.to_string();
            true
        }
        None => false,
    }
}
