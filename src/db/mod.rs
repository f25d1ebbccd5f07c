mod account;
mod card;
mod list;

use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

pub use account::{Account, AccountRole, AccountStore};
pub use card::{Flashcard, FlashcardStore};
pub use list::{CardSnapshot, FlashcardList, FlashcardListStore, ListStoreError};

#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open or create a database at the given path.
    /// Use ":memory:" for an in-memory database.
    pub async fn open(path: &str) -> Result<Self, sqlx::Error> {
        let url = if path == ":memory:" {
            "sqlite::memory:".to_string()
        } else {
            format!("sqlite:{}?mode=rwc", path)
        };

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&url)
            .await?;

        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    /// Get the current schema version.
    async fn get_version(&self) -> Result<i32, sqlx::Error> {
        let result: Option<(i32,)> = sqlx::query_as("SELECT version FROM schema_version LIMIT 1")
            .fetch_optional(&self.pool)
            .await?;
        Ok(result.map(|r| r.0).unwrap_or(0))
    }

    /// Set the schema version within a transaction.
    async fn set_version(
        tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
        version: i32,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM schema_version")
            .execute(&mut **tx)
            .await?;
        sqlx::query("INSERT INTO schema_version (version) VALUES (?)")
            .bind(version)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    /// Run database migrations.
    async fn migrate(&self) -> Result<(), sqlx::Error> {
        sqlx::query("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL)")
            .execute(&self.pool)
            .await?;

        let version = self.get_version().await?;

        if version < 1 {
            self.migrate_v1().await?;
        }

        Ok(())
    }

    /// Execute a list of queries in a transaction, then set the version.
    async fn run_migration(
        &self,
        version: i32,
        queries: &[&'static str],
    ) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        for query in queries {
            sqlx::query(*query).execute(&mut *tx).await?;
        }
        Self::set_version(&mut tx, version).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn migrate_v1(&self) -> Result<(), sqlx::Error> {
        self.run_migration(
            1,
            &[
                // Accounts table. The current access/refresh token pair is
                // stored inline; refresh rotation looks accounts up by the
                // stored refresh token value.
                "CREATE TABLE accounts (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    uuid TEXT UNIQUE NOT NULL,
                    name TEXT NOT NULL,
                    email TEXT UNIQUE NOT NULL COLLATE NOCASE,
                    password_hash TEXT NOT NULL,
                    role TEXT NOT NULL DEFAULT 'user',
                    avatar_url TEXT NOT NULL DEFAULT '',
                    access_token TEXT NOT NULL DEFAULT '',
                    refresh_token TEXT NOT NULL DEFAULT '',
                    created_at TEXT NOT NULL DEFAULT (datetime('now')),
                    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
                )",
                "CREATE INDEX idx_accounts_uuid ON accounts(uuid)",
                "CREATE INDEX idx_accounts_email ON accounts(email)",
                "CREATE INDEX idx_accounts_refresh_token ON accounts(refresh_token)",
                // Canonical flashcard records.
                "CREATE TABLE flashcards (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    uuid TEXT UNIQUE NOT NULL,
                    list_uuid TEXT NOT NULL,
                    owner_uuid TEXT NOT NULL,
                    front TEXT NOT NULL,
                    back TEXT NOT NULL
                )",
                "CREATE INDEX idx_flashcards_uuid ON flashcards(uuid)",
                "CREATE INDEX idx_flashcards_list_uuid ON flashcards(list_uuid)",
                "CREATE INDEX idx_flashcards_owner_uuid ON flashcards(owner_uuid)",
                // List aggregates. cards_json holds the ordered embedded
                // snapshot array. The unique index backstops the
                // application-level (owner, name) check under concurrency.
                "CREATE TABLE flashcard_lists (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    uuid TEXT UNIQUE NOT NULL,
                    owner_uuid TEXT NOT NULL,
                    name TEXT NOT NULL,
                    cards_json TEXT NOT NULL DEFAULT '[]',
                    created_at TEXT NOT NULL DEFAULT (datetime('now'))
                )",
                "CREATE INDEX idx_flashcard_lists_uuid ON flashcard_lists(uuid)",
                "CREATE INDEX idx_flashcard_lists_owner ON flashcard_lists(owner_uuid)",
                "CREATE UNIQUE INDEX idx_flashcard_lists_owner_name ON flashcard_lists(owner_uuid, name)",
            ],
        )
        .await
    }

    /// Get the account store.
    pub fn accounts(&self) -> AccountStore {
        AccountStore::new(self.pool.clone())
    }

    /// Get the canonical flashcard store.
    pub fn cards(&self) -> FlashcardStore {
        FlashcardStore::new(self.pool.clone())
    }

    /// Get the flashcard list store.
    pub fn lists(&self) -> FlashcardListStore {
        FlashcardListStore::new(self.pool.clone())
    }

    /// Get the underlying connection pool (for tests that need raw SQL access).
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
