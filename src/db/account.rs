use sqlx::sqlite::SqlitePool;

#[derive(Clone)]
pub struct AccountStore {
    pool: SqlitePool,
}

/// Account role for authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountRole {
    User,
    Admin,
}

impl AccountRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountRole::User => "user",
            AccountRole::Admin => "admin",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "admin" => AccountRole::Admin,
            _ => AccountRole::User,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Account {
    pub id: i64,
    pub uuid: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: AccountRole,
    pub avatar_url: String,
    /// Most recently issued access token ("" before first login).
    pub access_token: String,
    /// Most recently issued refresh token ("" before first login).
    pub refresh_token: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(sqlx::FromRow)]
struct AccountRow {
    id: i64,
    uuid: String,
    name: String,
    email: String,
    password_hash: String,
    role: String,
    avatar_url: String,
    access_token: String,
    refresh_token: String,
    created_at: String,
    updated_at: String,
}

impl From<AccountRow> for Account {
    fn from(row: AccountRow) -> Self {
        Self {
            id: row.id,
            uuid: row.uuid,
            name: row.name,
            email: row.email,
            password_hash: row.password_hash,
            role: AccountRole::from_str(&row.role),
            avatar_url: row.avatar_url,
            access_token: row.access_token,
            refresh_token: row.refresh_token,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl AccountStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new account. Returns the account ID.
    pub async fn create(
        &self,
        uuid: &str,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<i64, sqlx::Error> {
        let result =
            sqlx::query("INSERT INTO accounts (uuid, name, email, password_hash) VALUES (?, ?, ?, ?)")
                .bind(uuid)
                .bind(name)
                .bind(email)
                .bind(password_hash)
                .execute(&self.pool)
                .await?;
        Ok(result.last_insert_rowid())
    }

    /// Get an account by UUID.
    pub async fn get_by_uuid(&self, uuid: &str) -> Result<Option<Account>, sqlx::Error> {
        let row: Option<AccountRow> = sqlx::query_as(
            "SELECT id, uuid, name, email, password_hash, role, avatar_url, access_token, refresh_token, created_at, updated_at
             FROM accounts WHERE uuid = ?",
        )
        .bind(uuid)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Account::from))
    }

    /// Get an account by email.
    pub async fn get_by_email(&self, email: &str) -> Result<Option<Account>, sqlx::Error> {
        let row: Option<AccountRow> = sqlx::query_as(
            "SELECT id, uuid, name, email, password_hash, role, avatar_url, access_token, refresh_token, created_at, updated_at
             FROM accounts WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Account::from))
    }

    /// Find the account whose stored refresh token equals the presented
    /// value. Exact string match; the refresh flow relies on this rather
    /// than signature-based lookup.
    pub async fn get_by_refresh_token(&self, token: &str) -> Result<Option<Account>, sqlx::Error> {
        let row: Option<AccountRow> = sqlx::query_as(
            "SELECT id, uuid, name, email, password_hash, role, avatar_url, access_token, refresh_token, created_at, updated_at
             FROM accounts WHERE refresh_token = ? AND refresh_token != ''",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Account::from))
    }

    /// Persist a newly issued token pair onto an account.
    /// Returns true if the account was updated.
    pub async fn set_tokens(
        &self,
        uuid: &str,
        access_token: &str,
        refresh_token: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE accounts SET access_token = ?, refresh_token = ?, updated_at = datetime('now')
             WHERE uuid = ?",
        )
        .bind(access_token)
        .bind(refresh_token)
        .bind(uuid)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete an account by UUID.
    pub async fn delete(&self, uuid: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM accounts WHERE uuid = ?")
            .bind(uuid)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
