//! Postgres-backed user store.
//!
//! Same contract as the in-memory store; email uniqueness is enforced by a
//! unique index, with SQLSTATE 23505 mapped to `DomainError::Conflict`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use userhub_core::{DomainError, DomainResult, NewUser, User, UserId, UserPatch};

use crate::UserStore;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id          UUID PRIMARY KEY,
    name        TEXT NOT NULL,
    email       TEXT NOT NULL UNIQUE,
    age         BIGINT,
    created_at  TIMESTAMPTZ NOT NULL
)
"#;

/// Postgres store over a process-wide connection pool.
#[derive(Debug, Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect using a `postgres://` connection string.
    pub async fn connect(url: &str) -> DomainResult<Self> {
        let pool = PgPool::connect(url).await.map_err(store_err)?;
        Ok(Self::new(pool))
    }

    /// Create the `users` table if it does not exist yet.
    pub async fn ensure_schema(&self) -> DomainResult<()> {
        sqlx::query(SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(store_err)?;
        Ok(())
    }
}

fn store_err(e: sqlx::Error) -> DomainError {
    DomainError::store(e.to_string())
}

// Emails are lowercased before they reach the store, so the plain unique
// index gives case-insensitive uniqueness.
fn write_err(e: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db) = &e {
        if db.code().as_deref() == Some("23505") {
            return DomainError::conflict("email already taken");
        }
    }
    store_err(e)
}

fn row_to_user(row: &PgRow) -> DomainResult<User> {
    Ok(User {
        id: UserId::from_uuid(row.try_get("id").map_err(store_err)?),
        name: row.try_get("name").map_err(store_err)?,
        email: row.try_get("email").map_err(store_err)?,
        age: row.try_get::<Option<i64>, _>("age").map_err(store_err)?,
        created_at: row
            .try_get::<DateTime<Utc>, _>("created_at")
            .map_err(store_err)?,
    })
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn list(&self) -> DomainResult<Vec<User>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, email, age, created_at
            FROM users
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(store_err)?;

        rows.iter().map(row_to_user).collect()
    }

    async fn get(&self, id: UserId) -> DomainResult<User> {
        let row = sqlx::query(
            r#"
            SELECT id, name, email, age, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(store_err)?;

        match row {
            Some(row) => row_to_user(&row),
            None => Err(DomainError::NotFound),
        }
    }

    async fn create(&self, fields: NewUser) -> DomainResult<User> {
        let user = User::create(fields, UserId::new(), Utc::now())?;

        sqlx::query(
            r#"
            INSERT INTO users (id, name, email, age, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(user.id.as_uuid())
        .bind(&user.name)
        .bind(&user.email)
        .bind(user.age)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(write_err)?;

        Ok(user)
    }

    async fn update(&self, id: UserId, patch: UserPatch) -> DomainResult<User> {
        let current = self.get(id).await?;
        let updated = current.apply(&patch)?;

        let result = sqlx::query(
            r#"
            UPDATE users
            SET name = $2, email = $3, age = $4
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .bind(&updated.name)
        .bind(&updated.email)
        .bind(updated.age)
        .execute(&self.pool)
        .await
        .map_err(write_err)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound);
        }
        Ok(updated)
    }

    async fn delete(&self, id: UserId) -> DomainResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(store_err)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound);
        }
        Ok(())
    }
}
