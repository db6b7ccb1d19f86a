//! PostgreSQL implementation of the storage traits.
//!
//! Ownership is enforced inside each statement (`WHERE id = $1 AND owner = $2`), never by
//! reading a row and checking it afterwards. Email uniqueness is backed by the unique
//! index on `accounts.email`; a violation surfaces as [`StoreError::Conflict`].

use async_trait::async_trait;
use sqlx::PgPool;
use store::{Account, AccountStore, NewAccount, Note, NoteDraft, NotePatch, NoteStore, StoreError};
use uuid::Uuid;

const UNIQUE_VIOLATION: &str = "23505";

#[derive(Clone, Debug)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn backend(err: sqlx::Error) -> StoreError {
    StoreError::backend(err)
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some(UNIQUE_VIOLATION))
}

#[async_trait]
impl AccountStore for PgStore {
    async fn create_account(&self, account: NewAccount) -> Result<Account, StoreError> {
        sqlx::query_as(
            r#"
            INSERT INTO accounts (id, full_name, email, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING id, full_name, email, password_hash, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&account.full_name)
        .bind(&account.email)
        .bind(&account.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                StoreError::Conflict("account")
            } else {
                backend(e)
            }
        })
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        sqlx::query_as(
            "SELECT id, full_name, email, password_hash, created_at FROM accounts WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, StoreError> {
        sqlx::query_as(
            "SELECT id, full_name, email, password_hash, created_at FROM accounts WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)
    }
}

#[async_trait]
impl NoteStore for PgStore {
    async fn create(&self, owner: Uuid, draft: NoteDraft) -> Result<Note, StoreError> {
        sqlx::query_as(
            r#"
            INSERT INTO notes (id, owner, title, content)
            VALUES ($1, $2, $3, $4)
            RETURNING id, owner, title, content, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(owner)
        .bind(&draft.title)
        .bind(&draft.content)
        .fetch_one(&self.pool)
        .await
        .map_err(backend)
    }

    async fn list(&self, owner: Uuid) -> Result<Vec<Note>, StoreError> {
        sqlx::query_as(
            r#"
            SELECT id, owner, title, content, created_at, updated_at
            FROM notes
            WHERE owner = $1
            ORDER BY updated_at DESC
            "#,
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await
        .map_err(backend)
    }

    async fn update(&self, owner: Uuid, id: Uuid, patch: NotePatch) -> Result<Note, StoreError> {
        let note: Option<Note> = sqlx::query_as(
            r#"
            UPDATE notes SET
                title = COALESCE($3, title),
                content = COALESCE($4, content),
                updated_at = CASE
                    WHEN $3::text IS NULL AND $4::text IS NULL THEN updated_at
                    ELSE NOW()
                END
            WHERE id = $1 AND owner = $2
            RETURNING id, owner, title, content, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(owner)
        .bind(&patch.title)
        .bind(&patch.content)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?;

        note.ok_or(StoreError::NotFound("note"))
    }

    async fn delete(&self, owner: Uuid, id: Uuid) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM notes WHERE id = $1 AND owner = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await
            .map_err(backend)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("note"));
        }
        Ok(())
    }
}
