//! # Storage traits: accounts and owner-scoped notes
//!
//! The server talks to persistence only through these two traits, so the same route
//! handlers run against PostgreSQL in production and against [`crate::MemoryStore`]
//! in tests.
//!
//! ## Owner scoping
//!
//! Every note method except [`NoteStore::create`] takes the caller's account id and
//! filters on it together with the note id. Implementations must do that filtering
//! inside the single read/write they perform: a note owned by someone else is
//! indistinguishable from a note that does not exist ([`StoreError::NotFound`]).
//!
//! ## Atomicity
//!
//! Each method is one record operation. No method spans records, so no transactions
//! are needed.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::{Account, NewAccount, Note, NoteDraft, NotePatch};

/// Account persistence. Accounts are unique by email.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Insert a new account. Fails with [`StoreError::Conflict`] if the email is taken.
    async fn create_account(&self, account: NewAccount) -> Result<Account, StoreError>;

    /// Look an account up by its (normalised) email.
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, StoreError>;
}

/// Note persistence, scoped by owner.
#[async_trait]
pub trait NoteStore: Send + Sync {
    /// Create a note owned by `owner`.
    async fn create(&self, owner: Uuid, draft: NoteDraft) -> Result<Note, StoreError>;

    /// All notes owned by `owner`, most recently updated first.
    async fn list(&self, owner: Uuid) -> Result<Vec<Note>, StoreError>;

    /// Apply `patch` to the note `id` if `owner` owns it. An empty patch returns the
    /// note unchanged and does not touch `updated_at`.
    async fn update(&self, owner: Uuid, id: Uuid, patch: NotePatch) -> Result<Note, StoreError>;

    /// Delete the note `id` if `owner` owns it.
    async fn delete(&self, owner: Uuid, id: Uuid) -> Result<(), StoreError>;
}
