use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::{Account, NewAccount, Note, NoteDraft, NotePatch};
use crate::repo::{AccountStore, NoteStore};

/// In-memory store for tests and local development.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    accounts: Arc<Mutex<HashMap<Uuid, Account>>>,
    notes: Arc<Mutex<HashMap<Uuid, Note>>>,
    clock: Arc<Mutex<Option<DateTime<Utc>>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current time, strictly after every timestamp handed out before so that
    /// ordering by `updated_at` is total.
    fn tick(&self) -> DateTime<Utc> {
        let mut last = lock(&self.clock);
        let mut now = Utc::now();
        if let Some(prev) = *last {
            if now <= prev {
                now = prev + Duration::microseconds(1);
            }
        }
        *last = Some(now);
        now
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn create_account(&self, account: NewAccount) -> Result<Account, StoreError> {
        let mut accounts = lock(&self.accounts);
        if accounts.values().any(|a| a.email == account.email) {
            return Err(StoreError::Conflict("account"));
        }
        let created = Account {
            id: Uuid::new_v4(),
            full_name: account.full_name,
            email: account.email,
            password_hash: account.password_hash,
            created_at: self.tick(),
        };
        accounts.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        Ok(lock(&self.accounts)
            .values()
            .find(|a| a.email == email)
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, StoreError> {
        Ok(lock(&self.accounts).get(&id).cloned())
    }
}

#[async_trait]
impl NoteStore for MemoryStore {
    async fn create(&self, owner: Uuid, draft: NoteDraft) -> Result<Note, StoreError> {
        let now = self.tick();
        let note = Note {
            id: Uuid::new_v4(),
            owner,
            title: draft.title,
            content: draft.content,
            created_at: now,
            updated_at: now,
        };
        lock(&self.notes).insert(note.id, note.clone());
        Ok(note)
    }

    async fn list(&self, owner: Uuid) -> Result<Vec<Note>, StoreError> {
        let mut notes: Vec<Note> = lock(&self.notes)
            .values()
            .filter(|n| n.owner == owner)
            .cloned()
            .collect();
        notes.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(notes)
    }

    async fn update(&self, owner: Uuid, id: Uuid, patch: NotePatch) -> Result<Note, StoreError> {
        let mut notes = lock(&self.notes);
        let note = notes
            .get_mut(&id)
            .filter(|n| n.owner == owner)
            .ok_or(StoreError::NotFound("note"))?;
        if patch.apply(note) {
            note.updated_at = self.tick();
        }
        Ok(note.clone())
    }

    async fn delete(&self, owner: Uuid, id: Uuid) -> Result<(), StoreError> {
        let mut notes = lock(&self.notes);
        if !notes.get(&id).is_some_and(|n| n.owner == owner) {
            return Err(StoreError::NotFound("note"));
        }
        notes.remove(&id);
        Ok(())
    }
}
