//! # Domain models for accounts and notes
//!
//! Defines the records kept by the storage layer and the client-safe projections
//! that cross the HTTP boundary. Everything here is `Serialize + Deserialize` so the
//! same types are shared by the server and the client crates.
//!
//! ## Types
//!
//! | Struct | Represents |
//! |--------|-----------|
//! | [`Account`] | A full account row, including the Argon2 password hash. Server side only; never serialised to a response. |
//! | [`UserInfo`] | The public profile (`id`, `fullName`, `email`) returned by login and `/api/auth/me`. |
//! | [`NewAccount`] | Input for account creation: the profile plus an already-derived password hash. |
//! | [`Note`] | A stored note. `content` is opaque ciphertext produced by the client. Serialised with the `_id`/camelCase field names the client expects. |
//! | [`NoteDraft`] | Input for note creation. |
//! | [`NotePatch`] | Partial update; `None` fields are left untouched. |

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Full account record.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Account {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Project to the profile that is safe to hand to a client.
    pub fn to_info(&self) -> UserInfo {
        UserInfo {
            id: self.id.to_string(),
            full_name: self.full_name.clone(),
            email: self.email.clone(),
        }
    }
}

/// Account information safe to send to the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: String,
    pub full_name: String,
    pub email: String,
}

/// A validated signup, ready to be persisted.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub full_name: String,
    pub email: String,
    pub password_hash: String,
}

/// A note owned by exactly one account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Note {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub owner: Uuid,
    pub title: String,
    /// Ciphertext; the server never interprets it.
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for a new note.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
}

/// A partial note update.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NotePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl NotePatch {
    /// True when the patch would not change anything.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none()
    }

    /// Apply the present fields to `note`. Returns whether anything was written.
    pub fn apply(&self, note: &mut Note) -> bool {
        if let Some(title) = &self.title {
            note.title = title.clone();
        }
        if let Some(content) = &self.content {
            note.content = content.clone();
        }
        !self.is_empty()
    }
}
