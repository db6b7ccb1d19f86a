use std::fmt::Write as _;

use chrono::{DateTime, Local, Utc};
use store::Note;

use crate::cipher::{CipherError, NoteCipher};

pub const EMPTY_LIST: &str = "No notes yet. Create your first encrypted note!";

/// A note with its body opened, or the reason it could not be.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenedNote {
    pub id: String,
    pub title: String,
    pub body: Result<String, CipherError>,
    pub updated_at: DateTime<Utc>,
}

impl OpenedNote {
    pub fn open(cipher: &NoteCipher, note: &Note) -> Self {
        Self {
            id: note.id.to_string(),
            title: note.title.clone(),
            body: cipher.decrypt(&note.content),
            updated_at: note.updated_at,
        }
    }
}

/// Open every note; undecryptable bodies stay in the list as errors.
pub fn open_all(cipher: &NoteCipher, notes: &[Note]) -> Vec<OpenedNote> {
    notes.iter().map(|note| OpenedNote::open(cipher, note)).collect()
}

pub fn render_note(note: &OpenedNote) -> String {
    let mut out = String::new();
    let title = if note.title.is_empty() {
        "(untitled)"
    } else {
        &note.title
    };
    let _ = writeln!(out, "{title}");
    match &note.body {
        Ok(body) => {
            for line in body.lines() {
                let _ = writeln!(out, "  {line}");
            }
        }
        Err(e) => {
            let _ = writeln!(out, "  [unable to decrypt: {e}]");
        }
    }
    let updated = note.updated_at.with_timezone(&Local);
    let _ = writeln!(out, "  Last updated: {}", updated.format("%Y-%m-%d %H:%M:%S"));
    let _ = write!(out, "  id: {}", note.id);
    out
}

pub fn render_notes(notes: &[OpenedNote]) -> String {
    if notes.is_empty() {
        return EMPTY_LIST.to_string();
    }
    notes.iter().map(render_note).collect::<Vec<_>>().join("\n\n")
}
