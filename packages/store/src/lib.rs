pub mod error;
pub mod models;
pub mod repo;

mod memory;
pub use memory::MemoryStore;

pub use error::StoreError;
pub use models::{Account, NewAccount, Note, NoteDraft, NotePatch, UserInfo};
pub use repo::{AccountStore, NoteStore};
