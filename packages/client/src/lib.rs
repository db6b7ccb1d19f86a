//! # Lockify client
//!
//! Talks to the Lockify API and keeps note bodies encrypted end to end.
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`api`] | [`ApiClient`], one method per server endpoint |
//! | [`cipher`] | [`NoteCipher`]: passphrase-derived AES-256-GCM sealing of note bodies |
//! | [`session`] | [`Session`] (token plus profile) and its on-disk persistence |
//! | [`render`] | Plain-text rendering of decrypted notes |
//! | [`error`] | [`ClientError`] |

pub mod api;
pub mod cipher;
pub mod error;
pub mod render;
pub mod session;

pub use api::ApiClient;
pub use cipher::{CipherError, NoteCipher};
pub use error::ClientError;
pub use session::Session;
