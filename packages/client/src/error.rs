use thiserror::Error;

use crate::cipher::CipherError;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The server answered with a non-success status.
    #[error("{message} (HTTP {status})")]
    Api { status: u16, message: String },

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("not logged in; run `lockify login` first")]
    NotLoggedIn,

    #[error(transparent)]
    Cipher(#[from] CipherError),

    #[error("session file: {0}")]
    Io(#[from] std::io::Error),

    #[error("session file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

impl ClientError {
    /// True for a 401 from the server, i.e. the stored token is no longer accepted.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::Api { status: 401, .. })
    }
}
