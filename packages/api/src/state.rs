use std::sync::Arc;

use store::{AccountStore, MemoryStore, NoteStore};

use crate::auth::TokenKeys;
use crate::rate_limit::RateLimiter;

/// Shared, cheaply cloneable handler state.
#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<dyn AccountStore>,
    pub notes: Arc<dyn NoteStore>,
    pub tokens: TokenKeys,
    pub auth_limiter: Arc<RateLimiter>,
}

impl AppState {
    pub fn new<S>(store: S, tokens: TokenKeys, auth_limiter: RateLimiter) -> Self
    where
        S: AccountStore + NoteStore + Clone + 'static,
    {
        Self {
            accounts: Arc::new(store.clone()),
            notes: Arc::new(store),
            tokens,
            auth_limiter: Arc::new(auth_limiter),
        }
    }

    /// State backed by a fresh [`MemoryStore`].
    pub fn in_memory(tokens: TokenKeys, auth_limiter: RateLimiter) -> Self {
        Self::new(MemoryStore::new(), tokens, auth_limiter)
    }
}
