//! Credential service: password hashing, session tokens and the bearer-token guard.

pub mod middleware;
pub mod password;
pub mod token;

pub use middleware::{bearer_token, require_auth};
pub use password::{hash_password, verify_password, PasswordError};
pub use token::{Claims, Identity, TokenError, TokenKeys};
