//! # API crate: the Lockify notes server
//!
//! Signup, login and owner-scoped note CRUD over a small JSON REST surface. Note
//! bodies arrive already encrypted by the client; the server stores them as opaque
//! strings.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`application`] | Tracing setup, state construction, serving with graceful shutdown |
//! | [`auth`] | Argon2id password hashing, HS256 session tokens, the bearer-token middleware |
//! | [`db`] | PostgreSQL pool, migrations and the [`db::PgStore`] implementation of the storage traits |
//! | [`error`] | [`ApiError`], the single error type handlers return, and its JSON rendering |
//! | [`rate_limit`] | Fixed-window per-IP limiter for `/api/auth/*` |
//! | [`routes`] | The routing table and the handlers |
//! | [`settings`] | Layered configuration (defaults, `config.toml`, environment) |
//! | [`state`] | [`AppState`] shared by every handler |
//! | [`validation`] | Request payload validation |

pub mod application;
pub mod auth;
pub mod db;
pub mod error;
pub mod rate_limit;
pub mod routes;
pub mod settings;
pub mod state;
pub mod validation;

pub use application::{init_tracing, launch, Backend};
pub use error::ApiError;
pub use routes::router;
pub use settings::Settings;
pub use state::AppState;
