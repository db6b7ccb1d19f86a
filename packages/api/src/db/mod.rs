//! # Database module: PostgreSQL pool and store
//!
//! - [`connect`] opens a [`sqlx::PgPool`] from [`crate::settings::Database`] and runs the
//!   embedded migrations (`packages/api/migrations`). Callers treat failure as fatal.
//! - [`PgStore`] implements [`store::AccountStore`] and [`store::NoteStore`] on top of
//!   that pool.

mod pool;
mod postgres;

pub use pool::connect;
pub use postgres::PgStore;
