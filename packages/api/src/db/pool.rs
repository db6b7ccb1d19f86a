//! Database connection pool.

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

use crate::settings;

/// Open a connection pool and bring the schema up to date.
pub async fn connect(settings: &settings::Database) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(settings.connections)
        .connect(&settings.url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("database ready ({} max connections)", settings.connections);

    Ok(pool)
}
