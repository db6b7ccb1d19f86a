use std::net::SocketAddr;

use anyhow::Context as _;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use crate::auth::TokenKeys;
use crate::db::{self, PgStore};
use crate::rate_limit::RateLimiter;
use crate::routes::router;
use crate::settings::Settings;
use crate::state::AppState;
use store::MemoryStore;

/// Where accounts and notes live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Postgres,
    /// Volatile, for local development only.
    Memory,
}

/// Install the global tracing subscriber. `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,lockify_api=debug,tower_http=debug"));
    fmt().with_env_filter(filter).init();
}

/// Build state for `backend`, bind and serve until Ctrl+C or SIGTERM.
pub async fn launch(settings: Settings, backend: Backend) -> anyhow::Result<()> {
    settings.validate().context("invalid settings")?;

    let tokens = TokenKeys::new(&settings.auth.secret, settings.auth.token_lifetime()?);
    let limiter = RateLimiter::from_settings(&settings.ratelimit);

    let state = match backend {
        Backend::Postgres => {
            info!("Connecting to database...");
            let pool = db::connect(&settings.database)
                .await
                .context("failed to connect to the database")?;
            AppState::new(PgStore::new(pool), tokens, limiter)
        }
        Backend::Memory => {
            info!("Using in-memory store; data will not survive a restart");
            AppState::new(MemoryStore::new(), tokens, limiter)
        }
    };

    let app = router(state, &settings.server);

    let address = settings.server.address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;
    info!("Lockify running at http://{address}");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
