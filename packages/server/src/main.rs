use std::process::ExitCode;

use api::{init_tracing, launch, Backend, Settings};
use clap::Parser;
use tracing::error;

/// Lockify API server.
#[derive(Debug, Parser)]
#[command(name = "lockify-server", version, about)]
struct Cli {
    /// Keep accounts and notes in memory instead of PostgreSQL.
    #[arg(long)]
    memory: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    let backend = if cli.memory {
        Backend::Memory
    } else {
        Backend::Postgres
    };

    let result = match Settings::new() {
        Ok(settings) => launch(settings, backend).await,
        Err(e) => Err(anyhow::Error::new(e).context("failed to load settings")),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
