//! naspi-upload entry point.

mod app;
mod cli;
mod config;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<ExitCode> {
    let cli = cli::Cli::parse();

    // Logs go to stderr; stdout carries progress and results.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = match &cli.config {
        Some(path) => config::Config::load_from(path)?,
        None => config::Config::load()?,
    };
    if let Some(server) = &cli.server {
        config.server_url = server.clone();
    }
    if let Some(mib) = cli.chunk_size_mib {
        config.chunk_size_mib = mib;
    }
    tracing::debug!(server = %config.server_url, "configuration loaded");

    let rt = tokio::runtime::Runtime::new()?;
    let ok = rt.block_on(app::run(cli, config))?;

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
