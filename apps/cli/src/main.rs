//! `nethra` binary entry point.

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::debug;

use nethra_cli::cli::Cli;
use nethra_cli::state::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    nethra_cli::init_tracing(cli.verbose);

    let config = AppConfig::load(cli.config.clone())
        .context("Failed to load configuration")?
        .with_api_url(cli.api_url.clone());
    config.validate().context("Invalid configuration")?;

    debug!(api_url = %config.api.base_url, "Configuration loaded");

    Ok(nethra_cli::run(cli.command, cli.config, config).await)
}
