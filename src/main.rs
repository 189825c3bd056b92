mod cli;
mod client;
mod config;
mod logging;
mod monitor;
mod paths;
mod rpc;
mod view;

use anyhow::Result;
use clap::Parser;
use cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config = cli::load_config(&cli)?;
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        backend = %config.backend.address,
        "sessiondeck starting"
    );

    let result = cli::run(cli, config).await;
    if let Err(e) = &result {
        tracing::error!(error = %e, "command failed");
    }
    result
}

#[cfg(test)]
#[path = "tests/cli_tests.rs"]
mod cli_tests;
