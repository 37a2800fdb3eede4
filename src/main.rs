//! Iris storefront console

#![expect(
    clippy::print_stdout,
    clippy::print_stderr,
    reason = "the console writes its results to the terminal"
)]

use std::{io, process};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use iris_storefront::{
    config::{LogFormat, LoggingConfig},
    context::StorefrontContext,
};

use crate::cli::Cli;

mod cli;

/// Iris storefront console entry point.
#[tokio::main]
pub async fn main() {
    let _env = dotenvy::dotenv();

    let cli = Cli::parse();

    init_logging(&cli.config.logging);

    let context = match StorefrontContext::from_config(&cli.config) {
        Ok(context) => context,
        Err(error) => {
            eprintln!("failed to initialize the storefront client: {error}");
            process::exit(1);
        }
    };

    let result = cli.run(&context).await;

    // A command may have refreshed the access token mid-flight; the session
    // file has to follow or the next invocation starts with a stale token.
    if let Err(error) = context.persist_refreshed_token() {
        tracing::warn!(%error, "failed to persist the refreshed session");
    }

    if let Err(error) = result {
        eprintln!("{error}");
        process::exit(1);
    }
}

/// Logs go to stderr so tables and receipts stay pipeable.
fn init_logging(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    match config.log_format {
        LogFormat::Compact => tracing_subscriber::fmt()
            .compact()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init(),
    }
}
