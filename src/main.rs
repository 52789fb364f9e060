//! Command-line entrypoint for the git provider workflows.

use std::io::{self, Write};
use std::process::ExitCode;

use gitops_providers::{GitopsConfig, ProviderError};
use ortho_config::OrthoConfig;
use tracing_subscriber::EnvFilter;

mod cli;

/// Log level used when `RUST_LOG` is unset or invalid.
const DEFAULT_LOG_FILTER: &str = "warn";

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            if writeln!(io::stderr().lock(), "{error}").is_err() {
                return ExitCode::FAILURE;
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), ProviderError> {
    init_logging()?;
    let config = load_config()?;
    let mut stdout = io::stdout().lock();
    cli::run(&config, &mut stdout).await
}

/// Installs a stderr `fmt` subscriber filtered by `RUST_LOG`.
///
/// # Errors
///
/// Returns [`ProviderError::Configuration`] when a global subscriber is
/// already installed.
fn init_logging() -> Result<(), ProviderError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init()
        .map_err(|error| ProviderError::Configuration {
            message: format!("could not install logging: {error}"),
        })
}

/// Loads configuration from CLI, environment, and files.
///
/// # Errors
///
/// Returns [`ProviderError::Configuration`] when ortho-config fails to parse
/// arguments or load configuration files.
fn load_config() -> Result<GitopsConfig, ProviderError> {
    GitopsConfig::load().map_err(|error| ProviderError::Configuration {
        message: error.to_string(),
    })
}
