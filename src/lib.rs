pub mod cli;
pub mod config;
pub mod dataset;
pub mod generator;
pub mod models;
pub mod sampling;
pub mod sources;

use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::generator::{run_generation, GenerateError, GenerationSummary};

/// Entry point for the binary. Returns `None` when only the configuration
/// was printed.
pub fn run(cli: Cli) -> Result<Option<GenerationSummary>, GenerateError> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let config = cli.resolve_config()?;
    if cli.print_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(None);
    }

    run_generation(&config).map(Some)
}
