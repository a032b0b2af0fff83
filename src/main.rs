//! Pizza assistant - review-grounded restaurant Q&A CLI
//!
#![doc = "Pizza assistant - review-grounded restaurant Q&A CLI"]
#![doc = "Main entry point for the pizza-assistant application."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use pizza_assistant::cli::{Cli, Commands};
use pizza_assistant::commands;
use pizza_assistant::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Initialize tracing
    init_tracing(cli.verbose);

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    // Execute command
    match cli.command {
        Commands::Chat => {
            tracing::info!("Starting interactive chat mode");
            commands::chat::run_chat(config).await?;
            Ok(())
        }
        Commands::Ask { question } => {
            tracing::debug!("Answering one question");
            commands::ask::run_ask(config, question).await?;
            Ok(())
        }
        Commands::Index { rebuild } => {
            tracing::info!("Indexing reviews (rebuild={})", rebuild);
            commands::index::run_index(config, rebuild).await?;
            Ok(())
        }
    }
}

/// Initialize tracing subscriber with environment filter
///
/// Logs go to stderr so answers printed on stdout stay clean.
fn init_tracing(verbose: bool) {
    let default_level = if verbose {
        "pizza_assistant=debug"
    } else {
        "pizza_assistant=info"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
