use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use notewatch::app::AppContext;
use notewatch::cli::{commands, Cli, Commands};
use notewatch::config::Config;
use notewatch::watch::{WatchConfig, Watcher};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref()).context("loading configuration")?;
    if let Some(workers) = cli.workers {
        config.workers = workers;
    }

    let ctx = AppContext::new(config)?;

    match cli.command {
        Commands::Check { sources } => {
            let results = commands::check_sources(&ctx, &sources).await?;
            if results.iter().any(|r| r.error().is_some()) {
                std::process::exit(1);
            }
        }
        Commands::Sources => {
            commands::list_sources(&ctx)?;
        }
        Commands::Reset { id } => {
            commands::reset_source(&ctx, &id)?;
        }
        Commands::Watch {
            interval,
            no_initial_check,
        } => {
            let interval_secs = WatchConfig::parse_interval(&interval).map_err(anyhow::Error::msg)?;
            let watch_config = WatchConfig {
                interval_secs,
                check_on_start: !no_initial_check,
            };
            Watcher::new(Arc::new(ctx), watch_config).run().await?;
        }
    }

    Ok(())
}
