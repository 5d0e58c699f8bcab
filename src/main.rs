use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use lugnut::app::AppContext;
use lugnut::cli::{commands, Cli, Commands};
use lugnut::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.log_file.as_deref())?;

    let config = Config::load()?;
    let ctx = AppContext::new(config, cli.output_dir.clone())?;

    match cli.command {
        Commands::Sites => {
            commands::list_sites();
        }
        Commands::Scrape {
            site,
            max_pages,
            pages_from,
            headless,
            auto_challenge,
        } => {
            let opts = commands::ScrapeOptions {
                max_pages,
                pages_from,
                headless,
                auto_challenge,
            };
            commands::run_scrape(&ctx, &site, opts).await?;
        }
        Commands::Merge { input_dir, output } => {
            commands::run_merge(&ctx, &input_dir, output)?;
        }
    }

    Ok(())
}

/// Console logging, plus an append-only file layer when requested.
fn init_tracing(log_file: Option<&Path>) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(fmt::layer()).with(filter);

    match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            registry
                .with(fmt::layer().with_ansi(false).with_writer(Arc::new(file)))
                .init();
        }
        None => registry.init(),
    }

    Ok(())
}
