use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use estuary::app::AppContext;
use estuary::cli::{commands, Cli, Commands};
use estuary::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = Config::load(&cli.config)?;
    let ctx = AppContext::with_workers(&config, cli.workers);

    match cli.command {
        Commands::Serve { addr } => {
            commands::serve(ctx, addr).await?;
        }
        Commands::Items { sources, topics } => {
            commands::print_items(&ctx, sources, topics).await?;
        }
        Commands::Meta => {
            commands::print_meta(&ctx)?;
        }
    }

    Ok(())
}
