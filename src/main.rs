mod cli;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use contact_manager::{config, db};

use crate::cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let cli = Cli::parse();

    // Load configuration
    let config = config::init()?;

    // Initialize database connection
    let mut db = db::init(&config).await?;

    let result = cli::run(cli.command, &mut db).await;

    // Close even if the command failed, then report the command's error first
    let closed = db.close().await;
    result?;
    closed?;

    Ok(())
}
