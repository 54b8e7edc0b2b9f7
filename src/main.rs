mod config;
mod error;
mod monitor;
mod record;
mod sink;

use anyhow::Result;
use clap::Parser;
use log::info;
use simple_logger::SimpleLogger;
use tokio::sync::watch;

#[tokio::main]
async fn main() -> Result<()> {
    SimpleLogger::new()
        .with_level(log::LevelFilter::Info)
        .env()
        .init()?;

    info!("Starting bitflip-monitor");

    // Parse command-line arguments
    let cli = config::Cli::parse();

    // Load configuration
    let config = config::load_config(&cli)?;
    info!("Configuration loaded successfully");

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // Spawn the monitor task
    let mut monitor_handle = tokio::spawn(monitor::run(config, shutdown_rx));

    tokio::select! {
        result = &mut monitor_handle => {
            result??;
        }
        _ = tokio::signal::ctrl_c() => {
            println!("Logging stopped.");
            let _ = shutdown_tx.send(true);
            // Let the monitor finish the line in flight and close its handles
            monitor_handle.await??;
        }
    }

    Ok(())
}
