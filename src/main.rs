use clap::Parser;
use env_logger::{Builder, WriteStyle};
use hostwatch::cli::Cli;
use hostwatch::config::AppConfig;
use log::error;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration first (without logging)
    let config = AppConfig::load(&cli.config).unwrap_or_else(|e| {
        eprintln!("Failed to load configuration: {:#}", e);
        // Fall back to default configuration
        AppConfig::default()
    });

    // Initialise logger with a configured log level
    Builder::new()
        .filter_level(config.get_log_level())
        .write_style(WriteStyle::Always)
        .format_timestamp_secs()
        .init();

    if let Err(e) = hostwatch::run(config, cli).await {
        error!("Application error: {}", e);
        return Err(e);
    }
    Ok(())
}
