pub mod alerts;
pub mod cli;
pub mod collectors;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod models;
pub mod report;
pub mod scheduler;
mod utils;

use crate::alerts::{AlertSink, Thresholds};
use crate::cli::{Cli, Command};
use crate::config::AppConfig;
use crate::dashboard::ConsoleNotifier;
use crate::scheduler::Monitor;
use anyhow::{bail, Context};
use log::{debug, error, info};

pub async fn run(config: AppConfig, cli: Cli) -> anyhow::Result<()> {
    info!("Starting hostwatch");

    let result = match cli.command.clone().unwrap_or(Command::Watch) {
        Command::Watch => watch(&config).await,
        Command::Report { json } => report(&config, json).await,
        Command::Tail { lines } => tail(&config, lines),
        Command::InitConfig { force } => init_config(&config, &cli, force),
    };

    match result {
        Ok(_) => info!("hostwatch finished"),
        Err(ref e) => {
            error!("Application error: {e:#}");
            // Print chain of error causes
            let mut source = e.source();
            while let Some(e) = source {
                error!("Caused by: {e}");
                source = e.source();
            }
        }
    }
    result.context("hostwatch failed to run")
}

fn build_monitor(config: &AppConfig) -> anyhow::Result<Monitor> {
    debug!("Building collectors");
    let collectors = collectors::from_config(config)?;
    let sink = AlertSink::with_log_file(config.log_file()).with_notifier(Box::new(ConsoleNotifier));
    Ok(Monitor::new(
        collectors,
        Thresholds::from(&config.thresholds),
        sink,
        config.poll_interval(),
    ))
}

async fn watch(config: &AppConfig) -> anyhow::Result<()> {
    let handle = build_monitor(config)?.spawn();

    tokio::select! {
        result = dashboard::interactive(handle) => result,
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted, shutting down");
            Ok(())
        }
    }
}

async fn report(config: &AppConfig, json: bool) -> anyhow::Result<()> {
    let mut monitor = build_monitor(config)?;
    let report = monitor.run_report().await;
    if json {
        let text = serde_json::to_string_pretty(&report).context("Failed to encode report")?;
        println!("{}", text);
    } else {
        println!("{}", dashboard::render_report(&report));
    }
    Ok(())
}

fn tail(config: &AppConfig, lines: usize) -> anyhow::Result<()> {
    let path = config.log_file();
    let recent = utils::file::simple_tail(&path, lines)
        .context(format!("Failed to read alert log {}", path.display()))?;
    for line in recent {
        println!("{}", line);
    }
    Ok(())
}

fn init_config(config: &AppConfig, cli: &Cli, force: bool) -> anyhow::Result<()> {
    if cli.config.exists() && !force {
        bail!(
            "{} already exists, pass --force to overwrite",
            cli.config.display()
        );
    }
    config.save(&cli.config)
}
