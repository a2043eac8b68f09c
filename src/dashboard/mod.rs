//! Console presentation: renders snapshots, shows alerts and reads the
//! operator's `refresh` / `run` commands from stdin.

use anyhow::Context;
use log::{debug, info};
use std::io::{self, Write};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::alerts::Notifier;
use crate::error::SinkError;
use crate::models::{AlertEvent, Domain, Severity, Snapshot};
use crate::report::{self, Report};
use crate::scheduler::MonitorHandle;

/// Prints alerts to stdout with a per-severity banner.
pub struct ConsoleNotifier;

pub fn alert_banner(event: &AlertEvent) -> String {
    match event.severity {
        Severity::Info => format!("[info] {}", event.message),
        Severity::Warning => format!("[warning] {}", event.message),
        Severity::Error => format!("!! [error] {} !!", event.message),
    }
}

/// A closed stdout (piped into a reader that went away) leaves the console
/// unusable for the rest of the run.
fn console_error(e: io::Error) -> SinkError {
    match e.kind() {
        io::ErrorKind::BrokenPipe => SinkError::Unavailable("stdout is closed".to_string()),
        _ => SinkError::Io(e),
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, event: &AlertEvent) -> Result<(), SinkError> {
        let mut out = io::stdout().lock();
        writeln!(out, "{}", alert_banner(event)).map_err(console_error)?;
        out.flush().map_err(console_error)?;
        Ok(())
    }
}

/// The latest snapshot as a status panel.
pub fn render_snapshot(snapshot: &Snapshot) -> String {
    let mut lines = vec!["== System Monitor ==".to_string()];
    for domain in Domain::ALL {
        match snapshot.get(domain) {
            Some(reading) => {
                lines.push(report::describe(reading));
            }
            None => lines.push(format!("{}: pending", domain.title())),
        }
    }
    lines.join("\n")
}

pub fn render_report(report: &Report) -> String {
    format!(
        "== System Details ({}) ==\n{}",
        report.generated_at.format("%Y-%m-%d %H:%M:%S"),
        report
    )
}

const HELP: &str = "Commands: refresh (r), run, quit (q)";

enum Command {
    Refresh,
    Run,
    Quit,
    Help,
    Unknown(String),
}

fn parse_command(line: &str) -> Option<Command> {
    let command = match line.trim().to_lowercase().as_str() {
        "" => return None,
        "r" | "refresh" => Command::Refresh,
        "run" => Command::Run,
        "q" | "quit" | "exit" => Command::Quit,
        "h" | "help" | "?" => Command::Help,
        other => Command::Unknown(other.to_string()),
    };
    Some(command)
}

/// Interactive console until the operator quits or stdin closes.
pub async fn interactive(handle: MonitorHandle) -> anyhow::Result<()> {
    let mut updates = handle.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    println!("{}", HELP);

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    info!("Monitor stopped, leaving console");
                    break;
                }
                let snapshot = updates.borrow_and_update().clone();
                println!("{}", render_snapshot(&snapshot));
            }
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read command")? else {
                    debug!("stdin closed");
                    break;
                };
                match parse_command(&line) {
                    None => {}
                    Some(Command::Refresh) => handle.refresh().await?,
                    Some(Command::Run) => {
                        let report = handle.run_report().await?;
                        println!("{}", render_report(&report));
                    }
                    Some(Command::Quit) => break,
                    Some(Command::Help) => println!("{}", HELP),
                    Some(Command::Unknown(other)) => {
                        println!("Unknown command '{}'. {}", other, HELP)
                    }
                }
            }
        }
    }
    Ok(())
}
