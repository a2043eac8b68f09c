use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::DEFAULT_CONFIG_FILE;

#[derive(Parser, Debug)]
#[command(name = "hostwatch", version, about = "Host resource monitor with threshold alerts")]
pub struct Cli {
    /// INI configuration file
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Poll on a timer and accept refresh/run commands on stdin (default)
    Watch,
    /// Run a single pass and print the consolidated report
    Report {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the most recent lines of the alert log
    Tail {
        #[arg(short = 'n', long, default_value_t = 20)]
        lines: usize,
    },
    /// Write the default configuration to the config path
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
