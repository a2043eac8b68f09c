use std::io;
use thiserror::Error;

/// Failure of a single collector read. Never leaves the collector; it is
/// folded into an error-bearing reading.
#[derive(Error, Debug)]
pub enum CollectError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("sysfs walk failed: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("sampling worker failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("{0}")]
    Unsupported(String),
}

impl CollectError {
    pub fn unsupported<S: Into<String>>(msg: S) -> Self {
        CollectError::Unsupported(msg.into())
    }
}

/// Failure of one alert delivery channel.
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("notifier unavailable: {0}")]
    Unavailable(String),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum MonitorError {
    #[error("monitor task has stopped")]
    Stopped,
}
