use chrono::{DateTime, Local};
use serde::Serialize;

use super::Domain;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    /// Level column of the durable log.
    pub fn level(&self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertEvent {
    pub severity: Severity,
    pub message: String,
    pub domain: Option<Domain>,
    pub timestamp: DateTime<Local>,
}

impl AlertEvent {
    pub fn new(severity: Severity, domain: Option<Domain>, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            domain,
            timestamp: Local::now(),
        }
    }

    pub fn warning(domain: Domain, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, Some(domain), message)
    }

    pub fn error(domain: Domain, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, Some(domain), message)
    }
}
