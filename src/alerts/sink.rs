//! Delivers alerts to the durable log and to operator-facing notifiers.
//!
//! Each channel fails on its own: a log write error does not stop
//! notification, and a notifier error does not stop the log. Failures are
//! reported through the diagnostic logger and never returned.

use log::{debug, error, warn};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::SinkError;
use crate::models::AlertEvent;

/// Operator-facing presentation of an alert.
pub trait Notifier: Send {
    fn notify(&self, event: &AlertEvent) -> Result<(), SinkError>;
}

/// Append-only alert log, opened once.
pub struct AlertLog {
    path: PathBuf,
    file: File,
}

impl AlertLog {
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&mut self, event: &AlertEvent) -> io::Result<()> {
        writeln!(self.file, "{}", format_line(event))?;
        self.file.flush()
    }
}

/// `<ISO-8601 timestamp>:<LEVEL>:<message>`
pub fn format_line(event: &AlertEvent) -> String {
    format!(
        "{}:{}:{}",
        event.timestamp.format("%Y-%m-%dT%H:%M:%S%.3f%:z"),
        event.severity.level(),
        event.message
    )
}

pub struct AlertSink {
    log: Option<AlertLog>,
    notifiers: Vec<Box<dyn Notifier>>,
}

impl AlertSink {
    pub fn new(log: Option<AlertLog>) -> Self {
        Self {
            log,
            notifiers: Vec::new(),
        }
    }

    /// Open the log at `path`; run without one if it cannot be opened.
    pub fn with_log_file<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match AlertLog::open(path) {
            Ok(log) => Self::new(Some(log)),
            Err(e) => {
                warn!(
                    "Alert log {} unavailable, alerts will not be persisted: {}",
                    path.display(),
                    e
                );
                Self::new(None)
            }
        }
    }

    pub fn with_notifier(mut self, notifier: Box<dyn Notifier>) -> Self {
        self.notifiers.push(notifier);
        self
    }

    pub fn emit(&mut self, event: &AlertEvent) {
        debug!("alert {:?}: {}", event.severity, event.message);

        if let Some(log) = self.log.as_mut() {
            if let Err(e) = log.append(event) {
                error!(
                    "Failed to write alert to {}: {}",
                    log.path().display(),
                    e
                );
            }
        }

        for notifier in &self.notifiers {
            if let Err(e) = notifier.notify(event) {
                error!("Failed to notify operator: {}", e);
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::{Domain, Severity};
    use regex::Regex;
    use std::sync::{Arc, Mutex};
    use tempfile::tempdir;

    /// Keeps every event it receives.
    #[derive(Clone, Default)]
    pub(crate) struct RecordingNotifier {
        pub events: Arc<Mutex<Vec<AlertEvent>>>,
    }

    impl RecordingNotifier {
        pub fn messages(&self) -> Vec<String> {
            self.events
                .lock()
                .unwrap()
                .iter()
                .map(|e| e.message.clone())
                .collect()
        }
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, event: &AlertEvent) -> Result<(), SinkError> {
            self.events.lock().unwrap().push(event.clone());
            Ok(())
        }
    }

    struct FailingNotifier;

    impl Notifier for FailingNotifier {
        fn notify(&self, _event: &AlertEvent) -> Result<(), SinkError> {
            Err(SinkError::Unavailable("console closed".to_string()))
        }
    }

    #[test]
    fn test_log_line_format() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("system_monitor.log");
        let mut sink = AlertSink::with_log_file(&path);

        sink.emit(&AlertEvent::warning(
            Domain::Cpu,
            "High CPU usage detected! Usage: 85%",
        ));
        sink.emit(&AlertEvent::error(Domain::Network, "No network connectivity"));

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);

        let shape =
            Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}\.\d{3}[+-]\d{2}:\d{2}:(INFO|WARNING|ERROR):")
                .unwrap();
        assert!(shape.is_match(lines[0]), "unexpected line {}", lines[0]);
        assert!(lines[0].ends_with(":WARNING:High CPU usage detected! Usage: 85%"));
        assert!(lines[1].ends_with(":ERROR:No network connectivity"));
    }

    #[test]
    fn test_log_is_appended_across_opens() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("alerts.log");
        AlertSink::with_log_file(&path).emit(&AlertEvent::new(Severity::Info, None, "first"));
        AlertSink::with_log_file(&path).emit(&AlertEvent::new(Severity::Info, None, "second"));

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 2);
        assert!(contents.lines().next().unwrap().ends_with(":INFO:first"));
    }

    #[test]
    fn test_notifier_failure_does_not_stop_log_or_others() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("alerts.log");
        let recorder = RecordingNotifier::default();
        let mut sink = AlertSink::with_log_file(&path)
            .with_notifier(Box::new(FailingNotifier))
            .with_notifier(Box::new(recorder.clone()));

        sink.emit(&AlertEvent::error(Domain::Disk, "Error checking disk usage: gone"));

        assert_eq!(recorder.messages(), vec!["Error checking disk usage: gone"]);
        assert_eq!(std::fs::read_to_string(&path).unwrap().lines().count(), 1);
    }

    #[test]
    fn test_missing_log_still_notifies() {
        let dir = tempdir().unwrap();
        let recorder = RecordingNotifier::default();
        let mut sink = AlertSink::with_log_file(dir.path().join("no/such/dir/alerts.log"))
            .with_notifier(Box::new(recorder.clone()));

        sink.emit(&AlertEvent::warning(Domain::Memory, "High memory usage detected! Usage: 91%"));
        assert_eq!(recorder.messages().len(), 1);
    }

    #[test]
    fn test_failed_log_write_still_notifies() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("alerts.log");
        std::fs::write(&path, "").unwrap();
        // A read-only handle: the log opens but every append fails.
        let log = AlertLog {
            path: path.clone(),
            file: File::open(&path).unwrap(),
        };
        let recorder = RecordingNotifier::default();
        let mut sink = AlertSink::new(Some(log)).with_notifier(Box::new(recorder.clone()));

        sink.emit(&AlertEvent::warning(Domain::Cpu, "High CPU usage detected! Usage: 95%"));
        sink.emit(&AlertEvent::error(Domain::Network, "No network connectivity"));

        assert_eq!(
            recorder.messages(),
            vec!["High CPU usage detected! Usage: 95%", "No network connectivity"]
        );
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
    }
}
