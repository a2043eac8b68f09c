use chrono::{DateTime, Local};
use serde::Serialize;

pub(crate) mod alert;
pub(crate) mod display;
pub(crate) mod network;
pub(crate) mod snapshot;

pub use alert::{AlertEvent, Severity};
pub use display::{BrightnessInfo, DisplayInfo};
pub use network::Reachability;
pub use snapshot::Snapshot;

/// A monitored resource category. Declaration order is the pass order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Domain {
    Cpu,
    Memory,
    Disk,
    Network,
    Display,
    Brightness,
}

impl Domain {
    pub const ALL: [Domain; 6] = [
        Domain::Cpu,
        Domain::Memory,
        Domain::Disk,
        Domain::Network,
        Domain::Display,
        Domain::Brightness,
    ];

    /// Heading used in reports and on the console.
    pub fn title(&self) -> &'static str {
        match self {
            Domain::Cpu => "CPU Usage",
            Domain::Memory => "Memory Usage",
            Domain::Disk => "Disk Usage",
            Domain::Network => "Network Connectivity",
            Domain::Display => "Screen Info",
            Domain::Brightness => "Brightness Level",
        }
    }

    /// Lower-case phrase used inside alert messages.
    pub fn subject(&self) -> &'static str {
        match self {
            Domain::Cpu => "CPU usage",
            Domain::Memory => "memory usage",
            Domain::Disk => "disk usage",
            Domain::Network => "network connectivity",
            Domain::Display => "screen issues",
            Domain::Brightness => "brightness level",
        }
    }

    pub fn is_percentage(&self) -> bool {
        matches!(self, Domain::Cpu | Domain::Memory | Domain::Disk)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum MetricValue {
    Percentage(f32),
    Reachability(Reachability),
    Displays(Vec<DisplayInfo>),
    Brightness(Vec<BrightnessInfo>),
}

/// One collector result. Holds either a value or the reason the read failed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricReading {
    pub domain: Domain,
    pub timestamp: DateTime<Local>,
    pub outcome: Result<MetricValue, String>,
}

impl MetricReading {
    pub fn ok(domain: Domain, value: MetricValue) -> Self {
        Self {
            domain,
            timestamp: Local::now(),
            outcome: Ok(value),
        }
    }

    pub fn failed(domain: Domain, reason: impl Into<String>) -> Self {
        Self {
            domain,
            timestamp: Local::now(),
            outcome: Err(reason.into()),
        }
    }

    pub fn value(&self) -> Option<&MetricValue> {
        self.outcome.as_ref().ok()
    }

    pub fn error(&self) -> Option<&str> {
        self.outcome.as_ref().err().map(String::as_str)
    }

    pub fn percentage(&self) -> Option<f32> {
        match self.value() {
            Some(MetricValue::Percentage(p)) => Some(*p),
            _ => None,
        }
    }
}

/// Clamp to [0, 100] and keep one decimal place.
pub fn round_percent(value: f32) -> f32 {
    if !value.is_finite() {
        return 0.0;
    }
    ((value * 10.0).round() / 10.0).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_percent() {
        assert_eq!(round_percent(85.0), 85.0);
        assert_eq!(round_percent(62.34), 62.3);
        assert_eq!(round_percent(-3.0), 0.0);
        assert_eq!(round_percent(100.04), 100.0);
        assert_eq!(round_percent(f32::NAN), 0.0);
        assert_eq!(format!("{}", round_percent(85.0)), "85");
    }

    #[test]
    fn test_reading_holds_value_or_error() {
        let ok = MetricReading::ok(Domain::Cpu, MetricValue::Percentage(42.0));
        assert_eq!(ok.percentage(), Some(42.0));
        assert!(ok.error().is_none());

        let failed = MetricReading::failed(Domain::Disk, "permission denied");
        assert!(failed.value().is_none());
        assert_eq!(failed.error(), Some("permission denied"));
        assert_eq!(failed.percentage(), None);
    }

    #[test]
    fn test_domain_order() {
        let mut shuffled = vec![Domain::Brightness, Domain::Cpu, Domain::Network, Domain::Disk];
        shuffled.sort();
        assert_eq!(
            shuffled,
            vec![Domain::Cpu, Domain::Disk, Domain::Network, Domain::Brightness]
        );
        assert!(Domain::Memory.is_percentage());
        assert!(!Domain::Display.is_percentage());
    }
}
