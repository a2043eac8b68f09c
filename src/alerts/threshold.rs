//! Evaluates readings against fixed percentage limits.

use serde::Serialize;

use crate::config::{ThresholdsConfig, DEFAULT_LIMIT};
use crate::models::{AlertEvent, Domain, MetricReading, MetricValue, Reachability};

/// Limit for one percentage-valued domain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ThresholdPolicy {
    pub domain: Domain,
    pub limit_percent: f32,
}

impl ThresholdPolicy {
    pub fn new(domain: Domain, limit_percent: f32) -> Self {
        Self {
            domain,
            limit_percent,
        }
    }

    /// Strictly greater than the limit; equal values are within bounds.
    pub fn is_breached(&self, percentage: f32) -> bool {
        percentage > self.limit_percent
    }
}

/// Limits for CPU, memory and disk. Fixed for the life of the process.
#[derive(Debug, Clone, Serialize)]
pub struct Thresholds {
    cpu: ThresholdPolicy,
    memory: ThresholdPolicy,
    disk: ThresholdPolicy,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self::new(DEFAULT_LIMIT, DEFAULT_LIMIT, DEFAULT_LIMIT)
    }
}

impl From<&ThresholdsConfig> for Thresholds {
    fn from(config: &ThresholdsConfig) -> Self {
        Self::new(config.cpu_limit, config.mem_limit, config.disk_limit)
    }
}

impl Thresholds {
    pub fn new(cpu_limit: f32, mem_limit: f32, disk_limit: f32) -> Self {
        Self {
            cpu: ThresholdPolicy::new(Domain::Cpu, cpu_limit),
            memory: ThresholdPolicy::new(Domain::Memory, mem_limit),
            disk: ThresholdPolicy::new(Domain::Disk, disk_limit),
        }
    }

    pub fn policy(&self, domain: Domain) -> Option<&ThresholdPolicy> {
        match domain {
            Domain::Cpu => Some(&self.cpu),
            Domain::Memory => Some(&self.memory),
            Domain::Disk => Some(&self.disk),
            _ => None,
        }
    }

    /// Warning when `percentage` exceeds the domain's limit. Domains without a
    /// policy never alert here.
    pub fn evaluate(&self, domain: Domain, percentage: f32) -> Option<AlertEvent> {
        let policy = self.policy(domain)?;
        if !policy.is_breached(percentage) {
            return None;
        }
        Some(AlertEvent::warning(
            domain,
            format!("High {} detected! Usage: {}%", domain.subject(), percentage),
        ))
    }

    /// All alerts a single reading raises.
    pub fn assess(&self, reading: &MetricReading) -> Vec<AlertEvent> {
        let domain = reading.domain;
        let value = match &reading.outcome {
            Ok(value) => value,
            Err(reason) => {
                return vec![AlertEvent::error(
                    domain,
                    format!("Error checking {}: {}", domain.subject(), reason),
                )];
            }
        };

        match value {
            MetricValue::Percentage(p) => self.evaluate(domain, *p).into_iter().collect(),
            MetricValue::Reachability(Reachability::Unexpected(code)) => vec![AlertEvent::warning(
                domain,
                format!("Network issue detected! Status code: {}", code),
            )],
            MetricValue::Reachability(Reachability::Unreachable) => {
                vec![AlertEvent::error(domain, "No network connectivity")]
            }
            MetricValue::Reachability(Reachability::Reachable)
            | MetricValue::Displays(_)
            | MetricValue::Brightness(_) => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DisplayInfo, Severity};

    #[test]
    fn test_high_cpu_warning() {
        let thresholds = Thresholds::default();
        let alert = thresholds.evaluate(Domain::Cpu, 85.0).unwrap();
        assert_eq!(alert.severity, Severity::Warning);
        assert_eq!(alert.domain, Some(Domain::Cpu));
        assert_eq!(alert.message, "High CPU usage detected! Usage: 85%");
    }

    #[test]
    fn test_limit_is_exclusive() {
        let thresholds = Thresholds::default();
        for domain in [Domain::Cpu, Domain::Memory, Domain::Disk] {
            assert!(thresholds.evaluate(domain, 80.0).is_none());
            assert!(thresholds.evaluate(domain, 79.9).is_none());
            assert!(thresholds.evaluate(domain, 80.1).is_some());
        }
    }

    #[test]
    fn test_custom_limits() {
        let thresholds = Thresholds::new(95.0, 50.0, 80.0);
        assert!(thresholds.evaluate(Domain::Cpu, 90.0).is_none());
        let alert = thresholds.evaluate(Domain::Memory, 50.5).unwrap();
        assert_eq!(alert.message, "High memory usage detected! Usage: 50.5%");
    }

    #[test]
    fn test_non_percentage_domains_are_not_evaluated() {
        let thresholds = Thresholds::default();
        assert!(thresholds.evaluate(Domain::Network, 100.0).is_none());
        assert!(thresholds.evaluate(Domain::Brightness, 100.0).is_none());
        assert!(thresholds.policy(Domain::Display).is_none());
    }

    #[test]
    fn test_network_states() {
        let thresholds = Thresholds::default();

        let unexpected = MetricReading::ok(
            Domain::Network,
            MetricValue::Reachability(Reachability::Unexpected(503)),
        );
        let alerts = thresholds.assess(&unexpected);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].severity, Severity::Warning);
        assert!(alerts[0].message.contains("503"));

        let unreachable = MetricReading::ok(
            Domain::Network,
            MetricValue::Reachability(Reachability::Unreachable),
        );
        let alerts = thresholds.assess(&unreachable);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].severity, Severity::Error);
        assert_eq!(alerts[0].message, "No network connectivity");

        let reachable = MetricReading::ok(
            Domain::Network,
            MetricValue::Reachability(Reachability::Reachable),
        );
        assert!(thresholds.assess(&reachable).is_empty());
    }

    #[test]
    fn test_failed_reading_is_an_error_alert() {
        let thresholds = Thresholds::default();
        let reading = MetricReading::failed(Domain::Brightness, "permission denied");
        let alerts = thresholds.assess(&reading);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].severity, Severity::Error);
        assert_eq!(
            alerts[0].message,
            "Error checking brightness level: permission denied"
        );

        let display = MetricReading::failed(Domain::Display, "no drm directory");
        assert_eq!(
            thresholds.assess(&display)[0].message,
            "Error checking screen issues: no drm directory"
        );
    }

    #[test]
    fn test_displays_never_alert() {
        let thresholds = Thresholds::default();
        let none = MetricReading::ok(Domain::Display, MetricValue::Displays(Vec::new()));
        let one = MetricReading::ok(
            Domain::Display,
            MetricValue::Displays(vec![DisplayInfo::default()]),
        );
        assert!(thresholds.assess(&none).is_empty());
        assert!(thresholds.assess(&one).is_empty());
    }
}
