use anyhow::Context;
use async_trait::async_trait;
use log::{debug, warn};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use crate::collectors::{brightness, cpu, disk, display, memory, network};
use crate::config::AppConfig;
use crate::error::CollectError;
use crate::models::{Domain, MetricReading, MetricValue};

/// A source of one domain's current reading.
///
/// Implementors provide [`Collector::sample`]; [`Collector::collect`] folds any
/// failure into an error-bearing [`MetricReading`] so nothing escapes the
/// collector boundary.
#[async_trait]
pub trait Collector: Send + Sync {
    fn domain(&self) -> Domain;

    async fn sample(&self) -> Result<MetricValue, CollectError>;

    async fn collect(&self) -> MetricReading {
        let start = Instant::now();
        let domain = self.domain();
        let reading = match self.sample().await {
            Ok(value) => MetricReading::ok(domain, value),
            Err(e) => {
                warn!("{:?} collector failed: {}", domain, e);
                MetricReading::failed(domain, e.to_string())
            }
        };
        debug!(
            "collect {:?} took: {} ms",
            domain,
            start.elapsed().as_millis()
        );
        reading
    }
}

/// The six host collectors, in pass order.
pub fn from_config(config: &AppConfig) -> anyhow::Result<Vec<Arc<dyn Collector>>> {
    let network = network::NetworkCollector::new(&config.probe.url, config.probe_timeout())
        .context("Failed to build network client")?;

    Ok(vec![
        Arc::new(cpu::CpuCollector::new(config.cpu_sample_window())),
        Arc::new(memory::MemoryCollector::new()),
        Arc::new(disk::DiskCollector::new(&config.sources.disk_mount_point)),
        Arc::new(network),
        Arc::new(display::DisplayCollector::new(PathBuf::from(
            &config.sources.drm_root,
        ))),
        Arc::new(brightness::BrightnessCollector::new(PathBuf::from(
            &config.sources.backlight_root,
        ))),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Broken;

    #[async_trait]
    impl Collector for Broken {
        fn domain(&self) -> Domain {
            Domain::Memory
        }

        async fn sample(&self) -> Result<MetricValue, CollectError> {
            Err(CollectError::unsupported("no memory statistics on this host"))
        }
    }

    #[tokio::test]
    async fn test_collect_folds_failure_into_reading() {
        let reading = Broken.collect().await;
        assert_eq!(reading.domain, Domain::Memory);
        assert_eq!(reading.error(), Some("no memory statistics on this host"));
        assert!(reading.value().is_none());
    }

    #[tokio::test]
    async fn test_from_config_builds_all_domains_in_order() {
        let collectors = from_config(&AppConfig::default()).unwrap();
        let domains: Vec<Domain> = collectors.iter().map(|c| c.domain()).collect();
        assert_eq!(domains, Domain::ALL.to_vec());
    }
}
