use async_trait::async_trait;
use log::debug;
use std::time::{Duration, Instant};
use systemstat::{Platform, System};

use crate::collectors::Collector;
use crate::error::CollectError;
use crate::models::{round_percent, Domain, MetricValue};

/// Aggregate CPU utilisation over a blocking sample window.
pub struct CpuCollector {
    window: Duration,
}

impl CpuCollector {
    pub fn new(window: Duration) -> Self {
        Self { window }
    }
}

fn load_aggregate(window: Duration) -> Result<f32, CollectError> {
    let start = Instant::now();
    let sys = System::new();
    let measurement = sys.cpu_load_aggregate()?;
    std::thread::sleep(window);
    let cpu = measurement.done()?;
    debug!(
        "load_aggregate took: {} ms",
        start.elapsed().as_millis()
    );
    Ok((1.0 - cpu.idle) * 100.0)
}

#[async_trait]
impl Collector for CpuCollector {
    fn domain(&self) -> Domain {
        Domain::Cpu
    }

    async fn sample(&self) -> Result<MetricValue, CollectError> {
        let window = self.window;
        // The sample window blocks, keep it off the async workers.
        let load = tokio::task::spawn_blocking(move || load_aggregate(window)).await??;
        Ok(MetricValue::Percentage(round_percent(load)))
    }
}
