use async_trait::async_trait;
use systemstat::{Platform, System};

use crate::collectors::Collector;
use crate::error::CollectError;
use crate::models::{round_percent, Domain, MetricValue};

pub struct MemoryCollector {
    sys: System,
}

impl MemoryCollector {
    pub fn new() -> Self {
        Self { sys: System::new() }
    }
}

impl Default for MemoryCollector {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn used_percent(used: u64, total: u64) -> Result<f32, CollectError> {
    if total == 0 {
        return Err(CollectError::unsupported("reported total size is zero"));
    }
    Ok(round_percent(used as f32 / total as f32 * 100.0))
}

#[async_trait]
impl Collector for MemoryCollector {
    fn domain(&self) -> Domain {
        Domain::Memory
    }

    async fn sample(&self) -> Result<MetricValue, CollectError> {
        let mem = self.sys.memory()?;
        let total = mem.total.as_u64();
        let used = total.saturating_sub(mem.free.as_u64());
        Ok(MetricValue::Percentage(used_percent(used, total)?))
    }
}
