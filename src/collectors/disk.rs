use async_trait::async_trait;
use log::debug;
use std::path::Path;
use std::time::Instant;
use sysinfo::Disks;

use crate::collectors::memory::used_percent;
use crate::collectors::Collector;
use crate::error::CollectError;
use crate::models::{Domain, MetricValue};

/// Space used on the filesystem mounted at `mount_point`.
pub struct DiskCollector {
    mount_point: String,
}

impl DiskCollector {
    pub fn new(mount_point: &str) -> Self {
        Self {
            mount_point: mount_point.to_string(),
        }
    }
}

fn block_usage(disks: &Disks, mount_point: &Path) -> Option<(u64, u64)> {
    let mut disk_total = 0;
    let mut disk_used = 0;
    let mut found = false;

    for disk in disks.list() {
        if disk.mount_point() == mount_point {
            found = true;
            disk_total += disk.total_space();
            disk_used += disk.total_space().saturating_sub(disk.available_space());
        }
    }

    found.then_some((disk_used, disk_total))
}

#[async_trait]
impl Collector for DiskCollector {
    fn domain(&self) -> Domain {
        Domain::Disk
    }

    async fn sample(&self) -> Result<MetricValue, CollectError> {
        let start = Instant::now();
        let disks = Disks::new_with_refreshed_list();
        let (used, total) = block_usage(&disks, Path::new(&self.mount_point)).ok_or_else(|| {
            CollectError::unsupported(format!("no filesystem mounted at {}", self.mount_point))
        })?;
        debug!("block_usage took: {} ms", start.elapsed().as_millis());
        Ok(MetricValue::Percentage(used_percent(used, total)?))
    }
}
