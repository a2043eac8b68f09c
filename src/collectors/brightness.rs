use async_trait::async_trait;
use log::debug;
use std::path::PathBuf;
use std::time::Instant;
use walkdir::WalkDir;

use crate::collectors::Collector;
use crate::error::CollectError;
use crate::models::{BrightnessInfo, Domain, MetricValue};
use crate::utils::sysfs;

/// Backlight levels from `root` (normally `/sys/class/backlight`).
///
/// Indices follow the backlight devices' own order and are not tied to the
/// display collector's connector order.
pub struct BrightnessCollector {
    root: PathBuf,
}

impl BrightnessCollector {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn enumerate(&self) -> Result<Vec<BrightnessInfo>, CollectError> {
        let start = Instant::now();
        let mut levels = Vec::new();
        if !self.root.is_dir() {
            return Ok(levels);
        }

        for entry in WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry?;
            let path = entry.path();
            let brightness: u64 = sysfs::read_number(&path.join("brightness"))?;
            let max: u64 = sysfs::read_number(&path.join("max_brightness"))?;
            let device = entry.file_name().to_string_lossy().into_owned();
            let level_percent = level_percent(brightness, max).ok_or_else(|| {
                CollectError::unsupported(format!("{} reports max_brightness 0", device))
            })?;

            levels.push(BrightnessInfo {
                display_index: levels.len(),
                level_percent,
                device,
            });
        }

        debug!("enumerate backlights took: {} ms", start.elapsed().as_millis());
        Ok(levels)
    }
}

fn level_percent(brightness: u64, max: u64) -> Option<u8> {
    if max == 0 {
        return None;
    }
    let percent = (brightness.saturating_mul(100) + max / 2) / max;
    Some(percent.min(100) as u8)
}

#[async_trait]
impl Collector for BrightnessCollector {
    fn domain(&self) -> Domain {
        Domain::Brightness
    }

    async fn sample(&self) -> Result<MetricValue, CollectError> {
        Ok(MetricValue::Brightness(self.enumerate()?))
    }
}
