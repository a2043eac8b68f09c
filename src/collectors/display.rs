use async_trait::async_trait;
use log::debug;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::Instant;
use walkdir::WalkDir;

use crate::collectors::Collector;
use crate::error::CollectError;
use crate::models::{DisplayInfo, Domain, MetricValue};
use crate::utils::sysfs;

static MODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)x(\d+)").expect("valid mode pattern"));

static CONNECTOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^card\d+-(.+)$").expect("valid connector pattern"));

const EDID_HEADER: [u8; 8] = [0x00, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x00];

/// Connected displays, read from the DRM connectors under `root`.
///
/// Each connector directory (`card0-HDMI-A-1`, ...) exposes:
///
/// - `status`: `connected` or `disconnected`
/// - `modes`: supported modes, preferred first (`1920x1080`)
/// - `edid`: optional; bytes 21 and 22 hold the panel size in cm
pub struct DisplayCollector {
    root: PathBuf,
}

impl DisplayCollector {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn enumerate(&self) -> Result<Vec<DisplayInfo>, CollectError> {
        let start = Instant::now();
        let mut displays = Vec::new();
        // A host without DRM has no displays attached.
        if !self.root.is_dir() {
            return Ok(displays);
        }

        for entry in WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry?;
            let filename = entry.file_name().to_string_lossy();
            let Some(name) = CONNECTOR_RE
                .captures(&filename)
                .map(|captures| captures[1].to_string())
            else {
                continue;
            };

            if let Some(display) = read_connector(entry.path(), name)? {
                displays.push(display);
            }
        }

        debug!("enumerate displays took: {} ms", start.elapsed().as_millis());
        Ok(displays)
    }
}

fn read_connector(path: &Path, name: String) -> Result<Option<DisplayInfo>, CollectError> {
    if sysfs::read_trimmed(&path.join("status"))? != "connected" {
        return Ok(None);
    }

    let modes = sysfs::read_trimmed(&path.join("modes")).unwrap_or_default();
    let (width, height) = modes
        .lines()
        .next()
        .and_then(parse_mode)
        .unwrap_or((0, 0));

    let dpi = sysfs::read_bytes(&path.join("edid"))?
        .and_then(|edid| edid_size_cm(&edid))
        .and_then(|(width_cm, _)| dpi_from(width, width_cm));

    Ok(Some(DisplayInfo {
        name,
        width,
        height,
        dpi,
    }))
}

fn parse_mode(line: &str) -> Option<(u32, u32)> {
    let captures = MODE_RE.captures(line.trim())?;
    Some((captures[1].parse().ok()?, captures[2].parse().ok()?))
}

fn edid_size_cm(edid: &[u8]) -> Option<(u8, u8)> {
    if edid.len() < 23 || edid[..8] != EDID_HEADER {
        return None;
    }
    // Zero means the size is undefined (projectors, some TVs).
    match (edid[21], edid[22]) {
        (0, _) | (_, 0) => None,
        size => Some(size),
    }
}

fn dpi_from(pixels: u32, cm: u8) -> Option<f32> {
    if pixels == 0 {
        return None;
    }
    let dpi = pixels as f32 / (cm as f32 / 2.54);
    Some((dpi * 10.0).round() / 10.0)
}

#[async_trait]
impl Collector for DisplayCollector {
    fn domain(&self) -> Domain {
        Domain::Display
    }

    async fn sample(&self) -> Result<MetricValue, CollectError> {
        Ok(MetricValue::Displays(self.enumerate()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn edid(width_cm: u8, height_cm: u8) -> Vec<u8> {
        let mut bytes = vec![0u8; 128];
        bytes[..8].copy_from_slice(&EDID_HEADER);
        bytes[21] = width_cm;
        bytes[22] = height_cm;
        bytes
    }

    fn connector(root: &Path, name: &str, status: &str, modes: &str) -> PathBuf {
        let dir = root.join(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("status"), format!("{}\n", status)).unwrap();
        fs::write(dir.join("modes"), modes).unwrap();
        dir
    }

    #[test]
    fn test_connected_displays_only() {
        let root = tempdir().unwrap();
        let hdmi = connector(root.path(), "card0-HDMI-A-1", "connected", "1920x1080\n1280x720\n");
        fs::write(hdmi.join("edid"), edid(52, 29)).unwrap();
        connector(root.path(), "card0-DP-1", "disconnected", "");
        connector(root.path(), "card1-eDP-1", "connected", "2560x1600\n");
        fs::create_dir_all(root.path().join("card0")).unwrap();
        fs::write(root.path().join("version"), "drm 1.1.0\n").unwrap();

        let displays = DisplayCollector::new(root.path().to_path_buf())
            .enumerate()
            .unwrap();

        assert_eq!(displays.len(), 2);
        assert_eq!(displays[0].name, "HDMI-A-1");
        assert_eq!((displays[0].width, displays[0].height), (1920, 1080));
        let dpi = displays[0].dpi.unwrap();
        assert!((dpi - 93.8).abs() < 0.05, "dpi was {}", dpi);

        assert_eq!(displays[1].name, "eDP-1");
        assert_eq!((displays[1].width, displays[1].height), (2560, 1600));
        assert_eq!(displays[1].dpi, None);
    }

    #[tokio::test]
    async fn test_no_displays_is_an_empty_reading() {
        let root = tempdir().unwrap();
        connector(root.path(), "card0-HDMI-A-1", "disconnected", "");

        let reading = DisplayCollector::new(root.path().to_path_buf())
            .collect()
            .await;
        assert!(reading.error().is_none());
        assert_eq!(reading.value(), Some(&MetricValue::Displays(Vec::new())));

        let missing = DisplayCollector::new(root.path().join("absent"))
            .collect()
            .await;
        assert_eq!(missing.value(), Some(&MetricValue::Displays(Vec::new())));
    }

    #[test]
    fn test_unreadable_status_is_an_error() {
        let root = tempdir().unwrap();
        fs::create_dir_all(root.path().join("card0-HDMI-A-1")).unwrap();

        let result = DisplayCollector::new(root.path().to_path_buf()).enumerate();
        assert!(matches!(result, Err(CollectError::Io(_))));
    }

    #[test]
    fn test_edid_without_size() {
        assert_eq!(edid_size_cm(&edid(0, 0)), None);
        assert_eq!(edid_size_cm(&[0u8; 10]), None);
        assert_eq!(edid_size_cm(&edid(60, 34)), Some((60, 34)));
        assert_eq!(parse_mode("3840x2160i"), Some((3840, 2160)));
        assert_eq!(parse_mode("garbage"), None);
    }
}
