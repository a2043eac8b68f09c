use anyhow::{bail, Context, Result};
use config::{Config, File, FileFormat};
use log::{debug, info, LevelFilter};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_CONFIG_FILE: &str = "config.ini";
pub const DEFAULT_LIMIT: f32 = 80.0;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MonitorConfig {
    pub poll_interval_seconds: u64,
    pub cpu_sample_millis: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval_seconds: 60,
            cpu_sample_millis: 1000,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ThresholdsConfig {
    pub cpu_limit: f32,
    pub mem_limit: f32,
    pub disk_limit: f32,
}

impl Default for ThresholdsConfig {
    fn default() -> Self {
        Self {
            cpu_limit: DEFAULT_LIMIT,
            mem_limit: DEFAULT_LIMIT,
            disk_limit: DEFAULT_LIMIT,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ProbeConfig {
    pub url: String,
    pub timeout_seconds: u64,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            url: "http://www.google.com".to_string(),
            timeout_seconds: 5,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AlertsConfig {
    pub log_file: String,
}

impl Default for AlertsConfig {
    fn default() -> Self {
        Self {
            log_file: "system_monitor.log".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SourcesConfig {
    pub disk_mount_point: String,
    pub drm_root: String,
    pub backlight_root: String,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            disk_mount_point: "/".to_string(),
            drm_root: "/sys/class/drm".to_string(),
            backlight_root: "/sys/class/backlight".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub monitor: MonitorConfig,
    #[serde(default)]
    pub thresholds: ThresholdsConfig,
    #[serde(default)]
    pub probe: ProbeConfig,
    #[serde(default)]
    pub alerts: AlertsConfig,
    #[serde(default)]
    pub sources: SourcesConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load `path` if it exists, otherwise fall back to the defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config_path = path.as_ref();
        if !config_path.exists() {
            debug!(
                "No configuration at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::from_file(config_path)
    }

    pub fn get_log_level(&self) -> LevelFilter {
        match self.logging.level.to_lowercase().as_str() {
            "trace" => LevelFilter::Trace,
            "debug" => LevelFilter::Debug,
            "info" => LevelFilter::Info,
            "warn" => LevelFilter::Warn,
            "error" => LevelFilter::Error,
            "off" => LevelFilter::Off,
            _ => LevelFilter::Info, // Default to Info if invalid
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.monitor.poll_interval_seconds)
    }

    pub fn cpu_sample_window(&self) -> Duration {
        Duration::from_millis(self.monitor.cpu_sample_millis)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe.timeout_seconds)
    }

    pub fn log_file(&self) -> PathBuf {
        PathBuf::from(&self.alerts.log_file)
    }

    pub fn validate(&self) -> Result<()> {
        for (name, limit) in [
            ("cpu_limit", self.thresholds.cpu_limit),
            ("mem_limit", self.thresholds.mem_limit),
            ("disk_limit", self.thresholds.disk_limit),
        ] {
            if !(0.0..=100.0).contains(&limit) {
                bail!("{} must be between 0 and 100, got {}", name, limit);
            }
        }
        if self.monitor.poll_interval_seconds == 0 {
            bail!("poll_interval_seconds must be greater than zero");
        }
        if self.probe.timeout_seconds == 0 {
            bail!("probe timeout_seconds must be greater than zero");
        }
        if self.probe.url.trim().is_empty() {
            bail!("probe url must not be empty");
        }
        Ok(())
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config_path = path.as_ref();
        debug!("Loading configuration from {}", config_path.display());

        let config = Config::builder()
            .add_source(File::from(config_path).format(FileFormat::Ini))
            .build()
            .context(format!("Failed to load config from {}", config_path.display()))?;

        let app_config: AppConfig = config
            .try_deserialize()
            .context("Failed to deserialize config")?;
        app_config
            .validate()
            .context(format!("Invalid config in {}", config_path.display()))?;

        Ok(app_config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let config_path = path.as_ref();

        let mut config_str = String::new();

        config_str.push_str(&format!(
            "[monitor]\npoll_interval_seconds = {}\ncpu_sample_millis = {}\n\n",
            self.monitor.poll_interval_seconds, self.monitor.cpu_sample_millis
        ));

        config_str.push_str(&format!(
            "[thresholds]\ncpu_limit = {}\nmem_limit = {}\ndisk_limit = {}\n\n",
            self.thresholds.cpu_limit, self.thresholds.mem_limit, self.thresholds.disk_limit
        ));

        config_str.push_str(&format!(
            "[probe]\nurl = {}\ntimeout_seconds = {}\n\n",
            self.probe.url, self.probe.timeout_seconds
        ));

        config_str.push_str(&format!("[alerts]\nlog_file = {}\n\n", self.alerts.log_file));

        config_str.push_str(&format!(
            "[sources]\ndisk_mount_point = {}\ndrm_root = {}\nbacklight_root = {}\n\n",
            self.sources.disk_mount_point, self.sources.drm_root, self.sources.backlight_root
        ));

        config_str.push_str(&format!("[logging]\nlevel = {}\n", self.logging.level));

        fs::write(config_path, config_str)
            .context(format!("Failed to save config to {}", config_path.display()))?;

        info!("Configuration saved to {}", config_path.display());
        Ok(())
    }
}
