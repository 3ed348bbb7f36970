/*!
 * Configuration types for hygrolog
 *
 * One immutable `Config` value is loaded per run (JSON, same shape the
 * logger's cron deployments have always used) and never mutated afterwards.
 */

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{HygroError, Result};
use crate::schedule::Weekday;

/// Environment variable naming an alternative config file location
pub const CONFIG_ENV_VAR: &str = "HYGROLOG_CONFIG";

/// Default config file name, resolved relative to the working directory
pub const DEFAULT_CONFIG_FILE: &str = "hygrolog.json";

/// Main configuration for one monitoring run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Reading store location and backup dump destination
    pub database: DatabaseConfig,

    /// Sensor channel file paths
    pub sensor: SensorConfig,

    /// SMTP parameters for warning mails and weekly rollups
    #[serde(default)]
    pub mail: MailConfig,

    /// Weekly-average rollup gate (enable flag + send weekday)
    #[serde(default)]
    pub weekly_averages: FeatureSchedule,

    /// Backup dump gate (enable flag + dump weekday)
    #[serde(default)]
    pub backup_dump: FeatureSchedule,
}

/// Reading store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite database file path
    pub path: PathBuf,

    /// Directory receiving timestamped backup dumps
    #[serde(default = "default_backup_dir")]
    pub backup_dir: PathBuf,
}

/// Sensor channel configuration (sysfs/hwmon style, one file per channel)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorConfig {
    /// File exposing temperature in millidegrees Celsius
    pub temperature_path: PathBuf,

    /// File exposing relative humidity in milli-percent
    pub humidity_path: PathBuf,
}

/// SMTP parameters. An empty section is valid configuration; the mail
/// channel then fails to construct and the run continues without it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    #[serde(default)]
    pub smtp_host: String,

    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,

    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub password: String,

    /// From address
    #[serde(default)]
    pub sender: String,

    /// To addresses
    #[serde(default)]
    pub recipients: Vec<String>,
}

/// An optional stage's gate: an enable flag plus the weekday it runs on
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FeatureSchedule {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default)]
    pub weekday: Weekday,
}

// The derived impl would zero smtp_port, so a config without a mail
// section would diverge from one carrying an empty mail object.
impl Default for MailConfig {
    fn default() -> Self {
        Self {
            smtp_host: String::new(),
            smtp_port: default_smtp_port(),
            username: String::new(),
            password: String::new(),
            sender: String::new(),
            recipients: Vec::new(),
        }
    }
}

impl Default for FeatureSchedule {
    fn default() -> Self {
        Self {
            enabled: false,
            weekday: Weekday::Sunday,
        }
    }
}

fn default_smtp_port() -> u16 {
    465
}

fn default_backup_dir() -> PathBuf {
    PathBuf::from("backups")
}

impl Config {
    /// Load configuration from a JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            HygroError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config: Config = serde_json::from_str(&contents).map_err(|e| {
            HygroError::Config(format!("Failed to parse {}: {}", path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from `$HYGROLOG_CONFIG` or the default file name
    pub fn load() -> Result<Self> {
        let path = std::env::var_os(CONFIG_ENV_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        Self::from_file(&path)
    }

    /// Validate loaded configuration
    pub fn validate(&self) -> Result<()> {
        if self.database.path.as_os_str().is_empty() {
            return Err(HygroError::Config(
                "database.path must not be empty".to_string(),
            ));
        }
        if self.sensor.temperature_path.as_os_str().is_empty()
            || self.sensor.humidity_path.as_os_str().is_empty()
        {
            return Err(HygroError::Config(
                "sensor channel paths must not be empty".to_string(),
            ));
        }
        if self.backup_dump.enabled && self.database.backup_dir.as_os_str().is_empty() {
            return Err(HygroError::Config(
                "database.backup_dir must be set when backup_dump is enabled".to_string(),
            ));
        }
        Ok(())
    }
}
