/// Configuration for improvement-report
///
/// Resolves the data directory and reads the optional `config.json` that
/// lives in it.

use crate::error::{ReportError, Result};
use crate::intelligence::DetectionThresholds;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable that overrides the data directory
pub const HOME_ENV: &str = "IMPROVEMENT_REPORT_HOME";

const DEFAULT_DIR: &str = ".improvement-report";
const CONFIG_FILE: &str = "config.json";
const DEFAULT_DB_FILE: &str = "history.db";

/// On-disk shape of `config.json`
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    database_file: Option<String>,
    thresholds: DetectionThresholds,
}

/// Resolved configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub home: PathBuf,
    pub database_path: PathBuf,
    pub thresholds: DetectionThresholds,
}

impl Config {
    /// Load configuration
    ///
    /// The data directory comes from `home_override`, then `IMPROVEMENT_REPORT_HOME`,
    /// then `~/.improvement-report`.
    pub fn load(home_override: Option<PathBuf>) -> Result<Self> {
        let home = match home_override {
            Some(home) => home,
            None => Self::default_home()?,
        };

        Self::load_from(home)
    }

    pub fn default_home() -> Result<PathBuf> {
        if let Some(home) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
            return Ok(PathBuf::from(home));
        }

        dirs::home_dir()
            .map(|home| home.join(DEFAULT_DIR))
            .ok_or_else(|| ReportError::Config("could not find home directory".to_string()))
    }

    /// Load from an explicit data directory
    pub fn load_from<P: AsRef<Path>>(home: P) -> Result<Self> {
        let home = home.as_ref().to_path_buf();
        let config_path = home.join(CONFIG_FILE);

        let file = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            serde_json::from_str::<ConfigFile>(&content).map_err(|e| {
                ReportError::Config(format!("{}: {}", config_path.display(), e))
            })?
        } else {
            ConfigFile::default()
        };

        file.thresholds.validate()?;

        let database_file = file.database_file.unwrap_or_else(|| DEFAULT_DB_FILE.to_string());
        if database_file.trim().is_empty() {
            return Err(ReportError::Config("database_file must not be empty".to_string()));
        }

        Ok(Self {
            database_path: home.join(database_file),
            home,
            thresholds: file.thresholds,
        })
    }
}
