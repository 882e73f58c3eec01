//! Configuration module
//!
//! Reads `config.toml` (default `~/.config/sacm-tariff/config.toml`):
//!
//! ```toml
//! [logging]
//! level = "info"      # trace, debug, info, warn, error
//! format = "text"     # text | json
//!
//! [tariff]
//! schedule_file = "sacm-2018.toml"   # relative to this file
//! uda_value = "325.50"
//! special_zones = ["cdmx", "guadalajara", "monterrey", "cancun"]
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::tariff::TariffSchedule;
use crate::shared::errors::{AppError, InfraError};
use crate::shared::serializations::normalize_tag;

/// Directory name under the platform config dir
const APP_DIR: &str = "sacm-tariff";

/// Default config location: `<config_dir>/sacm-tariff/config.toml`.
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join("config.toml")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset
    pub level: String,
    /// `text` or `json`
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

/// Overrides applied on top of the tariff schedule
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TariffConfig {
    /// TOML-serialized schedule replacing the built-in SACM 2017 one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule_file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uda_value: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_zones: Option<Vec<String>>,
}

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub tariff: TariffConfig,
}

impl AppConfig {
    /// Load from `path`. A missing file yields the defaults; a relative
    /// `schedule_file` is resolved against the config file's directory.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let text = fs::read_to_string(path).map_err(|source| InfraError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let mut config: AppConfig = toml::from_str(&text).map_err(InfraError::from)?;

        if let (Some(file), Some(dir)) = (&config.tariff.schedule_file, path.parent()) {
            if file.is_relative() {
                config.tariff.schedule_file = Some(dir.join(file));
            }
        }

        Ok(config)
    }

    /// Write the config as TOML, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), AppError> {
        let io_err = |source| InfraError::Io {
            path: path.display().to_string(),
            source,
        };
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(io_err)?;
        }
        let text = toml::to_string_pretty(self).map_err(InfraError::from)?;
        fs::write(path, text).map_err(io_err)?;
        Ok(())
    }

    /// Schedule in effect: the configured file (or the built-in one) with
    /// the UDA value and special-zone overrides applied, then validated.
    pub fn tariff_schedule(&self) -> Result<TariffSchedule, AppError> {
        let mut schedule = match &self.tariff.schedule_file {
            Some(file) => {
                let text = fs::read_to_string(file).map_err(|source| InfraError::Io {
                    path: file.display().to_string(),
                    source,
                })?;
                toml::from_str::<TariffSchedule>(&text).map_err(InfraError::from)?
            }
            None => TariffSchedule::sacm_2017(),
        };

        if let Some(uda_value) = self.tariff.uda_value {
            schedule.uda_value = uda_value;
        }
        if let Some(zones) = &self.tariff.special_zones {
            schedule.special_zones = zones.iter().map(|z| normalize_tag(z)).collect();
        }

        schedule.validate()?;
        Ok(schedule)
    }
}

// ── Tests ──────────────────────────────────────────────────────
