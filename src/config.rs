use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::acwr::AcwrConfig;
use crate::calibration::CalibrationConfig;
use crate::logging::LogConfig;
use crate::recovery::RecoveryConfig;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Configuration metadata
    pub metadata: ConfigMetadata,

    /// Workload ratio windows and zones
    #[serde(default)]
    pub acwr: AcwrConfig,

    /// Recovery score weights and tunables
    #[serde(default)]
    pub recovery: RecoveryConfig,

    /// Account calibration window
    #[serde(default)]
    pub calibration: CalibrationConfig,

    /// Logging output
    #[serde(default)]
    pub logging: LogConfig,
}

/// Configuration metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigMetadata {
    /// Configuration format version
    pub version: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let now = Utc::now();

        AppConfig {
            metadata: ConfigMetadata {
                version: "1.0".to_string(),
                created_at: now,
                updated_at: now,
            },
            acwr: AcwrConfig::default(),
            recovery: RecoveryConfig::default(),
            calibration: CalibrationConfig::default(),
            logging: LogConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: AppConfig =
            toml::from_str(&content).with_context(|| "Failed to parse TOML configuration")?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save_to_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.metadata.updated_at = Utc::now();

        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml_content = toml::to_string_pretty(self)
            .with_context(|| "Failed to serialize configuration to TOML")?;

        fs::write(&path, toml_content)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;

        Ok(())
    }

    /// Get default configuration file path
    pub fn default_config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".perfsci")
            .join("config.toml")
    }

    /// Load configuration from the default location, with fallback to defaults
    pub fn load_or_default() -> Result<Self> {
        Self::load_or_default_from(Self::default_config_path())
    }

    /// Load configuration, falling back to defaults only when the file is
    /// absent; an unreadable or invalid file is an error
    pub fn load_or_default_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config_path = path.as_ref();

        if !config_path.exists() {
            eprintln!("Config file not found, using defaults: {}", config_path.display());
            return Ok(Self::default());
        }

        Self::load_from_file(config_path)
    }

    /// Save configuration to default location
    pub fn save_default(&mut self) -> Result<()> {
        let config_path = Self::default_config_path();
        self.save_to_file(config_path)
    }

    /// Reject settings the calculators cannot divide by or classify with
    pub fn validate(&self) -> Result<()> {
        self.acwr.validate().context("Invalid [acwr] settings")?;
        self.recovery
            .validate()
            .context("Invalid [recovery] settings")?;
        Ok(())
    }

    /// Flattened `key = value` listing for display
    pub fn entries(&self) -> Vec<(String, String)> {
        let acwr = &self.acwr;
        let recovery = &self.recovery;
        vec![
            ("acwr.acute_days".into(), acwr.acute_days.to_string()),
            ("acwr.chronic_days".into(), acwr.chronic_days.to_string()),
            ("acwr.min_logs".into(), acwr.min_logs.to_string()),
            ("acwr.sweet_spot_lower".into(), acwr.sweet_spot_lower.to_string()),
            ("acwr.sweet_spot_upper".into(), acwr.sweet_spot_upper.to_string()),
            ("acwr.high_load_upper".into(), acwr.high_load_upper.to_string()),
            ("recovery.min_logs".into(), recovery.min_logs.to_string()),
            ("recovery.sleep_target_hours".into(), recovery.sleep_target_hours.to_string()),
            ("recovery.default_resting_hr".into(), recovery.default_resting_hr.to_string()),
            ("recovery.load_normalization".into(), recovery.load_normalization.to_string()),
            (
                "recovery.rhr_penalty_multiplier".into(),
                recovery.rhr_penalty_multiplier.to_string(),
            ),
            ("calibration.period_days".into(), self.calibration.period_days.to_string()),
            ("logging.level".into(), self.logging.level.to_filter()),
        ]
    }
}
