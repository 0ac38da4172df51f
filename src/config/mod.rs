// Configuration module
// Author: kelexine (https://github.com/kelexine)

mod models;

pub use models::*;

use crate::error::{OddsError, Result};
use config::{Config, Environment, File};
use std::path::{Path, PathBuf};

impl AppConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Environment variables (highest, `ODDSCACHE__SECTION__KEY`)
    /// 2. Config file (`path`, or `~/.oddscache/config.toml`)
    /// 3. Defaults (lowest)
    ///
    /// CLI overrides are applied by the caller afterwards.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (file, required) = match path {
            Some(p) => (p.to_string_lossy().to_string(), true),
            None => (Self::default_config_path(), false),
        };

        let config = Config::builder()
            // Start with defaults
            .add_source(Config::try_from(&Self::default())?)
            .add_source(File::with_name(&file).required(required))
            .add_source(
                Environment::with_prefix("ODDSCACHE")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()
            .map_err(|e| OddsError::Config(e.to_string()))?;

        let app_config: Self = config
            .try_deserialize()
            .map_err(|e| OddsError::Config(e.to_string()))?;

        app_config.validate()?;
        Ok(app_config)
    }

    /// Reject configurations the gateway cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.upstream.api_key.trim().is_empty() {
            return Err(OddsError::Config(
                "upstream.api_key is not set (ODDSCACHE__UPSTREAM__API_KEY)".to_string(),
            ));
        }

        let cache = &self.cache;
        if cache.critical_below > cache.constrained_below {
            return Err(OddsError::Config(format!(
                "cache.critical_below ({}) must not exceed cache.constrained_below ({})",
                cache.critical_below, cache.constrained_below
            )));
        }
        if cache.cleanup_interval_seconds == 0 {
            return Err(OddsError::Config(
                "cache.cleanup_interval_seconds must be positive".to_string(),
            ));
        }
        if self.upstream.max_retries == 0 {
            return Err(OddsError::Config(
                "upstream.max_retries must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    /// Render the effective configuration as TOML, with the API key masked.
    pub fn to_toml(&self) -> Result<String> {
        let mut shown = self.clone();
        if !shown.upstream.api_key.is_empty() {
            shown.upstream.api_key = "[REDACTED]".to_string();
        }
        toml::to_string_pretty(&shown).map_err(|e| OddsError::Internal(e.to_string()))
    }

    fn default_config_path() -> String {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".oddscache")
            .join("config.toml")
            .to_string_lossy()
            .to_string()
    }
}
