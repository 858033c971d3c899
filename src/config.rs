//! Configuration management for the travel recommender
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::RecommenderError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecommenderConfig {
    /// Catalog and index artifact locations
    #[serde(default)]
    pub data: DataConfig,
    /// Geocoding service configuration
    #[serde(default)]
    pub geocoding: GeocodingConfig,
    /// HTTP API configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Locations of the read-only artifacts loaded at startup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Destination catalog (CSV)
    #[serde(default = "default_catalog_path")]
    pub catalog_path: PathBuf,
    /// Prebuilt neighbor index with its encoding schema (JSON)
    #[serde(default = "default_index_path")]
    pub index_path: PathBuf,
}

/// Geocoding service configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodingConfig {
    /// Base URL of the Nominatim-compatible service
    #[serde(default = "default_geocoding_base_url")]
    pub base_url: String,
    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Timeout of a single attempt in seconds
    #[serde(default = "default_geocoding_timeout")]
    pub timeout_seconds: u32,
    /// Total number of attempts per place, including the first
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Fixed delay between attempts in milliseconds
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

/// HTTP API configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listening port
    #[serde(default = "default_port")]
    pub port: u16,
    /// Upper bound for a whole request. Must cover two full geocode resolutions.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u32,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_catalog_path() -> PathBuf {
    PathBuf::from("data/destinations.csv")
}

fn default_index_path() -> PathBuf {
    PathBuf::from("data/neighbor_index.json")
}

fn default_geocoding_base_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

fn default_user_agent() -> String {
    "travel_app".to_string()
}

fn default_geocoding_timeout() -> u32 {
    10
}

fn default_max_attempts() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    1000
}

fn default_port() -> u16 {
    8080
}

fn default_request_timeout() -> u32 {
    90
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            catalog_path: default_catalog_path(),
            index_path: default_index_path(),
        }
    }
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            base_url: default_geocoding_base_url(),
            user_agent: default_user_agent(),
            timeout_seconds: default_geocoding_timeout(),
            max_attempts: default_max_attempts(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl GeocodingConfig {
    /// Timeout applied to each attempt
    #[must_use]
    pub fn attempt_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.into())
    }

    /// Delay between two attempts
    #[must_use]
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    /// Longest one place resolution can take: every attempt timing out plus the delays between them
    #[must_use]
    pub fn resolution_budget(&self) -> Duration {
        self.attempt_timeout() * self.max_attempts
            + self.retry_delay() * self.max_attempts.saturating_sub(1)
    }
}

impl ServerConfig {
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds.into())
    }
}

impl RecommenderConfig {
    /// Load configuration from the default file location and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path()
                .filter(|path| path.exists())
                .unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // TRAVELREC_GEOCODING__MAX_ATTEMPTS=5 overrides geocoding.max_attempts
        builder = builder.add_source(
            Environment::with_prefix("TRAVELREC")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: RecommenderConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("travel-recommender").join("config.toml"))
    }

    /// Apply default values to empty configuration fields
    pub fn apply_defaults(&mut self) {
        if self.data.catalog_path.as_os_str().is_empty() {
            self.data.catalog_path = default_catalog_path();
        }
        if self.data.index_path.as_os_str().is_empty() {
            self.data.index_path = default_index_path();
        }
        if self.geocoding.base_url.is_empty() {
            self.geocoding.base_url = default_geocoding_base_url();
        }
        if self.geocoding.user_agent.is_empty() {
            self.geocoding.user_agent = default_user_agent();
        }
        if self.geocoding.timeout_seconds == 0 {
            self.geocoding.timeout_seconds = default_geocoding_timeout();
        }
        if self.geocoding.max_attempts == 0 {
            self.geocoding.max_attempts = default_max_attempts();
        }
        if self.server.request_timeout_seconds == 0 {
            self.server.request_timeout_seconds = default_request_timeout();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.geocoding.timeout_seconds > 120 {
            return Err(
                RecommenderError::config("Geocoding timeout cannot exceed 120 seconds").into(),
            );
        }

        if !(1..=10).contains(&self.geocoding.max_attempts) {
            return Err(RecommenderError::config(
                "Geocoding max attempts must be between 1 and 10",
            )
            .into());
        }

        if self.geocoding.retry_delay_ms > 60_000 {
            return Err(RecommenderError::config(
                "Geocoding retry delay cannot exceed 60000 ms",
            )
            .into());
        }

        if self.server.request_timeout_seconds > 600 {
            return Err(
                RecommenderError::config("Request timeout cannot exceed 600 seconds").into(),
            );
        }

        // an estimate resolves source and destination one after the other
        let estimate_budget = self.geocoding.resolution_budget() * 2;
        if self.server.request_timeout() < estimate_budget {
            return Err(RecommenderError::config(format!(
                "Request timeout of {}s is shorter than the worst-case geocoding time of {:.1}s",
                self.server.request_timeout_seconds,
                estimate_budget.as_secs_f64()
            ))
            .into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(RecommenderError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(RecommenderError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        if !self.geocoding.base_url.starts_with("http://")
            && !self.geocoding.base_url.starts_with("https://")
        {
            return Err(RecommenderError::config(
                "Geocoding base URL must be a valid HTTP or HTTPS URL",
            )
            .into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = RecommenderConfig::default();
        assert_eq!(
            config.geocoding.base_url,
            "https://nominatim.openstreetmap.org"
        );
        assert_eq!(config.geocoding.max_attempts, 3);
        assert_eq!(config.geocoding.retry_delay(), Duration::from_secs(1));
        assert_eq!(config.data.catalog_path, PathBuf::from("data/destinations.csv"));
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = RecommenderConfig::default();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_numeric_ranges() {
        let mut config = RecommenderConfig::default();
        config.geocoding.timeout_seconds = 500;
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("timeout cannot exceed"));

        let mut config = RecommenderConfig::default();
        config.geocoding.max_attempts = 11;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_resolution_budget() {
        let config = GeocodingConfig::default();
        // 3 attempts of 10s plus 2 delays of 1s
        assert_eq!(config.resolution_budget(), Duration::from_secs(32));
    }

    #[test]
    fn test_request_timeout_must_cover_geocoding() {
        let config = RecommenderConfig::default();
        assert!(config.server.request_timeout() >= config.geocoding.resolution_budget() * 2);

        let mut config = RecommenderConfig::default();
        config.server.request_timeout_seconds = 60;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("worst-case geocoding time of 64.0s"));

        config.geocoding.timeout_seconds = 5;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_base_url() {
        let mut config = RecommenderConfig::default();
        config.geocoding.base_url = "nominatim.local".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_apply_defaults_fills_zeroes() {
        let mut config = RecommenderConfig::default();
        config.geocoding.max_attempts = 0;
        config.logging.format = String::new();
        config.apply_defaults();
        assert_eq!(config.geocoding.max_attempts, 3);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_load_from_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[geocoding]\nmax_attempts = 2\nretry_delay_ms = 250\n\n[server]\nport = 9000"
        )
        .unwrap();

        let config = RecommenderConfig::load_from_path(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.geocoding.max_attempts, 2);
        assert_eq!(config.geocoding.retry_delay_ms, 250);
        assert_eq!(config.server.port, 9000);
        // untouched sections keep their defaults
        assert_eq!(config.geocoding.user_agent, "travel_app");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_rejects_invalid_file_values() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[logging]\nformat = \"xml\"").unwrap();

        let result = RecommenderConfig::load_from_path(Some(file.path().to_path_buf()));
        assert!(result.is_err());
    }

    #[test]
    fn test_config_path_generation() {
        if let Some(path) = RecommenderConfig::get_config_path() {
            assert!(path.to_string_lossy().contains("travel-recommender"));
            assert!(path.to_string_lossy().contains("config.toml"));
        }
    }
}
