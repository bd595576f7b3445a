//! Configuration structures for deserialisation.
//!
//! These structures map directly to the JSON configuration file format.

use reqwest::Url;
use serde::Deserialize;

use crate::error::ConfigError;

/// Default root of the Google Sheets REST API.
pub const DEFAULT_API_BASE_URL: &str = "https://sheets.googleapis.com";

/// Root configuration structure.
///
/// This is the top-level structure that matches the JSON config file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Optional JSON schema reference (ignored during parsing).
    #[serde(rename = "$schema", default)]
    _schema: Option<String>,

    /// Optional comment field (ignored during parsing).
    #[serde(rename = "_comment", default)]
    _comment: Option<String>,

    /// Sheets API settings.
    #[serde(default)]
    pub sheets: SheetsConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any validation checks fail.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = Url::parse(&self.sheets.api_base_url).map_err(|e| {
            ConfigError::ValidationError {
                message: format!(
                    "Invalid Sheets API base URL '{}': {e}",
                    self.sheets.api_base_url
                ),
            }
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::ValidationError {
                message: format!(
                    "Invalid Sheets API base URL '{}'. Scheme must be http or https",
                    self.sheets.api_base_url
                ),
            });
        }
        Ok(())
    }
}

/// Google Sheets API configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SheetsConfig {
    /// Root URL of the Sheets REST API.
    /// Default: `https://sheets.googleapis.com`
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
        }
    }
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}
