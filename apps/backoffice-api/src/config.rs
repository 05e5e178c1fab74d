//! # Back-Office Configuration
//!
//! ## Load Order (later overrides earlier)
//! 1. Default values
//! 2. Config file (`backoffice.toml`)
//! 3. `FOGON_*` environment variables
//!
//! ```toml
//! database_path = "/var/lib/fogon/fogon.db"
//! bind_addr = "0.0.0.0"
//! port = 8080
//! reminder_interval_secs = 60
//! reminder_lead_minutes = 10
//! reminder_webhook_url = "https://gateway.example/send"
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "FOGON_CONFIG";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },
}

/// Server and worker settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackofficeConfig {
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,

    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Seconds between reminder passes.
    #[serde(default = "default_reminder_interval")]
    pub reminder_interval_secs: u64,

    /// How long before a reservation its reminder goes out.
    #[serde(default = "default_reminder_lead")]
    pub reminder_lead_minutes: i64,

    /// Messaging gateway; reminders are only logged when unset.
    #[serde(default)]
    pub reminder_webhook_url: Option<String>,
}

fn default_database_path() -> PathBuf {
    PathBuf::from("fogon.db")
}

fn default_bind_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_reminder_interval() -> u64 {
    60
}

fn default_reminder_lead() -> i64 {
    fogon_db::service::reminders::DEFAULT_LEAD_MINUTES
}

impl Default for BackofficeConfig {
    fn default() -> Self {
        BackofficeConfig {
            database_path: default_database_path(),
            bind_addr: default_bind_addr(),
            port: default_port(),
            reminder_interval_secs: default_reminder_interval(),
            reminder_lead_minutes: default_reminder_lead(),
            reminder_webhook_url: None,
        }
    }
}

impl BackofficeConfig {
    /// Loads configuration from file, environment and defaults.
    ///
    /// `config_path` wins over `FOGON_CONFIG`, which wins over the
    /// platform config directory. A missing file is not an error.
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let path = config_path
            .or_else(|| std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from))
            .or_else(Self::default_config_path);

        if let Some(path) = path {
            if path.exists() {
                info!(?path, "Loading back-office config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = Self::from_toml(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;

        Ok(config)
    }

    /// Parses a config file body; absent keys take their defaults.
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Applies `FOGON_*` overrides read through `var`.
    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        if let Some(path) = var("FOGON_DATABASE_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database_path = PathBuf::from(path);
        }
        if let Some(addr) = var("FOGON_BIND_ADDR") {
            self.bind_addr = addr;
        }
        if let Some(port) = var("FOGON_PORT") {
            self.port = parse_env("FOGON_PORT", &port)?;
        }
        if let Some(secs) = var("FOGON_REMINDER_INTERVAL_SECS") {
            self.reminder_interval_secs = parse_env("FOGON_REMINDER_INTERVAL_SECS", &secs)?;
        }
        if let Some(mins) = var("FOGON_REMINDER_LEAD_MINUTES") {
            self.reminder_lead_minutes = parse_env("FOGON_REMINDER_LEAD_MINUTES", &mins)?;
        }
        if let Some(url) = var("FOGON_REMINDER_WEBHOOK_URL") {
            debug!(url = %url, "Overriding reminder webhook from environment");
            self.reminder_webhook_url = Some(url).filter(|u| !u.trim().is_empty());
        }
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database_path.as_os_str().is_empty() {
            return Err(invalid("database_path", "must not be empty"));
        }
        if self.reminder_interval_secs == 0 {
            return Err(invalid("reminder_interval_secs", "must be greater than 0"));
        }
        if !(1..=24 * 60).contains(&self.reminder_lead_minutes) {
            return Err(invalid("reminder_lead_minutes", "must be between 1 and 1440"));
        }
        if let Some(ref url) = self.reminder_webhook_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(invalid(
                    "reminder_webhook_url",
                    &format!("must start with http:// or https://, got: {}", url),
                ));
            }
        }
        self.socket_addr().map(|_| ())
    }

    /// Address the HTTP server binds to.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.bind_addr, self.port)
            .parse()
            .map_err(|_| invalid("bind_addr", &format!("'{}' is not an IP address", self.bind_addr)))
    }

    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("pe", "fogon", "backoffice")
            .map(|dirs| dirs.config_dir().join("backoffice.toml"))
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| invalid(key, &format!("'{}' is not a valid number", value)))
}

fn invalid(key: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = BackofficeConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.reminder_lead_minutes, 10);
        assert_eq!(config.socket_addr().unwrap().port(), 8080);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = BackofficeConfig::from_toml("port = 9090\nreminder_webhook_url = \"https://gw.example/send\"").unwrap();
        assert_eq!(config.port, 9090);
        assert_eq!(config.bind_addr, "0.0.0.0");
        assert_eq!(config.reminder_interval_secs, 60);
        assert_eq!(config.reminder_webhook_url.as_deref(), Some("https://gw.example/send"));
    }

    #[test]
    fn test_env_overrides_file() {
        let mut config = BackofficeConfig::from_toml("port = 9090").unwrap();
        config
            .apply_overrides(env(&[
                ("FOGON_PORT", "7000"),
                ("FOGON_DATABASE_PATH", "/tmp/f.db"),
                ("FOGON_REMINDER_WEBHOOK_URL", " "),
            ]))
            .unwrap();

        assert_eq!(config.port, 7000);
        assert_eq!(config.database_path, PathBuf::from("/tmp/f.db"));
        assert_eq!(config.reminder_webhook_url, None);
    }

    #[test]
    fn test_bad_env_number_is_rejected() {
        let mut config = BackofficeConfig::default();
        let err = config.apply_overrides(env(&[("FOGON_PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "FOGON_PORT"));
    }

    #[test]
    fn test_validation() {
        let mut config = BackofficeConfig::default();

        config.reminder_interval_secs = 0;
        assert!(config.validate().is_err());
        config.reminder_interval_secs = 30;

        config.reminder_lead_minutes = 0;
        assert!(config.validate().is_err());
        config.reminder_lead_minutes = 10;

        config.reminder_webhook_url = Some("ftp://gw".to_string());
        assert!(config.validate().is_err());
        config.reminder_webhook_url = None;

        config.bind_addr = "not-an-ip".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_toml_syntax_is_parse_error() {
        assert!(matches!(
            BackofficeConfig::from_toml("port = "),
            Err(ConfigError::Parse(_))
        ));
    }
}
