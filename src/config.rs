//! Configuration management for the SDK
//!
//! Handles loading endpoint and behaviour settings from TOML files and
//! environment variables.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Deployment the SDK talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Local,
    Dev,
    Production,
}

impl Environment {
    /// Default HTTPS endpoint for this environment
    pub fn api_url(&self) -> &'static str {
        match self {
            Environment::Local => "https://localhost:5000",
            Environment::Dev => "https://api.d1.navability.io",
            Environment::Production => "https://api.navability.io",
        }
    }

    /// Default WebSocket endpoint for this environment
    pub fn ws_url(&self) -> &'static str {
        match self {
            Environment::Local => "wss://localhost:5000/graphql",
            Environment::Dev => "wss://api.d1.navability.io/graphql",
            Environment::Production => "wss://api.navability.io/graphql",
        }
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Environment::Local),
            "dev" => Ok(Environment::Dev),
            "production" | "prod" => Ok(Environment::Production),
            _ => Err(ConfigError::InvalidEnvironment(s.to_string())),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Local => write!(f, "local"),
            Environment::Dev => write!(f, "dev"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// What `get_variables`/`get_factors` do when the response envelope is malformed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvelopePolicy {
    /// Fail with an envelope error
    #[default]
    Strict,
    /// Log a warning and return an empty result
    Lenient,
}

impl FromStr for EnvelopePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "strict" => Ok(EnvelopePolicy::Strict),
            "lenient" => Ok(EnvelopePolicy::Lenient),
            _ => Err(ConfigError::InvalidValue(
                "envelope_policy".to_string(),
                s.to_string(),
            )),
        }
    }
}

/// SDK configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdkConfig {
    /// Deployment providing the default endpoints
    pub environment: Environment,
    /// Overrides the environment's HTTPS endpoint
    pub api_url: Option<String>,
    /// Overrides the environment's WebSocket endpoint
    pub ws_url: Option<String>,
    /// Request timeout, also used for the WebSocket handshake
    pub timeout_secs: u64,
    /// Policy for malformed envelopes on list queries
    pub envelope_policy: EnvelopePolicy,
    /// Delay between status polls
    pub status_poll_interval_ms: u64,
    /// Budget for waiting on request completion
    pub status_timeout_secs: u64,
}

impl Default for SdkConfig {
    fn default() -> Self {
        Self {
            environment: Environment::Production,
            api_url: None,
            ws_url: None,
            timeout_secs: 30,
            envelope_policy: EnvelopePolicy::Strict,
            status_poll_interval_ms: 1000,
            status_timeout_secs: 60,
        }
    }
}

impl SdkConfig {
    /// Create a configuration for the given environment
    pub fn new(environment: Environment) -> Self {
        Self {
            environment,
            ..Default::default()
        }
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;

        let mut config: SdkConfig =
            toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;

        // Apply environment variable overrides
        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply environment variable overrides to the configuration
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(environment) = std::env::var("NAVABILITY_ENVIRONMENT") {
            self.environment = environment.parse()?;
        }
        if let Ok(url) = std::env::var("NAVABILITY_API_URL") {
            self.api_url = Some(url);
        }
        if let Ok(url) = std::env::var("NAVABILITY_WS_URL") {
            self.ws_url = Some(url);
        }
        if let Ok(timeout) = std::env::var("NAVABILITY_TIMEOUT_SECS") {
            self.timeout_secs = timeout.parse().map_err(|_| {
                ConfigError::InvalidValue("timeout_secs".to_string(), timeout.clone())
            })?;
        }
        if let Ok(policy) = std::env::var("NAVABILITY_ENVELOPE_POLICY") {
            self.envelope_policy = policy.parse()?;
        }

        Ok(())
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?;

        // Create parent directories if they don't exist
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent).map_err(ConfigError::Io)?;
        }

        std::fs::write(path, content).map_err(ConfigError::Io)?;
        Ok(())
    }

    /// Effective HTTPS endpoint
    pub fn api_url(&self) -> &str {
        self.api_url
            .as_deref()
            .unwrap_or_else(|| self.environment.api_url())
    }

    /// Effective WebSocket endpoint
    pub fn ws_url(&self) -> &str {
        self.ws_url
            .as_deref()
            .unwrap_or_else(|| self.environment.ws_url())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn status_poll_interval(&self) -> Duration {
        Duration::from_millis(self.status_poll_interval_ms)
    }

    pub fn status_timeout(&self) -> Duration {
        Duration::from_secs(self.status_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let api_url = self.api_url();
        if !(api_url.starts_with("https://") || api_url.starts_with("http://")) {
            return Err(ConfigError::InvalidUrl(api_url.to_string()));
        }

        let ws_url = self.ws_url();
        if !(ws_url.starts_with("wss://") || ws_url.starts_with("ws://")) {
            return Err(ConfigError::InvalidUrl(ws_url.to_string()));
        }

        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "timeout_secs".to_string(),
                "0".to_string(),
            ));
        }
        if self.status_poll_interval_ms == 0 {
            return Err(ConfigError::InvalidValue(
                "status_poll_interval_ms".to_string(),
                "0".to_string(),
            ));
        }
        if self.status_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "status_timeout_secs".to_string(),
                "0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse configuration: {0}")]
    Parse(String),
    #[error("Failed to serialize configuration: {0}")]
    Serialize(String),
    #[error("Unknown environment: {0}")]
    InvalidEnvironment(String),
    #[error("Invalid endpoint URL: {0}")]
    InvalidUrl(String),
    #[error("Invalid value for '{0}': {1}")]
    InvalidValue(String, String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config_is_valid() {
        let config = SdkConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.api_url(), "https://api.navability.io");
        assert_eq!(config.ws_url(), "wss://api.navability.io/graphql");
        assert_eq!(config.envelope_policy, EnvelopePolicy::Strict);
    }

    #[test]
    fn test_environment_selects_endpoints() {
        let config = SdkConfig::new(Environment::Dev);
        assert_eq!(config.api_url(), "https://api.d1.navability.io");
        assert_eq!(config.ws_url(), "wss://api.d1.navability.io/graphql");
    }

    #[test]
    fn test_url_override_wins() {
        let config = SdkConfig {
            api_url: Some("http://127.0.0.1:8080".to_string()),
            ..SdkConfig::new(Environment::Local)
        };
        assert_eq!(config.api_url(), "http://127.0.0.1:8080");
        assert_eq!(config.ws_url(), "wss://localhost:5000/graphql");
    }

    #[test]
    fn test_invalid_urls_rejected() {
        let config = SdkConfig {
            api_url: Some("ftp://example.com".to_string()),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidUrl(_))));

        let config = SdkConfig {
            ws_url: Some("https://example.com/graphql".to_string()),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidUrl(_))));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = SdkConfig {
            timeout_secs: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue(field, _)) if field == "timeout_secs"
        ));
    }

    #[test]
    fn test_zero_status_durations_rejected() {
        let no_poll = SdkConfig {
            status_poll_interval_ms: 0,
            ..Default::default()
        };
        assert!(matches!(
            no_poll.validate(),
            Err(ConfigError::InvalidValue(field, _)) if field == "status_poll_interval_ms"
        ));

        let no_wait = SdkConfig {
            status_timeout_secs: 0,
            ..Default::default()
        };
        assert!(matches!(
            no_wait.validate(),
            Err(ConfigError::InvalidValue(field, _)) if field == "status_timeout_secs"
        ));
    }

    #[test]
    fn test_parse_environment_and_policy() {
        assert_eq!("DEV".parse::<Environment>().unwrap(), Environment::Dev);
        assert_eq!("prod".parse::<Environment>().unwrap(), Environment::Production);
        assert!("staging".parse::<Environment>().is_err());
        assert_eq!(
            "lenient".parse::<EnvelopePolicy>().unwrap(),
            EnvelopePolicy::Lenient
        );
        assert!("loose".parse::<EnvelopePolicy>().is_err());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("navability.toml");

        let config = SdkConfig {
            environment: Environment::Local,
            timeout_secs: 5,
            envelope_policy: EnvelopePolicy::Lenient,
            ..Default::default()
        };
        config.save_to_file(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let loaded: SdkConfig = toml::from_str(&content).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let loaded: SdkConfig = toml::from_str("environment = \"dev\"\n").unwrap();
        assert_eq!(loaded.environment, Environment::Dev);
        assert_eq!(loaded.timeout_secs, 30);
        assert_eq!(loaded.status_timeout_secs, 60);
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "timeout_secs = \"soon\"").unwrap();
        assert!(matches!(
            SdkConfig::from_file(&path),
            Err(ConfigError::Parse(_))
        ));
    }
}
