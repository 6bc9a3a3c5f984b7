//! # Configuration
//!
//! Layered service configuration.
//!
//! Sources, later ones overriding earlier ones:
//!
//! 1. Built-in defaults
//! 2. A TOML file, `config/b2b-rfq.toml` unless another path is given
//! 3. Environment variables prefixed `B2B_RFQ__`, with `__` between keys,
//!    e.g. `B2B_RFQ__SERVER__PORT=9090`
//!
//! # Examples
//!
//! ```
//! use b2b_rfq::config::AppConfig;
//!
//! let config = AppConfig::default();
//! assert!(config.validate().is_ok());
//! assert_eq!(config.negotiation.default_validity_days, 7);
//! ```

use crate::application::services::{DEFAULT_SWEEP_INTERVAL, NegotiationConfig};
use crate::domain::entities::DEFAULT_VALIDITY_DAYS;
use crate::infrastructure::identity::DEFAULT_TOKEN_TTL;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Default configuration file path.
pub const DEFAULT_CONFIG_PATH: &str = "config/b2b-rfq.toml";

/// Prefix of configuration environment variables.
pub const ENV_PREFIX: &str = "B2B_RFQ";

/// Signing secret used when none is configured. Only fit for local runs.
pub const DEVELOPMENT_JWT_SECRET: &str = "b2b-rfq-development-secret";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A source could not be read or deserialized.
    #[error("could not load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// A value is out of range.
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Complete service configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP listener.
    pub server: ServerConfig,
    /// Bearer token settings.
    pub auth: AuthConfig,
    /// Negotiation lifecycle settings.
    pub negotiation: NegotiationSettings,
    /// Log output.
    pub logging: LoggingConfig,
    /// Seed demo users and catalog at startup.
    pub seed_demo_data: bool,
}

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind.
    pub bind_address: String,
    /// Port to bind.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

/// Bearer token settings.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// HS256 signing secret.
    pub jwt_secret: String,
    /// Token lifetime in minutes.
    pub token_ttl_minutes: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: DEVELOPMENT_JWT_SECRET.to_string(),
            token_ttl_minutes: DEFAULT_TOKEN_TTL.as_secs() / 60,
        }
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl_minutes", &self.token_ttl_minutes)
            .finish()
    }
}

/// Negotiation lifecycle settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NegotiationSettings {
    /// Validity window of RFQs that do not name one.
    pub default_validity_days: i64,
    /// Delay between expiry sweeps.
    pub sweep_interval_secs: u64,
}

impl Default for NegotiationSettings {
    fn default() -> Self {
        Self {
            default_validity_days: DEFAULT_VALIDITY_DAYS,
            sweep_interval_secs: DEFAULT_SWEEP_INTERVAL.as_secs(),
        }
    }
}

/// Log output settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `info` or `b2b_rfq=debug`.
    pub level: String,
    /// Output format.
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

impl AppConfig {
    /// Loads the configuration from `path` (or the default path) and the
    /// environment, then validates it.
    ///
    /// A missing file is an error only when `path` was given explicitly.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Load` if a source is malformed and
    /// `ConfigError::Validation` if a value is out of range.
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let (file, required) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_PATH), false),
        };

        let config: Self = config::Config::builder()
            .add_source(config::File::from(file.as_path()).required(required))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` naming the first bad value.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.auth.jwt_secret.trim().is_empty() {
            return Err(ConfigError::Validation(
                "auth.jwt_secret must not be empty".to_string(),
            ));
        }
        if self.auth.token_ttl_minutes == 0 {
            return Err(ConfigError::Validation(
                "auth.token_ttl_minutes must be greater than zero".to_string(),
            ));
        }
        if self.negotiation.default_validity_days < 0 {
            return Err(ConfigError::Validation(
                "negotiation.default_validity_days must not be negative".to_string(),
            ));
        }
        if self.negotiation.sweep_interval_secs == 0 {
            return Err(ConfigError::Validation(
                "negotiation.sweep_interval_secs must be greater than zero".to_string(),
            ));
        }
        if self.server.bind_address.trim().is_empty() {
            return Err(ConfigError::Validation(
                "server.bind_address must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Socket address of the HTTP listener.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if the bind address is not an IP.
    pub fn socket_addr(&self) -> ConfigResult<SocketAddr> {
        format!("{}:{}", self.server.bind_address, self.server.port)
            .parse()
            .map_err(|err| {
                ConfigError::Validation(format!(
                    "server.bind_address `{}` is invalid: {err}",
                    self.server.bind_address
                ))
            })
    }

    /// Token lifetime.
    #[must_use]
    pub fn token_ttl(&self) -> Duration {
        Duration::from_secs(self.auth.token_ttl_minutes.saturating_mul(60))
    }

    /// Sweep interval.
    #[must_use]
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.negotiation.sweep_interval_secs)
    }

    /// Lifecycle settings handed to the coordinator.
    #[must_use]
    pub fn negotiation_config(&self) -> NegotiationConfig {
        NegotiationConfig {
            default_validity_days: self.negotiation.default_validity_days,
        }
    }

    /// Returns true if the built-in development secret is in use.
    #[must_use]
    pub fn uses_development_secret(&self) -> bool {
        self.auth.jwt_secret == DEVELOPMENT_JWT_SECRET
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Write;

    mod validate {
        use super::*;

        #[test]
        fn defaults_are_valid() {
            let config = AppConfig::default();
            assert!(config.validate().is_ok());
            assert_eq!(config.token_ttl(), Duration::from_secs(30 * 60));
            assert_eq!(config.socket_addr().unwrap().port(), 8080);
            assert!(config.uses_development_secret());
        }

        #[test]
        fn empty_secret_is_rejected() {
            let mut config = AppConfig::default();
            config.auth.jwt_secret = "  ".to_string();
            assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
        }

        #[test]
        fn zero_ttl_is_rejected() {
            let mut config = AppConfig::default();
            config.auth.token_ttl_minutes = 0;
            assert!(config.validate().is_err());
        }

        #[test]
        fn negative_validity_is_rejected() {
            let mut config = AppConfig::default();
            config.negotiation.default_validity_days = -1;
            assert!(config.validate().is_err());

            config.negotiation.default_validity_days = 0;
            assert!(config.validate().is_ok());
        }
    }

    #[test]
    fn loads_file_over_defaults() {
        let path = std::env::temp_dir().join(format!("b2b-rfq-{}.toml", uuid::Uuid::new_v4()));
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "seed_demo_data = true\n\n[server]\nport = 9191\n\n[negotiation]\ndefault_validity_days = 3\n\n[logging]\nformat = \"json\""
        )
        .unwrap();

        let config = AppConfig::load(Some(path.as_path())).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert!(config.seed_demo_data);
        assert_eq!(config.server.port, 9191);
        assert_eq!(config.server.bind_address, "0.0.0.0");
        assert_eq!(config.negotiation_config().default_validity_days, 3);
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let path = std::env::temp_dir().join("b2b-rfq-does-not-exist.toml");
        assert!(matches!(
            AppConfig::load(Some(path.as_path())),
            Err(ConfigError::Load(_))
        ));
    }

    #[test]
    fn debug_redacts_secret() {
        let config = AppConfig::default();
        assert!(!format!("{config:?}").contains(DEVELOPMENT_JWT_SECRET));
    }
}
