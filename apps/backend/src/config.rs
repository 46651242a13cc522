//! Backend configuration module.
//!
//! Settings are layered, later sources winning:
//!
//! ```text
//!   built-in defaults ──► config/pasar.toml (optional) ──► PASAR_* env vars
//! ```
//!
//! `PASAR_DATABASE_PATH=/var/lib/pasar.db` overrides `database_path`, and so
//! on for every field.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File};
use serde::{Deserialize, Serialize};

use pasar_core::{AesGcmCipher, PageLimit};

/// Optional settings file, relative to the working directory.
pub const CONFIG_FILE: &str = "config/pasar";

/// Prefix of the environment variables that override settings.
pub const ENV_PREFIX: &str = "PASAR";

// Development defaults. Production refuses to start with either of them.
const DEV_AES_SECRET: &str = "6465762d6f6e6c792d637572736f722d6b65792d706173617221212121212121";
const DEV_ACCESS_TOKEN_SECRET: &str = "pasar-dev-secret-change-in-production";

/// Deployment environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppEnv {
    Development,
    Production,
}

/// Backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// development | production
    pub app_env: AppEnv,

    /// SQLite database file
    pub database_path: String,

    /// Pool size
    pub db_max_connections: u32,

    /// Hex-encoded AES key for pagination cursors (16 or 32 bytes)
    pub aes_secret: String,

    /// HMAC secret that access tokens are signed with
    pub access_token_secret: String,

    /// Page size used when a caller does not ask for one
    pub default_page_limit: i64,
}

impl AppConfig {
    /// Load configuration from defaults, the optional file and the
    /// environment.
    pub fn load() -> Result<Self, ConfigError> {
        let builder = Self::defaults()?
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX));

        Self::from_builder(builder)
    }

    /// Builder pre-filled with development defaults.
    pub fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        let builder = Config::builder()
            .set_default("app_env", "development")?
            .set_default("database_path", "./pasar_dev.db")?
            .set_default("db_max_connections", 5_i64)?
            .set_default("aes_secret", DEV_AES_SECRET)?
            .set_default("access_token_secret", DEV_ACCESS_TOKEN_SECRET)?
            .set_default("default_page_limit", 10_i64)?;

        Ok(builder)
    }

    /// Deserializes and validates whatever `builder` was given.
    pub fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let config: AppConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Checks values the type system cannot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.cursor_cipher()?;
        self.page_limit()?;

        if self.access_token_secret.trim().is_empty() {
            return Err(ConfigError::MissingRequired("access_token_secret".to_string()));
        }

        if self.db_max_connections == 0 {
            return Err(ConfigError::InvalidValue {
                key: "db_max_connections".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        if self.app_env == AppEnv::Production {
            if self.aes_secret == DEV_AES_SECRET {
                return Err(ConfigError::MissingRequired("aes_secret".to_string()));
            }
            if self.access_token_secret == DEV_ACCESS_TOKEN_SECRET {
                return Err(ConfigError::MissingRequired("access_token_secret".to_string()));
            }
        }

        Ok(())
    }

    /// The cursor cipher for `aes_secret`.
    pub fn cursor_cipher(&self) -> Result<AesGcmCipher, ConfigError> {
        AesGcmCipher::from_hex_key(&self.aes_secret).map_err(|e| ConfigError::InvalidValue {
            key: "aes_secret".to_string(),
            reason: e.to_string(),
        })
    }

    /// `default_page_limit` as a validated limit.
    pub fn page_limit(&self) -> Result<PageLimit, ConfigError> {
        PageLimit::new(self.default_page_limit).map_err(|e| ConfigError::InvalidValue {
            key: "default_page_limit".to_string(),
            reason: e.to_string(),
        })
    }

    pub fn is_production(&self) -> bool {
        self.app_env == AppEnv::Production
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}
