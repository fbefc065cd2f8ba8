//! Service configuration
//!
//! Layered, lowest precedence first:
//! 1. Built-in defaults
//! 2. Optional file named by `SMARTSITE_CONFIG` (default `config/smartsite`,
//!    any format the `config` crate recognises by extension)
//! 3. `SMARTSITE__SECTION__KEY` environment variables
//!
//! `OPENAI_API_KEY` fills in the completion key when none is configured.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use smartsite_db::DbConfig;
use smartsite_screening::ScreeningConfig;

const DEFAULT_CONFIG_FILE: &str = "config/smartsite";

/// Development-only signing secret
pub const DEV_JWT_SECRET: &str = "smartsite-dev-secret-change-me-before-deploying";

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DbConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub screening: ScreeningConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Listen address, e.g. `0.0.0.0:8080`
    pub bind: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// HS256 secret shared with the token issuer
    pub jwt_secret: String,
    /// Lifetime of tokens minted by [`crate::middleware::auth::issue_token`]
    pub token_ttl_hours: i64,
}

impl AppConfig {
    /// Load configuration from the process environment
    pub fn load() -> Result<Self, ConfigError> {
        let file = std::env::var("SMARTSITE_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.into());
        let mut config: Self = Self::builder(&file)?.build()?.try_deserialize()?;

        if config.screening.openai_api_key.is_none() {
            config.screening.openai_api_key = std::env::var("OPENAI_API_KEY").ok();
        }

        Ok(config)
    }

    fn builder(
        file: &str,
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Ok(Config::builder()
            .set_default("server.bind", "0.0.0.0:8080")?
            .set_default("database.url", "sqlite://smartsite.db")?
            .set_default("database.max_connections", 8)?
            .set_default("database.busy_timeout_secs", 5)?
            .set_default("auth.jwt_secret", DEV_JWT_SECRET)?
            .set_default("auth.token_ttl_hours", 8)?
            .add_source(File::with_name(file).required(false))
            .add_source(
                Environment::with_prefix("SMARTSITE")
                    .separator("__")
                    .try_parsing(true),
            ))
    }

    /// Whether the signing secret is still the development default
    pub fn uses_dev_secret(&self) -> bool {
        self.auth.jwt_secret == DEV_JWT_SECRET
    }
}
