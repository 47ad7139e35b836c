//! Builds an `AppConfig` from layered sources and validates it before the app starts.
//!
//! Sources, later ones taking precedence:
//! 1. `config/base.toml`
//! 2. `config/{environment}.toml` where the environment comes from `APP_ENVIRONMENT` (default `local`)
//! 3. `APP_` prefixed env variables, `__` separates nested keys (`APP_NET_CONFIG__APP_PORT`)
//! 4. `RESEND_API_KEY` and `RESEND_FROM_EMAIL`, required outside of `local`
//! 5. `DATABASE_URL` replaces the whole `db_config` if it is set

mod error;
mod types;

use std::path::Path;

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use tracing::info;

pub use error::{ConfigError, ConfigResult};
pub use types::{AppConfig, DbConfig, EmailConfig, Environment, NetConfig, SslRequire};

impl AppConfig {
    /// Loads the configuration from the `config` directory in the current working directory.
    pub fn load() -> ConfigResult<Self> {
        let base_path = std::env::current_dir()?;
        let environment: Environment = std::env::var("APP_ENVIRONMENT")
            .unwrap_or_else(|_| "local".into())
            .try_into()?;

        Self::load_from(base_path.join("config"), environment)
    }

    /// Loads the configuration for `environment` from `config_dir` and validates it.
    pub fn load_from(config_dir: impl AsRef<Path>, environment: Environment) -> ConfigResult<Self> {
        info!("{:<20} - Initializing the configuration", "load_config");
        let config_dir = config_dir.as_ref();
        let environment_filename = format!("{}.toml", environment.as_ref().to_lowercase());

        let mut config: AppConfig = Figment::new()
            .merge(Toml::file(config_dir.join("base.toml")))
            .merge(Toml::file(config_dir.join(environment_filename)))
            .merge(Env::prefixed("APP_").split("__"))
            // Only `local.toml` ships email credentials, production has to provide them
            .merge(
                Env::raw()
                    .only(&["RESEND_API_KEY"])
                    .map(|_| "email_config.auth_token".into()),
            )
            .merge(
                Env::raw()
                    .only(&["RESEND_FROM_EMAIL"])
                    .map(|_| "email_config.sender_addr".into()),
            )
            .extract()?;
        config.environment = environment;

        if let Ok(db_url) = std::env::var("DATABASE_URL") {
            config.db_config = DbConfig::try_from(db_url.as_str())?;
        }

        config.validate()?;

        Ok(config)
    }

    /// Fails early on values that would otherwise only blow up on the first request.
    pub fn validate(&self) -> ConfigResult<()> {
        self.email_config.valid_sender()?;
        self.email_config.valid_url()?;
        if self.db_config.db_name.trim().is_empty() {
            return Err(ConfigError::MissingValue("db_config.db_name"));
        }

        Ok(())
    }
}
