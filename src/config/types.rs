//! The configuration structs used to build the AppConfig, and their impls.
use std::str::FromStr;

use lazy_regex::regex_is_match;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use sqlx::{
    postgres::{PgConnectOptions, PgSslMode},
    ConnectOptions,
};
use strum_macros::AsRefStr;

use crate::config::{ConfigError, ConfigResult};
use crate::web::types::ValidEmail;

// ###################################
// ->   STRUCTS
// ###################################
/// The environment the app runs in. `Local` exposes internal error details to clients.
#[derive(AsRefStr, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Environment {
    #[default]
    Local,
    Production,
}

#[derive(Deserialize, Clone, Debug)]
pub struct AppConfig {
    #[serde(skip)]
    pub environment: Environment,
    pub net_config: NetConfig,
    pub db_config: DbConfig,
    pub email_config: EmailConfig,
}

#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct NetConfig {
    pub host: [u8; 4],
    pub app_port: u16,
}

/// Database settings, either from the config files or from a `DATABASE_URL`.
///
/// A URL is parsed by sqlx and kept as is, so every option it carries reaches the connection.
/// The plain fields mirror it for logging and `db_name` can still be swapped (tests do that).
#[derive(Deserialize, Clone, Debug)]
pub struct DbConfig {
    pub username: String,
    pub password: SecretString,
    pub port: u16,
    pub host: String,
    pub db_name: String,
    #[serde(default)]
    pub require_ssl: SslRequire,
    #[serde(skip)]
    url_options: Option<PgConnectOptions>,
}

#[derive(Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SslRequire {
    Disable,
    Allow,
    #[default]
    Prefer,
    Require,
    VerifyCa,
    VerifyFull,
}

#[derive(Deserialize, Clone, Debug)]
pub struct EmailConfig {
    pub sender_addr: String,
    pub url: String,
    pub auth_token: SecretString,
    pub timeout_millis: u64,
    pub subject: String,
}

// ###################################
// ->   IMPLs
// ###################################
impl Environment {
    pub fn exposes_error_details(&self) -> bool {
        matches!(self, Environment::Local)
    }
}

impl EmailConfig {
    pub fn valid_sender(&self) -> ConfigResult<ValidEmail> {
        let addr = ValidEmail::parse(&self.sender_addr)
            .map_err(|er| ConfigError::InvalidEmail(er.to_string()))?;
        Ok(addr)
    }
    pub fn valid_url(&self) -> ConfigResult<reqwest::Url> {
        reqwest::Url::parse(&self.url).map_err(|er| ConfigError::InvalidUrl(er.to_string()))
    }
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.timeout_millis)
    }
}

impl DbConfig {
    pub fn connection_options(&self) -> PgConnectOptions {
        self.connection_options_without_db().database(&self.db_name)
    }
    /// Options for the server itself, used to create databases.
    /// A URL based config connects to the `postgres` maintenance database.
    pub fn connection_options_without_db(&self) -> PgConnectOptions {
        if let Some(url_options) = &self.url_options {
            return url_options.clone().database("postgres");
        }

        // Create new PgConnectOptions struct but don't try to use the '$HOME/.pgpass' file.
        PgConnectOptions::new_without_pgpass()
            .host(&self.host)
            .username(&self.username)
            .password(self.password.expose_secret())
            .port(self.port)
            .ssl_mode(self.require_ssl.into())
            .log_statements(tracing::log::LevelFilter::Trace)
    }
}

impl From<SslRequire> for PgSslMode {
    fn from(value: SslRequire) -> Self {
        match value {
            SslRequire::Disable => PgSslMode::Disable,
            SslRequire::Allow => PgSslMode::Allow,
            SslRequire::Prefer => PgSslMode::Prefer,
            SslRequire::Require => PgSslMode::Require,
            SslRequire::VerifyCa => PgSslMode::VerifyCa,
            SslRequire::VerifyFull => PgSslMode::VerifyFull,
        }
    }
}

impl From<PgSslMode> for SslRequire {
    fn from(value: PgSslMode) -> Self {
        match value {
            PgSslMode::Disable => SslRequire::Disable,
            PgSslMode::Allow => SslRequire::Allow,
            PgSslMode::Prefer => SslRequire::Prefer,
            PgSslMode::Require => SslRequire::Require,
            PgSslMode::VerifyCa => SslRequire::VerifyCa,
            PgSslMode::VerifyFull => SslRequire::VerifyFull,
        }
    }
}

// ###################################
// ->   TRY FROMs
// ###################################

impl TryFrom<String> for Environment {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_ascii_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            _ => Err(Self::Error::StringToEnvironmentFail),
        }
    }
}

impl TryFrom<&str> for DbConfig {
    type Error = ConfigError;

    /// Parses a `postgres://` or `postgresql://` connection string.
    /// Port, ssl mode and percent-decoding follow sqlx (and libpq) defaults.
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        if !regex_is_match!(r"^postgres(?:ql)?://", value) {
            return Err(Self::Error::StringToDbConfigFail(
                "expected a postgres:// or postgresql:// url".to_string(),
            ));
        }

        let url_options = PgConnectOptions::from_str(value)
            .map_err(|er| Self::Error::StringToDbConfigFail(er.to_string()))?;

        let username = url_options.get_username().to_string();
        let db_name = url_options
            .get_database()
            .map(str::to_string)
            .unwrap_or_else(|| username.clone());

        Ok(DbConfig {
            port: url_options.get_port(),
            host: url_options.get_host().to_string(),
            require_ssl: url_options.get_ssl_mode().into(),
            // Only the parsed options carry the decoded password
            password: SecretString::from(String::new()),
            username,
            db_name,
            url_options: Some(url_options),
        })
    }
}

// ###################################
// ->   TESTS
// ###################################
