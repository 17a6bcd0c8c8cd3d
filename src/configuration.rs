use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local, Utc};
use config::ConfigError;

use crate::error;

#[derive(serde::Deserialize, Clone)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub application: ApplicationSettings,
    pub auth: AuthSettings,
}

#[derive(serde::Deserialize, Clone)]
pub struct ApplicationSettings {
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

#[derive(serde::Deserialize, Clone)]
pub struct DatabaseSettings {
    pub username: String,
    pub password: String,
    pub port: u16,
    pub host: String,
    pub database_name: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,
}

impl DatabaseSettings {
    pub fn connection_string(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.username, self.password, self.host, self.port, self.database_name
        )
    }

    pub fn connection_string_without_db(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}",
            self.username, self.password, self.host, self.port
        )
    }
}

/// Zone used when rendering token expiry timestamps.
#[derive(serde::Deserialize, Clone, Copy, Debug, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TimestampZone {
    #[default]
    Utc,
    /// Server-local time, matching older clients that expect it.
    Local,
}

impl TimestampZone {
    pub fn format(&self, at: DateTime<Utc>, pattern: &str) -> String {
        match self {
            TimestampZone::Utc => at.format(pattern).to_string(),
            TimestampZone::Local => at.with_timezone(&Local).format(pattern).to_string(),
        }
    }
}

/// Token issuance settings
#[derive(serde::Deserialize, Clone)]
pub struct AuthSettings {
    pub private_key_path: String,
    pub public_key_path: String,
    #[serde(default = "default_issuer")]
    pub issuer: String,
    #[serde(default = "default_access_token_expire_hours")]
    pub access_token_expire_hours: i64,
    #[serde(default = "default_refresh_token_expire_hours")]
    pub refresh_token_expire_hours: i64,
    #[serde(default = "default_datetime_format")]
    pub datetime_format: String,
    #[serde(default)]
    pub timestamp_zone: TimestampZone,
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,
}

impl AuthSettings {
    /// Settings with the default lifetimes and format, for the given key files.
    pub fn with_key_paths(private_key_path: &str, public_key_path: &str) -> Self {
        Self {
            private_key_path: private_key_path.to_string(),
            public_key_path: public_key_path.to_string(),
            issuer: default_issuer(),
            access_token_expire_hours: default_access_token_expire_hours(),
            refresh_token_expire_hours: default_refresh_token_expire_hours(),
            datetime_format: default_datetime_format(),
            timestamp_zone: TimestampZone::default(),
            bcrypt_cost: default_bcrypt_cost(),
        }
    }

    pub fn validate(&self) -> Result<(), error::ConfigError> {
        if self.private_key_path.trim().is_empty() {
            return Err(error::ConfigError::MissingRequired(
                "auth.private_key_path".to_string(),
            ));
        }
        if self.public_key_path.trim().is_empty() {
            return Err(error::ConfigError::MissingRequired(
                "auth.public_key_path".to_string(),
            ));
        }
        if self.access_token_expire_hours <= 0 {
            return Err(error::ConfigError::InvalidValue(
                "auth.access_token_expire_hours must be positive".to_string(),
            ));
        }
        if self.refresh_token_expire_hours <= 0 {
            return Err(error::ConfigError::InvalidValue(
                "auth.refresh_token_expire_hours must be positive".to_string(),
            ));
        }
        if !(4..=31).contains(&self.bcrypt_cost) {
            return Err(error::ConfigError::InvalidValue(format!(
                "auth.bcrypt_cost must be between 4 and 31, got {}",
                self.bcrypt_cost
            )));
        }
        if StrftimeItems::new(&self.datetime_format).any(|item| matches!(item, Item::Error)) {
            return Err(error::ConfigError::InvalidValue(format!(
                "auth.datetime_format is not a valid pattern: {}",
                self.datetime_format
            )));
        }
        Ok(())
    }

    pub fn format_timestamp(&self, at: DateTime<Utc>) -> String {
        self.timestamp_zone.format(at, &self.datetime_format)
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_max_connections() -> u32 {
    5
}

fn default_acquire_timeout_secs() -> u64 {
    5
}

fn default_issuer() -> String {
    "bookshelf".to_string()
}

fn default_access_token_expire_hours() -> i64 {
    6
}

fn default_refresh_token_expire_hours() -> i64 {
    24
}

fn default_datetime_format() -> String {
    "%Y-%m-%d %H:%M:%S".to_string()
}

fn default_bcrypt_cost() -> u32 {
    bcrypt::DEFAULT_COST
}

/// Reads `configuration.yaml` (optional) and `APP_*` environment overrides,
/// e.g. `APP_DATABASE__HOST=db`.
pub fn get_configuration() -> Result<Settings, ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("configuration").required(false))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;
    settings.try_deserialize::<Settings>()
}
