//! Server configuration loading from file and environment variables.

use feedback_session::ProviderConfig;
use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use thiserror::Error;

/// Top-level server configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Server network settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Database settings.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Real-time session provider settings.
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Network configuration for the HTTP server.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to. All interfaces by default.
    #[serde(default = "default_host")]
    pub host: IpAddr,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file (`:memory:` for a throwaway store).
    #[serde(default = "default_db_path")]
    pub path: String,

    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,

    #[serde(default = "default_pool_max_size")]
    pub pool_max_size: u32,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "feedback_server=debug,info").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to output logs in JSON format.
    #[serde(default)]
    pub json: bool,
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    3000
}

fn default_db_path() -> String {
    "feedback.db".to_string()
}

fn default_busy_timeout_ms() -> u64 {
    feedback_db::DbRuntimeSettings::default().busy_timeout_ms
}

fn default_pool_max_size() -> u32 {
    feedback_db::DbRuntimeSettings::default().pool_max_size
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            busy_timeout_ms: default_busy_timeout_ms(),
            pool_max_size: default_pool_max_size(),
        }
    }
}

impl DatabaseConfig {
    pub fn runtime_settings(&self) -> feedback_db::DbRuntimeSettings {
        feedback_db::DbRuntimeSettings {
            busy_timeout_ms: self.busy_timeout_ms,
            pool_max_size: self.pool_max_size,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse the configuration file.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// No provider credential was supplied.
    #[error("provider api key is missing; set OPENAI_API_KEY or provider.api_key")]
    MissingProviderKey,

    #[error("database path is empty; set DATABASE_PATH or database.path")]
    MissingDatabasePath,
}

impl Config {
    /// Checks the required process inputs: provider credential and store
    /// location.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingProviderKey` or
    /// `ConfigError::MissingDatabasePath`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.provider.has_credential() {
            return Err(ConfigError::MissingProviderKey);
        }
        if self.database.path.trim().is_empty() {
            return Err(ConfigError::MissingDatabasePath);
        }
        Ok(())
    }
}

/// Result of [`load_config`].
#[derive(Debug)]
pub struct LoadedConfig {
    pub config: Config,
    /// False when no file was read and the defaults were used.
    pub from_file: bool,
}

/// Loads configuration from a TOML file, falling back to defaults, then
/// applies environment overrides (see [`apply_env_overrides`]).
///
/// Runs before logging is initialized, so it reports rather than logs
/// whether the file was found.
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read or parsed.
pub fn load_config(path: Option<&str>) -> Result<LoadedConfig, ConfigError> {
    let (config, from_file): (Config, bool) = match path {
        Some(p) => match std::fs::read_to_string(p) {
            Ok(contents) => (toml::from_str(&contents)?, true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => (Config::default(), false),
            Err(e) => return Err(ConfigError::FileRead(e)),
        },
        None => (Config::default(), false),
    };

    Ok(LoadedConfig {
        config: apply_env_overrides(config, |key| std::env::var(key).ok()),
        from_file,
    })
}

/// Applies environment variable overrides using `lookup` to read variables.
///
/// - `FEEDBACK_HOST` overrides `server.host`
/// - `PORT`, then `FEEDBACK_PORT`, override `server.port`
/// - `DATABASE_PATH`, then `FEEDBACK_DB_PATH`, override `database.path`
/// - `OPENAI_API_KEY` overrides `provider.api_key`
/// - `FEEDBACK_PROVIDER_URL` overrides `provider.session_url`
/// - `FEEDBACK_LOG_LEVEL` overrides `logging.level`
/// - `FEEDBACK_LOG_JSON` overrides `logging.json` ("true" or "1" enables)
///
/// Unparseable host or port values are ignored.
pub fn apply_env_overrides<F>(mut config: Config, lookup: F) -> Config
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(host) = lookup("FEEDBACK_HOST").and_then(|h| h.parse().ok()) {
        config.server.host = host;
    }
    for key in ["PORT", "FEEDBACK_PORT"] {
        if let Some(port) = lookup(key).and_then(|p| p.parse().ok()) {
            config.server.port = port;
        }
    }
    for key in ["DATABASE_PATH", "FEEDBACK_DB_PATH"] {
        if let Some(path) = lookup(key) {
            config.database.path = path;
        }
    }
    if let Some(key) = lookup("OPENAI_API_KEY") {
        config.provider.api_key = key;
    }
    if let Some(url) = lookup("FEEDBACK_PROVIDER_URL") {
        config.provider.session_url = url;
    }
    if let Some(level) = lookup("FEEDBACK_LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Some(json) = lookup("FEEDBACK_LOG_JSON") {
        config.logging.json = json == "true" || json == "1";
    }
    config
}
