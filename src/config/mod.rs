//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Pool rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Season label (e.g. 2026)
    #[serde(default = "default_season_year")]
    pub season_year: u32,

    /// N: teams each participant picks, priorities 1..=N
    #[serde(default = "default_picks_per_participant")]
    pub picks_per_participant: usize,

    /// Refuse a sync that returns fewer teams than this (guards against
    /// truncated upstream responses wiping the standings)
    #[serde(default = "default_min_teams_protection")]
    pub min_teams_protection: usize,
}

fn default_season_year() -> u32 {
    2026
}

fn default_picks_per_participant() -> usize {
    7
}

fn default_min_teams_protection() -> usize {
    20
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            season_year: default_season_year(),
            picks_per_participant: default_picks_per_participant(),
            min_teams_protection: default_min_teams_protection(),
        }
    }
}

/// Standings source configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_tournament_id")]
    pub tournament_id: u32,

    #[serde(default = "default_season_id")]
    pub season_id: u32,

    /// Timeout per request, in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Delay between retries, in seconds
    #[serde(default = "default_retry_delay")]
    pub retry_delay_seconds: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_base_url() -> String {
    "https://www.sofascore.com/api/v1".to_string()
}

fn default_tournament_id() -> u32 {
    325
}

fn default_season_id() -> u32 {
    87678
}

fn default_timeout() -> u64 {
    20
}

fn default_max_retries() -> u32 {
    1
}

fn default_retry_delay() -> u64 {
    3
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".to_string()
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            tournament_id: default_tournament_id(),
            season_id: default_season_id(),
            timeout_seconds: default_timeout(),
            max_retries: default_max_retries(),
            retry_delay_seconds: default_retry_delay(),
            user_agent: default_user_agent(),
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origin() -> String {
    "*".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

/// Admin auth configuration. Deliberately minimal: one set of admin
/// credentials guarding mutations, plus a separate secret for the
/// unattended cron endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "default_admin_username")]
    pub admin_username: String,

    #[serde(default = "default_admin_password")]
    pub admin_password: String,

    #[serde(default = "default_secret_key")]
    pub secret_key: String,

    #[serde(default = "default_cron_secret")]
    pub cron_secret: String,
}

fn default_admin_username() -> String {
    "admin".to_string()
}

fn default_admin_password() -> String {
    "change-me".to_string()
}

fn default_secret_key() -> String {
    "change-me-to-a-random-secret-key".to_string()
}

fn default_cron_secret() -> String {
    "change-me-to-a-random-cron-secret".to_string()
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            admin_username: default_admin_username(),
            admin_password: default_admin_password(),
            secret_key: default_secret_key(),
            cron_secret: default_cron_secret(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub pool: PoolConfig,

    #[serde(default)]
    pub source: SourceConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub auth: AuthConfig,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
            pool: PoolConfig::default(),
            source: SourceConfig::default(),
            server: ServerConfig::default(),
            auth: AuthConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &PathBuf) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pool.picks_per_participant == 0 {
            return Err(ConfigError::ValidationError(
                "picks_per_participant must be greater than 0".to_string(),
            ));
        }

        if self.source.timeout_seconds == 0 {
            return Err(ConfigError::ValidationError(
                "Source timeout must be greater than 0".to_string(),
            ));
        }

        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "Server port must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
