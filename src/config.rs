//! Application configuration management
//!
//! This module handles loading and validating configuration from environment
//! variables. All configuration is loaded at startup and validated before the
//! application accepts any submission; a missing judge or callback value is a
//! fatal startup error, never a per-request one.

use std::env;
use std::sync::LazyLock;

use crate::constants::{
    DEFAULT_DATABASE_MAX_CONNECTIONS, DEFAULT_JUDGE_TIMEOUT_SECS, DEFAULT_JWT_EXPIRY_HOURS,
    DEFAULT_MAX_TEST_CASES, DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT,
    DEFAULT_SUBMISSION_RATE_LIMIT, DEFAULT_SUBMISSION_RATE_WINDOW_SECS, MAX_ASSEMBLED_CODE_SIZE,
    MAX_SOURCE_CODE_SIZE,
};

/// Global application configuration (lazily initialized)
pub static CONFIG: LazyLock<Config> = LazyLock::new(|| {
    Config::from_env().expect("Failed to load configuration from environment")
});

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub jwt: JwtConfig,
    pub judge: JudgeConfig,
    pub limits: LimitsConfig,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub rust_log: String,
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// Redis configuration
#[derive(Debug, Clone)]
pub struct RedisConfig {
    pub url: String,
}

/// JWT authentication configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiry_hours: i64,
}

/// External judge configuration
#[derive(Debug, Clone)]
pub struct JudgeConfig {
    /// Base URL of the external judge service
    pub base_url: String,
    /// API credential sent with every dispatch request
    pub api_key: String,
    /// Externally reachable base URL of this server, used to build callback URLs
    pub callback_base_url: String,
    /// Shared secret embedded in callback URLs and verified on every callback
    pub callback_secret: String,
    /// Dispatch request timeout in seconds
    pub timeout_secs: u64,
}

/// Submission limits configuration
#[derive(Debug, Clone)]
pub struct LimitsConfig {
    /// Maximum submissions per user per rate-limit window
    pub submission_rate_limit: u32,
    /// Rate limit window in seconds
    pub submission_rate_window_secs: u64,
    /// Maximum number of test cases dispatched per submission
    pub max_test_cases: usize,
    /// Maximum user source fragment size in bytes
    pub max_code_size: usize,
    /// Maximum assembled source size in bytes
    pub max_assembled_size: usize,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            server: ServerConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            redis: RedisConfig::from_env()?,
            jwt: JwtConfig::from_env()?,
            judge: JudgeConfig::from_env()?,
            limits: LimitsConfig::from_env()?,
        })
    }
}

impl ServerConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: env::var("SERVER_HOST").unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
            port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| DEFAULT_SERVER_PORT.to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("SERVER_PORT".to_string()))?,
            rust_log: env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

impl DatabaseConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            url: env::var("DATABASE_URL")
                .map_err(|_| ConfigError::Missing("DATABASE_URL".to_string()))?,
            max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| DEFAULT_DATABASE_MAX_CONNECTIONS.to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("DATABASE_MAX_CONNECTIONS".to_string()))?,
        })
    }
}

impl RedisConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            url: env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string()),
        })
    }
}

impl JwtConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            secret: env::var("JWT_SECRET")
                .map_err(|_| ConfigError::Missing("JWT_SECRET".to_string()))?,
            expiry_hours: env::var("JWT_EXPIRY_HOURS")
                .unwrap_or_else(|_| DEFAULT_JWT_EXPIRY_HOURS.to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("JWT_EXPIRY_HOURS".to_string()))?,
        })
    }
}

impl JudgeConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: env::var("JUDGE_BASE_URL")
                .map_err(|_| ConfigError::Missing("JUDGE_BASE_URL".to_string()))?,
            api_key: env::var("JUDGE_API_KEY")
                .map_err(|_| ConfigError::Missing("JUDGE_API_KEY".to_string()))?,
            callback_base_url: env::var("CALLBACK_BASE_URL")
                .map_err(|_| ConfigError::Missing("CALLBACK_BASE_URL".to_string()))?,
            callback_secret: env::var("CALLBACK_SECRET")
                .map_err(|_| ConfigError::Missing("CALLBACK_SECRET".to_string()))?,
            timeout_secs: env::var("JUDGE_TIMEOUT_SECS")
                .unwrap_or_else(|_| DEFAULT_JUDGE_TIMEOUT_SECS.to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("JUDGE_TIMEOUT_SECS".to_string()))?,
        })
    }
}

impl LimitsConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            submission_rate_limit: env::var("SUBMISSION_RATE_LIMIT")
                .unwrap_or_else(|_| DEFAULT_SUBMISSION_RATE_LIMIT.to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("SUBMISSION_RATE_LIMIT".to_string()))?,
            submission_rate_window_secs: env::var("SUBMISSION_RATE_WINDOW_SECS")
                .unwrap_or_else(|_| DEFAULT_SUBMISSION_RATE_WINDOW_SECS.to_string())
                .parse()
                .map_err(|_| {
                    ConfigError::InvalidValue("SUBMISSION_RATE_WINDOW_SECS".to_string())
                })?,
            max_test_cases: env::var("MAX_TEST_CASES")
                .unwrap_or_else(|_| DEFAULT_MAX_TEST_CASES.to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("MAX_TEST_CASES".to_string()))?,
            max_code_size: env::var("MAX_CODE_SIZE")
                .unwrap_or_else(|_| MAX_SOURCE_CODE_SIZE.to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("MAX_CODE_SIZE".to_string()))?,
            max_assembled_size: env::var("MAX_ASSEMBLED_SIZE")
                .unwrap_or_else(|_| MAX_ASSEMBLED_CODE_SIZE.to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("MAX_ASSEMBLED_SIZE".to_string()))?,
        })
    }
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(String),

    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}
