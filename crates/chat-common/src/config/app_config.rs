//! Application configuration
//!
//! Loaded from environment variables (and a `.env` file when present).

use serde::Deserialize;
use std::env;
use std::str::FromStr;
use std::time::Duration;

use chat_core::{DEFAULT_ACTIVE_WINDOW_MS, DEFAULT_RETENTION_WINDOW_MS};

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub api: ServerConfig,
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub jwt: JwtConfig,
    pub rate_limit: RateLimitConfig,
    pub cors: CorsConfig,
    pub snowflake: SnowflakeConfig,
    pub presence: PresenceConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default)]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "production" => Some(Self::Production),
            "staging" => Some(Self::Staging),
            "development" => Some(Self::Development),
            _ => None,
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Redis configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    pub url: String,
    #[serde(default = "default_redis_max_connections")]
    pub max_connections: u32,
}

/// JWT verification configuration
///
/// Tokens are issued by the identity provider; this service only verifies
/// them (and mints short-lived ones for tests).
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry: i64,
}

/// Rate limiting configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,
    #[serde(default = "default_burst")]
    pub burst: u32,
}

/// CORS configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

/// Snowflake ID generator configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SnowflakeConfig {
    #[serde(default)]
    pub worker_id: u16,
}

/// Typing presence windows and sweep schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PresenceConfig {
    /// A typing record counts as active for this long after its last signal
    #[serde(default = "default_active_window_ms")]
    pub active_window_ms: i64,
    /// Records older than this are deleted by the sweep
    #[serde(default = "default_retention_window_ms")]
    pub retention_window_ms: i64,
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

impl Default for PresenceConfig {
    fn default() -> Self {
        Self {
            active_window_ms: default_active_window_ms(),
            retention_window_ms: default_retention_window_ms(),
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

impl PresenceConfig {
    /// Check window ordering and positivity
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidValue`] for a non-positive window, a
    /// zero sweep interval, or a retention window shorter than the active one.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.active_window_ms <= 0 {
            return Err(ConfigError::InvalidValue(
                "TYPING_ACTIVE_WINDOW_MS",
                "must be positive".to_string(),
            ));
        }
        if self.retention_window_ms < self.active_window_ms {
            return Err(ConfigError::InvalidValue(
                "TYPING_RETENTION_MS",
                format!(
                    "{} is shorter than the active window ({})",
                    self.retention_window_ms, self.active_window_ms
                ),
            ));
        }
        if self.sweep_interval_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "TYPING_SWEEP_INTERVAL_SECS",
                "must be positive".to_string(),
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

// Default value functions
fn default_app_name() -> String {
    "chat-presence".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    5
}

fn default_redis_max_connections() -> u32 {
    10
}

fn default_access_token_expiry() -> i64 {
    900 // 15 minutes
}

fn default_requests_per_second() -> u32 {
    10
}

fn default_burst() -> u32 {
    50
}

fn default_active_window_ms() -> i64 {
    DEFAULT_ACTIVE_WINDOW_MS
}

fn default_retention_window_ms() -> i64 {
    DEFAULT_RETENTION_WINDOW_MS
}

fn default_sweep_interval_secs() -> u64 {
    300 // 5 minutes
}

/// Reads variables through `lookup`, so tests can supply a map instead of
/// the process environment.
struct VarSource<F> {
    lookup: F,
}

impl<F> VarSource<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn required(&self, key: &'static str) -> Result<String, ConfigError> {
        (self.lookup)(key).ok_or(ConfigError::MissingVar(key))
    }

    fn or_else(&self, key: &str, default: impl FnOnce() -> String) -> String {
        (self.lookup)(key).unwrap_or_else(default)
    }

    /// Missing → default; present but unparsable → error
    fn parsed<T: FromStr>(
        &self,
        key: &'static str,
        default: impl FnOnce() -> T,
    ) -> Result<T, ConfigError> {
        match (self.lookup)(key) {
            None => Ok(default()),
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue(key, raw)),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing or
    /// a value cannot be parsed
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    ///
    /// # Errors
    /// Same as [`AppConfig::from_env`]
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = VarSource { lookup };

        let port_raw = vars.required("API_PORT")?;
        let port = port_raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue("API_PORT", port_raw))?;

        let presence = PresenceConfig {
            active_window_ms: vars.parsed("TYPING_ACTIVE_WINDOW_MS", default_active_window_ms)?,
            retention_window_ms: vars.parsed("TYPING_RETENTION_MS", default_retention_window_ms)?,
            sweep_interval_secs: vars
                .parsed("TYPING_SWEEP_INTERVAL_SECS", default_sweep_interval_secs)?,
        };
        presence.validate()?;

        Ok(Self {
            app: AppSettings {
                name: vars.or_else("APP_NAME", default_app_name),
                env: (vars.lookup)("APP_ENV")
                    .as_deref()
                    .and_then(Environment::parse)
                    .unwrap_or_default(),
            },
            api: ServerConfig {
                host: vars.or_else("API_HOST", default_host),
                port,
            },
            database: DatabaseConfig {
                url: vars.required("DATABASE_URL")?,
                max_connections: vars.parsed("DATABASE_MAX_CONNECTIONS", default_max_connections)?,
                min_connections: vars.parsed("DATABASE_MIN_CONNECTIONS", default_min_connections)?,
            },
            redis: RedisConfig {
                url: vars.required("REDIS_URL")?,
                max_connections: vars
                    .parsed("REDIS_MAX_CONNECTIONS", default_redis_max_connections)?,
            },
            jwt: JwtConfig {
                secret: vars.required("JWT_SECRET")?,
                access_token_expiry: vars
                    .parsed("JWT_ACCESS_TOKEN_EXPIRY", default_access_token_expiry)?,
            },
            rate_limit: RateLimitConfig {
                requests_per_second: vars
                    .parsed("RATE_LIMIT_REQUESTS_PER_SECOND", default_requests_per_second)?,
                burst: vars.parsed("RATE_LIMIT_BURST", default_burst)?,
            },
            cors: CorsConfig {
                allowed_origins: vars
                    .or_else("CORS_ALLOWED_ORIGINS", String::new)
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect(),
            },
            snowflake: SnowflakeConfig {
                worker_id: vars.parsed("WORKER_ID", || 0)?,
            },
            presence,
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
