// src/config.rs

use std::{env, fmt, net::SocketAddr};

use dotenvy::dotenv;

/// Two weeks, the usual lifetime of a login cookie.
pub const DEFAULT_SESSION_TTL_SECONDS: i64 = 60 * 60 * 24 * 14;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub rust_log: String,
    pub log_dir: String,
    pub bind_addr: SocketAddr,
    pub session_ttl_seconds: i64,
    pub cors_origins: Vec<String>,
}

/// A configuration variable was present but could not be parsed.
#[derive(Debug)]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid value for {}: '{}'", self.key, self.value)
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();

        Self::from_source(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_source<F>(get: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url =
            get("DATABASE_URL").unwrap_or_else(|| "sqlite://blog.db?mode=rwc".to_string());

        let rust_log = get("RUST_LOG").unwrap_or_else(|| "info".to_string());

        let log_dir = get("LOG_DIR").unwrap_or_else(|| "logs".to_string());

        let bind_addr = match get("BIND_ADDR") {
            Some(raw) => raw.parse().map_err(|_| ConfigError {
                key: "BIND_ADDR",
                value: raw,
            })?,
            None => SocketAddr::from(([0, 0, 0, 0], 3000)),
        };

        let session_ttl_seconds = match get("SESSION_TTL_SECONDS") {
            Some(raw) => match raw.parse::<i64>() {
                Ok(ttl) if ttl > 0 => ttl,
                _ => {
                    return Err(ConfigError {
                        key: "SESSION_TTL_SECONDS",
                        value: raw,
                    });
                }
            },
            None => DEFAULT_SESSION_TTL_SECONDS,
        };

        let cors_origins = get("CORS_ORIGINS")
            .unwrap_or_else(|| "http://localhost:3000,http://127.0.0.1:3000".to_string())
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Self {
            database_url,
            rust_log,
            log_dir,
            bind_addr,
            session_ttl_seconds,
            cors_origins,
        })
    }
}
