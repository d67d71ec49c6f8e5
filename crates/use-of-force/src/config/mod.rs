use std::env;
use std::net::{IpAddr, SocketAddr};

use chrono::NaiveDateTime;

use crate::validation::ValidationPolicy;

/// Format accepted by `APP_FIXED_NOW` and the CLI `--now` flag.
pub const FIXED_NOW_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub clock: ClockConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let clock = match env::var("APP_FIXED_NOW") {
            Ok(value) if !value.trim().is_empty() => ClockConfig::fixed_from_str(&value)?,
            _ => ClockConfig::System,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            clock,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Clock consulted by date rules such as "not in the future".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClockConfig {
    #[default]
    System,
    Fixed(NaiveDateTime),
}

impl ClockConfig {
    pub fn fixed_from_str(value: &str) -> Result<Self, ConfigError> {
        NaiveDateTime::parse_from_str(value.trim(), FIXED_NOW_FORMAT)
            .map(ClockConfig::Fixed)
            .map_err(|source| ConfigError::InvalidFixedNow {
                value: value.to_string(),
                source,
            })
    }

    /// Policy for one submission, read from the clock at call time.
    pub fn policy(&self) -> ValidationPolicy {
        match self {
            ClockConfig::System => ValidationPolicy::current(),
            ClockConfig::Fixed(now) => ValidationPolicy::at(*now),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("APP_PORT must be a valid u16")]
    InvalidPort,
    #[error("APP_HOST must parse to an IPv4 or IPv6 address")]
    InvalidHost {
        #[source]
        source: std::net::AddrParseError,
    },
    #[error("APP_FIXED_NOW '{value}' must look like 2019-01-15T10:00")]
    InvalidFixedNow {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}
