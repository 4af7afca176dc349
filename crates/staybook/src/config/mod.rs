use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use crate::workflows::packages::{LookupPolicy, RateCalculator, DEFAULT_BASE_RATE};

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

/// Top-level configuration for the booking service.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub pricing: PricingConfig,
    pub billing: BillingConfig,
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

        let default_base_rate = match env::var("APP_DEFAULT_BASE_RATE") {
            Ok(raw) => parse_base_rate(&raw)?,
            Err(_) => DEFAULT_BASE_RATE,
        };

        let package_lookup = match env::var("APP_PACKAGE_LOOKUP") {
            Ok(raw) => LookupPolicy::parse(&raw)
                .map_err(|reason| ConfigError::InvalidLookupPolicy { value: raw, reason })?,
            Err(_) => LookupPolicy::default(),
        };

        let public_sdk_key = env::var("BILLING_PUBLIC_SDK_KEY")
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            pricing: PricingConfig {
                default_base_rate,
                package_lookup,
            },
            billing: BillingConfig { public_sdk_key },
        })
    }
}

fn parse_base_rate(raw: &str) -> Result<f64, ConfigError> {
    match raw.trim().parse::<f64>() {
        Ok(rate) if rate.is_finite() && rate > 0.0 => Ok(rate),
        _ => Err(ConfigError::InvalidBaseRate(raw.to_string())),
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

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Nightly rate fallback and estimate package resolution.
#[derive(Debug, Clone)]
pub struct PricingConfig {
    pub default_base_rate: f64,
    pub package_lookup: LookupPolicy,
}

impl PricingConfig {
    pub fn calculator(&self) -> RateCalculator {
        RateCalculator::new(self.default_base_rate)
    }
}

#[derive(Debug, Clone, Default)]
pub struct BillingConfig {
    pub public_sdk_key: Option<String>,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidBaseRate(String),
    InvalidLookupPolicy { value: String, reason: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidBaseRate(value) => write!(
                f,
                "APP_DEFAULT_BASE_RATE must be a positive amount, got '{value}'"
            ),
            ConfigError::InvalidLookupPolicy { value, reason } => {
                write!(f, "APP_PACKAGE_LOOKUP '{value}' is invalid: {reason}")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidBaseRate(_)
            | ConfigError::InvalidLookupPolicy { .. } => None,
        }
    }
}
