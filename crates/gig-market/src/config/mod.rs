use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

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
    pub marketplace: MarketplaceConfig,
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

        let search_limit = match env::var("APP_SEARCH_LIMIT") {
            Ok(raw) => match raw.trim().parse::<usize>() {
                Ok(limit) if limit > 0 => limit,
                _ => return Err(ConfigError::InvalidSearchLimit(raw)),
            },
            Err(_) => MarketplaceConfig::DEFAULT_SEARCH_LIMIT,
        };

        let job_expiry_days = match env::var("APP_JOB_EXPIRY_DAYS") {
            Ok(raw) => match raw.trim().parse::<i64>() {
                Ok(days) if (1..=MarketplaceConfig::MAX_JOB_EXPIRY_DAYS).contains(&days) => days,
                _ => return Err(ConfigError::InvalidJobExpiry(raw)),
            },
            Err(_) => MarketplaceConfig::DEFAULT_JOB_EXPIRY_DAYS,
        };

        let seed_demo_data = env::var("APP_SEED_DEMO")
            .map(|raw| !matches!(raw.trim().to_ascii_lowercase().as_str(), "0" | "false" | "no"))
            .unwrap_or(true);

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            marketplace: MarketplaceConfig {
                search_limit,
                job_expiry_days,
                seed_demo_data,
            },
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

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Knobs for worker search and job posting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketplaceConfig {
    /// Maximum number of workers returned by a skill search.
    pub search_limit: usize,
    /// Days a newly posted job stays open before it is closed automatically.
    pub job_expiry_days: i64,
    pub seed_demo_data: bool,
}

impl MarketplaceConfig {
    pub const DEFAULT_SEARCH_LIMIT: usize = 3;
    pub const DEFAULT_JOB_EXPIRY_DAYS: i64 = 30;
    pub const MAX_JOB_EXPIRY_DAYS: i64 = 3650;
}

impl Default for MarketplaceConfig {
    fn default() -> Self {
        Self {
            search_limit: Self::DEFAULT_SEARCH_LIMIT,
            job_expiry_days: Self::DEFAULT_JOB_EXPIRY_DAYS,
            seed_demo_data: true,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidSearchLimit(String),
    InvalidJobExpiry(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidSearchLimit(raw) => {
                write!(f, "APP_SEARCH_LIMIT must be a positive integer (got '{raw}')")
            }
            ConfigError::InvalidJobExpiry(raw) => {
                write!(
                    f,
                    "APP_JOB_EXPIRY_DAYS must be between 1 and {} (got '{raw}')",
                    MarketplaceConfig::MAX_JOB_EXPIRY_DAYS
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidSearchLimit(_)
            | ConfigError::InvalidJobExpiry(_) => None,
        }
    }
}
