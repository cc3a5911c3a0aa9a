use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::simulator::LimeConfig;

/// Upper bound on perturbations per explanation request.
pub const MAX_LIME_SAMPLES: usize = 50_000;

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
    pub simulator: SimulatorConfig,
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

        let artifact_dir =
            PathBuf::from(env::var("APP_ARTIFACT_DIR").unwrap_or_else(|_| "artifacts".to_string()));

        let lime_samples = env::var("APP_LIME_SAMPLES")
            .unwrap_or_else(|_| "5000".to_string())
            .parse::<usize>()
            .ok()
            .filter(|samples| (1..=MAX_LIME_SAMPLES).contains(samples))
            .ok_or(ConfigError::InvalidLimeSamples)?;

        let lime_seed = env::var("APP_LIME_SEED")
            .unwrap_or_else(|_| "42".to_string())
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidLimeSeed)?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            simulator: SimulatorConfig {
                artifact_dir,
                lime_samples,
                lime_seed,
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

/// Where the model artifacts live and how explanations are sampled.
#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    pub artifact_dir: PathBuf,
    pub lime_samples: usize,
    pub lime_seed: u64,
}

impl SimulatorConfig {
    pub fn lime(&self) -> LimeConfig {
        LimeConfig {
            num_samples: self.lime_samples,
            seed: self.lime_seed,
            ..LimeConfig::default()
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidLimeSamples,
    InvalidLimeSeed,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidLimeSamples => {
                write!(
                    f,
                    "APP_LIME_SAMPLES must be between 1 and {MAX_LIME_SAMPLES}"
                )
            }
            ConfigError::InvalidLimeSeed => write!(f, "APP_LIME_SEED must be a valid u64"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidLimeSamples
            | ConfigError::InvalidLimeSeed => None,
        }
    }
}
