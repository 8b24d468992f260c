//! Application configuration.
//!
//! Configuration is read from environment variables exactly once at process
//! start and handed to the server as an explicit value. Business logic never
//! reads ambient environment state; everything it needs travels inside
//! [`AppConfig`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors raised during startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is absent. The process must not start
    /// without it.
    #[error("missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server configuration
    pub server: ServerConfig,

    /// Token signing and lifetime settings
    pub auth: AuthConfig,

    /// Password hashing parameters
    pub hashing: HashingConfig,

    /// Optional admin account seeded at startup
    pub admin: Option<AdminBootstrap>,
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Allowed CORS origins; empty means permissive (development)
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            cors_origins: Vec::new(),
        }
    }
}

/// Token signing configuration.
///
/// The secret has no default: issuing identity tokens with a known key would
/// make every deployment forgeable, so startup fails without it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HMAC secret for token signing
    pub jwt_secret: String,
    /// Access token lifetime in seconds (default: 3600 = 1 hour)
    pub token_ttl_secs: u64,
    /// Token issuer identifier
    pub issuer: String,
}

/// Argon2id cost parameters.
///
/// Defaults follow the OWASP interactive-login profile. Raising memory or
/// iterations increases resistance to offline attack at the cost of login
/// latency; the dial is exposed so operators can pick their tradeoff.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HashingConfig {
    /// Memory cost in KiB (default: 19456 = 19 MiB)
    pub memory_cost: u32,
    /// Iteration count (default: 2)
    pub time_cost: u32,
    /// Lanes (default: 1)
    pub parallelism: u32,
}

impl Default for HashingConfig {
    fn default() -> Self {
        Self {
            memory_cost: 19_456,
            time_cost: 2,
            parallelism: 1,
        }
    }
}

/// Credentials for the admin account created at startup when no admin
/// exists yet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminBootstrap {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub address: String,
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Fails if `EVENTLY_JWT_SECRET` is not set; every other setting has a
    /// default.
    pub fn from_env() -> Result<Self, ConfigError> {
        let jwt_secret =
            std::env::var("EVENTLY_JWT_SECRET").map_err(|_| ConfigError::MissingVar("EVENTLY_JWT_SECRET"))?;

        let mut server = ServerConfig::default();
        if let Ok(host) = std::env::var("API_HOST") {
            server.host = host;
        }
        if let Ok(port) = std::env::var("API_PORT") {
            server.port = port.parse().map_err(|_| ConfigError::InvalidValue {
                key: "API_PORT",
                value: port,
            })?;
        }
        if let Ok(origins) = std::env::var("CORS_ORIGINS") {
            server.cors_origins = origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        let auth = AuthConfig {
            jwt_secret,
            token_ttl_secs: parse_env("EVENTLY_TOKEN_TTL_SECS")?.unwrap_or(3600),
            issuer: std::env::var("EVENTLY_JWT_ISSUER").unwrap_or_else(|_| "evently-api".to_string()),
        };

        let defaults = HashingConfig::default();
        let hashing = HashingConfig {
            memory_cost: parse_env("EVENTLY_ARGON2_MEMORY_KIB")?.unwrap_or(defaults.memory_cost),
            time_cost: parse_env("EVENTLY_ARGON2_TIME_COST")?.unwrap_or(defaults.time_cost),
            parallelism: parse_env("EVENTLY_ARGON2_PARALLELISM")?.unwrap_or(defaults.parallelism),
        };

        let admin = match (
            std::env::var("EVENTLY_ADMIN_EMAIL"),
            std::env::var("EVENTLY_ADMIN_PASSWORD"),
        ) {
            (Ok(email), Ok(password)) => Some(AdminBootstrap {
                email,
                password,
                first_name: std::env::var("EVENTLY_ADMIN_FIRST_NAME")
                    .unwrap_or_else(|_| "System".to_string()),
                last_name: std::env::var("EVENTLY_ADMIN_LAST_NAME")
                    .unwrap_or_else(|_| "Administrator".to_string()),
                phone: std::env::var("EVENTLY_ADMIN_PHONE")
                    .unwrap_or_else(|_| "+639171234567".to_string()),
                address: std::env::var("EVENTLY_ADMIN_ADDRESS")
                    .unwrap_or_else(|_| "Head Office".to_string()),
            }),
            _ => None,
        };

        Ok(Self {
            server,
            auth,
            hashing,
            admin,
        })
    }

    /// Configuration suitable for tests: fixed secret, light hashing.
    pub fn for_testing() -> Self {
        Self {
            server: ServerConfig::default(),
            auth: AuthConfig {
                jwt_secret: "test-signing-secret".to_string(),
                token_ttl_secs: 3600,
                issuer: "evently-api".to_string(),
            },
            hashing: HashingConfig {
                memory_cost: 1024,
                time_cost: 1,
                parallelism: 1,
            },
            admin: None,
        }
    }
}

fn parse_env<T: std::str::FromStr>(key: &'static str) -> Result<Option<T>, ConfigError> {
    match std::env::var(key) {
        Ok(value) => value
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { key, value }),
        Err(_) => Ok(None),
    }
}
