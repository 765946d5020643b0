//! Server configuration.
//!
//! Read once at startup, either from a YAML file named by `CONFIG_PATH` or
//! from individual environment variables. `DATABASE_URL` in the environment
//! always wins over the file so secrets can stay out of it.

use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

use crate::error::AppError;

/// Deployment environment. Selects the log format and default level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Developer machine: human-readable debug logs.
    #[default]
    Local,
    /// Shared development: JSON debug logs.
    Dev,
    /// Production: JSON info logs.
    Prod,
}

impl FromStr for Environment {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "local" => Ok(Self::Local),
            "dev" => Ok(Self::Dev),
            "prod" => Ok(Self::Prod),
            other => Err(AppError::Config(format!(
                "unknown environment {other:?}, expected local, dev or prod"
            ))),
        }
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HttpServerConfig {
    /// `host:port` to bind.
    pub address: String,
    /// Upper bound on a single request, in seconds.
    pub timeout_secs: u64,
    /// Grace period for in-flight requests on shutdown, in seconds.
    pub shutdown_timeout_secs: u64,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            address: "0.0.0.0:3000".to_string(),
            timeout_secs: 4,
            shutdown_timeout_secs: 10,
        }
    }
}

impl HttpServerConfig {
    /// Per-request timeout.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Shutdown grace period.
    #[must_use]
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }
}

/// Connection pool settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Maximum pooled connections.
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { max_connections: 10 }
    }
}

/// Complete server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AppConfig {
    /// Deployment environment.
    #[serde(default)]
    pub env: Environment,
    /// `PostgreSQL` connection string.
    #[serde(default)]
    pub database_url: String,
    /// HTTP listener settings.
    #[serde(default)]
    pub http_server: HttpServerConfig,
    /// Connection pool settings.
    #[serde(default)]
    pub database: DatabaseConfig,
}

impl AppConfig {
    /// Loads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the file cannot be read or parsed, a
    /// variable is malformed, or no database URL is configured.
    pub fn load() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration using `lookup` in place of the environment.
    ///
    /// # Errors
    ///
    /// See [`AppConfig::load`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match lookup("CONFIG_PATH") {
            Some(path) => {
                let raw = std::fs::read_to_string(&path).map_err(|e| {
                    AppError::Config(format!("cannot read config file {path}: {e}"))
                })?;
                Self::from_yaml(&raw)?
            }
            None => Self::from_vars(&lookup)?,
        };

        if let Some(url) = lookup("DATABASE_URL") {
            config.database_url = url;
        }
        if config.database_url.trim().is_empty() {
            return Err(AppError::Config(
                "DATABASE_URL environment variable must be set".to_string(),
            ));
        }
        Ok(config)
    }

    /// Parses a YAML document. Missing sections fall back to defaults.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the document is not valid YAML for
    /// this shape.
    pub fn from_yaml(raw: &str) -> Result<Self, AppError> {
        serde_yaml::from_str(raw).map_err(|e| AppError::Config(format!("invalid config file: {e}")))
    }

    fn from_vars<F>(lookup: &F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = lookup("APP_ENV")
            .map(|raw| raw.parse::<Environment>())
            .transpose()?
            .unwrap_or_default();
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port: u16 = parse_var(lookup, "PORT", 3000)?;
        let defaults = HttpServerConfig::default();

        Ok(Self {
            env,
            database_url: String::new(),
            http_server: HttpServerConfig {
                address: format!("{host}:{port}"),
                timeout_secs: parse_var(lookup, "REQUEST_TIMEOUT_SECS", defaults.timeout_secs)?,
                shutdown_timeout_secs: parse_var(
                    lookup,
                    "SHUTDOWN_TIMEOUT_SECS",
                    defaults.shutdown_timeout_secs,
                )?,
            },
            database: DatabaseConfig {
                max_connections: parse_var(
                    lookup,
                    "DATABASE_MAX_CONNECTIONS",
                    DatabaseConfig::default().max_connections,
                )?,
            },
        })
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T, AppError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .parse()
            .map_err(|e| AppError::Config(format!("{key} must be valid: {e}"))),
    }
}
