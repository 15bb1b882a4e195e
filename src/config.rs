//! Configuration management for the PDF export server

use std::env;
use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Value of `APP_ENV` that selects the development launch profile.
pub const DEVELOPMENT_ENV: &str = "development";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid SERVER_PORT {0:?}: expected a number between 0 and 65535")]
    InvalidPort(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub chromium: ChromiumConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct ChromiumConfig {
    /// Deployment environment, read once at startup
    pub environment: Environment,
    /// Explicit production executable, bypasses PATH lookup
    pub executable_override: Option<PathBuf>,
}

/// Process-wide deployment environment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    /// Anything other than `development` is treated as production.
    pub fn from_app_env(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(DEVELOPMENT_ENV) => Environment::Development,
            _ => Environment::Production,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => DEVELOPMENT_ENV,
            Environment::Production => "production",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
            },
            chromium: ChromiumConfig {
                environment: Environment::Production,
                executable_override: None,
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("SERVER_PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort(raw.clone()))?,
            None => 3000,
        };

        Ok(Config {
            server: ServerConfig {
                host: lookup("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                port,
            },
            chromium: ChromiumConfig {
                environment: Environment::from_app_env(lookup("APP_ENV").as_deref()),
                executable_override: lookup("CHROMIUM_EXECUTABLE_PATH")
                    .filter(|path| !path.trim().is_empty())
                    .map(PathBuf::from),
            },
        })
    }
}
