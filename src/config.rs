//! Application configuration
//!
//! Centralized configuration management with environment variable support
//! and sensible defaults. Read once at startup and injected into `AppState`.

use crate::services::pagination::DEFAULT_PER_PAGE;
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while reading configuration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is absent or empty
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    /// A variable is present but could not be parsed
    #[error("Invalid value for {name}: {value:?}")]
    Invalid {
        /// Variable name
        name: &'static str,
        /// Raw value
        value: String,
    },
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,
    /// Shared secret clients present as a bearer token
    pub api_key: ApiKey,
    /// Workbook source configuration
    pub source: SourceConfig,
    /// Rows per page for every paginated endpoint
    pub per_page: usize,
    /// Requests allowed per client per hour; 0 disables limiting
    pub rate_limit_per_hour: u32,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to bind the server to
    pub port: u16,
    /// Host address to bind to
    pub host: String,
}

/// Workbook source configuration
#[derive(Debug, Clone)]
pub struct SourceConfig {
    /// Directory holding the workbook files
    pub data_dir: PathBuf,
    /// Workbook served on the fixed data route
    pub data_file: String,
    /// Sheet served on the fixed data route; first sheet when unset
    pub data_sheet: Option<String>,
    /// Path of the fixed data route
    pub data_route: String,
    /// When the fixed source is decoded
    pub mode: SourceMode,
}

/// When the fixed source is decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceMode {
    /// Decode on every request; always fresh, pays decode cost per request
    #[default]
    Lazy,
    /// Decode once at startup; fast, but serves the startup snapshot
    Eager,
}

impl FromStr for SourceMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lazy" => Ok(SourceMode::Lazy),
            "eager" => Ok(SourceMode::Eager),
            _ => Err(()),
        }
    }
}

/// The shared API secret; `Debug` never prints it
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wrap a secret
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Raw secret
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("API_KEY")
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::Missing("API_KEY"))?;

        let mut data_route = lookup("DATA_ROUTE").unwrap_or_else(|| "/data".to_string());
        if !data_route.starts_with('/') {
            data_route.insert(0, '/');
        }
        if is_reserved_route(&data_route) {
            return Err(ConfigError::Invalid {
                name: "DATA_ROUTE",
                value: data_route,
            });
        }

        let per_page = parse_or("PER_PAGE", &lookup, DEFAULT_PER_PAGE)?;
        if per_page == 0 {
            return Err(ConfigError::Invalid {
                name: "PER_PAGE",
                value: "0".to_string(),
            });
        }

        Ok(Self {
            server: ServerConfig {
                port: parse_or("PORT", &lookup, 5000)?,
                host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            },
            api_key: ApiKey::new(api_key),
            source: SourceConfig {
                data_dir: PathBuf::from(lookup("DATA_DIR").unwrap_or_else(|| "data".to_string())),
                data_file: lookup("DATA_FILE")
                    .unwrap_or_else(|| "CustomerOrders.xlsx".to_string()),
                data_sheet: lookup("DATA_SHEET").filter(|sheet| !sheet.is_empty()),
                data_route,
                mode: parse_or("SOURCE_MODE", &lookup, SourceMode::default())?,
            },
            per_page,
            rate_limit_per_hour: parse_or("RATE_LIMIT_PER_HOUR", &lookup, 100)?,
        })
    }

    /// Get the server address as a string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// Paths already served by the fixed routes
fn is_reserved_route(route: &str) -> bool {
    matches!(route, "/" | "/files" | "/health" | "/file")
        || route.starts_with("/file/")
        || route.contains(['?', '#', ':', '*'])
}

fn parse_or<T, F>(name: &'static str, lookup: &F, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
            name,
            value: raw,
        }),
    }
}
