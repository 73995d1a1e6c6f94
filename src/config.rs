/// Service configuration loader - parses service.toml
///
/// Keeps the listen address, worker count, and debug flag out of the
/// code so a deployment can retune them without recompiling. The
/// database connection string deliberately does NOT live here — it
/// carries credentials and comes from DATABASE_URL (see `db`).

use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Root configuration structure for TOML parsing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub server: ServerConfig,
}

/// HTTP server settings from the `[server]` table.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address.
    pub host: String,
    /// Listen port.
    pub port: u16,
    /// Request handler threads. Queries still serialize on the single
    /// database connection; workers overlap parsing and response writes.
    pub workers: usize,
    /// Log a line per request.
    pub debug: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            workers: 4,
            debug: false,
        }
    }
}

impl ServerConfig {
    /// The address string handed to the HTTP server.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Loads configuration from `path`. A missing file yields the built-in
/// defaults, since the service runs fine without tuning.
///
/// # Panics
/// Panics if the file exists but cannot be read or parsed. This is
/// intentional — a present-but-broken configuration is an operator
/// error that should not be papered over with defaults.
pub fn load_config(path: &str) -> ServiceConfig {
    if !Path::new(path).exists() {
        return ServiceConfig::default();
    }

    let contents =
        fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {}: {}", path, e));

    toml::from_str(&contents).unwrap_or_else(|e| panic!("Failed to parse {}: {}", path, e))
}
