//! Application configuration loading from config.toml
//!
//! The file holds the HTTP server settings and, optionally, the stock the
//! machine starts with. Every section is optional so an empty or missing file
//! yields a working local setup.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Initial stock to seed on first run
    #[serde(default)]
    pub items: Vec<SeedItem>,
}

/// HTTP server settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Origins allowed by the CORS layer
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            cors_origins: vec!["http://localhost:8000".to_string()],
        }
    }
}

/// An item the machine is stocked with when its name is not in the database yet
#[derive(Debug, Clone, Deserialize)]
pub struct SeedItem {
    /// Name of the item
    pub name: String,
    /// Starting quantity
    pub qty: i64,
}

/// Loads configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - A field has the wrong type
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse {}: {e}", path_ref.display()),
    })
}

/// Loads configuration from `SODA_VENDOR_CONFIG` (default `./config.toml`).
///
/// A missing file is not an error: the defaults are used instead.
pub fn load_default_config() -> Result<AppConfig> {
    let path = std::env::var("SODA_VENDOR_CONFIG").unwrap_or_else(|_| "config.toml".to_string());
    if !Path::new(&path).exists() {
        info!("No config file at {path}, using defaults");
        return Ok(AppConfig::default());
    }
    load_config(path)
}
