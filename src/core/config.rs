//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.catalog/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{LevelFilter, debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::api::StoreConfig;
use crate::api::client::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
use crate::core::sort::DEFAULT_SORT_KEY;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub api: ApiConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub log_level: Option<String>,
    pub default_sort_key: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ApiConfig {
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

pub const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Debug;

pub const ENV_API_URL: &str = "CATALOG_API_URL";
pub const ENV_API_TIMEOUT_SECS: &str = "CATALOG_API_TIMEOUT_SECS";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub log_level: LevelFilter,
    pub default_sort_key: String,
}

impl ResolvedConfig {
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            base_url: self.base_url.clone(),
            timeout: self.timeout,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.catalog/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".catalog").join("config.toml"))
}

/// Load config from `~/.catalog/config.toml`, generating a commented default
/// when the file does not exist yet.
pub fn load_config() -> Result<CatalogConfig, ConfigError> {
    let Some(path) = config_path() else {
        warn!("Could not determine home directory, using default config");
        return Ok(CatalogConfig::default());
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(CatalogConfig::default());
    }

    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> Result<CatalogConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let config: CatalogConfig = toml::from_str(&contents)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

fn generate_default_config(path: &Path) {
    let default_content = r#"# Catalog Configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# log_level = "debug"                 # "off", "error", "warn", "info", "debug", "trace"
# default_sort_key = "id"             # id, name, description, price, stock_quantity, inventory_value

# [api]
# base_url = "http://localhost:8080/api"   # Or set CATALOG_API_URL
# timeout_secs = 10                        # Or set CATALOG_API_TIMEOUT_SECS
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config from the process environment.
pub fn resolve(config: &CatalogConfig, cli_api_url: Option<&str>) -> ResolvedConfig {
    resolve_with(config, cli_api_url, |key| std::env::var(key).ok())
}

/// Resolve with an explicit environment lookup.
pub fn resolve_with(
    config: &CatalogConfig,
    cli_api_url: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    // Base URL: CLI → env → config → default
    let base_url = cli_api_url
        .map(str::to_string)
        .or_else(|| env(ENV_API_URL))
        .or_else(|| config.api.base_url.clone())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    // Timeout: env → config → default. Zero would fail every request.
    let timeout = env(ENV_API_TIMEOUT_SECS)
        .and_then(|raw| match raw.trim().parse::<u64>() {
            Ok(0) => {
                warn!("Ignoring {ENV_API_TIMEOUT_SECS}=0, timeout must be positive");
                None
            }
            Ok(secs) => Some(secs),
            Err(e) => {
                warn!("Ignoring {ENV_API_TIMEOUT_SECS}={raw:?}: {e}");
                None
            }
        })
        .or_else(|| match config.api.timeout_secs {
            Some(0) => {
                warn!("Ignoring api.timeout_secs = 0, timeout must be positive");
                None
            }
            secs => secs,
        })
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_TIMEOUT);

    let log_level = config
        .general
        .log_level
        .as_deref()
        .and_then(|level| match level.parse::<LevelFilter>() {
            Ok(level) => Some(level),
            Err(_) => {
                warn!("Unknown log level {level:?}, using {DEFAULT_LOG_LEVEL}");
                None
            }
        })
        .unwrap_or(DEFAULT_LOG_LEVEL);

    ResolvedConfig {
        base_url,
        timeout,
        log_level,
        default_sort_key: config
            .general
            .default_sort_key
            .clone()
            .unwrap_or_else(|| DEFAULT_SORT_KEY.to_string()),
    }
}
