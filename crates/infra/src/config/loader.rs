//! Configuration loader
//!
//! Loads client settings from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If credentials are missing there, falls back to a config file
//! 3. Probes several paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `ARMORY_CLIENT_ID`: OAuth client id (required)
//! - `ARMORY_CLIENT_SECRET`: OAuth client secret (required)
//! - `ARMORY_REGION`: Service region, defaults to `us`
//! - `ARMORY_LOCALE`: Response locale, defaults to `en_US`
//! - `ARMORY_TOKEN_CACHE`: Token cache file path
//! - `ARMORY_MAX_CONCURRENCY`: Batch concurrency bound
//! - `ARMORY_API_BASE_URL`: Game-data base URL override
//! - `ARMORY_AUTH_URL`: Token endpoint override
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./armory.toml` or `./armory.json` (current working directory)
//! 2. `./config.toml` or `./config.json` (current working directory)
//! 3. The same names next to the executable

use std::path::{Path, PathBuf};

use armory_domain::{ArmoryError, ClientConfig, ClientSettings, Result};

use crate::errors::InfraError;

const CONFIG_FILE_NAMES: &[&str] = &["armory.toml", "armory.json", "config.toml", "config.json"];

/// Load and validate configuration with automatic fallback strategy
///
/// # Errors
/// Returns `ArmoryError::Config` if no source yields settings, a file is
/// malformed, or the region/locale is not recognized.
pub fn load() -> Result<ClientConfig> {
    ClientConfig::try_from(load_settings()?)
}

/// Load raw settings, environment first and a config file second
///
/// # Errors
/// Returns `ArmoryError::Config` if neither source yields settings.
pub fn load_settings() -> Result<ClientSettings> {
    match load_from_env() {
        Ok(settings) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(settings)
        }
        Err(e) => {
            tracing::debug!(error = %e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load settings from environment variables
///
/// # Errors
/// Returns `ArmoryError::Config` if the credentials are missing or a numeric
/// variable does not parse.
pub fn load_from_env() -> Result<ClientSettings> {
    let client_id = env_var("ARMORY_CLIENT_ID")?;
    let client_secret = env_var("ARMORY_CLIENT_SECRET")?;

    let max_concurrency = optional_env("ARMORY_MAX_CONCURRENCY")
        .map(|s| {
            s.parse::<usize>()
                .map_err(|e| ArmoryError::Config(format!("Invalid max concurrency: {}", e)))
        })
        .transpose()?;

    Ok(ClientSettings {
        client_id,
        client_secret,
        region: optional_env("ARMORY_REGION").unwrap_or_else(|| "us".to_string()),
        locale: optional_env("ARMORY_LOCALE").unwrap_or_else(|| "en_US".to_string()),
        api_base_url: optional_env("ARMORY_API_BASE_URL"),
        auth_url: optional_env("ARMORY_AUTH_URL"),
        token_cache_path: optional_env("ARMORY_TOKEN_CACHE").map(PathBuf::from),
        request_timeout_secs: None,
        retry_attempts: None,
        max_concurrency,
        token_safety_margin_secs: None,
    })
}

/// Load settings from a file
///
/// If `path` is `None`, probes the standard locations via
/// [`probe_config_paths`]. The format follows the file extension.
///
/// # Errors
/// Returns `ArmoryError::Config` if the file is missing, unreadable or
/// malformed.
pub fn load_from_file(path: Option<PathBuf>) -> Result<ClientSettings> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(ArmoryError::Config(format!("Config file not found: {}", p.display())));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            ArmoryError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| ArmoryError::Config(format!("Failed to read config file: {}", e)))?;

    parse_settings(&contents, &config_path)
}

fn parse_settings(contents: &str, path: &Path) -> Result<ClientSettings> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents).map_err(|e| ArmoryError::from(InfraError::from(e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| ArmoryError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(ArmoryError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// First existing config file among the standard locations
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut dirs = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd);
    }
    if let Some(exe_dir) =
        std::env::current_exe().ok().and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        dirs.push(exe_dir);
    }

    dirs.iter()
        .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.exists())
}

/// Get required environment variable
fn env_var(key: &str) -> Result<String> {
    optional_env(key).ok_or_else(|| {
        ArmoryError::Config(format!("Missing required environment variable: {}", key))
    })
}

/// Non-empty environment variable, if set
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
