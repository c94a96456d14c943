//! Configuration loader
//!
//! ## Loading Strategy
//! 1. A `.env` file in the working directory is merged into the environment
//! 2. If `PLANSIM_GRAPHQL_URL` is set, configuration comes from the environment
//! 3. Otherwise the first config file found by [`probe_config_paths`] is used
//! 4. With neither, built-in defaults apply
//!
//! Credential variables (`PLANSIM_TOKEN`, `PLANSIM_ADMIN_SECRET`,
//! `PLANSIM_ROLE`) always override whatever the file says.
//!
//! ## Environment Variables
//! - `PLANSIM_GRAPHQL_URL`: GraphQL endpoint (required for env loading)
//! - `PLANSIM_GATEWAY_URL`: gateway base URL used for file uploads
//! - `PLANSIM_TOKEN`: bearer token
//! - `PLANSIM_ADMIN_SECRET`: Hasura admin secret
//! - `PLANSIM_ROLE`: Hasura role
//! - `PLANSIM_HTTP_TIMEOUT`: request timeout in seconds
//! - `PLANSIM_HTTP_MAX_ATTEMPTS`: attempts per request, initial try included
//! - `PLANSIM_POLL_PERIOD`: seconds between simulation polls
//! - `PLANSIM_MAX_POLLS`: poll budget per simulation (unset means unbounded)

use std::path::{Path, PathBuf};
use std::str::FromStr;

use plansim_domain::{ClientConfig, PlanError, Result};

const CONFIG_FILE_NAMES: &[&str] = &["plansim.json", "plansim.toml", "config.json", "config.toml"];

/// Load configuration with automatic fallback strategy.
///
/// # Errors
/// Returns `PlanError::Config` when an environment variable or a discovered
/// file holds an invalid value. A missing source is not an error.
pub fn load() -> Result<ClientConfig> {
    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!(path = %path.display(), "merged .env file into environment");
    }

    if std::env::var_os("PLANSIM_GRAPHQL_URL").is_some() {
        let config = load_from_env()?;
        tracing::info!("configuration loaded from environment variables");
        return Ok(config);
    }

    let config = match probe_config_paths() {
        Some(path) => load_from_file(Some(path))?,
        None => {
            tracing::debug!("no config file found, using defaults");
            ClientConfig::default()
        }
    };

    Ok(apply_env_overrides(config))
}

/// Load configuration from environment variables.
///
/// Only `PLANSIM_GRAPHQL_URL` is required; everything else falls back to
/// the defaults.
///
/// # Errors
/// Returns `PlanError::Config` if the endpoint is missing or a numeric
/// variable does not parse.
pub fn load_from_env() -> Result<ClientConfig> {
    let mut config =
        ClientConfig { graphql_url: env_var("PLANSIM_GRAPHQL_URL")?, ..ClientConfig::default() };

    if let Some(gateway) = env_opt("PLANSIM_GATEWAY_URL") {
        config.gateway_url = gateway;
    }
    if let Some(timeout) = env_parse::<u64>("PLANSIM_HTTP_TIMEOUT")? {
        config.http.timeout_secs = timeout;
    }
    if let Some(attempts) = env_parse::<u32>("PLANSIM_HTTP_MAX_ATTEMPTS")? {
        config.http.max_attempts = attempts;
    }
    if let Some(period) = env_parse::<u64>("PLANSIM_POLL_PERIOD")? {
        config.poll.period_secs = period;
    }
    if let Some(max_polls) = env_parse::<u32>("PLANSIM_MAX_POLLS")? {
        config.poll.max_polls = Some(max_polls);
    }

    Ok(apply_env_overrides(config))
}

/// Overlay credential variables onto an existing configuration.
#[must_use]
pub fn apply_env_overrides(mut config: ClientConfig) -> ClientConfig {
    if let Some(token) = env_opt("PLANSIM_TOKEN") {
        config.auth.token = Some(token);
    }
    if let Some(secret) = env_opt("PLANSIM_ADMIN_SECRET") {
        config.auth.admin_secret = Some(secret);
    }
    if let Some(role) = env_opt("PLANSIM_ROLE") {
        config.auth.role = Some(role);
    }
    config
}

/// Load configuration from a file.
///
/// If `path` is `None`, probes the standard locations.
///
/// # Errors
/// Returns `PlanError::Config` if the file is missing, unreadable or does
/// not parse.
pub fn load_from_file(path: Option<PathBuf>) -> Result<ClientConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(PlanError::Config(format!("config file not found: {}", p.display())));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            PlanError::Config("no config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| PlanError::Config(format!("failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

fn parse_config(contents: &str, path: &Path) -> Result<ClientConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| PlanError::Config(format!("invalid TOML config: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| PlanError::Config(format!("invalid JSON config: {e}"))),
        _ => Err(PlanError::Config(format!("unsupported config format: {extension}"))),
    }
}

/// Probe the working directory, its two parents and the executable's
/// directory for a config file.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut dirs = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        dirs.extend(cwd.ancestors().take(3).map(Path::to_path_buf));
    }

    if let Some(exe_dir) =
        std::env::current_exe().ok().and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        dirs.push(exe_dir);
    }

    dirs.iter()
        .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.is_file())
}

fn env_var(key: &str) -> Result<String> {
    env_opt(key)
        .ok_or_else(|| PlanError::Config(format!("missing required environment variable: {key}")))
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    env_opt(key)
        .map(|raw| raw.parse::<T>().map_err(|e| PlanError::Config(format!("invalid {key}: {e}"))))
        .transpose()
}
