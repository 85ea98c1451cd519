//! Configuration loading from disk and the environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::GatewayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable overriding `backend.origin`.
pub const ENV_BACKEND_URL: &str = "BACKEND_URL";
/// Environment variable overriding `listener.bind_address`.
pub const ENV_BIND_ADDRESS: &str = "BIND_ADDRESS";
/// Environment variable overriding `observability.log_level`.
pub const ENV_LOG_LEVEL: &str = "LOG_LEVEL";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration.
///
/// Starts from defaults, layers the TOML file at `path` when given, then the
/// process environment (a `.env` file is honoured).
pub fn load_config(path: Option<&Path>) -> Result<GatewayConfig, ConfigError> {
    let config = match path {
        Some(path) => parse_file(path)?,
        None => GatewayConfig::default(),
    };

    finalize(apply_env_overrides(config, |key| dotenvy::var(key).ok()))
}

/// Parse a TOML file without validating it.
pub fn parse_file(path: &Path) -> Result<GatewayConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Apply environment overrides using `lookup` to resolve variables.
pub fn apply_env_overrides<F>(mut config: GatewayConfig, lookup: F) -> GatewayConfig
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

    if let Some(origin) = non_empty(ENV_BACKEND_URL) {
        config.backend.origin = origin;
    }
    if let Some(addr) = non_empty(ENV_BIND_ADDRESS) {
        config.listener.bind_address = addr;
    }
    if let Some(level) = non_empty(ENV_LOG_LEVEL) {
        config.observability.log_level = level;
    }
    config
}

/// Normalise and validate a config, freezing it for use.
pub fn finalize(mut config: GatewayConfig) -> Result<GatewayConfig, ConfigError> {
    let origin = config.backend.origin.trim().trim_end_matches('/').to_string();
    config.backend.origin = origin;

    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}
