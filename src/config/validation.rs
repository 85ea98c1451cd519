//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the backend origin is an absolute http(s) URL
//! - Validate value ranges (timeouts > 0, addresses parse)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::GatewayConfig;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("backend.origin `{0}` is not an absolute URL")]
    InvalidOrigin(String),

    #[error("backend.origin scheme `{0}` is not http or https")]
    UnsupportedScheme(String),

    #[error("backend.origin must not carry a query or fragment")]
    OriginHasQuery,

    #[error("backend.route_prefix `{0}` must be empty or start with '/' and not end with '/'")]
    InvalidPrefix(String),

    #[error("{field} `{value}` is not a socket address")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}

/// Validate a loaded configuration, collecting every error.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match Url::parse(&config.backend.origin) {
        Ok(url) => {
            if url.scheme() != "http" && url.scheme() != "https" {
                errors.push(ValidationError::UnsupportedScheme(url.scheme().to_string()));
            }
            if url.query().is_some() || url.fragment().is_some() {
                errors.push(ValidationError::OriginHasQuery);
            }
        }
        Err(_) => errors.push(ValidationError::InvalidOrigin(config.backend.origin.clone())),
    }

    let prefix = &config.backend.route_prefix;
    if !prefix.is_empty() && (!prefix.starts_with('/') || prefix.ends_with('/')) {
        errors.push(ValidationError::InvalidPrefix(prefix.clone()));
    }

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if config.timeouts.connect_secs == 0 {
        errors.push(ValidationError::Zero("timeouts.connect_secs"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::Zero("timeouts.request_secs"));
    }
    if config.limits.max_body_bytes == 0 {
        errors.push(ValidationError::Zero("limits.max_body_bytes"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert_eq!(validate_config(&GatewayConfig::default()), Ok(()));
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = GatewayConfig::default();
        config.backend.origin = "backend:3001".to_string();
        config.backend.route_prefix = "api/".to_string();
        config.timeouts.request_secs = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3, "got {:?}", errors);
        assert!(errors.contains(&ValidationError::InvalidPrefix("api/".to_string())));
        assert!(errors.contains(&ValidationError::Zero("timeouts.request_secs")));
    }

    #[test]
    fn test_prefix_forms() {
        let mut config = GatewayConfig::default();
        for ok in ["", "/api", "/storage/v1"] {
            config.backend.route_prefix = ok.to_string();
            assert!(validate_config(&config).is_ok(), "{:?}", ok);
        }
        for bad in ["/", "api", "/api/"] {
            config.backend.route_prefix = bad.to_string();
            assert!(validate_config(&config).is_err(), "{:?}", bad);
        }
    }

    #[test]
    fn test_rejects_non_http_origin() {
        let mut config = GatewayConfig::default();
        config.backend.origin = "ftp://files.local".to_string();
        assert_eq!(
            validate_config(&config),
            Err(vec![ValidationError::UnsupportedScheme("ftp".to_string())])
        );
    }

    #[test]
    fn test_metrics_address_checked_only_when_enabled() {
        let mut config = GatewayConfig::default();
        config.observability.metrics_address = "nowhere".to_string();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        assert!(validate_config(&config).is_err());
    }
}
