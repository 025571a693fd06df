//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::{GatewayConfig, Mode};

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address `{0}` is not a socket address")]
    BindAddress(String),

    #[error("frontend.dev_origin `{0}` must be an absolute http:// URL")]
    DevOrigin(String),

    #[error("frontend.index_file must not be empty")]
    IndexFile,

    #[error("timeouts.{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("observability.log_format `{0}` must be `text` or `json`")]
    LogFormat(String),

    #[error("observability.metrics_address `{0}` is not a socket address")]
    MetricsAddress(String),
}

/// Check a configuration, collecting every problem.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }

    // The origin is only dialed in dev mode, but a typo should not wait for a mode switch
    let origin_ok = Url::parse(&config.frontend.dev_origin)
        .map(|url| url.scheme() == "http" && url.host_str().is_some())
        .unwrap_or(false);
    if !origin_ok {
        errors.push(ValidationError::DevOrigin(config.frontend.dev_origin.clone()));
    }

    if config.mode == Mode::Prod && config.frontend.index_file.trim().is_empty() {
        errors.push(ValidationError::IndexFile);
    }

    let timeouts = [
        ("connect_secs", config.timeouts.connect_secs),
        ("request_secs", config.timeouts.request_secs),
        ("upstream_secs", config.timeouts.upstream_secs),
    ];
    for (name, value) in timeouts {
        if value == 0 {
            errors.push(ValidationError::ZeroTimeout(name));
        }
    }

    if !matches!(config.observability.log_format.as_str(), "text" | "json") {
        errors.push(ValidationError::LogFormat(config.observability.log_format.clone()));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
