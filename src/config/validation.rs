//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, segment bound > 0, status codes)
//! - Check every configured route would be accepted by the route table
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RouterConfig → Result<(), Vec<ValidationError>>

use std::net::SocketAddr;

use axum::http::Method;
use thiserror::Error;

use crate::config::schema::RouterConfig;
use crate::routing::{Pattern, RouteError, Segmenter};

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: invalid socket address {value:?}")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },

    #[error("route {index}: invalid method {method:?}")]
    InvalidMethod { index: usize, method: String },

    #[error("route {index}: path {path:?} rejected: {source}")]
    InvalidPath {
        index: usize,
        path: String,
        source: RouteError,
    },

    #[error("route {index}: status {status} outside 100..=599")]
    InvalidStatus { index: usize, status: u16 },
}

/// Validate `config`, collecting every problem found.
pub fn validate_config(config: &RouterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

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
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::Zero {
            field: "timeouts.request_secs",
        });
    }
    if config.routing.max_segments == 0 {
        errors.push(ValidationError::Zero {
            field: "routing.max_segments",
        });
    }

    let segmenter = Segmenter::new(config.routing.max_segments);
    for (index, route) in config.routes.iter().enumerate() {
        if route.method.parse::<Method>().is_err() {
            errors.push(ValidationError::InvalidMethod {
                index,
                method: route.method.clone(),
            });
        }
        if let Err(source) = Pattern::parse(&route.path, &segmenter, ()) {
            errors.push(ValidationError::InvalidPath {
                index,
                path: route.path.clone(),
                source,
            });
        }
        if !(100..600).contains(&route.status) {
            errors.push(ValidationError::InvalidStatus {
                index,
                status: route.status,
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
