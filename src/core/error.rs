//! Error types and handling for the testbed node.
//!
//! This module defines a unified error type that can represent errors from
//! all domains and the transport, providing consistent error handling
//! across the entire application.

use thiserror::Error;

/// A specialized Result type for node operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the node.
#[derive(Debug, Error)]
pub enum Error {
    /// Error originating from the resources domain.
    #[error("Resource error: {0}")]
    Resource(#[from] crate::domains::resources::ResourceError),

    /// Error originating from the transport layer.
    #[error("Transport error: {0}")]
    Transport(#[from] super::transport::TransportError),

    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a new configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
