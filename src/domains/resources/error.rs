//! Resource-specific error types.

use thiserror::Error;

use super::message::Method;

/// Errors that can occur during resource operations.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// No resource is registered under the requested path.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// The path exists but is not bound to the requested method.
    #[error("Method {method} not allowed on {path}")]
    MethodNotAllowed { method: Method, path: String },

    /// A descriptor failed validation when the table was built.
    #[error("Invalid descriptor: {0}")]
    InvalidDescriptor(String),

    /// Two descriptors share the same method and path.
    #[error("Duplicate resource: {method} {path}")]
    Duplicate { method: Method, path: String },

    /// A link-format document could not be parsed.
    #[error("Invalid link-format: {0}")]
    InvalidLinkFormat(String),

    /// A copy did not fit into its destination buffer.
    #[error("Buffer overflow: needed {needed} bytes, {available} available")]
    BufferOverflow { needed: usize, available: usize },
}

impl ResourceError {
    /// Create a new "not found" error.
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound(path.into())
    }

    /// Create a new "method not allowed" error.
    pub fn method_not_allowed(method: Method, path: impl Into<String>) -> Self {
        Self::MethodNotAllowed {
            method,
            path: path.into(),
        }
    }

    /// Create a new "invalid descriptor" error.
    pub fn invalid_descriptor(msg: impl Into<String>) -> Self {
        Self::InvalidDescriptor(msg.into())
    }

    /// Create a new "invalid link-format" error.
    pub fn invalid_link_format(msg: impl Into<String>) -> Self {
        Self::InvalidLinkFormat(msg.into())
    }
}
