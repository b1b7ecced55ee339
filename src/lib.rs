//! Testbed Node Library
//!
//! This crate provides the CoAP resource layer of a constrained testbed
//! node: a fixed table of resources, a link-format discovery document and
//! one handler per resource, plus a minimal UDP engine to serve them.
//!
//! # Architecture
//!
//! - **core**: Configuration, error handling, the server and the transport
//! - **domains**: Business logic organized by bounded contexts
//!   - **resources**: Resource table, discovery and handlers
//!   - **hardware**: LED and temperature sensor collaborators
//!
//! # Example
//!
//! ```rust,no_run
//! use testbed_node::core::{CoapServer, Config, TransportService};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let server = CoapServer::new(config.clone())?;
//!     TransportService::new(config.transport).run(server).await?;
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{CoapServer, Config, Error, Result};
