//! Resources domain module.
//!
//! This module holds the node's addressable resources: the method/path
//! table, the link-format discovery document, and one handler per resource.
//!
//! ## Architecture
//!
//! - `definitions/` - Individual resource definitions (one file per resource)
//! - `registry.rs` - Central resource registration, fixes table order
//! - `table.rs` - Validated, immutable descriptor table
//! - `service.rs` - Dispatch from request to handler
//! - `discovery.rs` - `/.well-known/core` document
//! - `link_format.rs` - Gateway-side reading of discovery documents
//!
//! ## Adding a New Resource
//!
//! 1. Create a new file in `definitions/` (e.g., `my_resource.rs`)
//! 2. Implement the `ResourceDefinition` trait
//! 3. Export in `definitions/mod.rs`
//! 4. Register in `registry.rs`
//!
//! **No need to modify `service.rs`!**

mod buffer;
pub mod definitions;
mod discovery;
mod error;
pub mod link_format;
mod message;
mod registry;
mod service;
mod table;

pub use buffer::{MAX_RESPONSE_LEN, ResponseBuffer};
pub use definitions::{HandlerContext, HandlerFn, LedCommand, ResourceDefinition};
pub use discovery::{generate_discovery_document, write_discovery_document};
pub use error::ResourceError;
pub use link_format::{DeviceServices, Link, ServiceKind, parse_link_format};
pub use message::{
    ContentFormat, IncomingRequest, Method, OutgoingResponse, ResponseCode, make_response,
};
pub use registry::{build_table, get_all_resources, resource_paths};
pub use service::ResourceService;
pub use table::{ResourceDescriptor, ResourceTable};
