//! Resource definitions module.
//!
//! Each resource is defined in its own file with:
//! - method, path and discovery attribute
//! - the handler that stages its response
//!
//! ## Adding a New Resource
//!
//! 1. Create a new file (e.g., `my_resource.rs`)
//! 2. Implement the `ResourceDefinition` trait
//! 3. Export it here
//! 4. Register in `registry.rs`

mod actuator_led;
mod riot_board;
mod sensor_temperature;
mod well_known_core;

pub use actuator_led::{ActuatorLedResource, LedCommand};
pub use riot_board::RiotBoardResource;
pub use sensor_temperature::SensorTemperatureResource;
pub use well_known_core::WellKnownCoreResource;

use super::buffer::ResponseBuffer;
use super::message::{IncomingRequest, Method, OutgoingResponse};
use super::table::ResourceTable;
use crate::domains::hardware::Hardware;

/// Everything a handler may read while serving a request.
#[derive(Debug, Clone, Copy)]
pub struct HandlerContext<'a> {
    /// The table the request was dispatched from.
    pub table: &'a ResourceTable,

    pub hardware: &'a Hardware,
}

/// Handler contract: request and a fresh buffer in, response out.
pub type HandlerFn =
    for<'a> fn(&HandlerContext<'a>, &IncomingRequest, ResponseBuffer) -> OutgoingResponse;

/// Trait for resource definitions.
///
/// Each resource must implement this trait to provide its binding and handler.
pub trait ResourceDefinition {
    /// The method this resource answers.
    const METHOD: Method;

    /// Path segments, e.g. `&["sensor", "temperature"]`.
    const PATH: &'static [&'static str];

    /// Link-format attribute advertised by discovery, if any.
    const ATTRIBUTE: Option<&'static str>;

    /// Serve one request.
    fn handle(
        ctx: &HandlerContext<'_>,
        request: &IncomingRequest,
        buffer: ResponseBuffer,
    ) -> OutgoingResponse;
}
