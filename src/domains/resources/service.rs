//! Resource service implementation.
//!
//! The ResourceService owns the resource table and the hardware handles and
//! dispatches requests to the bound handler.
//!
//! Resources are defined in `definitions/` and registered via `registry.rs`.
//! Adding a new resource does NOT require modifying this file.

use std::sync::Arc;

use tracing::{debug, info, instrument};

use super::buffer::ResponseBuffer;
use super::definitions::HandlerContext;
use super::error::ResourceError;
use super::message::{IncomingRequest, OutgoingResponse};
use super::registry::build_table;
use super::table::ResourceTable;
use crate::domains::hardware::Hardware;

/// Service for dispatching requests into the resource table.
///
/// Each dispatch stages its reply in its own `ResponseBuffer`, so a single
/// service can be shared across tasks.
#[derive(Debug)]
pub struct ResourceService {
    table: Arc<ResourceTable>,
    hardware: Hardware,
}

impl ResourceService {
    /// Create a service over the registered resources.
    pub fn new(hardware: Hardware) -> Result<Self, ResourceError> {
        info!("Initializing ResourceService");
        Ok(Self::with_table(build_table()?, hardware))
    }

    /// Create a service over an explicit table.
    pub fn with_table(table: ResourceTable, hardware: Hardware) -> Self {
        for descriptor in &table {
            info!(
                "Registering resource: {} {}",
                descriptor.method,
                descriptor.path_string()
            );
        }

        Self {
            table: Arc::new(table),
            hardware,
        }
    }

    pub fn table(&self) -> &Arc<ResourceTable> {
        &self.table
    }

    /// Route `request` to its handler.
    ///
    /// Fails only when no descriptor matches; handlers themselves always
    /// produce a response.
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path_string()))]
    pub fn dispatch(&self, request: &IncomingRequest) -> Result<OutgoingResponse, ResourceError> {
        let descriptor = self.table.lookup(request.method, &request.path)?;

        let ctx = HandlerContext {
            table: &self.table,
            hardware: &self.hardware,
        };
        let response = (descriptor.handler)(&ctx, request, ResponseBuffer::new());

        debug!(
            "Replied {} with {} bytes",
            response.status,
            response.payload.len()
        );
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::hardware::{LedState, SimulatedLed, StaticTemperatureSensor};
    use crate::domains::resources::message::{Method, ResponseCode};

    fn service() -> (ResourceService, Arc<SimulatedLed>) {
        let led = Arc::new(SimulatedLed::new());
        let hardware = Hardware::new(
            "native",
            led.clone(),
            Arc::new(StaticTemperatureSensor::new(23)),
        );
        (ResourceService::new(hardware).unwrap(), led)
    }

    #[test]
    fn test_dispatch_to_each_resource() {
        let (service, led) = service();

        let board = service
            .dispatch(&IncomingRequest::new(Method::Get, "riot/board"))
            .unwrap();
        assert_eq!(board.payload_str(), "native");

        let temperature = service
            .dispatch(&IncomingRequest::new(Method::Get, "sensor/temperature"))
            .unwrap();
        assert_eq!(temperature.payload_str(), "23C");

        let switched = service
            .dispatch(&IncomingRequest::new(Method::Put, "actuator/led").with_payload("ON"))
            .unwrap();
        assert_eq!(switched.payload_str(), "LED is ON");
        assert_eq!(led.state(), LedState::On);

        let discovery = service
            .dispatch(&IncomingRequest::new(Method::Get, ".well-known/core"))
            .unwrap();
        assert!(discovery.payload_str().starts_with("</.well-known/core>;ct=40,"));
    }

    #[test]
    fn test_dispatch_unknown_path() {
        let (service, _) = service();
        let result = service.dispatch(&IncomingRequest::new(Method::Get, "sensor/humidity"));
        assert!(matches!(result, Err(ResourceError::NotFound(_))));
    }

    #[test]
    fn test_dispatch_wrong_method() {
        let (service, led) = service();
        let result =
            service.dispatch(&IncomingRequest::new(Method::Get, "actuator/led").with_payload("ON"));
        assert!(matches!(result, Err(ResourceError::MethodNotAllowed { .. })));
        assert_eq!(led.state(), LedState::Off);
    }

    #[test]
    fn test_buffers_do_not_leak_between_requests() {
        let (service, _) = service();
        let first = service
            .dispatch(&IncomingRequest::new(Method::Get, ".well-known/core"))
            .unwrap();
        let second = service
            .dispatch(&IncomingRequest::new(Method::Get, "sensor/temperature"))
            .unwrap();
        assert!(first.payload.len() > second.payload.len());
        assert_eq!(second.payload_str(), "23C");
        assert_eq!(second.status, ResponseCode::Content);
    }

    #[test]
    fn test_response_echoes_token() {
        let (service, _) = service();
        let request =
            IncomingRequest::new(Method::Get, "riot/board").with_token(77, &b"\x01\x02\x03"[..]);
        let response = service.dispatch(&request).unwrap();
        assert_eq!(response.message_id, 77);
        assert_eq!(&response.token[..], b"\x01\x02\x03");
    }
}
