//! Node server and lifecycle management.
//!
//! `CoapServer` ties the configuration, the hardware handles and the
//! resource service together. Transports hold a clone and call `handle`
//! for each decoded request.

use std::sync::Arc;

use tracing::info;

use super::config::Config;
use super::error::Result;
use crate::domains::hardware::Hardware;
use crate::domains::resources::{
    IncomingRequest, OutgoingResponse, ResourceError, ResourceService,
};

/// The node's request handler, cheap to clone.
#[derive(Debug, Clone)]
pub struct CoapServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Service for dispatching resource requests.
    resource_service: Arc<ResourceService>,
}

impl CoapServer {
    /// Create a server with simulated hardware built from `config`.
    pub fn new(config: Config) -> Result<Self> {
        let hardware = Hardware::simulated(config.board.name.clone(), config.sensor.celsius);
        Self::with_hardware(config, hardware)
    }

    /// Create a server driving the given hardware.
    pub fn with_hardware(config: Config, hardware: Hardware) -> Result<Self> {
        info!("Board: {}", hardware.board);
        let resource_service = Arc::new(ResourceService::new(hardware)?);

        Ok(Self {
            config: Arc::new(config),
            resource_service,
        })
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    pub fn resources(&self) -> &ResourceService {
        &self.resource_service
    }

    /// Dispatch one request.
    pub fn handle(
        &self,
        request: &IncomingRequest,
    ) -> std::result::Result<OutgoingResponse, ResourceError> {
        self.resource_service.dispatch(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::resources::Method;

    #[test]
    fn test_server_uses_configured_board() {
        let mut config = Config::default();
        config.board.name = "iotlab-m3".to_string();
        config.sensor.celsius = 19;
        let server = CoapServer::new(config).unwrap();

        let board = server
            .handle(&IncomingRequest::new(Method::Get, "riot/board"))
            .unwrap();
        assert_eq!(board.payload_str(), "iotlab-m3");

        let temperature = server
            .handle(&IncomingRequest::new(Method::Get, "sensor/temperature"))
            .unwrap();
        assert_eq!(temperature.payload_str(), "19C");
    }

    #[test]
    fn test_server_metadata() {
        let server = CoapServer::new(Config::default()).unwrap();
        assert_eq!(server.name(), "testbed-node");
        assert_eq!(server.version(), env!("CARGO_PKG_VERSION"));
        assert_eq!(server.resources().table().len(), 4);
    }
}
