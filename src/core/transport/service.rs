//! Transport service - binds the configured transport and runs it.

use tracing::info;

use super::udp::UdpTransport;
use super::{TransportConfig, TransportResult};
use crate::core::CoapServer;

/// Transport service - manages the transport layer for the node.
pub struct TransportService {
    config: TransportConfig,
}

impl TransportService {
    /// Create a new transport service with the given configuration.
    pub fn new(config: TransportConfig) -> Self {
        Self { config }
    }

    /// Get the transport configuration.
    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    /// Log information about the configured transport.
    pub fn log_info(&self) {
        info!("Starting transport: {}", self.config.description());
    }

    /// Start the transport with the given server.
    ///
    /// This method blocks until the transport fails.
    pub async fn run(self, server: CoapServer) -> TransportResult<()> {
        self.log_info();
        UdpTransport::bind(&self.config).await?.run(server).await
    }
}
