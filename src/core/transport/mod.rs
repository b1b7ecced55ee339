//! Transport layer for the node.
//!
//! A minimal CoAP engine: the message codec and a UDP loop that decodes
//! each datagram, dispatches it through the server and sends the reply.
//! There is no retransmission, deduplication or DTLS.

pub mod codec;
mod config;
mod error;
mod service;
pub mod udp;

pub use codec::{Message, MessageType};
pub use config::{DEFAULT_PORT, TransportConfig};
pub use error::{TransportError, TransportResult};
pub use service::TransportService;
pub use udp::UdpTransport;
