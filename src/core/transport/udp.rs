//! UDP transport implementation.
//!
//! One datagram is decoded, dispatched and answered before the next is
//! read. Confirmable requests get a piggybacked ACK; non-confirmable
//! requests get a NON reply with a fresh message id.

use std::net::SocketAddr;

use tokio::net::UdpSocket;
use tracing::{debug, info, warn};

use super::codec::{Message, MessageType};
use super::{TransportConfig, TransportError, TransportResult};
use crate::core::CoapServer;
use crate::domains::resources::{Method, ResourceError, ResponseCode};

/// Largest datagram the node accepts. Anything longer is dropped.
pub const MAX_DATAGRAM_LEN: usize = 1152;

/// UDP transport handler.
pub struct UdpTransport {
    socket: UdpSocket,
    next_message_id: u16,
}

impl UdpTransport {
    /// Bind the socket described by `config`.
    pub async fn bind(config: &TransportConfig) -> TransportResult<Self> {
        let addr = config.address();
        let socket = UdpSocket::bind(&addr)
            .await
            .map_err(|e| TransportError::bind(&addr, e))?;

        Ok(Self {
            socket,
            next_message_id: 1,
        })
    }

    /// The address actually bound, useful when the configured port is `0`.
    pub fn local_addr(&self) -> TransportResult<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }

    /// Serve requests until the socket fails.
    pub async fn run(mut self, server: CoapServer) -> TransportResult<()> {
        info!("Ready - listening on {} (CoAP over UDP)", self.local_addr()?);

        // One spare byte so a datagram the kernel cut short is seen as oversized.
        let mut datagram = vec![0u8; MAX_DATAGRAM_LEN + 1];
        loop {
            let (len, peer) = match self.socket.recv_from(&mut datagram).await {
                Ok(received) => received,
                Err(e) => {
                    warn!("Failed to receive datagram: {}", e);
                    tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
                    continue;
                }
            };

            let Some(reply) = self.process(&server, &datagram[..len]) else {
                continue;
            };

            match reply.encode() {
                Ok(bytes) => {
                    if let Err(e) = self.socket.send_to(&bytes, peer).await {
                        warn!("Failed to reply to {}: {}", peer, e);
                    }
                }
                Err(e) => warn!("Failed to encode reply to {}: {}", peer, e),
            }
        }
    }

    /// Decide the reply to one datagram, if any.
    pub fn process(&mut self, server: &CoapServer, datagram: &[u8]) -> Option<Message> {
        if datagram.len() > MAX_DATAGRAM_LEN {
            warn!(
                "Dropping datagram longer than {} bytes",
                MAX_DATAGRAM_LEN
            );
            return None;
        }

        let message = match Message::decode(datagram) {
            Ok(message) => message,
            Err(e) => {
                warn!("Dropping malformed datagram: {}", e);
                return None;
            }
        };

        let reply_type = match message.message_type {
            MessageType::Confirmable => MessageType::Acknowledgement,
            MessageType::NonConfirmable => MessageType::NonConfirmable,
            MessageType::Acknowledgement | MessageType::Reset => {
                debug!("Ignoring {:?} {}", message.message_type, message.message_id);
                return None;
            }
        };

        if message.is_empty() {
            // CoAP ping
            return (message.message_type == MessageType::Confirmable)
                .then(|| Message::empty(MessageType::Reset, message.message_id));
        }

        if !message.is_request() {
            debug!("Ignoring non-request code {:#04x}", message.code);
            return None;
        }

        let reply_id = match reply_type {
            MessageType::Acknowledgement => message.message_id,
            _ => self.allocate_message_id(),
        };

        let request = match message.to_request() {
            Ok(request) => request,
            Err(e) => {
                debug!("Rejecting request: {}", e);
                let status = if Method::from_code(message.code).is_none() {
                    ResponseCode::MethodNotAllowed
                } else {
                    ResponseCode::BadRequest
                };
                return Some(Message::status(
                    reply_type,
                    reply_id,
                    message.token.clone(),
                    status,
                ));
            }
        };

        match server.handle(&request) {
            Ok(response) => Some(Message::response(reply_type, reply_id, &response)),
            Err(e) => {
                debug!("No handler: {}", e);
                Some(Message::status(
                    reply_type,
                    reply_id,
                    message.token.clone(),
                    status_for(&e),
                ))
            }
        }
    }

    fn allocate_message_id(&mut self) -> u16 {
        let id = self.next_message_id;
        self.next_message_id = self.next_message_id.wrapping_add(1);
        id
    }
}

fn status_for(error: &ResourceError) -> ResponseCode {
    match error {
        ResourceError::NotFound(_) => ResponseCode::NotFound,
        ResourceError::MethodNotAllowed { .. } => ResponseCode::MethodNotAllowed,
        _ => ResponseCode::InternalServerError,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Config;
    use crate::core::transport::codec::CoapOption;
    use crate::domains::hardware::{
        Hardware, LedState, SimulatedLed, StaticTemperatureSensor,
    };
    use bytes::Bytes;
    use std::sync::Arc;

    fn server() -> CoapServer {
        CoapServer::new(Config::default()).unwrap()
    }

    fn transport() -> UdpTransport {
        tokio_test::block_on(UdpTransport::bind(&TransportConfig::udp("127.0.0.1", 0))).unwrap()
    }

    /// PUT `/actuator/led` of 1652 bytes whose bytes 1150..1152 are `ON`,
    /// padded with a Size1 option so a cut at 1152 leaves payload `ON`.
    fn oversized_led_put() -> Bytes {
        let mut request = Message::request(
            MessageType::Confirmable,
            Method::Put,
            "actuator/led",
            1,
            Bytes::new(),
        )
        .with_payload(format!("ON{}", "Z".repeat(500)));
        request.options.push(CoapOption {
            number: 60,
            value: Bytes::from(vec![0u8; 1128]),
        });

        let datagram = request.encode().unwrap();
        assert_eq!(datagram.len(), 1652);
        assert_eq!(&datagram[1150..1152], b"ON");
        datagram
    }

    fn exchange(transport: &mut UdpTransport, request: Message) -> Option<Message> {
        transport.process(&server(), &request.encode().unwrap())
    }

    #[test]
    fn test_confirmable_get_is_piggybacked() {
        let mut transport = transport();
        let request = Message::request(
            MessageType::Confirmable,
            Method::Get,
            "sensor/temperature",
            0x0a0b,
            Bytes::from_static(b"\x42"),
        );

        let reply = exchange(&mut transport, request).unwrap();
        assert_eq!(reply.message_type, MessageType::Acknowledgement);
        assert_eq!(reply.message_id, 0x0a0b);
        assert_eq!(&reply.token[..], b"\x42");
        assert_eq!(reply.code, ResponseCode::Content.code());
        assert_eq!(reply.content_format(), Some(0));
        assert_eq!(&reply.payload[..], b"21C");
    }

    #[test]
    fn test_non_confirmable_gets_fresh_id() {
        let mut transport = transport();
        let request = Message::request(
            MessageType::NonConfirmable,
            Method::Put,
            "actuator/led",
            500,
            Bytes::new(),
        )
        .with_payload("OFF");

        let first = exchange(&mut transport, request.clone()).unwrap();
        let second = exchange(&mut transport, request).unwrap();
        assert_eq!(first.message_type, MessageType::NonConfirmable);
        assert_ne!(first.message_id, second.message_id);
        assert_eq!(&first.payload[..], b"LED is OFF");
    }

    #[test]
    fn test_unknown_path_and_method() {
        let mut transport = transport();

        let missing = Message::request(
            MessageType::Confirmable,
            Method::Get,
            "sensor/light",
            1,
            Bytes::new(),
        );
        let reply = exchange(&mut transport, missing).unwrap();
        assert_eq!(reply.code, ResponseCode::NotFound.code());
        assert!(reply.payload.is_empty());

        let wrong_method = Message::request(
            MessageType::Confirmable,
            Method::Delete,
            "actuator/led",
            2,
            Bytes::new(),
        );
        let reply = exchange(&mut transport, wrong_method).unwrap();
        assert_eq!(reply.code, ResponseCode::MethodNotAllowed.code());
    }

    #[test]
    fn test_ping_and_noise() {
        let mut transport = transport();
        let server = server();

        let ping = Message::empty(MessageType::Confirmable, 99).encode().unwrap();
        let reply = transport.process(&server, &ping).unwrap();
        assert_eq!(reply.message_type, MessageType::Reset);
        assert_eq!(reply.message_id, 99);

        let ack = Message::empty(MessageType::Acknowledgement, 3).encode().unwrap();
        assert!(transport.process(&server, &ack).is_none());

        assert!(transport.process(&server, &[0xde, 0xad]).is_none());
    }

    #[test]
    fn test_oversized_datagram_is_dropped() {
        let mut transport = transport();
        let datagram = oversized_led_put();

        assert!(
            transport
                .process(&server(), &datagram[..MAX_DATAGRAM_LEN + 1])
                .is_none()
        );
        assert!(transport.process(&server(), &datagram).is_none());
    }

    #[tokio::test]
    async fn test_cut_short_datagram_does_not_switch_led() {
        let led = Arc::new(SimulatedLed::new());
        let hardware = Hardware::new(
            "native",
            led.clone(),
            Arc::new(StaticTemperatureSensor::default()),
        );
        let server = CoapServer::with_hardware(Config::default(), hardware).unwrap();

        let transport = UdpTransport::bind(&TransportConfig::udp("127.0.0.1", 0))
            .await
            .unwrap();
        let addr = transport.local_addr().unwrap();
        let handle = tokio::spawn(transport.run(server));

        let client = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        client.send_to(&oversized_led_put(), addr).await.unwrap();

        let follow_up = Message::request(
            MessageType::Confirmable,
            Method::Get,
            "sensor/temperature",
            2,
            Bytes::new(),
        );
        client
            .send_to(&follow_up.encode().unwrap(), addr)
            .await
            .unwrap();

        let mut buf = vec![0u8; MAX_DATAGRAM_LEN];
        let (len, _) = tokio::time::timeout(
            tokio::time::Duration::from_secs(5),
            client.recv_from(&mut buf),
        )
        .await
        .unwrap()
        .unwrap();
        let reply = Message::decode(&buf[..len]).unwrap();

        // The first reply answers the follow-up; the oversized PUT got none.
        assert_eq!(reply.message_id, 2);
        assert_eq!(&reply.payload[..], b"21C");
        assert_eq!(led.state(), LedState::Off);

        handle.abort();
    }

    #[tokio::test]
    async fn test_discovery_over_socket() {
        let transport = UdpTransport::bind(&TransportConfig::udp("127.0.0.1", 0))
            .await
            .unwrap();
        let addr = transport.local_addr().unwrap();
        let handle = tokio::spawn(transport.run(server()));

        let client = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let request = Message::request(
            MessageType::Confirmable,
            Method::Get,
            ".well-known/core",
            7,
            Bytes::from_static(b"\x01\x02"),
        );
        client
            .send_to(&request.encode().unwrap(), addr)
            .await
            .unwrap();

        let mut buf = vec![0u8; MAX_DATAGRAM_LEN];
        let (len, _) = tokio::time::timeout(
            tokio::time::Duration::from_secs(5),
            client.recv_from(&mut buf),
        )
        .await
        .unwrap()
        .unwrap();
        let reply = Message::decode(&buf[..len]).unwrap();

        assert_eq!(reply.message_id, 7);
        assert_eq!(reply.content_format(), Some(40));
        assert_eq!(
            std::str::from_utf8(&reply.payload).unwrap(),
            "</.well-known/core>;ct=40,</riot/board>;ct=0,\
             </sensor/temperature>;ct=0,</actuator/led>;ct=0"
        );

        handle.abort();
    }
}
