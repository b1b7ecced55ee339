//! `/actuator/led` control resource.

use tracing::debug;

use super::{HandlerContext, ResourceDefinition};
use crate::domains::hardware::LedState;
use crate::domains::resources::buffer::{MAX_RESPONSE_LEN, ResponseBuffer};
use crate::domains::resources::message::{
    ContentFormat, IncomingRequest, Method, OutgoingResponse, ResponseCode, make_response,
};

/// A command accepted by the LED resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedCommand {
    Switch(LedState),
    Unknown,
}

impl LedCommand {
    /// Exact, case-sensitive match on the raw payload.
    pub fn parse(payload: &[u8]) -> Self {
        match payload {
            b"ON" => Self::Switch(LedState::On),
            b"OFF" => Self::Switch(LedState::Off),
            _ => Self::Unknown,
        }
    }

    pub fn reply(self) -> &'static str {
        match self {
            Self::Switch(LedState::On) => "LED is ON",
            Self::Switch(LedState::Off) => "LED is OFF",
            Self::Unknown => "Unknown command",
        }
    }
}

/// Switches the LED according to the request payload.
///
/// Unrecognised commands still get a 2.05 reply; the body says what happened.
pub struct ActuatorLedResource;

impl ResourceDefinition for ActuatorLedResource {
    const METHOD: Method = Method::Put;
    const PATH: &'static [&'static str] = &["actuator", "led"];
    const ATTRIBUTE: Option<&'static str> = Some("ct=0");

    fn handle(
        ctx: &HandlerContext<'_>,
        request: &IncomingRequest,
        mut buffer: ResponseBuffer,
    ) -> OutgoingResponse {
        let mut staging = ResponseBuffer::with_capacity(MAX_RESPONSE_LEN);
        let command = match staging.try_extend(&request.payload) {
            Ok(()) => LedCommand::parse(staging.as_bytes()),
            Err(e) => {
                debug!("Rejecting LED command: {}", e);
                LedCommand::Unknown
            }
        };

        if let LedCommand::Switch(state) = command {
            ctx.hardware.led.set(state);
        }

        buffer.push_str(command.reply());
        make_response(
            request,
            buffer,
            ResponseCode::Content,
            ContentFormat::TextPlain,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::hardware::{Hardware, Led, StaticTemperatureSensor};
    use crate::domains::resources::table::ResourceTable;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct RecordingLed {
        calls: Mutex<Vec<LedState>>,
    }

    impl Led for RecordingLed {
        fn set(&self, state: LedState) {
            self.calls.lock().unwrap().push(state);
        }
    }

    fn serve(payload: &[u8]) -> (OutgoingResponse, Vec<LedState>) {
        let led = Arc::new(RecordingLed::default());
        let hardware = Hardware::new(
            "native",
            led.clone(),
            Arc::new(StaticTemperatureSensor::default()),
        );
        let table = ResourceTable::new(vec![]).unwrap();
        let ctx = HandlerContext {
            table: &table,
            hardware: &hardware,
        };
        let request =
            IncomingRequest::new(Method::Put, "actuator/led").with_payload(payload.to_vec());

        let response = ActuatorLedResource::handle(&ctx, &request, ResponseBuffer::new());
        let calls = led.calls.lock().unwrap().clone();
        (response, calls)
    }

    #[test]
    fn test_on_switches_led() {
        let (response, calls) = serve(b"ON");
        assert_eq!(response.payload_str(), "LED is ON");
        assert_eq!(calls, vec![LedState::On]);
        assert_eq!(response.status, ResponseCode::Content);
        assert_eq!(response.content_format, Some(ContentFormat::TextPlain));
    }

    #[test]
    fn test_off_switches_led() {
        let (response, calls) = serve(b"OFF");
        assert_eq!(response.payload_str(), "LED is OFF");
        assert_eq!(calls, vec![LedState::Off]);
    }

    #[test]
    fn test_unknown_commands_leave_led_alone() {
        for payload in [&b"on"[..], b"toggle", b"", b"ON ", b"ON\0"] {
            let (response, calls) = serve(payload);
            assert_eq!(response.payload_str(), "Unknown command");
            assert_eq!(response.status, ResponseCode::Content);
            assert!(calls.is_empty());
        }
    }

    #[test]
    fn test_oversized_payload_is_rejected() {
        for len in [MAX_RESPONSE_LEN - 1, MAX_RESPONSE_LEN, MAX_RESPONSE_LEN * 4] {
            let mut payload = b"ON".to_vec();
            payload.resize(len, b' ');
            let (response, calls) = serve(&payload);
            assert_eq!(response.payload_str(), "Unknown command");
            assert!(calls.is_empty());
        }
    }

    #[test]
    fn test_parse_is_exact() {
        assert_eq!(LedCommand::parse(b"ON"), LedCommand::Switch(LedState::On));
        assert_eq!(LedCommand::parse(b"OFF"), LedCommand::Switch(LedState::Off));
        assert_eq!(LedCommand::parse(b"Off"), LedCommand::Unknown);
    }
}
