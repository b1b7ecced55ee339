//! CoAP message codec (RFC 7252 section 3).
//!
//! Only what the node needs is interpreted: Uri-Path on requests and
//! Content-Format on responses. Other options are carried through opaquely.

use bytes::{BufMut, Bytes, BytesMut};

use super::{TransportError, TransportResult};
use crate::domains::resources::{IncomingRequest, Method, OutgoingResponse, ResponseCode};

pub const COAP_VERSION: u8 = 1;
pub const PAYLOAD_MARKER: u8 = 0xFF;
pub const MAX_TOKEN_LEN: usize = 8;

pub const OPTION_URI_PATH: u16 = 11;
pub const OPTION_CONTENT_FORMAT: u16 = 12;

/// The four CoAP message types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Confirmable,
    NonConfirmable,
    Acknowledgement,
    Reset,
}

impl MessageType {
    fn bits(self) -> u8 {
        match self {
            Self::Confirmable => 0,
            Self::NonConfirmable => 1,
            Self::Acknowledgement => 2,
            Self::Reset => 3,
        }
    }

    fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0 => Self::Confirmable,
            1 => Self::NonConfirmable,
            2 => Self::Acknowledgement,
            _ => Self::Reset,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoapOption {
    pub number: u16,
    pub value: Bytes,
}

/// A decoded CoAP message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub message_type: MessageType,

    /// Code byte, `class << 5 | detail`.
    pub code: u8,

    pub message_id: u16,
    pub token: Bytes,

    /// Options in ascending number order.
    pub options: Vec<CoapOption>,

    pub payload: Bytes,
}

impl Message {
    /// An empty message (code 0.00), used for RST and bare ACK.
    pub fn empty(message_type: MessageType, message_id: u16) -> Self {
        Self {
            message_type,
            code: 0,
            message_id,
            token: Bytes::new(),
            options: Vec::new(),
            payload: Bytes::new(),
        }
    }

    /// A request message for `method` on the `/`-separated `path`.
    pub fn request(
        message_type: MessageType,
        method: Method,
        path: &str,
        message_id: u16,
        token: impl Into<Bytes>,
    ) -> Self {
        let options = path
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|segment| CoapOption {
                number: OPTION_URI_PATH,
                value: Bytes::copy_from_slice(segment.as_bytes()),
            })
            .collect();

        Self {
            message_type,
            code: method.code(),
            message_id,
            token: token.into(),
            options,
            payload: Bytes::new(),
        }
    }

    /// Encode a handler response.
    pub fn response(
        message_type: MessageType,
        message_id: u16,
        response: &OutgoingResponse,
    ) -> Self {
        let options = response
            .content_format
            .map(|format| CoapOption {
                number: OPTION_CONTENT_FORMAT,
                value: encode_uint(format.id()),
            })
            .into_iter()
            .collect();

        Self {
            message_type,
            code: response.status.code(),
            message_id,
            token: response.token.clone(),
            options,
            payload: response.payload.clone(),
        }
    }

    /// A body-less response carrying only `status`.
    pub fn status(
        message_type: MessageType,
        message_id: u16,
        token: Bytes,
        status: ResponseCode,
    ) -> Self {
        Self {
            message_type,
            code: status.code(),
            message_id,
            token,
            options: Vec::new(),
            payload: Bytes::new(),
        }
    }

    pub fn with_payload(mut self, payload: impl Into<Bytes>) -> Self {
        self.payload = payload.into();
        self
    }

    /// Code 0.00.
    pub fn is_empty(&self) -> bool {
        self.code == 0
    }

    /// Class 0 with a non-zero detail.
    pub fn is_request(&self) -> bool {
        self.code >> 5 == 0 && self.code != 0
    }

    /// Values of all options numbered `number`, in order.
    pub fn option_values(&self, number: u16) -> impl Iterator<Item = &Bytes> {
        self.options
            .iter()
            .filter(move |option| option.number == number)
            .map(|option| &option.value)
    }

    /// Content-Format option value, if present.
    pub fn content_format(&self) -> Option<u16> {
        self.option_values(OPTION_CONTENT_FORMAT)
            .next()
            .map(|value| value.iter().fold(0u16, |acc, b| (acc << 8) | u16::from(*b)))
    }

    /// Turn a request message into the form handlers consume.
    pub fn to_request(&self) -> TransportResult<IncomingRequest> {
        let method = Method::from_code(self.code).ok_or_else(|| {
            TransportError::codec(format!("unsupported method code {:#04x}", self.code))
        })?;

        let path = self
            .option_values(OPTION_URI_PATH)
            .map(|value| {
                std::str::from_utf8(value)
                    .map(str::to_string)
                    .map_err(|_| TransportError::codec("Uri-Path is not valid UTF-8"))
            })
            .collect::<TransportResult<Vec<_>>>()?;

        Ok(IncomingRequest {
            method,
            path,
            message_id: self.message_id,
            token: self.token.clone(),
            payload: self.payload.clone(),
        })
    }

    /// Parse a datagram.
    pub fn decode(datagram: &[u8]) -> TransportResult<Self> {
        if datagram.len() < 4 {
            return Err(TransportError::codec("datagram shorter than header"));
        }

        let version = datagram[0] >> 6;
        if version != COAP_VERSION {
            return Err(TransportError::codec(format!("unsupported version {}", version)));
        }

        let message_type = MessageType::from_bits(datagram[0] >> 4);
        let token_len = usize::from(datagram[0] & 0x0F);
        if token_len > MAX_TOKEN_LEN {
            return Err(TransportError::codec(format!("token length {}", token_len)));
        }

        let code = datagram[1];
        let message_id = u16::from_be_bytes([datagram[2], datagram[3]]);

        let mut pos = 4;
        let token = take(datagram, &mut pos, token_len)?;

        let mut options = Vec::new();
        let mut number: u16 = 0;
        let mut payload = Bytes::new();

        while pos < datagram.len() {
            let header = datagram[pos];
            pos += 1;

            if header == PAYLOAD_MARKER {
                if pos == datagram.len() {
                    return Err(TransportError::codec("payload marker without payload"));
                }
                payload = Bytes::copy_from_slice(&datagram[pos..]);
                break;
            }

            let delta = read_extended(header >> 4, datagram, &mut pos)?;
            let length = read_extended(header & 0x0F, datagram, &mut pos)?;

            number = u16::try_from(u32::from(number) + delta)
                .map_err(|_| TransportError::codec("option number overflow"))?;
            let value = take(datagram, &mut pos, length as usize)?;
            options.push(CoapOption { number, value });
        }

        Ok(Self {
            message_type,
            code,
            message_id,
            token,
            options,
            payload,
        })
    }

    /// Serialize to a datagram.
    pub fn encode(&self) -> TransportResult<Bytes> {
        if self.token.len() > MAX_TOKEN_LEN {
            return Err(TransportError::codec(format!(
                "token length {}",
                self.token.len()
            )));
        }

        let mut out = BytesMut::with_capacity(4 + self.token.len() + self.payload.len() + 16);
        out.put_u8((COAP_VERSION << 6) | (self.message_type.bits() << 4) | self.token.len() as u8);
        out.put_u8(self.code);
        out.put_u16(self.message_id);
        out.put_slice(&self.token);

        let mut options: Vec<&CoapOption> = self.options.iter().collect();
        options.sort_by_key(|option| option.number);

        let mut previous = 0u16;
        for option in options {
            let (delta_nibble, delta_ext) = split_extended(usize::from(option.number - previous))?;
            let (len_nibble, len_ext) = split_extended(option.value.len())?;
            out.put_u8((delta_nibble << 4) | len_nibble);
            out.put_slice(&delta_ext);
            out.put_slice(&len_ext);
            out.put_slice(&option.value);
            previous = option.number;
        }

        if !self.payload.is_empty() {
            out.put_u8(PAYLOAD_MARKER);
            out.put_slice(&self.payload);
        }

        Ok(out.freeze())
    }
}

fn take(datagram: &[u8], pos: &mut usize, len: usize) -> TransportResult<Bytes> {
    let end = pos
        .checked_add(len)
        .filter(|end| *end <= datagram.len())
        .ok_or_else(|| TransportError::codec("message truncated"))?;
    let value = Bytes::copy_from_slice(&datagram[*pos..end]);
    *pos = end;
    Ok(value)
}

fn read_extended(nibble: u8, datagram: &[u8], pos: &mut usize) -> TransportResult<u32> {
    match nibble {
        0..=12 => Ok(u32::from(nibble)),
        13 => {
            let ext = take(datagram, pos, 1)?;
            Ok(u32::from(ext[0]) + 13)
        }
        14 => {
            let ext = take(datagram, pos, 2)?;
            Ok(u32::from(u16::from_be_bytes([ext[0], ext[1]])) + 269)
        }
        _ => Err(TransportError::codec("reserved option nibble 15")),
    }
}

/// Largest option delta or length the extended encoding can carry.
const MAX_EXTENDED: usize = 65535 + 269;

fn split_extended(value: usize) -> TransportResult<(u8, Vec<u8>)> {
    if value < 13 {
        Ok((value as u8, Vec::new()))
    } else if value < 269 {
        Ok((13, vec![(value - 13) as u8]))
    } else if value <= MAX_EXTENDED {
        Ok((14, ((value - 269) as u16).to_be_bytes().to_vec()))
    } else {
        Err(TransportError::codec(format!(
            "option field {} exceeds {}",
            value, MAX_EXTENDED
        )))
    }
}

/// Minimal-length big-endian unsigned integer option value.
fn encode_uint(value: u16) -> Bytes {
    let bytes = value.to_be_bytes();
    let first = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
    Bytes::copy_from_slice(&bytes[first..])
}
