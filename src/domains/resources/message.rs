//! Request and response types exchanged between the protocol engine and
//! resource handlers.

use std::fmt;

use bytes::Bytes;
use tracing::warn;

use super::buffer::ResponseBuffer;

/// Request methods a resource can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    /// The CoAP request code (class 0) for this method.
    pub fn code(self) -> u8 {
        match self {
            Self::Get => 0x01,
            Self::Post => 0x02,
            Self::Put => 0x03,
            Self::Delete => 0x04,
        }
    }

    /// Map a CoAP request code back to a method.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0x01 => Some(Self::Get),
            0x02 => Some(Self::Post),
            0x03 => Some(Self::Put),
            0x04 => Some(Self::Delete),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Response codes produced by this layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseCode {
    /// 2.05, success with a body.
    Content,
    /// 4.00
    BadRequest,
    /// 4.04
    NotFound,
    /// 4.05
    MethodNotAllowed,
    /// 5.00
    InternalServerError,
}

impl ResponseCode {
    /// The encoded `c.dd` code byte.
    pub fn code(self) -> u8 {
        match self {
            Self::Content => (2 << 5) | 5,
            Self::BadRequest => 4 << 5,
            Self::NotFound => (4 << 5) | 4,
            Self::MethodNotAllowed => (4 << 5) | 5,
            Self::InternalServerError => 5 << 5,
        }
    }
}

impl fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = self.code();
        write!(f, "{}.{:02}", code >> 5, code & 0x1f)
    }
}

/// Media formats of response payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentFormat {
    TextPlain,
    LinkFormat,
}

impl ContentFormat {
    /// Registered content-format number.
    pub fn id(self) -> u16 {
        match self {
            Self::TextPlain => 0,
            Self::LinkFormat => 40,
        }
    }
}

/// A request as delivered by the protocol engine.
#[derive(Debug, Clone)]
pub struct IncomingRequest {
    pub method: Method,

    /// Uri-Path segments in order.
    pub path: Vec<String>,

    pub message_id: u16,

    /// Opaque correlation token, echoed in the response.
    pub token: Bytes,

    pub payload: Bytes,
}

impl IncomingRequest {
    /// Build a request from a `/`-separated path. Empty segments are dropped.
    pub fn new(method: Method, path: &str) -> Self {
        Self {
            method,
            path: path
                .split('/')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            message_id: 0,
            token: Bytes::new(),
            payload: Bytes::new(),
        }
    }

    pub fn with_payload(mut self, payload: impl Into<Bytes>) -> Self {
        self.payload = payload.into();
        self
    }

    pub fn with_token(mut self, message_id: u16, token: impl Into<Bytes>) -> Self {
        self.message_id = message_id;
        self.token = token.into();
        self
    }

    /// The path rendered as `/seg1/seg2`.
    pub fn path_string(&self) -> String {
        render_path(&self.path)
    }
}

/// Render path segments as `/seg1/seg2`; no segments render as `/`.
pub fn render_path<S: AsRef<str>>(segments: &[S]) -> String {
    if segments.is_empty() {
        return "/".to_string();
    }

    let mut rendered = String::new();
    for segment in segments {
        rendered.push('/');
        rendered.push_str(segment.as_ref());
    }
    rendered
}

/// A response ready to be encoded by the protocol engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingResponse {
    pub status: ResponseCode,
    pub content_format: Option<ContentFormat>,
    pub payload: Bytes,
    pub message_id: u16,
    pub token: Bytes,
}

impl OutgoingResponse {
    /// Body as text, for logging and tests.
    pub fn payload_str(&self) -> &str {
        std::str::from_utf8(&self.payload).unwrap_or("<binary>")
    }
}

/// Wrap a staged payload into a response correlated with `request`.
pub fn make_response(
    request: &IncomingRequest,
    buffer: ResponseBuffer,
    status: ResponseCode,
    content_format: ContentFormat,
) -> OutgoingResponse {
    if buffer.is_truncated() {
        warn!(
            "Response to {} {} truncated to {} bytes",
            request.method,
            request.path_string(),
            buffer.len()
        );
    }

    OutgoingResponse {
        status,
        content_format: Some(content_format),
        payload: buffer.freeze(),
        message_id: request.message_id,
        token: request.token.clone(),
    }
}
