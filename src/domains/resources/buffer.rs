//! Bounded staging buffer for response payloads.
//!
//! Every request gets its own `ResponseBuffer`, so handlers never observe
//! content left behind by a previous request and concurrent dispatch needs
//! no locking.

use bytes::{Bytes, BytesMut};

use super::error::ResourceError;

/// Maximum size of a staged response, terminator byte included.
pub const MAX_RESPONSE_LEN: usize = 500;

/// Fixed-capacity byte buffer used to stage an outgoing payload.
///
/// One byte of the capacity is reserved for a terminator, so at most
/// `capacity - 1` bytes of payload are ever stored. Writes past that limit
/// are cut short and the buffer remembers that it truncated.
#[derive(Debug)]
pub struct ResponseBuffer {
    data: BytesMut,
    limit: usize,
    truncated: bool,
}

impl ResponseBuffer {
    /// Create a buffer of `MAX_RESPONSE_LEN` bytes.
    pub fn new() -> Self {
        Self::with_capacity(MAX_RESPONSE_LEN)
    }

    /// Create a buffer with the given total capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: BytesMut::with_capacity(capacity),
            limit: capacity.saturating_sub(1),
            truncated: false,
        }
    }

    /// Number of payload bytes this buffer can hold.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Bytes still available before the limit is reached.
    pub fn remaining(&self) -> usize {
        self.limit.saturating_sub(self.data.len())
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Whether any write has been cut short.
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// Append as much of `s` as fits. Returns `false` if it was cut short.
    pub fn push_str(&mut self, s: &str) -> bool {
        self.push_bytes(s.as_bytes())
    }

    /// Append as much of `bytes` as fits. Returns `false` if it was cut short.
    pub fn push_bytes(&mut self, bytes: &[u8]) -> bool {
        let take = bytes.len().min(self.remaining());
        self.data.extend_from_slice(&bytes[..take]);
        if take < bytes.len() {
            self.truncated = true;
            return false;
        }
        true
    }

    /// Append `bytes` only if all of them fit; otherwise leave the buffer
    /// untouched.
    pub fn try_extend(&mut self, bytes: &[u8]) -> Result<(), ResourceError> {
        if bytes.len() > self.remaining() {
            return Err(ResourceError::BufferOverflow {
                needed: bytes.len(),
                available: self.remaining(),
            });
        }
        self.data.extend_from_slice(bytes);
        Ok(())
    }

    /// Drop all content and reset the truncation flag.
    pub fn clear(&mut self) {
        self.data.clear();
        self.truncated = false;
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Hand the staged bytes over as an immutable payload.
    pub fn freeze(self) -> Bytes {
        self.data.freeze()
    }
}

impl Default for ResponseBuffer {
    fn default() -> Self {
        Self::new()
    }
}
