//! A payload with its endpoint metadata.

use bytes::Bytes;

use crate::buffer::Buffer;
use crate::registry::Registry;
use crate::transport::Address;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Datagram {
    pub payload: Bytes,
    pub src: Option<Address>,
    pub dst: Option<Address>,
}

impl Datagram {
    pub fn new(payload: impl Into<Bytes>) -> Self {
        Self {
            payload: payload.into(),
            src: None,
            dst: None,
        }
    }

    pub fn with_src(mut self, src: Address) -> Self {
        self.src = Some(src);
        self
    }

    pub fn with_dst(mut self, dst: Address) -> Self {
        self.dst = Some(dst);
        self
    }

    /// Payload as a buffer over a snapshot of the process-wide registry
    pub fn to_buffer(&self) -> Buffer {
        Buffer::from_bytes(&self.payload)
    }

    /// Payload as a buffer over the given registry
    pub fn to_buffer_with(&self, registry: Registry) -> Buffer {
        Buffer::with_registry(&self.payload, registry)
    }

    pub fn len(&self) -> usize {
        self.payload.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }
}

impl From<Buffer> for Datagram {
    fn from(buffer: Buffer) -> Self {
        Datagram::new(buffer.freeze())
    }
}
