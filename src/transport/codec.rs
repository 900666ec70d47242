//! `tokio_util` codec that turns each datagram into a [`Buffer`].

use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};

use crate::buffer::Buffer;
use crate::error::NetError;
use crate::registry::{self, Registry};

/// One frame per datagram, parsed with a clone of the codec's registry
#[derive(Debug, Clone)]
pub struct BufferCodec {
    registry: Registry,
}

impl BufferCodec {
    pub fn new(registry: Registry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}

impl Default for BufferCodec {
    fn default() -> Self {
        Self::new(registry::clone_registry())
    }
}

impl Decoder for BufferCodec {
    type Item = Buffer;
    type Error = NetError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if src.is_empty() {
            return Ok(None);
        }
        let frame = src.split();
        Ok(Some(Buffer::with_registry(&frame, self.registry.clone())))
    }
}

impl Encoder<Buffer> for BufferCodec {
    type Error = NetError;

    fn encode(&mut self, item: Buffer, dst: &mut BytesMut) -> Result<(), Self::Error> {
        dst.extend_from_slice(item.as_slice());
        Ok(())
    }
}
