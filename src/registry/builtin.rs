//! Converters for the built-in types, seeded into every fresh registry.
//!
//! | tag     | parameters         | defaults               |
//! |---------|--------------------|------------------------|
//! | `bytes` | `size`             | `size = 512`           |
//! | `int`   | `size`, `signed`   | `size = auto`, `signed = auto` |
//! | `str`   | `size`, `encoding` | `size = 0`, `encoding = utf-8` |
//! | `bool`  | `size`             | `size = 1`             |

use std::sync::Arc;

use crate::core::codec::{self, DEFAULT_BLOCK_SIZE};
use crate::core::size::SizeSpec;
use crate::core::value::{TypeTag, Value};
use crate::error::{NetError, Result};
use crate::registry::{Decode, Encode, ParamName, Params};

fn mismatch(expected: TypeTag, got: &Value) -> NetError {
    NetError::TypeMismatch(format!("{expected} converter cannot encode a {} value", got.tag()))
}

/// Raw byte blocks
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockCodec;

impl Encode for BlockCodec {
    fn parameters(&self) -> &[ParamName] {
        &[ParamName::Size]
    }

    fn defaults(&self) -> Params {
        Params {
            size: SizeSpec::Fixed(DEFAULT_BLOCK_SIZE),
            ..Params::default()
        }
    }

    fn encode(&self, value: &Value, params: &Params) -> Result<Vec<u8>> {
        match value {
            Value::Bytes(data) => codec::encode_block(data, params.size),
            other => Err(mismatch(TypeTag::Bytes, other)),
        }
    }
}

impl Decode for BlockCodec {
    fn parameters(&self) -> &[ParamName] {
        &[ParamName::Size]
    }

    fn defaults(&self) -> Params {
        Encode::defaults(self)
    }

    fn decode(&self, data: &[u8], params: &Params) -> Result<(Value, usize)> {
        let (block, used) = codec::decode_block(data, params.size)?;
        Ok((Value::Bytes(block), used))
    }
}

/// Big-endian integers
#[derive(Debug, Clone, Copy, Default)]
pub struct IntCodec;

impl Encode for IntCodec {
    fn parameters(&self) -> &[ParamName] {
        &[ParamName::Size, ParamName::Signed]
    }

    fn defaults(&self) -> Params {
        Params::default()
    }

    fn encode(&self, value: &Value, params: &Params) -> Result<Vec<u8>> {
        match value {
            Value::Int(v) => codec::encode_int(*v, params.size, params.signed),
            other => Err(mismatch(TypeTag::Int, other)),
        }
    }
}

impl Decode for IntCodec {
    fn parameters(&self) -> &[ParamName] {
        &[ParamName::Size, ParamName::Signed]
    }

    fn defaults(&self) -> Params {
        Params::default()
    }

    fn decode(&self, data: &[u8], params: &Params) -> Result<(Value, usize)> {
        let (value, used) = codec::decode_int(data, params.size, params.signed)?;
        Ok((Value::Int(value), used))
    }
}

/// Text strings
#[derive(Debug, Clone, Copy, Default)]
pub struct StrCodec;

impl Encode for StrCodec {
    fn parameters(&self) -> &[ParamName] {
        &[ParamName::Size, ParamName::Encoding]
    }

    fn defaults(&self) -> Params {
        Params {
            size: SizeSpec::Terminated,
            ..Params::default()
        }
    }

    fn encode(&self, value: &Value, params: &Params) -> Result<Vec<u8>> {
        match value {
            Value::Str(s) => codec::encode_str(s, params.size, params.encoding),
            other => Err(mismatch(TypeTag::Str, other)),
        }
    }
}

impl Decode for StrCodec {
    fn parameters(&self) -> &[ParamName] {
        &[ParamName::Size, ParamName::Encoding]
    }

    fn defaults(&self) -> Params {
        Encode::defaults(self)
    }

    fn decode(&self, data: &[u8], params: &Params) -> Result<(Value, usize)> {
        let (value, used) = codec::decode_str(data, params.size, params.encoding)?;
        Ok((Value::Str(value), used))
    }
}

/// Booleans stored as 0/1 integers
#[derive(Debug, Clone, Copy, Default)]
pub struct BoolCodec;

impl Encode for BoolCodec {
    fn parameters(&self) -> &[ParamName] {
        &[ParamName::Size]
    }

    fn defaults(&self) -> Params {
        Params {
            size: SizeSpec::Fixed(1),
            ..Params::default()
        }
    }

    fn encode(&self, value: &Value, params: &Params) -> Result<Vec<u8>> {
        match value {
            Value::Bool(b) => codec::encode_bool(*b, params.size),
            other => Err(mismatch(TypeTag::Bool, other)),
        }
    }
}

impl Decode for BoolCodec {
    fn parameters(&self) -> &[ParamName] {
        &[ParamName::Size]
    }

    fn defaults(&self) -> Params {
        Encode::defaults(self)
    }

    fn decode(&self, data: &[u8], params: &Params) -> Result<(Value, usize)> {
        let (value, used) = codec::decode_bool(data, params.size)?;
        Ok((Value::Bool(value), used))
    }
}

pub type Converter = (TypeTag, Arc<dyn Decode>, Arc<dyn Encode>);

fn pair<C: Encode + Decode + 'static>(tag: TypeTag, codec: C) -> Converter {
    let shared = Arc::new(codec);
    let decoder: Arc<dyn Decode> = shared.clone();
    let encoder: Arc<dyn Encode> = shared;
    (tag, decoder, encoder)
}

/// The built-in converter pairs, in registration order
pub fn converters() -> Vec<Converter> {
    vec![
        pair(TypeTag::Bytes, BlockCodec),
        pair(TypeTag::Int, IntCodec),
        pair(TypeTag::Str, StrCodec),
        pair(TypeTag::Bool, BoolCodec),
    ]
}
