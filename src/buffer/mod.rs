//! # Network Buffer
//!
//! A growable byte buffer that forges and parses wire data through its own
//! copy of the type registry.
//!
//! ## Operations
//! - `append` / `extend`: encode values onto the end
//! - `insert`: encode a value and splice it in at an index
//! - `pop`: decode a value from the front and remove the bytes it used
//! - `peek`: decode from the front without removing anything
//!
//! Raw storage stays reachable through `Deref`/`DerefMut` and [`Buffer::raw_mut`];
//! those paths never go through the registry.
//!
//! ## Usage
//! ```rust
//! use enchufe::buffer::{Buffer, Item};
//! use enchufe::registry::TypeTag;
//!
//! let mut buffer = Buffer::new();
//! buffer.append(Item::new(513).size(2))?;
//! buffer.append("hello")?;
//! assert_eq!(buffer.as_slice(), b"\x02\x01hello\x00");
//!
//! let port = buffer.pop(TypeTag::Int.descriptor().size(2))?;
//! assert_eq!(port.as_int(), Some(513));
//! assert_eq!(buffer.pop(TypeTag::Str)?.as_str(), Some("hello"));
//! # Ok::<(), enchufe::error::NetError>(())
//! ```

mod item;

pub use item::{Descriptor, Item};

use std::fmt;
use std::ops::{Deref, DerefMut};

use bytes::{Buf, Bytes, BytesMut};
use tracing::trace;

use crate::config::BufferOptions;
use crate::core::value::{TypeTag, Value};
use crate::error::{NetError, Result};
use crate::registry::{self, Arg, ParamName, ParamValue, Registry};

/// Initial data for a buffer: raw bytes, or hex text to decode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BufferData {
    Raw(Vec<u8>),
    Hex(String),
}

impl BufferData {
    fn into_bytes(self) -> Result<Vec<u8>> {
        match self {
            BufferData::Raw(data) => Ok(data),
            BufferData::Hex(text) => {
                let digits: String = text.chars().filter(|c| !c.is_whitespace()).collect();
                Ok(hex::decode(digits)?)
            }
        }
    }
}

impl Default for BufferData {
    fn default() -> Self {
        BufferData::Raw(Vec::new())
    }
}

impl From<&str> for BufferData {
    fn from(text: &str) -> Self {
        BufferData::Hex(text.to_owned())
    }
}

impl From<String> for BufferData {
    fn from(text: String) -> Self {
        BufferData::Hex(text)
    }
}

impl From<&[u8]> for BufferData {
    fn from(data: &[u8]) -> Self {
        BufferData::Raw(data.to_vec())
    }
}

impl<const N: usize> From<&[u8; N]> for BufferData {
    fn from(data: &[u8; N]) -> Self {
        BufferData::Raw(data.to_vec())
    }
}

impl From<Vec<u8>> for BufferData {
    fn from(data: Vec<u8>) -> Self {
        BufferData::Raw(data)
    }
}

impl From<Bytes> for BufferData {
    fn from(data: Bytes) -> Self {
        BufferData::Raw(data.to_vec())
    }
}

/// Parse and forge network data
#[derive(Clone)]
pub struct Buffer {
    data: BytesMut,
    registry: Registry,
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Buffer {
    /// Empty buffer with a snapshot of the process-wide registry
    pub fn new() -> Self {
        Self::with_registry(Vec::<u8>::new(), registry::clone_registry())
    }

    /// Buffer holding a copy of `data`
    pub fn from_bytes(data: impl AsRef<[u8]>) -> Self {
        Self::with_registry(data.as_ref(), registry::clone_registry())
    }

    /// Buffer holding the bytes spelled by a hex string (whitespace ignored)
    pub fn from_hex(text: &str) -> Result<Self> {
        let data = BufferData::Hex(text.to_owned()).into_bytes()?;
        Ok(Self::with_registry(data, registry::clone_registry()))
    }

    /// Buffer with an explicitly supplied registry
    pub fn with_registry(data: impl AsRef<[u8]>, registry: Registry) -> Self {
        Self {
            data: BytesMut::from(data.as_ref()),
            registry,
        }
    }

    /// Buffer with named default overrides such as `("int_size", Arg::Int(2))`.
    ///
    /// # Errors
    /// Returns `NetError::ConfigError` for an unrecognized option name and
    /// `NetError::InvalidHex` for malformed hex input.
    pub fn with_options<'a, I>(data: impl Into<BufferData>, options: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, Arg)>,
    {
        let mut registry = registry::clone_registry();
        for (option, arg) in options {
            let (tag, name) = parse_option(option)?;
            let value = ParamValue::from_arg(name, arg)?;
            registry.set_default(&tag, value).map_err(|e| match e {
                NetError::UnregisteredType(_) => {
                    NetError::ConfigError(format!("'{option}' is an invalid keyword argument"))
                }
                other => other,
            })?;
        }
        Ok(Self::with_registry(data.into().into_bytes()?, registry))
    }

    /// Buffer configured from a [`BufferOptions`] section
    pub fn from_options(data: impl Into<BufferData>, options: &BufferOptions) -> Result<Self> {
        let mut registry = registry::clone_registry();
        options.apply(&mut registry)?;
        Ok(Self::with_registry(data.into().into_bytes()?, registry))
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Mutable access to this buffer's registry; changes stay local to it
    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    pub fn get_default(&self, tag: &TypeTag, name: ParamName) -> Result<ParamValue> {
        self.registry.get_default(tag, name)
    }

    pub fn set_default(&mut self, tag: &TypeTag, value: ParamValue) -> Result<()> {
        self.registry.set_default(tag, value)
    }

    /// Encode an item without storing it.
    ///
    /// Raw bytes without overrides are returned unchanged; everything else
    /// goes through the registry entry for the value's tag.
    pub fn to_bytes(&self, item: impl Into<Item>) -> Result<Vec<u8>> {
        let item = item.into();
        if item.is_verbatim() {
            if let Value::Bytes(data) = item.value {
                return Ok(data);
            }
        }
        let tag = item.value.tag();
        let entry = self
            .registry
            .entry(&tag)
            .ok_or_else(|| NetError::TypeMismatch(format!("no converter registered for '{tag}'")))?;
        entry.encode(&item.value, &item.overrides)
    }

    /// Decode a value from the front without removing it.
    ///
    /// Returns the value and the number of bytes it occupies.
    pub fn peek(&self, descriptor: impl Into<Descriptor>) -> Result<(Value, usize)> {
        let descriptor = descriptor.into();
        let entry = self.registry.entry(&descriptor.tag).ok_or_else(|| {
            NetError::TypeMismatch(format!("no converter registered for '{}'", descriptor.tag))
        })?;
        entry.decode(&self.data, &descriptor.overrides)
    }

    /// Append a single item to the end of the buffer
    pub fn append(&mut self, item: impl Into<Item>) -> Result<()> {
        let bytes = self.to_bytes(item)?;
        trace!(len = bytes.len(), total = self.data.len() + bytes.len(), "append");
        self.data.extend_from_slice(&bytes);
        Ok(())
    }

    /// Append every item in order.
    ///
    /// Stops at the first failure; items appended before it remain.
    pub fn extend<I>(&mut self, items: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: Into<Item>,
    {
        for item in items {
            self.append(item)?;
        }
        Ok(())
    }

    /// Encode an item and splice its bytes in before `index`
    pub fn insert(&mut self, index: usize, item: impl Into<Item>) -> Result<()> {
        if index > self.data.len() {
            return Err(NetError::IndexOutOfRange {
                index,
                len: self.data.len(),
            });
        }
        let bytes = self.to_bytes(item)?;
        trace!(index, len = bytes.len(), "insert");
        let tail = self.data.split_off(index);
        self.data.extend_from_slice(&bytes);
        self.data.unsplit(tail);
        Ok(())
    }

    /// Remove and return a value decoded from the front of the buffer.
    ///
    /// The buffer is left untouched when decoding fails.
    pub fn pop(&mut self, descriptor: impl Into<Descriptor>) -> Result<Value> {
        let (value, consumed) = self.peek(descriptor)?;
        let consumed = consumed.min(self.data.len());
        trace!(consumed, remaining = self.data.len() - consumed, "pop");
        self.data.advance(consumed);
        Ok(value)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Raw storage, for mutation that bypasses the registry
    pub fn raw_mut(&mut self) -> &mut BytesMut {
        &mut self.data
    }

    pub fn clear(&mut self) {
        self.data.clear();
    }

    pub fn freeze(self) -> Bytes {
        self.data.freeze()
    }

    pub fn into_inner(self) -> BytesMut {
        self.data
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.data)
    }
}

/// Split an option name like `int_size` into its tag and parameter
fn parse_option(option: &str) -> Result<(TypeTag, ParamName)> {
    let invalid = || NetError::ConfigError(format!("'{option}' is an invalid keyword argument"));
    let (tag, param) = option.split_once('_').ok_or_else(invalid)?;
    let tag = TypeTag::builtin(tag).ok_or_else(invalid)?;
    let name = param.parse::<ParamName>().map_err(|_| invalid())?;
    Ok((tag, name))
}

impl Deref for Buffer {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.data
    }
}

impl DerefMut for Buffer {
    fn deref_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }
}

impl AsRef<[u8]> for Buffer {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

impl PartialEq for Buffer {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

impl PartialEq<[u8]> for Buffer {
    fn eq(&self, other: &[u8]) -> bool {
        self.data[..] == *other
    }
}

impl fmt::Debug for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buffer")
            .field("data", &self.data)
            .field("types", &self.registry.tags().collect::<Vec<_>>())
            .finish()
    }
}

impl fmt::Display for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Buffer({})", self.to_hex())
    }
}
