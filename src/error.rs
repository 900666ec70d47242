//! # Error Types
//!
//! Error handling for the buffer codec, the type registry and the transport glue.
//!
//! ## Error Categories
//! - **Configuration Errors**: unknown buffer options, invalid default names
//! - **Registry Errors**: unknown type tags, converter contract violations
//! - **Codec Errors**: invalid sizes, overflowing integers, short or malformed data
//! - **Transport Errors**: socket I/O, address parsing, timeouts
//!
//! All errors implement `std::error::Error` for interoperability.
//!
//! ## Example Usage
//! ```rust
//! use enchufe::buffer::Buffer;
//! use enchufe::error::{NetError, Result};
//! use enchufe::registry::TypeTag;
//!
//! fn first_byte(buffer: &mut Buffer) -> Result<i128> {
//!     let value = buffer.pop(TypeTag::Int)?;
//!     value
//!         .as_int()
//!         .ok_or_else(|| NetError::TypeMismatch("expected an integer".to_string()))
//! }
//!
//! let mut buffer = Buffer::from_bytes(b"\x07rest");
//! assert_eq!(first_byte(&mut buffer).unwrap(), 7);
//! ```

use std::io;
use thiserror::Error;

/// Error message constants to reduce allocations in error paths.
pub mod constants {
    /// Registry lock errors
    pub const ERR_REGISTRY_WRITE_LOCK: &str = "Failed to acquire write lock on type registry";
    pub const ERR_REGISTRY_READ_LOCK: &str = "Failed to acquire read lock on type registry";

    /// Converter contract errors
    pub const ERR_ALREADY_REGISTERED: &str = "Type tag is already registered";
    pub const ERR_EMPTY_TAG: &str = "Custom type tag name cannot be empty";
    pub const ERR_DUPLICATE_PARAMETER: &str = "Converter declares the same parameter twice";
    pub const ERR_DEFAULT_MISMATCH: &str =
        "Parameter shared by encoder and decoder has different defaults";

    /// Parameter errors
    pub const ERR_RESERVED_PARAMETER: &str = "Parameter names 'to' and 'from' are reserved";
    pub const ERR_TOO_MANY_ARGUMENTS: &str = "Too many positional arguments";

    /// Transport errors
    pub const ERR_NOT_CONNECTED: &str = "Transport has no connected peer";
    pub const ERR_NO_DESTINATION: &str = "Datagram has no destination and transport is not connected";
    pub const ERR_NO_ADDRESS_RESOLVED: &str = "Address did not resolve to any socket address";
}

/// NetError is the primary error type for all buffer and transport operations
#[derive(Error, Debug)]
pub enum NetError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid hex data: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Unrecognized type: {0}")]
    TypeMismatch(String),

    #[error("Invalid size {size} for {context}")]
    InvalidSize { size: i64, context: &'static str },

    #[error("Registration contract violated for '{tag}': {reason}")]
    RegistrationContract { tag: String, reason: String },

    #[error("Type '{0}' is not registered")]
    UnregisteredType(String),

    #[error("Integer {value} does not fit in {size} byte(s)")]
    Overflow { value: String, size: usize },

    #[error("Insufficient data: needed {needed} byte(s), {available} available")]
    InsufficientData { needed: usize, available: usize },

    #[error("No string terminator found")]
    MissingTerminator,

    #[error("Text encoding error: {0}")]
    TextEncoding(String),

    #[error("Index {index} out of range for buffer of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Timeout occurred")]
    Timeout,

    #[error("Transport error: {0}")]
    TransportError(String),

    #[error("Lock poisoned: {0}")]
    LockPoisoned(&'static str),
}

/// Type alias for Results using NetError
pub type Result<T> = std::result::Result<T, NetError>;
