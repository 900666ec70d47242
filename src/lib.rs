//! # enchufe
//!
//! Typed binary buffers for forging and parsing network data.
//!
//! A [`Buffer`] owns a growable byte sequence and its own copy of the type
//! registry. Values are appended through the converter registered for their
//! type and popped back out by type tag, each call optionally overriding the
//! registered defaults for size, signedness or text encoding.
//!
//! ## Modules
//! - [`core`]: value types, the size convention and the built-in codec functions
//! - [`registry`]: converter contracts, defaults and the process-wide registry
//! - [`buffer`]: the buffer itself
//! - [`transport`]: UDP glue that moves buffers as datagrams
//! - [`config`]: TOML/env configuration
//! - [`utils`]: logging, timeouts, metrics
//!
//! ## Quick Start
//! ```rust
//! use enchufe::{Buffer, Item, TypeTag};
//!
//! let mut request = Buffer::new();
//! request.extend([Item::new(0x1234).size(2), Item::new("status").size(-1)])?;
//! assert_eq!(request.to_hex(), "123406737461747573");
//! # Ok::<(), enchufe::NetError>(())
//! ```

pub mod buffer;
pub mod config;
pub mod core;
pub mod error;
pub mod registry;
pub mod transport;
pub mod utils;

pub use crate::buffer::{Buffer, BufferData, Descriptor, Item};
pub use crate::config::{BufferOptions, Config};
pub use crate::core::{SizeSpec, TextEncoding, TypeTag, Value};
pub use crate::error::{NetError, Result};
pub use crate::registry::{Arg, ParamName, ParamValue, Registry};
