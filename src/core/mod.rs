//! # Core Codec Components
//!
//! Value types, field sizing rules and the stateless built-in codec functions.
//!
//! This module provides the foundation every buffer operation dispatches to:
//! the semantic values a buffer understands, the [`SizeSpec`] layout convention
//! and the encode/decode function pairs for integers, strings, booleans and raw
//! blocks.
//!
//! ## Components
//! - **Value**: typed values and the [`TypeTag`] that selects their converter
//! - **SizeSpec**: auto / terminated / fixed / length-prefixed field layout
//! - **TextEncoding**: character encodings for string fields
//! - **Codec**: the built-in encode/decode functions
//!
//! ## Layout Rules
//! - Integers are big-endian, two's complement when signed
//! - Length headers are unsigned big-endian integers
//! - Decoders report exactly how many bytes they consumed

pub mod codec;
pub mod size;
pub mod text;
pub mod value;

pub use size::SizeSpec;
pub use text::TextEncoding;
pub use value::{CustomValue, TypeTag, Value};
