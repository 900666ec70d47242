//! # Transport Layer
//!
//! Moves buffers across UDP. Transports only carry raw payloads and endpoint
//! metadata; parsing and forging stays in [`crate::buffer`].
//!
//! ## Components
//! - **Address**: host/port pair with async resolution
//! - **Datagram**: payload plus source and destination
//! - **UdpTransport**: tokio UDP socket with timeouts and metrics
//! - **BufferCodec**: `tokio_util` codec yielding [`crate::buffer::Buffer`] per datagram

pub mod address;
pub mod codec;
pub mod datagram;
pub mod udp;

pub use address::Address;
pub use codec::BufferCodec;
pub use datagram::Datagram;
pub use udp::UdpTransport;
