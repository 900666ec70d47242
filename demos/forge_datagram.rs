//! Example: Forging and Parsing a Datagram
//!
//! Builds a small DNS-style query with a custom IPv4 converter, sends it over
//! UDP loopback and parses it back on the receiving side.
//!
//! Run with: `cargo run --example forge_datagram`

#![allow(clippy::uninlined_format_args)]

use std::net::Ipv4Addr;

use enchufe::config::Config;
use enchufe::core::codec;
use enchufe::core::CustomValue;
use enchufe::registry::{self, Decode, Encode, Params};
use enchufe::transport::{Address, UdpTransport};
use enchufe::utils::logging::init_logging;
use enchufe::utils::timeout::DEFAULT_TIMEOUT;
use enchufe::{Buffer, Item, NetError, ParamName, SizeSpec, TypeTag, Value};

fn ipv4() -> TypeTag {
    TypeTag::custom("ipv4")
}

struct Ipv4Codec;

impl Encode for Ipv4Codec {
    fn parameters(&self) -> &[ParamName] {
        &[]
    }

    fn defaults(&self) -> Params {
        Params::default()
    }

    fn encode(&self, value: &Value, _params: &Params) -> enchufe::Result<Vec<u8>> {
        value
            .as_custom()
            .and_then(|c| c.downcast_ref::<Ipv4Addr>())
            .map(|addr| addr.octets().to_vec())
            .ok_or_else(|| NetError::TypeMismatch("expected an Ipv4Addr".to_string()))
    }
}

impl Decode for Ipv4Codec {
    fn parameters(&self) -> &[ParamName] {
        &[]
    }

    fn defaults(&self) -> Params {
        Params::default()
    }

    fn decode(&self, data: &[u8], _params: &Params) -> enchufe::Result<(Value, usize)> {
        let (octets, used) = codec::decode_block(data, SizeSpec::Fixed(4))?;
        let octets: [u8; 4] = octets.try_into().map_err(|_| NetError::InsufficientData {
            needed: 4,
            available: data.len(),
        })?;
        let value = CustomValue::new(ipv4(), Ipv4Addr::from(octets));
        Ok((Value::Custom(value), used))
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;
    init_logging(&config.logging)?;

    // buffers created after this see the converter
    registry::global_register(ipv4(), Ipv4Codec, Ipv4Codec)?;

    let mut server = UdpTransport::bind(&Address::new("127.0.0.1", 0)).await?;
    server.set_recv_timeout(Some(config.transport.recv_timeout.unwrap_or(DEFAULT_TIMEOUT)));
    let client = UdpTransport::bind(&Address::new("127.0.0.1", 0)).await?;

    let mut query = Buffer::from_options("", &config.buffer)?;
    query.extend([
        Item::new(0xBEEFu16).size(2),
        Item::new(0x0100u16).size(2),
        Item::new("example").size(-1),
        Item::new("org").size(-1),
        Item::new(0u8).size(1),
    ])?;
    query.append(CustomValue::new(ipv4(), Ipv4Addr::new(192, 0, 2, 7)))?;
    println!("Forged: {}", query);

    client.send_to(&query, &server.local_address()?).await?;

    let datagram = server.recv().await?;
    println!(
        "Received {} bytes from {}",
        datagram.len(),
        datagram.src.as_ref().map(ToString::to_string).unwrap_or_default()
    );

    let mut reply = datagram.to_buffer();
    let id = reply.pop(TypeTag::Int.descriptor().size(2))?;
    let flags = reply.pop(TypeTag::Int.descriptor().size(2))?;
    let mut labels = Vec::new();
    loop {
        let label = reply.pop(TypeTag::Str.descriptor().size(-1))?;
        match label.as_str() {
            Some("") | None => break,
            Some(text) => labels.push(text.to_owned()),
        }
    }
    let addr = reply.pop(ipv4())?;

    println!("  id     = {:#06x}", id.as_int().unwrap_or_default());
    println!("  flags  = {:#06x}", flags.as_int().unwrap_or_default());
    println!("  name   = {}", labels.join("."));
    println!(
        "  addr   = {:?}",
        addr.as_custom().and_then(|c| c.downcast_ref::<Ipv4Addr>())
    );

    server.metrics().log_metrics();
    Ok(())
}
