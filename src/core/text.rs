//! Text encodings supported by the string codec.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{NetError, Result};

/// Character encoding applied to string fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TextEncoding {
    /// UTF-8 (used whenever no encoding is configured)
    #[default]
    #[serde(rename = "utf-8", alias = "utf8")]
    Utf8,
    /// UTF-16, little-endian code units, no BOM
    #[serde(rename = "utf-16le", alias = "utf16le")]
    Utf16Le,
    /// UTF-16, big-endian code units, no BOM
    #[serde(rename = "utf-16be", alias = "utf16be")]
    Utf16Be,
    /// ISO-8859-1
    #[serde(rename = "latin-1", alias = "latin1", alias = "iso-8859-1")]
    Latin1,
    /// 7-bit ASCII
    #[serde(rename = "ascii")]
    Ascii,
}

impl TextEncoding {
    /// Width in bytes of one code unit
    pub fn unit_width(self) -> usize {
        match self {
            TextEncoding::Utf16Le | TextEncoding::Utf16Be => 2,
            _ => 1,
        }
    }

    /// The encoded NUL character used as string terminator
    pub fn nul(self) -> &'static [u8] {
        match self.unit_width() {
            2 => &[0, 0],
            _ => &[0],
        }
    }

    /// Canonical name
    pub fn name(self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::Utf16Le => "utf-16le",
            TextEncoding::Utf16Be => "utf-16be",
            TextEncoding::Latin1 => "latin-1",
            TextEncoding::Ascii => "ascii",
        }
    }

    /// Encode a string to bytes
    pub fn encode(self, value: &str) -> Result<Vec<u8>> {
        match self {
            TextEncoding::Utf8 => Ok(value.as_bytes().to_vec()),
            TextEncoding::Utf16Le => Ok(value.encode_utf16().flat_map(u16::to_le_bytes).collect()),
            TextEncoding::Utf16Be => Ok(value.encode_utf16().flat_map(u16::to_be_bytes).collect()),
            TextEncoding::Latin1 => narrow(value, 0xFF, self),
            TextEncoding::Ascii => narrow(value, 0x7F, self),
        }
    }

    /// Decode bytes to a string
    pub fn decode(self, data: &[u8]) -> Result<String> {
        match self {
            TextEncoding::Utf8 => std::str::from_utf8(data)
                .map(str::to_owned)
                .map_err(|e| NetError::TextEncoding(format!("invalid utf-8: {e}"))),
            TextEncoding::Utf16Le => wide(data, u16::from_le_bytes),
            TextEncoding::Utf16Be => wide(data, u16::from_be_bytes),
            TextEncoding::Latin1 => Ok(data.iter().map(|&b| char::from(b)).collect()),
            TextEncoding::Ascii => match data.iter().position(|b| !b.is_ascii()) {
                Some(pos) => Err(NetError::TextEncoding(format!(
                    "byte 0x{:02x} at offset {pos} is not ascii",
                    data[pos]
                ))),
                None => Ok(data.iter().map(|&b| char::from(b)).collect()),
            },
        }
    }
}

fn narrow(value: &str, max: u32, encoding: TextEncoding) -> Result<Vec<u8>> {
    value
        .chars()
        .map(|c| {
            if u32::from(c) <= max {
                Ok(u32::from(c) as u8)
            } else {
                Err(NetError::TextEncoding(format!(
                    "character {c:?} cannot be encoded as {}",
                    encoding.name()
                )))
            }
        })
        .collect()
}

fn wide(data: &[u8], unit: fn([u8; 2]) -> u16) -> Result<String> {
    if data.len() % 2 != 0 {
        return Err(NetError::TextEncoding(format!(
            "odd byte count {} for utf-16 data",
            data.len()
        )));
    }
    let units = data.chunks_exact(2).map(|pair| unit([pair[0], pair[1]]));
    char::decode_utf16(units)
        .collect::<std::result::Result<String, _>>()
        .map_err(|e| NetError::TextEncoding(format!("invalid utf-16: {e}")))
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TextEncoding {
    type Err = NetError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "utf-8" | "utf8" => Ok(TextEncoding::Utf8),
            "utf-16le" | "utf16le" | "utf-16-le" => Ok(TextEncoding::Utf16Le),
            "utf-16be" | "utf16be" | "utf-16-be" => Ok(TextEncoding::Utf16Be),
            "latin-1" | "latin1" | "iso-8859-1" | "iso8859-1" => Ok(TextEncoding::Latin1),
            "ascii" | "us-ascii" => Ok(TextEncoding::Ascii),
            other => Err(NetError::ConfigError(format!("Unknown text encoding: {other}"))),
        }
    }
}
