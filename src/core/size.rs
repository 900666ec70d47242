//! # Field Sizing
//!
//! [`SizeSpec`] controls how a value is laid out on the wire.
//!
//! ```text
//! absent  -> Auto          minimal integer width / rest of the data
//! 0       -> Terminated    minimal integer width / NUL-terminated string
//! X > 0   -> Fixed(X)      exactly X bytes
//! -X < 0  -> Prefixed(X)   X-byte big-endian length header, then payload
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Layout of one encoded field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "SizeRepr", into = "SizeRepr")]
pub enum SizeSpec {
    /// No size given: computed automatically or consumes the remainder
    #[default]
    Auto,
    /// Size `0`: sentinel convention
    Terminated,
    /// Positive size: fixed-width field of exactly this many bytes
    Fixed(usize),
    /// Negative size: length header of this many bytes precedes the payload
    Prefixed(usize),
}

impl SizeSpec {
    /// Build from the signed integer convention
    pub fn from_signed(size: i64) -> Self {
        match size {
            0 => SizeSpec::Terminated,
            n if n > 0 => SizeSpec::Fixed(n as usize),
            n => SizeSpec::Prefixed(n.unsigned_abs() as usize),
        }
    }

    /// Signed integer form, `None` for [`SizeSpec::Auto`]
    pub fn to_signed(self) -> Option<i64> {
        match self {
            SizeSpec::Auto => None,
            SizeSpec::Terminated => Some(0),
            SizeSpec::Fixed(n) => Some(n as i64),
            SizeSpec::Prefixed(n) => Some(-(n as i64)),
        }
    }
}

impl From<i64> for SizeSpec {
    fn from(size: i64) -> Self {
        SizeSpec::from_signed(size)
    }
}

impl From<i32> for SizeSpec {
    fn from(size: i32) -> Self {
        SizeSpec::from_signed(i64::from(size))
    }
}

impl From<Option<i64>> for SizeSpec {
    fn from(size: Option<i64>) -> Self {
        size.map_or(SizeSpec::Auto, SizeSpec::from_signed)
    }
}

impl fmt::Display for SizeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_signed() {
            Some(n) => write!(f, "{n}"),
            None => f.write_str("auto"),
        }
    }
}

/// Serialized form: an integer, or the word `"auto"` since TOML has no null
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum SizeRepr {
    Int(i64),
    Word(String),
}

impl TryFrom<SizeRepr> for SizeSpec {
    type Error = String;

    fn try_from(repr: SizeRepr) -> std::result::Result<Self, Self::Error> {
        match repr {
            SizeRepr::Int(n) => Ok(SizeSpec::from_signed(n)),
            SizeRepr::Word(word) if word.eq_ignore_ascii_case("auto") => Ok(SizeSpec::Auto),
            SizeRepr::Word(word) => Err(format!("Invalid size: {word} (expected integer or \"auto\")")),
        }
    }
}

impl From<SizeSpec> for SizeRepr {
    fn from(size: SizeSpec) -> Self {
        match size.to_signed() {
            Some(n) => SizeRepr::Int(n),
            None => SizeRepr::Word("auto".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_convention() {
        assert_eq!(SizeSpec::from(0i64), SizeSpec::Terminated);
        assert_eq!(SizeSpec::from(4i64), SizeSpec::Fixed(4));
        assert_eq!(SizeSpec::from(-2i64), SizeSpec::Prefixed(2));
        assert_eq!(SizeSpec::from(None), SizeSpec::Auto);
    }

    #[test]
    fn test_to_signed() {
        assert_eq!(SizeSpec::Prefixed(3).to_signed(), Some(-3));
        assert_eq!(SizeSpec::Auto.to_signed(), None);
        assert_eq!(SizeSpec::Fixed(8).to_string(), "8");
        assert_eq!(SizeSpec::Auto.to_string(), "auto");
    }
}
