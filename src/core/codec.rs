//! # Built-in Codec Functions
//!
//! Stateless encode/decode pairs for the built-in semantic types. Every encoder
//! maps a value plus sizing parameters to bytes; every decoder maps a byte
//! source plus sizing parameters to `(value, bytes consumed)`.
//!
//! ## Wire Format
//! ```text
//! int    big-endian, optional two's complement, minimal width unless sized
//! str    NUL-terminated | fixed-width zero-padded | [len(N)] [payload]
//! bool   size-byte big-endian 0/1, nonzero decodes as true
//! block  verbatim bytes, optionally [len(N)] prefixed
//! ```

use crate::core::size::SizeSpec;
use crate::core::text::TextEncoding;
use crate::error::{NetError, Result};

/// Width of an `i128` on the wire
const NATIVE_WIDTH: usize = 16;

/// Default width used when decoding an integer with no size
pub const DEFAULT_INT_DECODE_SIZE: usize = 1;

/// Default width for raw block decoding
pub const DEFAULT_BLOCK_SIZE: usize = 512;

/// Widest fixed field an encoder will allocate
pub const MAX_FIELD_WIDTH: usize = 65_535;

fn check_width(width: usize, context: &'static str) -> Result<usize> {
    if width > MAX_FIELD_WIDTH {
        return Err(NetError::InvalidSize {
            size: i64::try_from(width).unwrap_or(i64::MAX),
            context,
        });
    }
    Ok(width)
}

/// Number of bits needed to represent `|value|`
fn bit_length(value: i128) -> usize {
    (u128::BITS - value.unsigned_abs().leading_zeros()) as usize
}

/// Minimal byte count for `value`, at least one byte
pub fn minimal_width(value: i128, signed: bool) -> usize {
    let bits = bit_length(value) + usize::from(signed);
    bits.div_ceil(8).max(1)
}

fn fits(value: i128, width: usize, signed: bool) -> bool {
    if width == 0 {
        return value == 0;
    }
    if width >= NATIVE_WIDTH {
        return signed || value >= 0;
    }
    let bits = (width * 8) as u32;
    if signed {
        let bound = 1i128 << (bits - 1);
        (-bound..bound).contains(&value)
    } else {
        (0..1i128 << bits).contains(&value)
    }
}

/// Convert an integer to bytes.
///
/// `signed` defaults to `value < 0`. `Auto` and `Terminated` compute the
/// minimal width; a length-prefixed size is rejected.
pub fn encode_int(value: i128, size: SizeSpec, signed: Option<bool>) -> Result<Vec<u8>> {
    let signed = signed.unwrap_or(value < 0);
    let width = match size {
        SizeSpec::Auto | SizeSpec::Terminated => minimal_width(value, signed),
        SizeSpec::Fixed(n) => check_width(n, "integer encoding")?,
        SizeSpec::Prefixed(n) => {
            return Err(NetError::InvalidSize {
                size: -(n as i64),
                context: "integer encoding",
            })
        }
    };

    if !fits(value, width, signed) {
        return Err(NetError::Overflow {
            value: value.to_string(),
            size: width,
        });
    }

    let native = value.to_be_bytes();
    let mut out = Vec::with_capacity(width);
    if width > NATIVE_WIDTH {
        let fill = if value < 0 { 0xFF } else { 0x00 };
        out.resize(width - NATIVE_WIDTH, fill);
        out.extend_from_slice(&native);
    } else {
        out.extend_from_slice(&native[NATIVE_WIDTH - width..]);
    }
    Ok(out)
}

/// Convert bytes to an integer.
///
/// Returns the value and the number of bytes used. Reading past the end of
/// `data` is an error rather than a silently shortened read.
pub fn decode_int(data: &[u8], size: SizeSpec, signed: Option<bool>) -> Result<(i128, usize)> {
    let signed = signed.unwrap_or(false);
    let width = match size {
        SizeSpec::Auto | SizeSpec::Terminated => DEFAULT_INT_DECODE_SIZE,
        SizeSpec::Fixed(n) => n,
        SizeSpec::Prefixed(n) => {
            return Err(NetError::InvalidSize {
                size: -(n as i64),
                context: "integer decoding",
            })
        }
    };

    if data.len() < width {
        return Err(NetError::InsufficientData {
            needed: width,
            available: data.len(),
        });
    }

    let field = &data[..width];
    let (head, tail) = field.split_at(width.saturating_sub(NATIVE_WIDTH));
    let acc = tail.iter().fold(0u128, |acc, &b| (acc << 8) | u128::from(b));
    let bits = tail.len() * 8;
    let negative = signed && tail.first().is_some_and(|b| b & 0x80 != 0);

    let value = if bits == 128 {
        if !signed && acc > i128::MAX as u128 {
            return Err(overflow(field));
        }
        acc as i128
    } else if negative {
        acc as i128 - (1i128 << bits)
    } else {
        acc as i128
    };

    let fill = if value < 0 { 0xFF } else { 0x00 };
    if head.iter().any(|&b| b != fill) {
        return Err(overflow(field));
    }

    Ok((value, width))
}

fn overflow(field: &[u8]) -> NetError {
    NetError::Overflow {
        value: format!("0x{}", hex::encode(field)),
        size: NATIVE_WIDTH,
    }
}

fn length_header(len: usize, header: usize) -> Result<Vec<u8>> {
    encode_int(len as i128, SizeSpec::Fixed(header), Some(false))
}

fn read_length_header(data: &[u8], header: usize) -> Result<(usize, usize)> {
    let (len, used) = decode_int(data, SizeSpec::Fixed(header), Some(false))?;
    let len = usize::try_from(len).map_err(|_| NetError::Overflow {
        value: len.to_string(),
        size: header,
    })?;
    let end = used.checked_add(len).unwrap_or(usize::MAX);
    if data.len() < end {
        return Err(NetError::InsufficientData {
            needed: end,
            available: data.len(),
        });
    }
    Ok((len, used))
}

/// Convert a string to bytes.
///
/// * `Prefixed(n)`: `n` bytes used as integer header for the length
/// * `Terminated`: encoded NUL appended after the text
/// * `Fixed(n)`: first `n` bytes only, filled with `0x00` if needed
/// * `Auto`: the encoded text with no framing
pub fn encode_str(value: &str, size: SizeSpec, encoding: Option<TextEncoding>) -> Result<Vec<u8>> {
    let encoding = encoding.unwrap_or_default();
    let mut bstr = encoding.encode(value)?;
    match size {
        SizeSpec::Auto => {}
        SizeSpec::Prefixed(header) => {
            let mut framed = length_header(bstr.len(), header)?;
            framed.append(&mut bstr);
            bstr = framed;
        }
        SizeSpec::Terminated => bstr.extend_from_slice(encoding.nul()),
        SizeSpec::Fixed(n) => bstr.resize(check_width(n, "string encoding")?, 0x00),
    }
    Ok(bstr)
}

/// Convert bytes to a string.
///
/// Returns the string and the number of bytes consumed. Fixed-width fields
/// have their trailing NUL padding removed.
pub fn decode_str(
    data: &[u8],
    size: SizeSpec,
    encoding: Option<TextEncoding>,
) -> Result<(String, usize)> {
    let encoding = encoding.unwrap_or_default();
    match size {
        SizeSpec::Auto => Ok((encoding.decode(data)?, data.len())),
        SizeSpec::Prefixed(header) => {
            let (len, used) = read_length_header(data, header)?;
            let value = encoding.decode(&data[used..used + len])?;
            Ok((value, used + len))
        }
        SizeSpec::Terminated => {
            let unit = encoding.unit_width();
            let nul = encoding.nul();
            let pos = data
                .chunks_exact(unit)
                .position(|chunk| chunk == nul)
                .ok_or(NetError::MissingTerminator)?;
            let end = pos * unit;
            Ok((encoding.decode(&data[..end])?, end + unit))
        }
        SizeSpec::Fixed(n) => {
            if data.len() < n {
                return Err(NetError::InsufficientData {
                    needed: n,
                    available: data.len(),
                });
            }
            let field = &data[..n];
            let whole_units = n - n % encoding.unit_width();
            let value = encoding.decode(&field[..whole_units])?;
            Ok((value.trim_end_matches('\0').to_owned(), n))
        }
    }
}

fn bool_width(size: SizeSpec) -> Result<SizeSpec> {
    match size {
        SizeSpec::Auto | SizeSpec::Terminated => Ok(SizeSpec::Fixed(1)),
        SizeSpec::Fixed(n) => Ok(SizeSpec::Fixed(n)),
        SizeSpec::Prefixed(n) => Err(NetError::InvalidSize {
            size: -(n as i64),
            context: "boolean",
        }),
    }
}

/// Convert a boolean to a `size`-byte 0/1 integer
pub fn encode_bool(value: bool, size: SizeSpec) -> Result<Vec<u8>> {
    encode_int(i128::from(value), bool_width(size)?, Some(false))
}

/// Convert a `size`-byte integer to a boolean, nonzero meaning `true`
pub fn decode_bool(data: &[u8], size: SizeSpec) -> Result<(bool, usize)> {
    let (value, used) = decode_int(data, bool_width(size)?, Some(false))?;
    Ok((value != 0, used))
}

/// Raw bytes to wire bytes
pub fn encode_block(value: &[u8], size: SizeSpec) -> Result<Vec<u8>> {
    match size {
        SizeSpec::Auto => Ok(value.to_vec()),
        SizeSpec::Terminated => Ok(Vec::new()),
        SizeSpec::Fixed(n) => Ok(value[..n.min(value.len())].to_vec()),
        SizeSpec::Prefixed(header) => {
            let mut framed = length_header(value.len(), header)?;
            framed.extend_from_slice(value);
            Ok(framed)
        }
    }
}

/// Wire bytes to raw bytes.
///
/// A fixed size larger than the available data is truncated silently.
pub fn decode_block(data: &[u8], size: SizeSpec) -> Result<(Vec<u8>, usize)> {
    match size {
        SizeSpec::Auto => Ok((data.to_vec(), data.len())),
        SizeSpec::Terminated => Ok((Vec::new(), 0)),
        SizeSpec::Fixed(n) => {
            let taken = n.min(data.len());
            Ok((data[..taken].to_vec(), taken))
        }
        SizeSpec::Prefixed(header) => {
            let (len, used) = read_length_header(data, header)?;
            Ok((data[used..used + len].to_vec(), used + len))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_int_width() {
        assert_eq!(encode_int(0, SizeSpec::Auto, None).unwrap(), vec![0x00]);
        assert_eq!(encode_int(255, SizeSpec::Auto, Some(false)).unwrap(), vec![0xFF]);
        assert_eq!(encode_int(256, SizeSpec::Auto, Some(false)).unwrap(), vec![0x01, 0x00]);
        assert_eq!(encode_int(-1, SizeSpec::Auto, Some(true)).unwrap(), vec![0xFF]);
        // signed auto-width reserves a sign bit
        assert_eq!(encode_int(255, SizeSpec::Terminated, Some(true)).unwrap(), vec![0x00, 0xFF]);
        assert_eq!(encode_int(-128, SizeSpec::Auto, None).unwrap(), vec![0xFF, 0x80]);
    }

    #[test]
    fn test_fixed_int_width() {
        assert_eq!(encode_int(1, SizeSpec::Fixed(4), None).unwrap(), vec![0, 0, 0, 1]);
        assert_eq!(
            encode_int(-2, SizeSpec::Fixed(3), None).unwrap(),
            vec![0xFF, 0xFF, 0xFE]
        );
        let wide = encode_int(-1, SizeSpec::Fixed(20), None).unwrap();
        assert_eq!(wide, vec![0xFF; 20]);
        assert_eq!(decode_int(&wide, SizeSpec::Fixed(20), Some(true)).unwrap(), (-1, 20));
    }

    #[test]
    fn test_int_errors() {
        assert!(matches!(
            encode_int(5, SizeSpec::Prefixed(1), None),
            Err(NetError::InvalidSize { size: -1, .. })
        ));
        assert!(matches!(
            encode_int(256, SizeSpec::Fixed(1), None),
            Err(NetError::Overflow { size: 1, .. })
        ));
        assert!(matches!(
            encode_int(-1, SizeSpec::Fixed(1), Some(false)),
            Err(NetError::Overflow { .. })
        ));
        assert!(matches!(
            decode_int(&[0x01], SizeSpec::Fixed(2), None),
            Err(NetError::InsufficientData { needed: 2, available: 1 })
        ));
    }

    #[test]
    fn test_decode_int_signedness() {
        assert_eq!(decode_int(&[0xFF, 0x00], SizeSpec::Fixed(1), None).unwrap(), (255, 1));
        assert_eq!(decode_int(&[0xFF, 0x00], SizeSpec::Fixed(2), Some(true)).unwrap(), (-256, 2));
        assert_eq!(decode_int(&[0x7F], SizeSpec::Auto, Some(true)).unwrap(), (127, 1));
    }

    #[test]
    fn test_decode_int_beyond_native_range() {
        let mut data = vec![0x01];
        data.extend_from_slice(&[0u8; 16]);
        assert!(matches!(
            decode_int(&data, SizeSpec::Fixed(17), None),
            Err(NetError::Overflow { .. })
        ));
        assert!(decode_int(&[0xFF; 16], SizeSpec::Fixed(16), Some(false)).is_err());
        assert_eq!(decode_int(&[0xFF; 16], SizeSpec::Fixed(16), Some(true)).unwrap(), (-1, 16));
    }

    #[test]
    fn test_str_framings() {
        assert_eq!(encode_str("ab", SizeSpec::Fixed(5), None).unwrap(), b"ab\0\0\0");
        assert_eq!(encode_str("abcdef", SizeSpec::Fixed(5), None).unwrap(), b"abcde");
        assert_eq!(encode_str("hi", SizeSpec::Prefixed(1), None).unwrap(), b"\x02hi");
        assert_eq!(encode_str("hi", SizeSpec::Terminated, None).unwrap(), b"hi\0");
        assert_eq!(encode_str("hi", SizeSpec::Auto, None).unwrap(), b"hi");
    }

    #[test]
    fn test_terminated_str_stops_at_first_nul() {
        let mut data = encode_str("hi", SizeSpec::Terminated, None).unwrap();
        data.extend_from_slice(b"\x00\x00garbage");
        assert_eq!(decode_str(&data, SizeSpec::Terminated, None).unwrap(), ("hi".to_string(), 3));
    }

    #[test]
    fn test_terminated_utf16_is_unit_aligned() {
        let enc = Some(TextEncoding::Utf16Le);
        let data = encode_str("hi", SizeSpec::Terminated, enc).unwrap();
        assert_eq!(data, b"h\0i\0\0\0");
        assert_eq!(decode_str(&data, SizeSpec::Terminated, enc).unwrap(), ("hi".to_string(), 6));
    }

    #[test]
    fn test_missing_terminator() {
        assert!(matches!(
            decode_str(b"no end", SizeSpec::Terminated, None),
            Err(NetError::MissingTerminator)
        ));
    }

    #[test]
    fn test_fixed_str_strips_padding() {
        assert_eq!(decode_str(b"ab\0\0\0tail", SizeSpec::Fixed(5), None).unwrap(), ("ab".to_string(), 5));
        let enc = Some(TextEncoding::Utf16Le);
        let data = encode_str("a", SizeSpec::Fixed(5), enc).unwrap();
        assert_eq!(decode_str(&data, SizeSpec::Fixed(5), enc).unwrap(), ("a".to_string(), 5));
    }

    #[test]
    fn test_prefixed_str_short_payload() {
        assert!(matches!(
            decode_str(b"\x05hi", SizeSpec::Prefixed(1), None),
            Err(NetError::InsufficientData { needed: 6, available: 3 })
        ));
        assert_eq!(decode_str(b"\x02hi!", SizeSpec::Prefixed(1), None).unwrap(), ("hi".to_string(), 3));
    }

    #[test]
    fn test_bool() {
        assert_eq!(encode_bool(true, SizeSpec::Fixed(1)).unwrap(), vec![1]);
        assert_eq!(encode_bool(false, SizeSpec::Fixed(2)).unwrap(), vec![0, 0]);
        assert_eq!(decode_bool(&[0x00, 0x80], SizeSpec::Fixed(2)).unwrap(), (true, 2));
        assert_eq!(decode_bool(&[0x00], SizeSpec::Auto).unwrap(), (false, 1));
    }

    #[test]
    fn test_block() {
        assert_eq!(decode_block(b"abc", SizeSpec::Fixed(512)).unwrap(), (b"abc".to_vec(), 3));
        assert_eq!(decode_block(b"abcdef", SizeSpec::Fixed(2)).unwrap(), (b"ab".to_vec(), 2));
        assert_eq!(decode_block(b"abc", SizeSpec::Auto).unwrap(), (b"abc".to_vec(), 3));
        assert_eq!(encode_block(b"abc", SizeSpec::Prefixed(2)).unwrap(), b"\x00\x03abc");
        assert_eq!(decode_block(b"\x00\x03abcd", SizeSpec::Prefixed(2)).unwrap(), (b"abc".to_vec(), 5));
    }

    #[test]
    fn test_oversized_fixed_width_rejected() {
        let huge = SizeSpec::Fixed(1 << 60);
        assert!(matches!(
            encode_int(1, huge, None),
            Err(NetError::InvalidSize { context: "integer encoding", .. })
        ));
        assert!(matches!(
            encode_str("x", huge, None),
            Err(NetError::InvalidSize { context: "string encoding", .. })
        ));
        assert!(encode_bool(true, huge).is_err());
        // length headers go through the integer path
        assert!(encode_str("x", SizeSpec::Prefixed(1 << 60), None).is_err());
        assert_eq!(encode_str("", SizeSpec::Fixed(MAX_FIELD_WIDTH), None).unwrap().len(), MAX_FIELD_WIDTH);
    }
}
