#![no_main]

use enchufe::{Buffer, SizeSpec, TextEncoding, TypeTag};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // first byte picks the framing, the rest is wire data; decoders must never panic
    let Some((&selector, wire)) = data.split_first() else {
        return;
    };
    let size = SizeSpec::from_signed(i64::from(selector as i8) % 24);
    let encoding = match selector % 3 {
        0 => TextEncoding::Utf8,
        1 => TextEncoding::Utf16Le,
        _ => TextEncoding::Latin1,
    };

    let mut buffer = Buffer::from_bytes(wire);
    let _ = buffer.peek(TypeTag::Int.descriptor().size(size));
    let _ = buffer.peek(TypeTag::Bool.descriptor().size(size));
    let _ = buffer.peek(TypeTag::Bytes.descriptor().size(size));
    while buffer
        .pop(TypeTag::Str.descriptor().size(size).encoding(encoding))
        .is_ok_and(|_| !buffer.is_empty())
    {}
});
