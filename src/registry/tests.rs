// test-only module included via registry/mod.rs
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::net::Ipv4Addr;

use crate::core::codec;
use crate::core::size::SizeSpec;
use crate::core::text::TextEncoding;
use crate::core::value::{CustomValue, TypeTag, Value};
use crate::error::{NetError, Result};
use crate::registry::*;

fn ipv4_tag() -> TypeTag {
    TypeTag::custom("ipv4")
}

/// Four address octets, optionally behind a length header
struct Ipv4Codec;

impl Encode for Ipv4Codec {
    fn parameters(&self) -> &[ParamName] {
        &[ParamName::Size]
    }

    fn defaults(&self) -> Params {
        Params {
            size: SizeSpec::Fixed(4),
            ..Params::default()
        }
    }

    fn encode(&self, value: &Value, params: &Params) -> Result<Vec<u8>> {
        let addr = value
            .as_custom()
            .and_then(|c| c.downcast_ref::<Ipv4Addr>())
            .ok_or_else(|| NetError::TypeMismatch("expected an Ipv4Addr".to_string()))?;
        codec::encode_block(&addr.octets(), params.size)
    }
}

impl Decode for Ipv4Codec {
    fn parameters(&self) -> &[ParamName] {
        &[ParamName::Size]
    }

    fn defaults(&self) -> Params {
        Encode::defaults(self)
    }

    fn decode(&self, data: &[u8], params: &Params) -> Result<(Value, usize)> {
        let (octets, used) = codec::decode_block(data, params.size)?;
        let octets: [u8; 4] = octets.try_into().map_err(|_| NetError::InsufficientData {
            needed: 4,
            available: data.len(),
        })?;
        let addr = Ipv4Addr::from(octets);
        Ok((Value::Custom(CustomValue::new(ipv4_tag(), addr)), used))
    }
}

/// Decoder whose size default disagrees with [`Ipv4Codec`]'s encoder
struct SkewedDecoder;

impl Decode for SkewedDecoder {
    fn parameters(&self) -> &[ParamName] {
        &[ParamName::Size]
    }

    fn defaults(&self) -> Params {
        Params {
            size: SizeSpec::Fixed(8),
            ..Params::default()
        }
    }

    fn decode(&self, _data: &[u8], _params: &Params) -> Result<(Value, usize)> {
        Ok((Value::Int(0), 0))
    }
}

/// Encoder that lists one parameter twice
struct RepeatingEncoder;

impl Encode for RepeatingEncoder {
    fn parameters(&self) -> &[ParamName] {
        &[ParamName::Size, ParamName::Size]
    }

    fn defaults(&self) -> Params {
        Params::default()
    }

    fn encode(&self, _value: &Value, _params: &Params) -> Result<Vec<u8>> {
        Ok(Vec::new())
    }
}

#[test]
fn test_builtin_defaults() {
    let registry = Registry::with_builtins();
    assert_eq!(
        registry.get_default(&TypeTag::Bytes, ParamName::Size).unwrap(),
        ParamValue::Size(SizeSpec::Fixed(512))
    );
    assert_eq!(
        registry.get_default(&TypeTag::Int, ParamName::Size).unwrap(),
        ParamValue::Size(SizeSpec::Auto)
    );
    assert_eq!(
        registry.get_default(&TypeTag::Int, ParamName::Signed).unwrap(),
        ParamValue::Signed(None)
    );
    assert_eq!(
        registry.get_default(&TypeTag::Str, ParamName::Size).unwrap(),
        ParamValue::Size(SizeSpec::Terminated)
    );
    assert_eq!(
        registry.get_default(&TypeTag::Str, ParamName::Encoding).unwrap(),
        ParamValue::Encoding(None)
    );
    assert_eq!(
        registry.get_default(&TypeTag::Bool, ParamName::Size).unwrap(),
        ParamValue::Size(SizeSpec::Fixed(1))
    );
}

#[test]
fn test_every_builtin_converter_registers() {
    let registry = Registry::with_builtins();
    let expected: Vec<TypeTag> = builtin::converters().into_iter().map(|(tag, _, _)| tag).collect();
    assert_eq!(expected.len(), 4);
    for tag in &expected {
        assert!(registry.contains(tag), "missing built-in {tag}");
    }
    assert_eq!(registry.tags().count(), expected.len());
}

#[test]
fn test_register_custom_converter() {
    let mut registry = Registry::with_builtins();
    registry.register(ipv4_tag(), Ipv4Codec, Ipv4Codec).unwrap();
    assert!(registry.contains(&ipv4_tag()));

    let entry = registry.entry(&ipv4_tag()).expect("registered");
    let addr = Value::Custom(CustomValue::new(ipv4_tag(), Ipv4Addr::new(10, 0, 0, 1)));
    let bytes = entry.encode(&addr, &Overrides::default()).unwrap();
    assert_eq!(bytes, vec![10, 0, 0, 1]);

    let (decoded, used) = entry.decode(&[192, 168, 1, 2, 99], &Overrides::default()).unwrap();
    assert_eq!(used, 4);
    let decoded = decoded.as_custom().and_then(|c| c.downcast_ref::<Ipv4Addr>()).copied();
    assert_eq!(decoded, Some(Ipv4Addr::new(192, 168, 1, 2)));
}

#[test]
fn test_duplicate_registration_keeps_first() {
    let mut registry = Registry::with_builtins();
    registry.register(ipv4_tag(), Ipv4Codec, Ipv4Codec).unwrap();
    registry
        .set_default(&ipv4_tag(), ParamValue::Size(SizeSpec::Prefixed(1)))
        .unwrap();

    let result = registry.register(ipv4_tag(), Ipv4Codec, Ipv4Codec);
    assert!(matches!(result, Err(NetError::RegistrationContract { .. })));

    // the original entry, including its edited default, is untouched
    assert_eq!(
        registry.get_default(&ipv4_tag(), ParamName::Size).unwrap(),
        ParamValue::Size(SizeSpec::Prefixed(1))
    );
}

#[test]
fn test_builtin_tags_cannot_be_reregistered() {
    let mut registry = Registry::with_builtins();
    let result = registry.register(TypeTag::Int, builtin::IntCodec, builtin::IntCodec);
    assert!(matches!(result, Err(NetError::RegistrationContract { .. })));
}

#[test]
fn test_mismatched_shared_defaults_rejected() {
    let mut registry = Registry::with_builtins();
    let result = registry.register(ipv4_tag(), SkewedDecoder, Ipv4Codec);
    match result {
        Err(NetError::RegistrationContract { tag, reason }) => {
            assert_eq!(tag, "ipv4");
            assert!(reason.contains("different defaults"));
        }
        other => panic!("Unexpected result: {other:?}"),
    }
    assert!(!registry.contains(&ipv4_tag()));
}

#[test]
fn test_repeated_parameter_rejected() {
    let mut registry = Registry::empty();
    let result = registry.register(TypeTag::custom("twice"), Ipv4Codec, RepeatingEncoder);
    assert!(matches!(result, Err(NetError::RegistrationContract { .. })));
}

#[test]
fn test_empty_custom_tag_rejected() {
    let mut registry = Registry::empty();
    let result = registry.register(TypeTag::custom("  "), Ipv4Codec, Ipv4Codec);
    assert!(matches!(result, Err(NetError::RegistrationContract { .. })));
}

#[test]
fn test_unregister() {
    let mut registry = Registry::with_builtins();
    registry.unregister(&TypeTag::Bool).unwrap();
    assert!(!registry.contains(&TypeTag::Bool));
    assert!(matches!(
        registry.unregister(&TypeTag::Bool),
        Err(NetError::UnregisteredType(name)) if name == "bool"
    ));
}

#[test]
fn test_defaults_on_unknown_type() {
    let mut registry = Registry::with_builtins();
    assert!(matches!(
        registry.get_default(&ipv4_tag(), ParamName::Size),
        Err(NetError::UnregisteredType(_))
    ));
    assert!(matches!(
        registry.set_default(&ipv4_tag(), ParamValue::Size(SizeSpec::Fixed(1))),
        Err(NetError::UnregisteredType(_))
    ));
}

#[test]
fn test_undeclared_parameter_rejected() {
    let mut registry = Registry::with_builtins();
    assert!(matches!(
        registry.set_default(&TypeTag::Bool, ParamValue::Encoding(Some(TextEncoding::Ascii))),
        Err(NetError::ConfigError(_))
    ));
    assert!(matches!(
        registry.get_default(&TypeTag::Int, ParamName::Encoding),
        Err(NetError::ConfigError(_))
    ));
}

#[test]
fn test_set_default_arg_by_name() {
    let mut registry = Registry::with_builtins();
    registry
        .set_default_arg(&TypeTag::Str, "encoding", Arg::Encoding(TextEncoding::Utf16Be))
        .unwrap();
    assert_eq!(
        registry.get_default(&TypeTag::Str, ParamName::Encoding).unwrap(),
        ParamValue::Encoding(Some(TextEncoding::Utf16Be))
    );

    for reserved in ["to", "from"] {
        assert!(matches!(
            registry.set_default_arg(&TypeTag::Str, reserved, Arg::None),
            Err(NetError::ConfigError(_))
        ));
    }
    assert!(registry.set_default_arg(&TypeTag::Str, "size", Arg::Bool(true)).is_err());
}

#[test]
fn test_clone_is_independent() {
    let mut original = Registry::with_builtins();
    let copy = original.clone();
    original
        .set_default(&TypeTag::Int, ParamValue::Size(SizeSpec::Fixed(8)))
        .unwrap();
    original.register(ipv4_tag(), Ipv4Codec, Ipv4Codec).unwrap();

    assert_eq!(
        copy.get_default(&TypeTag::Int, ParamName::Size).unwrap(),
        ParamValue::Size(SizeSpec::Auto)
    );
    assert!(!copy.contains(&ipv4_tag()));
}

#[test]
fn test_global_registration_does_not_reach_existing_snapshots() {
    let tag = TypeTag::custom("registry-test-ipv4");
    let before = clone_registry();
    global_register(tag.clone(), Ipv4Codec, Ipv4Codec).unwrap();

    assert!(!before.contains(&tag));
    assert!(clone_registry().contains(&tag));
    assert!(global_contains(&tag).unwrap());

    global_unregister(&tag).unwrap();
    assert!(!clone_registry().contains(&tag));
    assert!(matches!(global_unregister(&tag), Err(NetError::UnregisteredType(_))));
}

#[test]
fn test_overrides_resolve_against_entry_order() {
    let registry = Registry::with_builtins();
    let entry = registry.entry(&TypeTag::Int).unwrap();
    let params = entry
        .encode_params(&Overrides::positional([Arg::Int(2), Arg::Bool(true)]))
        .unwrap();
    assert_eq!(params.size, SizeSpec::Fixed(2));
    assert_eq!(params.signed, Some(true));

    let decode = registry
        .decode_params(&TypeTag::Str, &Overrides::named([ParamValue::Size(SizeSpec::Fixed(3))]))
        .unwrap();
    assert_eq!(decode.size, SizeSpec::Fixed(3));
    assert_eq!(decode.encoding, None);
    assert!(matches!(
        registry.encode_params(&ipv4_tag(), &Overrides::default()),
        Err(NetError::UnregisteredType(_))
    ));

    let str_entry = registry.entry(&TypeTag::Str).unwrap();
    assert!(str_entry
        .encode_params(&Overrides::named([ParamValue::Signed(Some(true))]))
        .is_err());
}
