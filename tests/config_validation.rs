//! Integration tests for configuration validation

#![allow(clippy::expect_used, clippy::unwrap_used)]

use enchufe::config::{BufferOptions, Config, LoggingConfig, TransportConfig};
use enchufe::{Buffer, NetError, ParamName, ParamValue, SizeSpec, TextEncoding, TypeTag};
use std::time::Duration;
use tracing::Level;

#[test]
fn test_default_config_validates() {
    let config = Config::default();
    let errors = config.validate();
    assert!(
        errors.is_empty(),
        "Default config should be valid, but got errors: {:?}",
        errors
    );
    assert!(config.validate_strict().is_ok());
}

#[test]
fn test_invalid_bind_address() {
    let mut config = Config::default();
    config.transport.bind_address = "invalid_address".to_string();

    let errors = config.validate();
    assert!(errors.iter().any(|e| e.contains("Invalid bind address")));
}

#[test]
fn test_empty_bind_address() {
    let mut config = Config::default();
    config.transport.bind_address = String::new();

    let errors = config.validate();
    assert!(errors.iter().any(|e| e.contains("cannot be empty")));
}

#[test]
fn test_hostname_peer_accepted() {
    let mut config = Config::default();
    config.transport.peer_address = Some("dns.example.net:53".to_string());
    assert!(config.validate().is_empty());

    config.transport.peer_address = Some("dns.example.net".to_string());
    assert!(config
        .validate()
        .iter()
        .any(|e| e.contains("Invalid peer address")));
}

#[test]
fn test_datagram_size_bounds() {
    let mut transport = TransportConfig {
        max_datagram_size: 0,
        ..TransportConfig::default()
    };
    assert!(transport.validate().iter().any(|e| e.contains("cannot be 0")));

    transport.max_datagram_size = 70_000;
    assert!(transport.validate().iter().any(|e| e.contains("too large")));
}

#[test]
fn test_recv_timeout_bounds() {
    let mut transport = TransportConfig {
        recv_timeout: Some(Duration::from_millis(1)),
        ..TransportConfig::default()
    };
    assert!(transport.validate().iter().any(|e| e.contains("too short")));

    transport.recv_timeout = Some(Duration::from_secs(3600));
    assert!(transport.validate().iter().any(|e| e.contains("too long")));
}

#[test]
fn test_logging_app_name() {
    let logging = LoggingConfig {
        app_name: "x".repeat(65),
        ..LoggingConfig::default()
    };
    assert!(logging.validate().iter().any(|e| e.contains("too long")));
}

#[test]
fn test_validate_strict_lists_every_error() {
    let mut config = Config::default();
    config.transport.bind_address = String::new();
    config.logging.app_name = String::new();

    match config.validate_strict() {
        Err(NetError::ConfigError(message)) => {
            assert!(message.contains("Bind address cannot be empty"));
            assert!(message.contains("Application name cannot be empty"));
        }
        other => panic!("Expected a ConfigError, got {other:?}"),
    }
}

#[test]
fn test_toml_round_trip() {
    let config = Config::default_with_overrides(|c| {
        c.buffer.int_size = Some(SizeSpec::Fixed(2));
        c.buffer.str_size = Some(SizeSpec::Auto);
        c.buffer.str_encoding = Some(TextEncoding::Utf16Be);
        c.transport.peer_address = Some("127.0.0.1:5353".to_string());
        c.transport.recv_timeout = Some(Duration::from_millis(750));
        c.logging.log_level = Level::DEBUG;
        c.logging.json_format = true;
    });

    let text = toml::to_string_pretty(&config).unwrap();
    let parsed = Config::from_toml(&text).unwrap();
    assert_eq!(parsed, config);
}

#[test]
fn test_example_config_parses() {
    let example = Config::example_config();
    let parsed = Config::from_toml(&example).expect("example config should parse");
    assert_eq!(parsed, Config::default());
}

#[test]
fn test_save_and_load_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("enchufe.toml");

    let config = Config::default_with_overrides(|c| {
        c.buffer.bytes_size = Some(SizeSpec::Prefixed(2));
        c.transport.max_datagram_size = 1200;
    });
    config.save_to_file(&path).unwrap();

    let loaded = Config::from_file(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = Config::from_file(dir.path().join("absent.toml"));
    assert!(matches!(result, Err(NetError::ConfigError(_))));
}

#[test]
fn test_unknown_buffer_option_rejected() {
    let result = Config::from_toml(
        r#"
        [buffer]
        int_width = 2
        "#,
    );
    assert!(matches!(result, Err(NetError::ConfigError(_))));
}

#[test]
fn test_invalid_log_level_rejected() {
    let result = Config::from_toml(
        r#"
        [logging]
        app_name = "enchufe"
        log_level = "loud"
        json_format = false
        "#,
    );
    assert!(result.is_err());
}

#[test]
fn test_encoding_names_in_toml() {
    let config = Config::from_toml(
        r#"
        [buffer]
        str_encoding = "latin-1"
        str_size = -1
        "#,
    )
    .unwrap();
    assert_eq!(config.buffer.str_encoding, Some(TextEncoding::Latin1));
    assert_eq!(config.buffer.str_size, Some(SizeSpec::Prefixed(1)));
}

#[test]
fn test_buffer_from_options() {
    let options = BufferOptions {
        int_size: Some(SizeSpec::Fixed(4)),
        int_signed: Some(true),
        ..BufferOptions::default()
    };
    let mut buffer = Buffer::from_options("", &options).unwrap();
    buffer.append(-2).unwrap();
    assert_eq!(buffer.as_slice(), &[0xFF, 0xFF, 0xFF, 0xFE]);
    assert_eq!(
        buffer.get_default(&TypeTag::Int, ParamName::Size).unwrap(),
        ParamValue::Size(SizeSpec::Fixed(4))
    );
    assert_eq!(buffer.pop(TypeTag::Int).unwrap().as_int(), Some(-2));
}

#[test]
fn test_negative_int_size_flagged() {
    let mut config = Config::default();
    config.buffer.int_size = Some(SizeSpec::Prefixed(1));
    assert!(config.validate().iter().any(|e| e.contains("int_size")));
}

#[test]
fn test_auto_size_in_toml() {
    let config = Config::from_toml(
        r#"
        [buffer]
        str_size = "auto"
        int_size = 0
        "#,
    )
    .unwrap();
    assert_eq!(config.buffer.str_size, Some(SizeSpec::Auto));
    assert_eq!(config.buffer.int_size, Some(SizeSpec::Terminated));

    let mut buffer = Buffer::from_options("", &config.buffer).unwrap();
    assert_eq!(
        buffer.get_default(&TypeTag::Str, ParamName::Size).unwrap(),
        ParamValue::Size(SizeSpec::Auto)
    );
    // no terminator with an auto-sized string
    buffer.append("abc").unwrap();
    assert_eq!(buffer.as_slice(), b"abc");

    let bad = Config::from_toml(
        r#"
        [buffer]
        str_size = "huge"
        "#,
    );
    assert!(matches!(bad, Err(NetError::ConfigError(_))));
}
