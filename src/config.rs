//! # Configuration Management
//!
//! Centralized configuration for buffers, the UDP transport and logging.
//!
//! ## Configuration Sources
//! - TOML files via `from_file()`
//! - TOML strings via `from_toml()`
//! - Environment variables via `from_env()` (`ENCHUFE_*`)
//! - Direct instantiation with defaults
//!
//! ## Buffer options
//! The `[buffer]` section mirrors the named keyword options a buffer accepts
//! (`int_size`, `str_encoding`, ...). Each one overrides a single default on the
//! buffer's own registry copy; unknown keys are rejected at parse time.

use crate::core::size::SizeSpec;
use crate::core::text::TextEncoding;
use crate::core::value::TypeTag;
use crate::error::{NetError, Result};
use crate::registry::{ParamValue, Registry};
use crate::utils::timeout;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Duration;
use tracing::Level;

/// Largest UDP payload over IPv4
pub const MAX_UDP_PAYLOAD: usize = 65_507;

/// Default local bind address for the transport
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:0";

/// Main configuration structure that contains all configurable settings
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
pub struct Config {
    /// Default overrides applied to every buffer built from this config
    #[serde(default)]
    pub buffer: BufferOptions,

    /// Transport configuration
    #[serde(default)]
    pub transport: TransportConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)
            .map_err(|e| NetError::ConfigError(format!("Failed to open config file: {e}")))?;

        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|e| NetError::ConfigError(format!("Failed to read config file: {e}")))?;

        Self::from_toml(&contents)
    }

    /// Load configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str::<Self>(content)
            .map_err(|e| NetError::ConfigError(format!("Failed to parse TOML: {e}")))
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(addr) = std::env::var("ENCHUFE_BIND_ADDRESS") {
            config.transport.bind_address = addr;
        }

        if let Ok(addr) = std::env::var("ENCHUFE_PEER_ADDRESS") {
            config.transport.peer_address = Some(addr);
        }

        if let Ok(size) = std::env::var("ENCHUFE_MAX_DATAGRAM_SIZE") {
            config.transport.max_datagram_size = size.parse::<usize>().map_err(|_| {
                NetError::ConfigError(format!("Invalid ENCHUFE_MAX_DATAGRAM_SIZE: '{size}'"))
            })?;
        }

        if let Ok(timeout) = std::env::var("ENCHUFE_RECV_TIMEOUT_MS") {
            let millis = timeout.parse::<u64>().map_err(|_| {
                NetError::ConfigError(format!("Invalid ENCHUFE_RECV_TIMEOUT_MS: '{timeout}'"))
            })?;
            config.transport.recv_timeout = Some(Duration::from_millis(millis));
        }

        if let Ok(level) = std::env::var("ENCHUFE_LOG_LEVEL") {
            config.logging.log_level = level
                .parse::<Level>()
                .map_err(|_| NetError::ConfigError(format!("Invalid ENCHUFE_LOG_LEVEL: '{level}'")))?;
        }

        if let Ok(json) = std::env::var("ENCHUFE_LOG_JSON") {
            config.logging.json_format = matches!(json.as_str(), "1" | "true" | "yes");
        }

        if let Ok(encoding) = std::env::var("ENCHUFE_STR_ENCODING") {
            config.buffer.str_encoding = Some(encoding.parse()?);
        }

        Ok(config)
    }

    /// Apply overrides to the default configuration
    pub fn default_with_overrides<F>(mutator: F) -> Self
    where
        F: FnOnce(&mut Self),
    {
        let mut config = Self::default();
        mutator(&mut config);
        config
    }

    /// Generate example configuration file content
    pub fn example_config() -> String {
        toml::to_string_pretty(&Self::default())
            .unwrap_or_else(|_| String::from("# Failed to generate example config"))
    }

    /// Save configuration to a file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| NetError::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)
            .map_err(|e| NetError::ConfigError(format!("Failed to write config file: {e}")))?;

        Ok(())
    }

    /// Validate the configuration for common issues and misconfigurations
    ///
    /// Returns a list of validation errors. Empty list means configuration is valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        errors.extend(self.buffer.validate());
        errors.extend(self.transport.validate());
        errors.extend(self.logging.validate());
        errors
    }

    /// Validate and return Result - convenience method
    pub fn validate_strict(&self) -> Result<()> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(NetError::ConfigError(format!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            )))
        }
    }
}

/// Per-buffer default overrides.
///
/// Sizes use the signed convention: `0` terminated, positive fixed, negative
/// length-prefixed, or the word `"auto"`. Unset fields leave the registry
/// default alone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BufferOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub int_size: Option<SizeSpec>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub int_signed: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub str_size: Option<SizeSpec>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub str_encoding: Option<TextEncoding>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bytes_size: Option<SizeSpec>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bool_size: Option<SizeSpec>,
}

impl BufferOptions {
    /// The overrides as `(tag, value)` pairs, in a fixed order
    pub fn defaults(&self) -> Vec<(TypeTag, ParamValue)> {
        let mut out = Vec::new();
        if let Some(size) = self.bytes_size {
            out.push((TypeTag::Bytes, ParamValue::Size(size)));
        }
        if let Some(size) = self.int_size {
            out.push((TypeTag::Int, ParamValue::Size(size)));
        }
        if let Some(signed) = self.int_signed {
            out.push((TypeTag::Int, ParamValue::Signed(Some(signed))));
        }
        if let Some(size) = self.str_size {
            out.push((TypeTag::Str, ParamValue::Size(size)));
        }
        if let Some(encoding) = self.str_encoding {
            out.push((TypeTag::Str, ParamValue::Encoding(Some(encoding))));
        }
        if let Some(size) = self.bool_size {
            out.push((TypeTag::Bool, ParamValue::Size(size)));
        }
        out
    }

    /// Write every set option into `registry`
    pub fn apply(&self, registry: &mut Registry) -> Result<()> {
        for (tag, value) in self.defaults() {
            registry.set_default(&tag, value)?;
        }
        Ok(())
    }

    /// Validate buffer options
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        // integers are never length-prefixed
        if let Some(size @ SizeSpec::Prefixed(_)) = self.int_size {
            errors.push(format!("int_size cannot be negative: {size}"));
        }

        for (name, value) in [
            ("int_size", self.int_size),
            ("str_size", self.str_size),
            ("bytes_size", self.bytes_size),
            ("bool_size", self.bool_size),
        ] {
            if let Some(SizeSpec::Fixed(n) | SizeSpec::Prefixed(n)) = value {
                if n > MAX_UDP_PAYLOAD {
                    errors.push(format!(
                        "{name} too large: {n} (maximum: {MAX_UDP_PAYLOAD})"
                    ));
                }
            }
        }

        if self.bool_size == Some(SizeSpec::Terminated) {
            errors.push("bool_size cannot be 0 (booleans have no terminator)".to_string());
        }

        errors
    }
}

/// Transport configuration
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct TransportConfig {
    /// Local bind address (e.g., "0.0.0.0:0")
    pub bind_address: String,

    /// Default peer to connect to, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub peer_address: Option<String>,

    /// Largest datagram accepted by `recv`; longer payloads are truncated
    pub max_datagram_size: usize,

    /// Receive timeout, unbounded when unset
    #[serde(default, with = "option_duration_serde", skip_serializing_if = "Option::is_none")]
    pub recv_timeout: Option<Duration>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            bind_address: String::from(DEFAULT_BIND_ADDRESS),
            peer_address: None,
            max_datagram_size: MAX_UDP_PAYLOAD,
            recv_timeout: None,
        }
    }
}

impl TransportConfig {
    /// Validate transport configuration
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.bind_address.is_empty() {
            errors.push("Bind address cannot be empty".to_string());
        } else if self.bind_address.parse::<crate::transport::Address>().is_err() {
            errors.push(format!(
                "Invalid bind address format: '{}' (expected format: '0.0.0.0:9000')",
                self.bind_address
            ));
        }

        if let Some(ref peer) = self.peer_address {
            if peer.parse::<crate::transport::Address>().is_err() {
                errors.push(format!(
                    "Invalid peer address format: '{peer}' (expected format: 'example.com:9000')"
                ));
            }
        }

        if self.max_datagram_size == 0 {
            errors.push("Max datagram size cannot be 0".to_string());
        } else if self.max_datagram_size > MAX_UDP_PAYLOAD {
            errors.push(format!(
                "Max datagram size too large: {} bytes (maximum: {MAX_UDP_PAYLOAD})",
                self.max_datagram_size
            ));
        }

        if let Some(recv) = self.recv_timeout {
            if recv.as_millis() < 10 {
                errors.push("Receive timeout too short (minimum: 10ms)".to_string());
            } else if recv > timeout::MAX_TIMEOUT {
                errors.push(format!(
                    "Receive timeout too long (maximum: {}s)",
                    timeout::MAX_TIMEOUT.as_secs()
                ));
            }
        }

        errors
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct LoggingConfig {
    /// Application name for logs
    pub app_name: String,

    /// Log level
    #[serde(with = "log_level_serde")]
    pub log_level: Level,

    /// Whether to use JSON formatting for logs
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            app_name: String::from("enchufe"),
            log_level: Level::INFO,
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// Validate logging configuration
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.app_name.is_empty() {
            errors.push("Application name cannot be empty".to_string());
        } else if self.app_name.len() > 64 {
            errors.push(format!(
                "Application name too long: {} characters (maximum: 64)",
                self.app_name.len()
            ));
        }

        errors
    }
}

/// Helper module for optional Duration serialization as milliseconds
mod option_duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match duration {
            Some(d) => serializer.serialize_u64(d.as_millis() as u64),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = Option::<u64>::deserialize(deserializer)?;
        Ok(millis.map(Duration::from_millis))
    }
}

/// Helper module for tracing::Level serialization/deserialization
mod log_level_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::str::FromStr;
    use tracing::Level;

    pub fn serialize<S>(level: &Level, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let level_str = match *level {
            Level::TRACE => "trace",
            Level::DEBUG => "debug",
            Level::INFO => "info",
            Level::WARN => "warn",
            Level::ERROR => "error",
        };
        level_str.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Level, D::Error>
    where
        D: Deserializer<'de>,
    {
        let level_str = String::deserialize(deserializer)?;
        Level::from_str(&level_str)
            .map_err(|_| serde::de::Error::custom(format!("Invalid log level: {level_str}")))
    }
}
