//! Converter parameters: names, typed values, defaults and per-call overrides.

use std::fmt;
use std::str::FromStr;

use crate::core::size::SizeSpec;
use crate::core::text::TextEncoding;
use crate::error::{constants, NetError, Result};

/// Name of a converter parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ParamName {
    Size,
    Signed,
    Encoding,
}

impl ParamName {
    pub fn as_str(self) -> &'static str {
        match self {
            ParamName::Size => "size",
            ParamName::Signed => "signed",
            ParamName::Encoding => "encoding",
        }
    }
}

impl fmt::Display for ParamName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParamName {
    type Err = NetError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "size" => Ok(ParamName::Size),
            "signed" => Ok(ParamName::Signed),
            "encoding" => Ok(ParamName::Encoding),
            "to" | "from" => Err(NetError::ConfigError(format!(
                "{}: '{s}'",
                constants::ERR_RESERVED_PARAMETER
            ))),
            other => Err(NetError::ConfigError(format!("Unknown parameter name: '{other}'"))),
        }
    }
}

/// Typed value of one named parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamValue {
    Size(SizeSpec),
    Signed(Option<bool>),
    Encoding(Option<TextEncoding>),
}

impl ParamValue {
    pub fn name(&self) -> ParamName {
        match self {
            ParamValue::Size(_) => ParamName::Size,
            ParamValue::Signed(_) => ParamName::Signed,
            ParamValue::Encoding(_) => ParamName::Encoding,
        }
    }

    /// Interpret an untyped argument as the value of `name`
    pub fn from_arg(name: ParamName, arg: Arg) -> Result<Self> {
        match (name, arg) {
            (ParamName::Size, Arg::None) => Ok(ParamValue::Size(SizeSpec::Auto)),
            (ParamName::Size, Arg::Int(n)) => Ok(ParamValue::Size(SizeSpec::from_signed(n))),
            (ParamName::Signed, Arg::None) => Ok(ParamValue::Signed(None)),
            (ParamName::Signed, Arg::Bool(b)) => Ok(ParamValue::Signed(Some(b))),
            (ParamName::Encoding, Arg::None) => Ok(ParamValue::Encoding(None)),
            (ParamName::Encoding, Arg::Encoding(e)) => Ok(ParamValue::Encoding(Some(e))),
            (name, arg) => Err(NetError::ConfigError(format!(
                "Invalid value {arg:?} for parameter '{name}'"
            ))),
        }
    }
}

/// Effective parameters handed to a converter.
///
/// Fields a converter does not declare keep their neutral defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Params {
    pub size: SizeSpec,
    pub signed: Option<bool>,
    pub encoding: Option<TextEncoding>,
}

impl Params {
    pub fn get(&self, name: ParamName) -> ParamValue {
        match name {
            ParamName::Size => ParamValue::Size(self.size),
            ParamName::Signed => ParamValue::Signed(self.signed),
            ParamName::Encoding => ParamValue::Encoding(self.encoding),
        }
    }

    pub fn set(&mut self, value: ParamValue) {
        match value {
            ParamValue::Size(size) => self.size = size,
            ParamValue::Signed(signed) => self.signed = signed,
            ParamValue::Encoding(encoding) => self.encoding = encoding,
        }
    }

    pub fn with(mut self, value: ParamValue) -> Self {
        self.set(value);
        self
    }
}

/// Untyped positional argument
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arg {
    None,
    Int(i64),
    Bool(bool),
    Encoding(TextEncoding),
}

impl From<i64> for Arg {
    fn from(v: i64) -> Self {
        Arg::Int(v)
    }
}

impl From<i32> for Arg {
    fn from(v: i32) -> Self {
        Arg::Int(i64::from(v))
    }
}

impl From<bool> for Arg {
    fn from(v: bool) -> Self {
        Arg::Bool(v)
    }
}

impl From<TextEncoding> for Arg {
    fn from(v: TextEncoding) -> Self {
        Arg::Encoding(v)
    }
}

impl<T: Into<Arg>> From<Option<T>> for Arg {
    fn from(v: Option<T>) -> Self {
        v.map_or(Arg::None, Into::into)
    }
}

/// Per-call parameter overrides.
///
/// Positional arguments map onto a converter's declared parameter order and
/// named overrides are applied after them; one parameter may not be given both
/// ways.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub positional: Vec<Arg>,
    pub named: Vec<ParamValue>,
}

impl Overrides {
    pub fn named(values: impl IntoIterator<Item = ParamValue>) -> Self {
        Self {
            positional: Vec::new(),
            named: values.into_iter().collect(),
        }
    }

    pub fn positional(args: impl IntoIterator<Item = Arg>) -> Self {
        Self {
            positional: args.into_iter().collect(),
            named: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.named.is_empty()
    }

    pub fn push(&mut self, value: ParamValue) {
        self.named.push(value);
    }

    /// Resolve against a converter's declared parameter order
    pub fn resolve(&self, order: &[ParamName]) -> Result<Vec<ParamValue>> {
        if self.positional.len() > order.len() {
            return Err(NetError::ConfigError(format!(
                "{}: got {}, accepts {}",
                constants::ERR_TOO_MANY_ARGUMENTS,
                self.positional.len(),
                order.len()
            )));
        }
        let mut resolved = order
            .iter()
            .zip(&self.positional)
            .map(|(&name, &arg)| ParamValue::from_arg(name, arg))
            .collect::<Result<Vec<_>>>()?;
        let given_positionally = &order[..self.positional.len()];

        for value in &self.named {
            let name = value.name();
            if !order.contains(&name) {
                return Err(NetError::ConfigError(format!("Unexpected parameter '{name}'")));
            }
            if given_positionally.contains(&name) {
                return Err(NetError::ConfigError(format!(
                    "Parameter '{name}' given both positionally and by name"
                )));
            }
            resolved.push(*value);
        }
        Ok(resolved)
    }
}
