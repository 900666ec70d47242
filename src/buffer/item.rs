//! Values and type descriptors annotated with per-call parameter overrides.

use crate::core::size::SizeSpec;
use crate::core::text::TextEncoding;
use crate::core::value::{TypeTag, Value};
use crate::registry::{Arg, Overrides, ParamValue};

/// A value to append or insert, with optional per-call overrides
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub value: Value,
    pub overrides: Overrides,
}

impl Item {
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
            overrides: Overrides::default(),
        }
    }

    /// Positional form `[value, size, ...]`, following the converter's parameter order
    pub fn positional(value: impl Into<Value>, args: impl IntoIterator<Item = Arg>) -> Self {
        Self {
            value: value.into(),
            overrides: Overrides::positional(args),
        }
    }

    pub fn with(mut self, value: ParamValue) -> Self {
        self.overrides.push(value);
        self
    }

    pub fn size(self, size: impl Into<SizeSpec>) -> Self {
        self.with(ParamValue::Size(size.into()))
    }

    /// Explicit auto size, overriding any configured default
    pub fn auto_size(self) -> Self {
        self.with(ParamValue::Size(SizeSpec::Auto))
    }

    pub fn signed(self, signed: bool) -> Self {
        self.with(ParamValue::Signed(Some(signed)))
    }

    pub fn encoding(self, encoding: TextEncoding) -> Self {
        self.with(ParamValue::Encoding(Some(encoding)))
    }

    /// Raw bytes with no overrides bypass the registry entirely
    pub(crate) fn is_verbatim(&self) -> bool {
        matches!(self.value, Value::Bytes(_)) && self.overrides.is_empty()
    }
}

impl<T: Into<Value>> From<T> for Item {
    fn from(value: T) -> Self {
        Item::new(value)
    }
}

/// A type tag to pop or peek, with optional per-call overrides
#[derive(Debug, Clone, PartialEq)]
pub struct Descriptor {
    pub tag: TypeTag,
    pub overrides: Overrides,
}

impl Descriptor {
    pub fn new(tag: TypeTag) -> Self {
        Self {
            tag,
            overrides: Overrides::default(),
        }
    }

    /// Positional form `[type, size, ...]`
    pub fn positional(tag: TypeTag, args: impl IntoIterator<Item = Arg>) -> Self {
        Self {
            tag,
            overrides: Overrides::positional(args),
        }
    }

    pub fn with(mut self, value: ParamValue) -> Self {
        self.overrides.push(value);
        self
    }

    pub fn size(self, size: impl Into<SizeSpec>) -> Self {
        self.with(ParamValue::Size(size.into()))
    }

    pub fn auto_size(self) -> Self {
        self.with(ParamValue::Size(SizeSpec::Auto))
    }

    pub fn signed(self, signed: bool) -> Self {
        self.with(ParamValue::Signed(Some(signed)))
    }

    pub fn encoding(self, encoding: TextEncoding) -> Self {
        self.with(ParamValue::Encoding(Some(encoding)))
    }
}

impl From<TypeTag> for Descriptor {
    fn from(tag: TypeTag) -> Self {
        Descriptor::new(tag)
    }
}

impl TypeTag {
    /// Start a [`Descriptor`] for this tag
    pub fn descriptor(self) -> Descriptor {
        Descriptor::new(self)
    }
}
