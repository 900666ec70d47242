//! Typed values carried in and out of a buffer, and the tags that select their converters.

use std::any::Any;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// Registry key selecting which converter pair applies to a value
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TypeTag {
    /// Raw byte block
    Bytes,
    /// Signed or unsigned integer
    Int,
    /// Text string
    Str,
    /// Boolean
    Bool,
    /// User-registered type, identified by name
    Custom(Cow<'static, str>),
}

impl TypeTag {
    /// Tag for a custom converter
    pub fn custom(name: impl Into<Cow<'static, str>>) -> Self {
        TypeTag::Custom(name.into())
    }

    /// Name used in option keys and error messages
    pub fn name(&self) -> &str {
        match self {
            TypeTag::Bytes => "bytes",
            TypeTag::Int => "int",
            TypeTag::Str => "str",
            TypeTag::Bool => "bool",
            TypeTag::Custom(name) => name,
        }
    }

    /// Look up a built-in tag by its name
    pub fn builtin(name: &str) -> Option<Self> {
        match name {
            "bytes" => Some(TypeTag::Bytes),
            "int" => Some(TypeTag::Int),
            "str" => Some(TypeTag::Str),
            "bool" => Some(TypeTag::Bool),
            _ => None,
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Value of a user-registered type.
///
/// The payload is type-erased; converters registered for [`CustomValue::tag`]
/// recover it with [`CustomValue::downcast_ref`].
#[derive(Clone)]
pub struct CustomValue {
    tag: TypeTag,
    inner: Arc<dyn Any + Send + Sync>,
}

impl CustomValue {
    pub fn new<T: Any + Send + Sync>(tag: TypeTag, value: T) -> Self {
        Self {
            tag,
            inner: Arc::new(value),
        }
    }

    pub fn tag(&self) -> &TypeTag {
        &self.tag
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }
}

impl fmt::Debug for CustomValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomValue")
            .field("tag", &self.tag)
            .finish_non_exhaustive()
    }
}

// Payloads are opaque, so two custom values are equal only when they share one.
impl PartialEq for CustomValue {
    fn eq(&self, other: &Self) -> bool {
        self.tag == other.tag && Arc::ptr_eq(&self.inner, &other.inner)
    }
}

/// A value that can be appended to or popped from a buffer
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i128),
    Str(String),
    Bool(bool),
    Bytes(Vec<u8>),
    Custom(CustomValue),
}

impl Value {
    /// The tag used to dispatch this value through a registry
    pub fn tag(&self) -> TypeTag {
        match self {
            Value::Int(_) => TypeTag::Int,
            Value::Str(_) => TypeTag::Str,
            Value::Bool(_) => TypeTag::Bool,
            Value::Bytes(_) => TypeTag::Bytes,
            Value::Custom(custom) => custom.tag().clone(),
        }
    }

    pub fn as_int(&self) -> Option<i128> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_custom(&self) -> Option<&CustomValue> {
        match self {
            Value::Custom(v) => Some(v),
            _ => None,
        }
    }
}

macro_rules! int_value {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::Int(i128::from(v))
                }
            }
        )*
    };
}

int_value!(i8, i16, i32, i64, i128, u8, u16, u32, u64);

// pointer-width integers are at most 64 bits on every supported target
impl From<usize> for Value {
    fn from(v: usize) -> Self {
        Value::Int(v as i128)
    }
}

impl From<isize> for Value {
    fn from(v: isize) -> Self {
        Value::Int(v as i128)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Value::Bytes(v.to_vec())
    }
}

impl<const N: usize> From<&[u8; N]> for Value {
    fn from(v: &[u8; N]) -> Self {
        Value::Bytes(v.to_vec())
    }
}

impl From<bytes::Bytes> for Value {
    fn from(v: bytes::Bytes) -> Self {
        Value::Bytes(v.to_vec())
    }
}

impl From<CustomValue> for Value {
    fn from(v: CustomValue) -> Self {
        Value::Custom(v)
    }
}
