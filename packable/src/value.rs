//! Values the engine packs and the type names that classify them.

use std::borrow::Cow;
use std::fmt;

use pack_codec::Integer;

/// Name of a registered type.
///
/// Types form a tree through explicitly declared parents, rooted at
/// [`TypeName::OBJECT`]. The three primitive kinds are children of the root.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeName(Cow<'static, str>);

impl TypeName {
    pub const OBJECT: TypeName = TypeName::from_static("Object");
    pub const INTEGER: TypeName = TypeName::from_static("Integer");
    pub const FLOAT: TypeName = TypeName::from_static("Float");
    pub const STRING: TypeName = TypeName::from_static("String");

    pub const fn from_static(name: &'static str) -> Self {
        TypeName(Cow::Borrowed(name))
    }

    pub fn new(name: impl Into<String>) -> Self {
        TypeName(Cow::Owned(name.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for TypeName {
    fn from(name: &'static str) -> Self {
        TypeName::from_static(name)
    }
}

impl From<String> for TypeName {
    fn from(name: String) -> Self {
        TypeName::new(name)
    }
}

/// A user-defined value: a declared type plus ordered fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Composite {
    pub type_name: TypeName,
    pub fields: Vec<Value>,
}

impl Composite {
    pub fn new(type_name: impl Into<TypeName>, fields: Vec<Value>) -> Self {
        Composite {
            type_name: type_name.into(),
            fields,
        }
    }
}

/// Anything that can be packed.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(Integer),
    Float(f64),
    Bytes(Vec<u8>),
    Composite(Composite),
}

impl Value {
    /// The type used to look up packers for this value.
    pub fn type_name(&self) -> TypeName {
        match self {
            Value::Int(_) => TypeName::INTEGER,
            Value::Float(_) => TypeName::FLOAT,
            Value::Bytes(_) => TypeName::STRING,
            Value::Composite(c) => c.type_name.clone(),
        }
    }

    pub fn as_integer(&self) -> Option<&Integer> {
        match self {
            Value::Int(n) => Some(n),
            _ => None,
        }
    }

    /// The integer, when it fits in an `i64`.
    pub fn as_i64(&self) -> Option<i64> {
        self.as_integer().and_then(|n| i64::try_from(n).ok())
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_composite(&self) -> Option<&Composite> {
        match self {
            Value::Composite(c) => Some(c),
            _ => None,
        }
    }
}

macro_rules! int_value {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::Int(Integer::from(v))
                }
            }
        )*
    };
}

int_value!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl From<Integer> for Value {
    fn from(v: Integer) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(f64::from(v))
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Bytes(v.as_bytes().to_vec())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Bytes(v.into_bytes())
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Value::Bytes(v.to_vec())
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

impl From<Composite> for Value {
    fn from(v: Composite) -> Self {
        Value::Composite(v)
    }
}

/// Result of a read: one value when one entry was requested, otherwise the
/// values in request order.
#[derive(Debug, Clone, PartialEq)]
pub enum Unpacked {
    One(Value),
    Many(Vec<Value>),
}

impl Unpacked {
    pub fn into_vec(self) -> Vec<Value> {
        match self {
            Unpacked::One(v) => vec![v],
            Unpacked::Many(vs) => vs,
        }
    }

    /// The value of a single-entry read.
    pub fn into_single(self) -> Option<Value> {
        match self {
            Unpacked::One(v) => Some(v),
            Unpacked::Many(_) => None,
        }
    }
}
