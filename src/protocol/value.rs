//! Dynamic field values.

use crate::protocol::instance::MessageInstance;

/// A single value stored in a message field.
///
/// Integers are held widened; whether a value fits its field is checked when
/// the instance is encoded.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// uint32, uint64, fixed32 and fixed64 fields
    UInt(u64),
    /// sint32 and sint64 fields
    SInt(i64),
    Bool(bool),
    Bytes(Vec<u8>),
    String(String),
    /// Enum number
    Enum(i32),
    Message(MessageInstance),
}

impl Value {
    /// Short name of the value's variant, used in error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::UInt(_) => "unsigned integer",
            Value::SInt(_) => "signed integer",
            Value::Bool(_) => "bool",
            Value::Bytes(_) => "bytes",
            Value::String(_) => "string",
            Value::Enum(_) => "enum",
            Value::Message(_) => "message",
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::UInt(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::SInt(v) => Some(*v),
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

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<i32> {
        match self {
            Value::Enum(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_message(&self) -> Option<&MessageInstance> {
        match self {
            Value::Message(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_message_mut(&mut self) -> Option<&mut MessageInstance> {
        match self {
            Value::Message(v) => Some(v),
            _ => None,
        }
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::UInt(u64::from(v))
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::UInt(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::SInt(i64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::SInt(v)
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

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<MessageInstance> for Value {
    fn from(v: MessageInstance) -> Self {
        Value::Message(v)
    }
}

/// Contents of a present field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Single(Value),
    Repeated(Vec<Value>),
}

impl FieldValue {
    pub fn as_single(&self) -> Option<&Value> {
        match self {
            FieldValue::Single(v) => Some(v),
            FieldValue::Repeated(_) => None,
        }
    }

    pub fn as_repeated(&self) -> Option<&[Value]> {
        match self {
            FieldValue::Single(_) => None,
            FieldValue::Repeated(v) => Some(v),
        }
    }

    pub fn cardinality_name(&self) -> &'static str {
        match self {
            FieldValue::Single(_) => "single",
            FieldValue::Repeated(_) => "repeated",
        }
    }
}
