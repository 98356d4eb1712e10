//! # Message Type Contract
//!
//! [`MessageType`] is implemented by every typed message: it exposes the
//! static field table and converts between the typed struct and a dynamic
//! [`MessageInstance`], which is what the generic encoder and decoder work
//! on. Top-level messages additionally implement [`WireMessage`], carrying the
//! identifier the transport layer uses to route frames.
//!
//! Field types are described by [`ProtoValue`], implemented here for the
//! primitive Rust types and generated for enums and messages by the
//! [`proto_enum!`](crate::proto_enum) and [`message!`](crate::message) macros.
//!
//! | Rust type      | Field kind |
//! |----------------|------------|
//! | `u32` / `u64`  | uint32 / uint64 |
//! | `i32` / `i64`  | sint32 / sint64 (zigzag) |
//! | [`Fixed32`] / [`Fixed64`] | fixed32 / fixed64 |
//! | `bool`         | bool |
//! | `Vec<u8>`      | bytes |
//! | `String`       | string |

use crate::core::codec::Codec;
use crate::error::{DecodeError, EncodeError};
use crate::protocol::descriptor::{FieldDescriptor, FieldType, MessageDescriptor, ScalarKind};
use crate::protocol::instance::MessageInstance;
use crate::protocol::value::{FieldValue, Value};

/// Capability every message type provides.
pub trait MessageType: Sized {
    /// Static field table shared by all instances of the type
    fn descriptor() -> &'static MessageDescriptor;

    fn get_fields() -> &'static [FieldDescriptor] {
        Self::descriptor().fields
    }

    fn to_instance(&self) -> MessageInstance;

    fn from_instance(instance: MessageInstance) -> Result<Self, DecodeError>;

    fn encode(&self) -> Result<Vec<u8>, EncodeError> {
        Codec::default().encode(self)
    }

    fn decode(input: &[u8]) -> Result<Self, DecodeError> {
        Codec::default().decode(input)
    }
}

/// A message that can travel on its own between host and device.
pub trait WireMessage: MessageType {
    /// Transport routing identifier (not a protobuf tag)
    const WIRE_TYPE: u16;
}

/// A Rust type usable as a message field.
pub trait ProtoValue: Sized {
    const FIELD_TYPE: FieldType;

    fn to_value(&self) -> Value;

    fn from_value(value: Value, field: &'static FieldDescriptor) -> Result<Self, DecodeError>;
}

/// Error for a value whose variant does not match the requested Rust type.
pub fn conversion_mismatch<T: ProtoValue>(
    value: &Value,
    field: &'static FieldDescriptor,
) -> DecodeError {
    DecodeError::ConversionMismatch {
        field: field.name,
        expected: T::FIELD_TYPE.type_name(),
        actual: value.kind_name(),
    }
}

fn out_of_range(field: &'static FieldDescriptor, kind: ScalarKind, value: i128) -> DecodeError {
    DecodeError::ValueOutOfRange {
        field: field.name,
        kind: kind.name(),
        value,
    }
}

/// Four bytes, little-endian on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Fixed32(pub u32);

/// Eight bytes, little-endian on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Fixed64(pub u64);

macro_rules! impl_unsigned {
    ($ty:ty, $kind:expr, $wrap:expr, $unwrap:expr) => {
        impl ProtoValue for $ty {
            const FIELD_TYPE: FieldType = FieldType::Scalar($kind);

            fn to_value(&self) -> Value {
                Value::UInt(($unwrap)(*self))
            }

            fn from_value(value: Value, field: &'static FieldDescriptor) -> Result<Self, DecodeError> {
                match value {
                    Value::UInt(v) => ($wrap)(v).ok_or_else(|| out_of_range(field, $kind, i128::from(v))),
                    other => Err(conversion_mismatch::<Self>(&other, field)),
                }
            }
        }
    };
}

impl_unsigned!(u32, ScalarKind::UInt32, |v: u64| u32::try_from(v).ok(), |v: u32| u64::from(v));
impl_unsigned!(u64, ScalarKind::UInt64, |v: u64| Some(v), |v: u64| v);
impl_unsigned!(
    Fixed32,
    ScalarKind::Fixed32,
    |v: u64| u32::try_from(v).ok().map(Fixed32),
    |v: Fixed32| u64::from(v.0)
);
impl_unsigned!(Fixed64, ScalarKind::Fixed64, |v: u64| Some(Fixed64(v)), |v: Fixed64| v.0);

impl ProtoValue for i32 {
    const FIELD_TYPE: FieldType = FieldType::Scalar(ScalarKind::SInt32);

    fn to_value(&self) -> Value {
        Value::SInt(i64::from(*self))
    }

    fn from_value(value: Value, field: &'static FieldDescriptor) -> Result<Self, DecodeError> {
        match value {
            Value::SInt(v) => i32::try_from(v)
                .map_err(|_| out_of_range(field, ScalarKind::SInt32, i128::from(v))),
            other => Err(conversion_mismatch::<Self>(&other, field)),
        }
    }
}

impl ProtoValue for i64 {
    const FIELD_TYPE: FieldType = FieldType::Scalar(ScalarKind::SInt64);

    fn to_value(&self) -> Value {
        Value::SInt(*self)
    }

    fn from_value(value: Value, field: &'static FieldDescriptor) -> Result<Self, DecodeError> {
        match value {
            Value::SInt(v) => Ok(v),
            other => Err(conversion_mismatch::<Self>(&other, field)),
        }
    }
}

impl ProtoValue for bool {
    const FIELD_TYPE: FieldType = FieldType::Scalar(ScalarKind::Bool);

    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }

    fn from_value(value: Value, field: &'static FieldDescriptor) -> Result<Self, DecodeError> {
        match value {
            Value::Bool(v) => Ok(v),
            other => Err(conversion_mismatch::<Self>(&other, field)),
        }
    }
}

impl ProtoValue for Vec<u8> {
    const FIELD_TYPE: FieldType = FieldType::Scalar(ScalarKind::Bytes);

    fn to_value(&self) -> Value {
        Value::Bytes(self.clone())
    }

    fn from_value(value: Value, field: &'static FieldDescriptor) -> Result<Self, DecodeError> {
        match value {
            Value::Bytes(v) => Ok(v),
            other => Err(conversion_mismatch::<Self>(&other, field)),
        }
    }
}

impl ProtoValue for String {
    const FIELD_TYPE: FieldType = FieldType::Scalar(ScalarKind::String);

    fn to_value(&self) -> Value {
        Value::String(self.clone())
    }

    fn from_value(value: Value, field: &'static FieldDescriptor) -> Result<Self, DecodeError> {
        match value {
            Value::String(v) => Ok(v),
            other => Err(conversion_mismatch::<Self>(&other, field)),
        }
    }
}

/// Lets a message hold an optional field of its own type.
impl<T: ProtoValue> ProtoValue for Box<T> {
    const FIELD_TYPE: FieldType = T::FIELD_TYPE;

    fn to_value(&self) -> Value {
        (**self).to_value()
    }

    fn from_value(value: Value, field: &'static FieldDescriptor) -> Result<Self, DecodeError> {
        T::from_value(value, field).map(Box::new)
    }
}

// Helpers called from `message!` expansions.

#[doc(hidden)]
pub fn put_optional<T: ProtoValue>(instance: &mut MessageInstance, number: u32, value: &Option<T>) {
    if let Some(value) = value {
        instance.insert_unchecked(number, FieldValue::Single(value.to_value()));
    }
}

#[doc(hidden)]
pub fn put_repeated<T: ProtoValue>(instance: &mut MessageInstance, number: u32, values: &[T]) {
    let values = values.iter().map(ProtoValue::to_value).collect();
    instance.insert_unchecked(number, FieldValue::Repeated(values));
}

#[doc(hidden)]
pub fn take_optional<T: ProtoValue>(
    instance: &mut MessageInstance,
    number: u32,
) -> Result<Option<T>, DecodeError> {
    let Some(field) = instance.descriptor().field_by_number(number) else {
        return Ok(None);
    };
    match instance.take(number) {
        None => Ok(None),
        Some(FieldValue::Single(value)) => T::from_value(value, field).map(Some),
        Some(FieldValue::Repeated(_)) => Err(DecodeError::ConversionMismatch {
            field: field.name,
            expected: "single value",
            actual: "repeated values",
        }),
    }
}

#[doc(hidden)]
pub fn take_repeated<T: ProtoValue>(
    instance: &mut MessageInstance,
    number: u32,
) -> Result<Vec<T>, DecodeError> {
    let Some(field) = instance.descriptor().field_by_number(number) else {
        return Ok(Vec::new());
    };
    match instance.take(number) {
        None => Ok(Vec::new()),
        Some(FieldValue::Repeated(values)) => values
            .into_iter()
            .map(|value| T::from_value(value, field))
            .collect(),
        Some(FieldValue::Single(_)) => Err(DecodeError::ConversionMismatch {
            field: field.name,
            expected: "repeated values",
            actual: "single value",
        }),
    }
}
