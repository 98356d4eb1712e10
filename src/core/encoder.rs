//! Generic, descriptor-driven encoder.
//!
//! Fields are written in the declaration order of the descriptor table, so
//! the output for a given instance is always the same. Repeated fields are
//! written unpacked, one tag and value per element.

use crate::core::varint::{encode_varint, zigzag_encode};
use crate::core::wire::{Tag, WireKind};
use crate::error::EncodeError;
use crate::protocol::descriptor::{
    Cardinality, FieldDescriptor, FieldType, MessageDescriptor, ScalarKind,
};
use crate::protocol::instance::MessageInstance;
use crate::protocol::value::{FieldValue, Value};
use bytes::BufMut;

pub(crate) struct Encoder {
    max_depth: usize,
}

impl Encoder {
    pub(crate) fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    pub(crate) fn encode(
        &self,
        instance: &MessageInstance,
        out: &mut impl BufMut,
    ) -> Result<(), EncodeError> {
        self.encode_message(instance, out, 0)
    }

    fn encode_message(
        &self,
        instance: &MessageInstance,
        out: &mut impl BufMut,
        depth: usize,
    ) -> Result<(), EncodeError> {
        if depth > self.max_depth {
            return Err(EncodeError::RecursionLimit {
                max_depth: self.max_depth,
            });
        }

        let descriptor = instance.descriptor();
        let mut written = 0usize;
        for (field, value) in instance.iter() {
            written += 1;
            match (field.cardinality, value) {
                (Cardinality::Single, FieldValue::Single(value)) => {
                    self.encode_field(field, value, out, depth)?;
                }
                (Cardinality::Repeated, FieldValue::Repeated(values)) => {
                    for value in values {
                        self.encode_field(field, value, out, depth)?;
                    }
                }
                (expected, actual) => {
                    return Err(EncodeError::CardinalityMismatch {
                        field: field.name,
                        expected: expected.name(),
                        actual: actual.cardinality_name(),
                    });
                }
            }
        }

        if written != instance.len() {
            return Err(undeclared_field(descriptor, instance));
        }
        Ok(())
    }

    fn encode_field(
        &self,
        field: &'static FieldDescriptor,
        value: &Value,
        out: &mut impl BufMut,
        depth: usize,
    ) -> Result<(), EncodeError> {
        match (field.field_type, value) {
            (FieldType::Scalar(kind), value) => encode_scalar(field, kind, value, out),
            (FieldType::Enum(descriptor), Value::Enum(number)) => {
                let descriptor = descriptor();
                if !descriptor.contains(*number) {
                    return Err(EncodeError::InvalidEnumValue {
                        field: field.name,
                        enum_name: descriptor.name,
                        value: *number,
                    });
                }
                Tag::new(field.number, WireKind::Varint).encode(out);
                // int32 on the wire: negatives are sign-extended to ten bytes
                encode_varint(i64::from(*number) as u64, out);
                Ok(())
            }
            (FieldType::Message(descriptor), Value::Message(nested)) => {
                let expected = descriptor();
                if !std::ptr::eq(expected, nested.descriptor()) {
                    return Err(EncodeError::MessageMismatch {
                        field: field.name,
                        expected: expected.name,
                        actual: nested.type_name(),
                    });
                }
                let mut payload = Vec::new();
                self.encode_message(nested, &mut payload, depth + 1)?;
                Tag::new(field.number, WireKind::LengthDelimited).encode(out);
                write_length_delimited(&payload, out);
                Ok(())
            }
            (field_type, value) => Err(type_mismatch(field, field_type, value)),
        }
    }
}

fn encode_scalar(
    field: &'static FieldDescriptor,
    kind: ScalarKind,
    value: &Value,
    out: &mut impl BufMut,
) -> Result<(), EncodeError> {
    let tag = Tag::new(field.number, kind.wire_kind());
    match (kind, value) {
        (ScalarKind::UInt32, Value::UInt(v)) => {
            check_range(field, kind, *v <= u64::from(u32::MAX), i128::from(*v))?;
            tag.encode(out);
            encode_varint(*v, out);
        }
        (ScalarKind::UInt64, Value::UInt(v)) => {
            tag.encode(out);
            encode_varint(*v, out);
        }
        (ScalarKind::SInt32, Value::SInt(v)) => {
            let fits = i32::try_from(*v).is_ok();
            check_range(field, kind, fits, i128::from(*v))?;
            tag.encode(out);
            encode_varint(zigzag_encode(*v), out);
        }
        (ScalarKind::SInt64, Value::SInt(v)) => {
            tag.encode(out);
            encode_varint(zigzag_encode(*v), out);
        }
        (ScalarKind::Fixed32, Value::UInt(v)) => {
            let fixed = u32::try_from(*v);
            check_range(field, kind, fixed.is_ok(), i128::from(*v))?;
            tag.encode(out);
            out.put_u32_le(fixed.unwrap_or_default());
        }
        (ScalarKind::Fixed64, Value::UInt(v)) => {
            tag.encode(out);
            out.put_u64_le(*v);
        }
        (ScalarKind::Bool, Value::Bool(v)) => {
            tag.encode(out);
            encode_varint(u64::from(*v), out);
        }
        (ScalarKind::Bytes, Value::Bytes(v)) => {
            tag.encode(out);
            write_length_delimited(v, out);
        }
        (ScalarKind::String, Value::String(v)) => {
            tag.encode(out);
            write_length_delimited(v.as_bytes(), out);
        }
        (kind, value) => return Err(type_mismatch(field, FieldType::Scalar(kind), value)),
    }
    Ok(())
}

fn write_length_delimited(payload: &[u8], out: &mut impl BufMut) {
    encode_varint(payload.len() as u64, out);
    out.put_slice(payload);
}

fn check_range(
    field: &'static FieldDescriptor,
    kind: ScalarKind,
    fits: bool,
    value: i128,
) -> Result<(), EncodeError> {
    if fits {
        Ok(())
    } else {
        Err(EncodeError::ValueOutOfRange {
            field: field.name,
            kind: kind.name(),
            value,
        })
    }
}

fn type_mismatch(field: &'static FieldDescriptor, field_type: FieldType, value: &Value) -> EncodeError {
    EncodeError::TypeMismatch {
        field: field.name,
        expected: field_type.type_name().to_string(),
        actual: value.kind_name(),
    }
}

fn undeclared_field(descriptor: &'static MessageDescriptor, instance: &MessageInstance) -> EncodeError {
    let number = instance
        .field_numbers()
        .find(|number| descriptor.field_by_number(*number).is_none())
        .unwrap_or_default();
    EncodeError::UndeclaredField {
        message: descriptor.name,
        number,
    }
}
