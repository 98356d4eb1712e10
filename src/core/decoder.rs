//! Generic, descriptor-driven decoder.
//!
//! The decoder reads tags until the input is exhausted. Known fields are
//! decoded according to their descriptor; unknown field numbers are stepped
//! over using only the wire kind from the tag. A single field that appears
//! more than once keeps its last value. Repeated scalar fields accept both the
//! unpacked and the packed encoding.

use crate::core::varint::{decode_varint, zigzag_decode};
use crate::core::wire::{read_fixed, read_length_delimited, skip_value, Tag, WireKind};
use crate::error::DecodeError;
use crate::protocol::descriptor::{FieldDescriptor, FieldType, MessageDescriptor, ScalarKind};
use crate::protocol::instance::MessageInstance;
use crate::protocol::value::{FieldValue, Value};
use crate::utils::metrics::global_metrics;
use tracing::trace;

pub(crate) struct Decoder {
    max_depth: usize,
}

impl Decoder {
    pub(crate) fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    pub(crate) fn decode(
        &self,
        descriptor: &'static MessageDescriptor,
        input: &[u8],
    ) -> Result<MessageInstance, DecodeError> {
        self.decode_message(descriptor, input, 0, 0)
    }

    /// `base` is the absolute offset of `input` within the outermost buffer.
    fn decode_message(
        &self,
        descriptor: &'static MessageDescriptor,
        input: &[u8],
        base: usize,
        depth: usize,
    ) -> Result<MessageInstance, DecodeError> {
        if depth > self.max_depth {
            return Err(DecodeError::RecursionLimit {
                max_depth: self.max_depth,
            });
        }

        let mut instance = MessageInstance::new(descriptor);
        let mut pos = 0usize;

        while pos < input.len() {
            let (tag, used) = Tag::decode(&input[pos..], base + pos)?;
            pos += used;
            let rest = &input[pos..];
            let offset = base + pos;

            let Some(field) = descriptor.field_by_number(tag.field_number) else {
                let skipped = skip_value(tag.kind, rest, offset)?;
                trace!(
                    message = descriptor.name,
                    field_number = tag.field_number,
                    wire_kind = ?tag.kind,
                    bytes = skipped,
                    "Skipping unknown field"
                );
                global_metrics().unknown_field_skipped();
                pos += skipped;
                continue;
            };

            let expected = field.field_type.wire_kind();
            if tag.kind == expected {
                let (value, used) = self.decode_value(field, rest, offset, depth)?;
                pos += used;
                if field.is_repeated() {
                    append(&mut instance, field.number, vec![value]);
                } else {
                    instance.insert_unchecked(field.number, FieldValue::Single(value));
                }
            } else if field.is_repeated()
                && tag.kind == WireKind::LengthDelimited
                && expected.is_packable()
            {
                let (payload, used) = read_length_delimited(rest, offset)?;
                let payload_offset = offset + used - payload.len();
                let values = self.decode_packed(field, payload, payload_offset, depth)?;
                pos += used;
                append(&mut instance, field.number, values);
            } else {
                return Err(DecodeError::WireKindMismatch {
                    field: field.name,
                    expected,
                    actual: tag.kind,
                });
            }
        }

        Ok(instance)
    }

    fn decode_packed(
        &self,
        field: &'static FieldDescriptor,
        payload: &[u8],
        base: usize,
        depth: usize,
    ) -> Result<Vec<Value>, DecodeError> {
        let mut values = Vec::new();
        let mut pos = 0usize;
        while pos < payload.len() {
            let (value, used) = self.decode_value(field, &payload[pos..], base + pos, depth)?;
            values.push(value);
            pos += used;
        }
        Ok(values)
    }

    /// Decode one value of the field's declared type from the front of `input`.
    fn decode_value(
        &self,
        field: &'static FieldDescriptor,
        input: &[u8],
        offset: usize,
        depth: usize,
    ) -> Result<(Value, usize), DecodeError> {
        match field.field_type {
            FieldType::Scalar(kind) => decode_scalar(field, kind, input, offset),
            FieldType::Enum(descriptor) => {
                let descriptor = descriptor();
                let (raw, used) = decode_varint(input, offset)?;
                let number = i32::try_from(raw as i64).map_err(|_| DecodeError::ValueOutOfRange {
                    field: field.name,
                    kind: "enum",
                    value: i128::from(raw as i64),
                })?;
                if !descriptor.contains(number) {
                    return Err(DecodeError::InvalidEnumValue {
                        field: field.name,
                        enum_name: descriptor.name,
                        value: number,
                    });
                }
                Ok((Value::Enum(number), used))
            }
            FieldType::Message(descriptor) => {
                let (payload, used) = read_length_delimited(input, offset)?;
                let payload_offset = offset + used - payload.len();
                let nested =
                    self.decode_message(descriptor(), payload, payload_offset, depth + 1)?;
                Ok((Value::Message(nested), used))
            }
        }
    }
}

fn decode_scalar(
    field: &'static FieldDescriptor,
    kind: ScalarKind,
    input: &[u8],
    offset: usize,
) -> Result<(Value, usize), DecodeError> {
    let out_of_range = |value: i128| DecodeError::ValueOutOfRange {
        field: field.name,
        kind: kind.name(),
        value,
    };

    match kind {
        ScalarKind::UInt32 => {
            let (raw, used) = decode_varint(input, offset)?;
            if raw > u64::from(u32::MAX) {
                return Err(out_of_range(i128::from(raw)));
            }
            Ok((Value::UInt(raw), used))
        }
        ScalarKind::UInt64 => {
            let (raw, used) = decode_varint(input, offset)?;
            Ok((Value::UInt(raw), used))
        }
        ScalarKind::SInt32 => {
            let (raw, used) = decode_varint(input, offset)?;
            let value = zigzag_decode(raw);
            if i32::try_from(value).is_err() {
                return Err(out_of_range(i128::from(value)));
            }
            Ok((Value::SInt(value), used))
        }
        ScalarKind::SInt64 => {
            let (raw, used) = decode_varint(input, offset)?;
            Ok((Value::SInt(zigzag_decode(raw)), used))
        }
        ScalarKind::Fixed32 => {
            let bytes = read_fixed::<4>(input, offset)?;
            Ok((Value::UInt(u64::from(u32::from_le_bytes(bytes))), 4))
        }
        ScalarKind::Fixed64 => {
            let bytes = read_fixed::<8>(input, offset)?;
            Ok((Value::UInt(u64::from_le_bytes(bytes)), 8))
        }
        ScalarKind::Bool => {
            let (raw, used) = decode_varint(input, offset)?;
            Ok((Value::Bool(raw != 0), used))
        }
        ScalarKind::Bytes => {
            let (payload, used) = read_length_delimited(input, offset)?;
            Ok((Value::Bytes(payload.to_vec()), used))
        }
        ScalarKind::String => {
            let (payload, used) = read_length_delimited(input, offset)?;
            let text = String::from_utf8(payload.to_vec())
                .map_err(|_| DecodeError::InvalidUtf8 { field: field.name })?;
            Ok((Value::String(text), used))
        }
    }
}

fn append(instance: &mut MessageInstance, number: u32, mut values: Vec<Value>) {
    if let Some(FieldValue::Repeated(mut existing)) = instance.take(number) {
        existing.append(&mut values);
        values = existing;
    }
    instance.insert_unchecked(number, FieldValue::Repeated(values));
}
