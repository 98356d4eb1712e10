//! # JSON Conversion
//!
//! Converts message instances to and from `serde_json` values, the dictionary
//! form used by tooling and test vectors.
//!
//! - objects are keyed by field name
//! - bytes are lowercase hex strings
//! - enums are written by name; numbers are also accepted on input
//! - repeated fields are arrays
//! - `null` or a missing key means absent
//!
//! Keys that name no declared field are rejected.

use crate::error::constants::{ERR_EXPECTED_ARRAY, ERR_EXPECTED_OBJECT, ERR_INVALID_HEX};
use crate::error::{ProtocolError, Result};
use crate::protocol::descriptor::{FieldDescriptor, FieldType, MessageDescriptor, ScalarKind};
use crate::protocol::instance::MessageInstance;
use crate::protocol::message::MessageType;
use crate::protocol::value::{FieldValue, Value};
use serde_json::{Map, Value as Json};

/// Dictionary form of `instance`.
pub fn to_json(instance: &MessageInstance) -> Json {
    let mut object = Map::new();
    for (field, value) in instance.iter() {
        let json = match value {
            FieldValue::Single(value) => value_to_json(field, value),
            FieldValue::Repeated(values) => {
                Json::Array(values.iter().map(|v| value_to_json(field, v)).collect())
            }
        };
        object.insert(field.name.to_string(), json);
    }
    Json::Object(object)
}

fn value_to_json(field: &FieldDescriptor, value: &Value) -> Json {
    match value {
        Value::UInt(v) => Json::from(*v),
        Value::SInt(v) => Json::from(*v),
        Value::Bool(v) => Json::Bool(*v),
        Value::Bytes(v) => Json::String(hex::encode(v)),
        Value::String(v) => Json::String(v.clone()),
        Value::Enum(number) => match field.field_type {
            FieldType::Enum(descriptor) => descriptor()
                .name_of(*number)
                .map_or_else(|| Json::from(*number), |name| Json::String(name.to_string())),
            _ => Json::from(*number),
        },
        Value::Message(nested) => to_json(nested),
    }
}

/// Build an instance of `descriptor` from its dictionary form.
pub fn from_json(descriptor: &'static MessageDescriptor, json: &Json) -> Result<MessageInstance> {
    let object = json
        .as_object()
        .ok_or_else(|| json_error(descriptor.name, ERR_EXPECTED_OBJECT))?;

    let mut instance = MessageInstance::new(descriptor);
    for (key, json) in object {
        let field = descriptor
            .field_by_name(key)
            .ok_or_else(|| ProtocolError::UnknownField {
                message: descriptor.name,
                field: key.clone(),
            })?;
        if json.is_null() {
            continue;
        }
        let value = if field.is_repeated() {
            let items = json
                .as_array()
                .ok_or_else(|| json_error(field.name, ERR_EXPECTED_ARRAY))?;
            let values = items
                .iter()
                .map(|item| value_from_json(field, item))
                .collect::<Result<Vec<_>>>()?;
            FieldValue::Repeated(values)
        } else {
            FieldValue::Single(value_from_json(field, json)?)
        };
        instance.insert_unchecked(field.number, value);
    }
    Ok(instance)
}

fn value_from_json(field: &'static FieldDescriptor, json: &Json) -> Result<Value> {
    let mismatch = || json_error(field.name, &format!("expected {}", field.field_type.type_name()));

    match field.field_type {
        FieldType::Scalar(kind) => match kind {
            ScalarKind::UInt32 | ScalarKind::Fixed32 => json
                .as_u64()
                .filter(|v| u32::try_from(*v).is_ok())
                .map(Value::UInt)
                .ok_or_else(mismatch),
            ScalarKind::UInt64 | ScalarKind::Fixed64 => {
                json.as_u64().map(Value::UInt).ok_or_else(mismatch)
            }
            ScalarKind::SInt32 => json
                .as_i64()
                .filter(|v| i32::try_from(*v).is_ok())
                .map(Value::SInt)
                .ok_or_else(mismatch),
            ScalarKind::SInt64 => json.as_i64().map(Value::SInt).ok_or_else(mismatch),
            ScalarKind::Bool => json.as_bool().map(Value::Bool).ok_or_else(mismatch),
            ScalarKind::String => json
                .as_str()
                .map(|s| Value::String(s.to_string()))
                .ok_or_else(mismatch),
            ScalarKind::Bytes => {
                let text = json.as_str().ok_or_else(mismatch)?;
                hex::decode(text)
                    .map(Value::Bytes)
                    .map_err(|e| json_error(field.name, &format!("{ERR_INVALID_HEX}: {e}")))
            }
        },
        FieldType::Enum(descriptor) => {
            let descriptor = descriptor();
            let number = match json {
                Json::String(name) => descriptor.value_of(name),
                _ => json
                    .as_i64()
                    .and_then(|v| i32::try_from(v).ok())
                    .filter(|v| descriptor.contains(*v)),
            };
            number.map(Value::Enum).ok_or_else(|| {
                json_error(
                    field.name,
                    &format!("{json} is not a member of enum {}", descriptor.name),
                )
            })
        }
        FieldType::Message(descriptor) => from_json(descriptor(), json).map(Value::Message),
    }
}

fn json_error(context: &str, message: &str) -> ProtocolError {
    ProtocolError::JsonError(format!("{context}: {message}"))
}

/// Dictionary form of a typed message.
pub fn message_to_json<M: MessageType>(message: &M) -> Json {
    to_json(&message.to_instance())
}

/// Typed message from its dictionary form.
pub fn message_from_json<M: MessageType>(json: &Json) -> Result<M> {
    let instance = from_json(M::descriptor(), json)?;
    Ok(M::from_instance(instance)?)
}
