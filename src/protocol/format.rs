//! Human-readable rendering of message instances.
//!
//! ```text
//! SignLocalCommitmentTxPhase2Request {
//!     node_id: NodeId {
//!         node_id: 33 bytes 02a1...
//!     }
//!     commitment_info: CommitmentInfo {
//!         feerate_per_kw: 253
//!         htlcs: [
//!             ...
//!         ]
//!     }
//! }
//! ```

use crate::protocol::descriptor::{FieldDescriptor, FieldType};
use crate::protocol::instance::MessageInstance;
use crate::protocol::value::{FieldValue, Value};
use std::fmt::{self, Write};

const INDENT: &str = "    ";

/// Render `instance` over multiple indented lines.
pub fn format_message(instance: &MessageInstance) -> String {
    let mut out = String::new();
    write_message(&mut out, instance, 0).ok();
    out
}

impl fmt::Display for MessageInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_message(f, self, 0)
    }
}

fn write_message<W: Write>(out: &mut W, instance: &MessageInstance, depth: usize) -> fmt::Result {
    if instance.is_empty() {
        return write!(out, "{} {{}}", instance.type_name());
    }
    writeln!(out, "{} {{", instance.type_name())?;
    for (field, value) in instance.iter() {
        pad(out, depth + 1)?;
        write!(out, "{}: ", field.name)?;
        match value {
            FieldValue::Single(value) => write_value(out, field, value, depth + 1)?,
            FieldValue::Repeated(values) => {
                writeln!(out, "[")?;
                for value in values {
                    pad(out, depth + 2)?;
                    write_value(out, field, value, depth + 2)?;
                    writeln!(out)?;
                }
                pad(out, depth + 1)?;
                write!(out, "]")?;
            }
        }
        writeln!(out)?;
    }
    pad(out, depth)?;
    write!(out, "}}")
}

fn write_value<W: Write>(
    out: &mut W,
    field: &FieldDescriptor,
    value: &Value,
    depth: usize,
) -> fmt::Result {
    match value {
        Value::UInt(v) => write!(out, "{v}"),
        Value::SInt(v) => write!(out, "{v}"),
        Value::Bool(v) => write!(out, "{v}"),
        Value::Bytes(v) => write!(out, "{} bytes {}", v.len(), hex::encode(v)),
        Value::String(v) => write!(out, "{v:?}"),
        Value::Enum(number) => match field.field_type {
            FieldType::Enum(descriptor) => match descriptor().name_of(*number) {
                Some(name) => write!(out, "{name} ({number})"),
                None => write!(out, "{number}"),
            },
            _ => write!(out, "{number}"),
        },
        Value::Message(nested) => write_message(out, nested, depth),
    }
}

fn pad<W: Write>(out: &mut W, depth: usize) -> fmt::Result {
    for _ in 0..depth {
        out.write_str(INDENT)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::{Failure, FailureType, NodeId, Ping};
    use crate::protocol::message::MessageType;

    #[test]
    fn test_flat_message() {
        let failure = Failure {
            code: Some(FailureType::ActionCancelled),
            message: Some("Cancelled".to_string()),
        };
        assert_eq!(
            format_message(&failure.to_instance()),
            "Failure {\n    code: ActionCancelled (4)\n    message: \"Cancelled\"\n}"
        );
    }

    #[test]
    fn test_empty_message() {
        assert_eq!(format_message(&Ping::default().to_instance()), "Ping {}");
    }

    #[test]
    fn test_bytes_and_display() {
        let node = NodeId {
            node_id: Some(vec![0xde, 0xad]),
        };
        let instance = node.to_instance();
        assert_eq!(instance.to_string(), "NodeId {\n    node_id: 2 bytes dead\n}");
        assert_eq!(instance.to_string(), format_message(&instance));
    }
}
