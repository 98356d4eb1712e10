//! # Descriptors
//!
//! Static tables describing message and enum types. A [`MessageDescriptor`]
//! is the field table the generic encoder and decoder walk; it never changes
//! after definition and is shared by every instance of its type.
//!
//! Nested message and enum types are referenced through function pointers so
//! tables can refer to each other (and to themselves) regardless of
//! definition order.

use crate::core::wire::WireKind;
use std::fmt;

/// Primitive value kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    UInt32,
    UInt64,
    /// zigzag-encoded
    SInt32,
    /// zigzag-encoded
    SInt64,
    Fixed32,
    Fixed64,
    Bool,
    Bytes,
    /// UTF-8 text
    String,
}

impl ScalarKind {
    pub fn wire_kind(self) -> WireKind {
        match self {
            ScalarKind::UInt32
            | ScalarKind::UInt64
            | ScalarKind::SInt32
            | ScalarKind::SInt64
            | ScalarKind::Bool => WireKind::Varint,
            ScalarKind::Fixed32 => WireKind::Fixed32,
            ScalarKind::Fixed64 => WireKind::Fixed64,
            ScalarKind::Bytes | ScalarKind::String => WireKind::LengthDelimited,
        }
    }

    /// protobuf spelling of the kind, used in errors and formatting
    pub fn name(self) -> &'static str {
        match self {
            ScalarKind::UInt32 => "uint32",
            ScalarKind::UInt64 => "uint64",
            ScalarKind::SInt32 => "sint32",
            ScalarKind::SInt64 => "sint64",
            ScalarKind::Fixed32 => "fixed32",
            ScalarKind::Fixed64 => "fixed64",
            ScalarKind::Bool => "bool",
            ScalarKind::Bytes => "bytes",
            ScalarKind::String => "string",
        }
    }
}

/// Declared type of a field.
#[derive(Clone, Copy)]
pub enum FieldType {
    Scalar(ScalarKind),
    Enum(fn() -> &'static EnumDescriptor),
    Message(fn() -> &'static MessageDescriptor),
}

impl FieldType {
    pub fn wire_kind(&self) -> WireKind {
        match self {
            FieldType::Scalar(kind) => kind.wire_kind(),
            FieldType::Enum(_) => WireKind::Varint,
            FieldType::Message(_) => WireKind::LengthDelimited,
        }
    }

    /// Name of the scalar kind or of the referenced enum/message type
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::Scalar(kind) => kind.name(),
            FieldType::Enum(descriptor) => descriptor().name,
            FieldType::Message(descriptor) => descriptor().name,
        }
    }
}

impl fmt::Debug for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Scalar(kind) => write!(f, "Scalar({kind:?})"),
            FieldType::Enum(descriptor) => write!(f, "Enum({})", descriptor().name),
            FieldType::Message(descriptor) => write!(f, "Message({})", descriptor().name),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    Single,
    Repeated,
}

impl Cardinality {
    pub fn name(self) -> &'static str {
        match self {
            Cardinality::Single => "single",
            Cardinality::Repeated => "repeated",
        }
    }
}

/// One member of a message type.
#[derive(Debug, Clone, Copy)]
pub struct FieldDescriptor {
    pub number: u32,
    pub name: &'static str,
    pub field_type: FieldType,
    pub cardinality: Cardinality,
}

impl FieldDescriptor {
    pub fn is_repeated(&self) -> bool {
        self.cardinality == Cardinality::Repeated
    }
}

/// Field table of a message type.
#[derive(Debug)]
pub struct MessageDescriptor {
    pub name: &'static str,
    /// Transport identifier of top-level messages; `None` for nested-only types
    pub wire_type: Option<u16>,
    /// Fields in declaration order
    pub fields: &'static [FieldDescriptor],
}

impl MessageDescriptor {
    pub fn field_by_number(&self, number: u32) -> Option<&'static FieldDescriptor> {
        self.fields.iter().find(|field| field.number == number)
    }

    pub fn field_by_name(&self, name: &str) -> Option<&'static FieldDescriptor> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Checks the table for duplicate or out-of-range field numbers and
    /// duplicate names. Returns a list of problems; empty means valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        for (i, field) in self.fields.iter().enumerate() {
            if field.number == 0 || field.number > crate::core::wire::MAX_FIELD_NUMBER {
                errors.push(format!(
                    "{}.{}: field number {} out of range",
                    self.name, field.name, field.number
                ));
            }
            for other in &self.fields[i + 1..] {
                if other.number == field.number {
                    errors.push(format!(
                        "{}: field number {} used by both '{}' and '{}'",
                        self.name, field.number, field.name, other.name
                    ));
                }
                if other.name == field.name {
                    errors.push(format!("{}: duplicate field name '{}'", self.name, field.name));
                }
            }
        }
        errors
    }
}

/// Value table of an enum type.
#[derive(Debug)]
pub struct EnumDescriptor {
    pub name: &'static str,
    pub values: &'static [(i32, &'static str)],
}

impl EnumDescriptor {
    pub fn name_of(&self, value: i32) -> Option<&'static str> {
        self.values
            .iter()
            .find(|(number, _)| *number == value)
            .map(|(_, name)| *name)
    }

    pub fn value_of(&self, name: &str) -> Option<i32> {
        self.values
            .iter()
            .find(|(_, candidate)| *candidate == name)
            .map(|(number, _)| *number)
    }

    pub fn contains(&self, value: i32) -> bool {
        self.name_of(value).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn child() -> &'static MessageDescriptor {
        static CHILD: MessageDescriptor = MessageDescriptor {
            name: "Child",
            wire_type: None,
            fields: &[],
        };
        &CHILD
    }

    static BROKEN: MessageDescriptor = MessageDescriptor {
        name: "Broken",
        wire_type: Some(7),
        fields: &[
            FieldDescriptor {
                number: 1,
                name: "a",
                field_type: FieldType::Scalar(ScalarKind::UInt32),
                cardinality: Cardinality::Single,
            },
            FieldDescriptor {
                number: 1,
                name: "b",
                field_type: FieldType::Message(child),
                cardinality: Cardinality::Repeated,
            },
            FieldDescriptor {
                number: 0,
                name: "a",
                field_type: FieldType::Scalar(ScalarKind::Bool),
                cardinality: Cardinality::Single,
            },
        ],
    };

    #[test]
    fn test_lookup() {
        assert_eq!(BROKEN.field_by_name("b").map(|f| f.number), Some(1));
        assert_eq!(BROKEN.field_by_number(1).map(|f| f.name), Some("a"));
        assert!(BROKEN.field_by_name("missing").is_none());
    }

    #[test]
    fn test_validate_reports_every_problem() {
        let errors = BROKEN.validate();
        assert_eq!(errors.len(), 3, "{errors:?}");
        assert!(errors.iter().any(|e| e.contains("used by both 'a' and 'b'")));
        assert!(errors.iter().any(|e| e.contains("duplicate field name 'a'")));
        assert!(errors.iter().any(|e| e.contains("out of range")));
    }

    #[test]
    fn test_wire_kinds() {
        assert_eq!(FieldType::Message(child).wire_kind(), WireKind::LengthDelimited);
        assert_eq!(FieldType::Scalar(ScalarKind::SInt64).wire_kind(), WireKind::Varint);
        assert_eq!(FieldType::Scalar(ScalarKind::Fixed64).wire_kind(), WireKind::Fixed64);
        assert_eq!(format!("{:?}", FieldType::Message(child)), "Message(Child)");
    }

    #[test]
    fn test_enum_lookup() {
        static COLOR: EnumDescriptor = EnumDescriptor {
            name: "Color",
            values: &[(1, "Red"), (2, "Green")],
        };
        assert_eq!(COLOR.name_of(2), Some("Green"));
        assert_eq!(COLOR.value_of("Red"), Some(1));
        assert!(!COLOR.contains(3));
    }
}
