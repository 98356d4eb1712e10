//! # Message Instances
//!
//! A [`MessageInstance`] is a dynamically typed message value bound to the
//! descriptor of its type. Fields are addressed by name; every assignment is
//! checked against the descriptor table so an instance can only ever hold
//! declared fields. Whether the stored values fit their declared types is
//! checked by the encoder, not at assignment time.
//!
//! Absent fields have no entry at all. An empty repeated field is absent.

use crate::error::{EncodeError, ProtocolError, Result};
use crate::protocol::descriptor::{FieldDescriptor, MessageDescriptor};
use crate::protocol::value::{FieldValue, Value};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Clone)]
pub struct MessageInstance {
    descriptor: &'static MessageDescriptor,
    values: BTreeMap<u32, FieldValue>,
}

impl MessageInstance {
    /// Create an instance with every field absent
    pub fn new(descriptor: &'static MessageDescriptor) -> Self {
        Self {
            descriptor,
            values: BTreeMap::new(),
        }
    }

    pub fn descriptor(&self) -> &'static MessageDescriptor {
        self.descriptor
    }

    pub fn type_name(&self) -> &'static str {
        self.descriptor.name
    }

    fn field(&self, name: &str) -> Result<&'static FieldDescriptor> {
        self.descriptor
            .field_by_name(name)
            .ok_or_else(|| ProtocolError::UnknownField {
                message: self.descriptor.name,
                field: name.to_string(),
            })
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        let field = self.descriptor.field_by_name(name)?;
        self.get_by_number(field.number)
    }

    pub fn get_by_number(&self, number: u32) -> Option<&FieldValue> {
        self.values.get(&number).filter(|value| is_present(value))
    }

    /// Mutable access to a single nested message field.
    pub fn get_mut_message(&mut self, name: &str) -> Option<&mut MessageInstance> {
        let field = self.descriptor.field_by_name(name)?;
        match self.values.get_mut(&field.number)? {
            FieldValue::Single(value) => value.as_message_mut(),
            FieldValue::Repeated(_) => None,
        }
    }

    /// Edit the elements of a repeated field in place.
    ///
    /// The field is absent afterwards if `edit` leaves it empty.
    pub fn edit_repeated<F, R>(&mut self, name: &str, edit: F) -> Result<R>
    where
        F: FnOnce(&mut Vec<Value>) -> R,
    {
        let field = self.field(name)?;
        if !field.is_repeated() {
            return Err(ProtocolError::NotRepeated {
                message: self.descriptor.name,
                field: field.name,
            });
        }
        let mut items = match self.values.remove(&field.number) {
            Some(FieldValue::Repeated(items)) => items,
            _ => Vec::new(),
        };
        let out = edit(&mut items);
        self.insert_unchecked(field.number, FieldValue::Repeated(items));
        Ok(out)
    }

    /// Value of a single field, `None` if absent or repeated
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.get(name).and_then(FieldValue::as_single)
    }

    /// Elements of a repeated field; empty if absent
    pub fn values(&self, name: &str) -> &[Value] {
        self.get(name)
            .and_then(FieldValue::as_repeated)
            .unwrap_or(&[])
    }

    pub fn has(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Assign a single value.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        self.set_field(name, FieldValue::Single(value.into()))
    }

    /// Replace the elements of a repeated field.
    pub fn set_repeated<I, V>(&mut self, name: &str, values: I) -> Result<()>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.set_field(name, FieldValue::Repeated(values))
    }

    pub fn set_field(&mut self, name: &str, value: FieldValue) -> Result<()> {
        let field = self.field(name)?;
        self.insert_unchecked(field.number, value);
        Ok(())
    }

    /// Append one element to a repeated field.
    pub fn push(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        let field = self.field(name)?;
        if !field.is_repeated() {
            return Err(ProtocolError::NotRepeated {
                message: self.descriptor.name,
                field: field.name,
            });
        }
        let value = value.into();
        match self.values.get_mut(&field.number) {
            Some(FieldValue::Repeated(items)) => items.push(value),
            _ => {
                self.values
                    .insert(field.number, FieldValue::Repeated(vec![value]));
            }
        }
        Ok(())
    }

    /// Make a field absent, returning its previous contents.
    pub fn clear(&mut self, name: &str) -> Result<Option<FieldValue>> {
        let field = self.field(name)?;
        Ok(self.values.remove(&field.number))
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of present fields
    pub fn len(&self) -> usize {
        self.values.values().filter(|value| is_present(value)).count()
    }

    /// Present fields in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static FieldDescriptor, &FieldValue)> + '_ {
        self.descriptor
            .fields
            .iter()
            .filter_map(|field| self.get_by_number(field.number).map(|value| (field, value)))
    }

    /// Encode with the default codec settings.
    pub fn encode(&self) -> std::result::Result<Vec<u8>, EncodeError> {
        crate::core::codec::Codec::default().encode_instance(self)
    }

    /// Store a value by field number without consulting the descriptor.
    ///
    /// Callers must only pass numbers declared by the descriptor.
    #[doc(hidden)]
    pub fn insert_unchecked(&mut self, number: u32, value: FieldValue) {
        match value {
            FieldValue::Repeated(ref items) if items.is_empty() => {
                self.values.remove(&number);
            }
            value => {
                self.values.insert(number, value);
            }
        }
    }

    #[doc(hidden)]
    pub fn take(&mut self, number: u32) -> Option<FieldValue> {
        self.values.remove(&number)
    }

    pub(crate) fn field_numbers(&self) -> impl Iterator<Item = u32> + '_ {
        self.values
            .iter()
            .filter(|(_, value)| is_present(value))
            .map(|(number, _)| *number)
    }
}

fn is_present(value: &FieldValue) -> bool {
    !matches!(value, FieldValue::Repeated(items) if items.is_empty())
}

impl PartialEq for MessageInstance {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.descriptor, other.descriptor) && self
                .iter()
                .map(|(field, value)| (field.number, value))
                .eq(other.iter().map(|(field, value)| (field.number, value)))
    }
}

impl fmt::Debug for MessageInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_struct(self.descriptor.name);
        for (field, value) in self.iter() {
            match value {
                FieldValue::Single(v) => out.field(field.name, v),
                FieldValue::Repeated(v) => out.field(field.name, v),
            };
        }
        out.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::descriptor::{Cardinality, FieldType, ScalarKind};

    static SAMPLE: MessageDescriptor = MessageDescriptor {
        name: "Sample",
        wire_type: None,
        fields: &[
            FieldDescriptor {
                number: 2,
                name: "b",
                field_type: FieldType::Scalar(ScalarKind::String),
                cardinality: Cardinality::Repeated,
            },
            FieldDescriptor {
                number: 1,
                name: "a",
                field_type: FieldType::Scalar(ScalarKind::UInt32),
                cardinality: Cardinality::Single,
            },
        ],
    };

    #[test]
    fn test_new_instance_is_empty() {
        let instance = MessageInstance::new(&SAMPLE);
        assert!(instance.is_empty());
        assert!(!instance.has("a"));
        assert!(instance.values("b").is_empty());
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_set_and_get() {
        let mut instance = MessageInstance::new(&SAMPLE);
        instance.set("a", 5u32).unwrap();
        instance.set_repeated("b", ["x", "y"]).unwrap();
        assert_eq!(instance.value("a"), Some(&Value::UInt(5)));
        assert_eq!(
            instance.values("b"),
            &[Value::String("x".into()), Value::String("y".into())]
        );
        assert_eq!(instance.len(), 2);
    }

    #[test]
    fn test_undeclared_field_rejected() {
        let mut instance = MessageInstance::new(&SAMPLE);
        let err = instance.set("zzz", 1u32).unwrap_err();
        assert!(matches!(err, ProtocolError::UnknownField { ref field, .. } if field == "zzz"));
        assert!(instance.is_empty());
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_push_and_clear() {
        let mut instance = MessageInstance::new(&SAMPLE);
        instance.push("b", "x").unwrap();
        instance.push("b", "y").unwrap();
        assert_eq!(instance.values("b").len(), 2);
        assert!(matches!(
            instance.push("a", 1u32),
            Err(ProtocolError::NotRepeated { field: "a", .. })
        ));
        assert!(instance.clear("b").unwrap().is_some());
        assert!(!instance.has("b"));
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_empty_repeated_is_absent() {
        let mut instance = MessageInstance::new(&SAMPLE);
        instance.set_repeated("b", Vec::<String>::new()).unwrap();
        assert!(!instance.has("b"));
        assert_eq!(instance, MessageInstance::new(&SAMPLE));
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_edit_repeated_to_empty_is_absent() {
        let mut instance = MessageInstance::new(&SAMPLE);
        instance.set("a", 3u32).unwrap();
        instance.push("b", "x").unwrap();

        let removed = instance.edit_repeated("b", |items| items.drain(..).count()).unwrap();
        assert_eq!(removed, 1);
        assert!(!instance.has("b"));
        assert_eq!(instance.len(), 1);

        let bytes = instance.encode().unwrap();
        let decoded = crate::core::codec::Codec::default()
            .decode_instance(&SAMPLE, &bytes)
            .unwrap();
        assert_eq!(decoded, instance);
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_edit_repeated_appends_and_rejects_single() {
        let mut instance = MessageInstance::new(&SAMPLE);
        instance
            .edit_repeated("b", |items| items.push(Value::String("y".into())))
            .unwrap();
        assert_eq!(instance.values("b"), &[Value::String("y".into())]);
        assert!(matches!(
            instance.edit_repeated("a", |_| ()),
            Err(ProtocolError::NotRepeated { field: "a", .. })
        ));
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_iteration_follows_declaration_order() {
        let mut instance = MessageInstance::new(&SAMPLE);
        instance.set("a", 1u32).unwrap();
        instance.push("b", "x").unwrap();
        let names: Vec<_> = instance.iter().map(|(field, _)| field.name).collect();
        assert_eq!(names, vec!["b", "a"]);
    }
}
