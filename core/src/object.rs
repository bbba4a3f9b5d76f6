//! Validated domain objects produced by `TypedValueBuilder`.
//!
//! A `DomainObject` keeps a reference to its static schema and one slot per
//! schema field. Slots of optional fields that were absent stay `None`; there
//! is no null value standing in for "absent". Nested objects are owned, so a
//! built value is a plain tree.

use std::fmt;

use serde_json::{Map, Number, Value};

use crate::error::{Container, ValidationError};
use crate::schema::{Cardinality, Field, FieldType, Schema};

/// A validated leaf or nested object.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    String(String),
    Number(Number),
    Boolean(bool),
    Object(DomainObject),
}

impl TypedValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            TypedValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<&Number> {
        match self {
            TypedValue::Number(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            TypedValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&DomainObject> {
        match self {
            TypedValue::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn to_raw(&self) -> Value {
        match self {
            TypedValue::String(s) => Value::String(s.clone()),
            TypedValue::Number(n) => Value::Number(n.clone()),
            TypedValue::Boolean(b) => Value::Bool(*b),
            TypedValue::Object(o) => o.to_raw(),
        }
    }

    /// Whether this value satisfies one of `candidates`.
    fn conforms_to(&self, candidates: &[FieldType]) -> bool {
        candidates.iter().any(|candidate| match (candidate, self) {
            (FieldType::Object(name), TypedValue::Object(o)) => o.type_name() == *name,
            (FieldType::Object(_), _) => false,
            (scalar, value) => scalar.accepts_scalar(&value.to_raw()),
        })
    }
}

/// The value bound to one field slot.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Single(TypedValue),
    Sequence(Vec<TypedValue>),
}

impl FieldValue {
    pub fn as_single(&self) -> Option<&TypedValue> {
        match self {
            FieldValue::Single(v) => Some(v),
            FieldValue::Sequence(_) => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[TypedValue]> {
        match self {
            FieldValue::Sequence(items) => Some(items),
            FieldValue::Single(_) => None,
        }
    }

    pub fn to_raw(&self) -> Value {
        match self {
            FieldValue::Single(v) => v.to_raw(),
            FieldValue::Sequence(items) => Value::Array(items.iter().map(TypedValue::to_raw).collect()),
        }
    }

    fn check(&self, owner: &'static str, field: &'static Field) -> Result<(), ValidationError> {
        let items: &[TypedValue] = match (field.cardinality, self) {
            (Cardinality::Single, FieldValue::Single(v)) => std::slice::from_ref(v),
            (Cardinality::Sequence, FieldValue::Sequence(items)) => items,
            (Cardinality::Single, FieldValue::Sequence(_)) | (Cardinality::Sequence, FieldValue::Single(_)) => {
                let expected = match field.cardinality {
                    Cardinality::Single => Container::Single,
                    Cardinality::Sequence => Container::Sequence,
                };
                return Err(ValidationError::MalformedContainer {
                    type_name: owner,
                    field: Some(field.name),
                    expected,
                    value: self.to_raw(),
                });
            }
        };
        for (i, item) in items.iter().enumerate() {
            if !item.conforms_to(field.types) {
                return Err(ValidationError::TypeMismatch {
                    type_name: owner,
                    field: field.name,
                    index: field.is_sequence().then_some(i),
                    value: item.to_raw(),
                    expected: field.types,
                });
            }
        }
        Ok(())
    }
}

/// An instance of a domain type whose bound fields all conform to its schema.
#[derive(Clone, PartialEq)]
pub struct DomainObject {
    schema: &'static Schema,
    slots: Vec<Option<FieldValue>>,
}

impl DomainObject {
    /// Assemble from slots produced by the builder, one per schema field.
    pub(crate) fn from_slots(schema: &'static Schema, slots: Vec<Option<FieldValue>>) -> Self {
        debug_assert_eq!(schema.fields.len(), slots.len());
        Self { schema, slots }
    }

    pub fn type_name(&self) -> &'static str {
        self.schema.type_name
    }

    pub fn schema(&self) -> &'static Schema {
        self.schema
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.schema.position(field).and_then(|i| self.slots[i].as_ref())
    }

    pub fn is_set(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    /// Shorthand for a single string field.
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.get(field)?.as_single()?.as_str()
    }

    /// Bound fields in schema order.
    pub fn fields(&self) -> impl Iterator<Item = (&'static str, &FieldValue)> + '_ {
        self.schema
            .fields
            .iter()
            .zip(&self.slots)
            .filter_map(|(f, slot)| slot.as_ref().map(|v| (f.name, v)))
    }

    /// Replace a field's value wholesale, returning the previous one.
    ///
    /// The new value is checked against the field's cardinality and
    /// candidate types; on error the object is left untouched.
    pub fn replace(&mut self, field: &str, value: FieldValue) -> Result<Option<FieldValue>, ValidationError> {
        let (index, decl) = self.lookup(field)?;
        value.check(self.type_name(), decl)?;
        Ok(self.slots[index].replace(value))
    }

    /// Clear an optional field. Required fields cannot be unset.
    pub fn unset(&mut self, field: &str) -> Result<Option<FieldValue>, ValidationError> {
        let (index, decl) = self.lookup(field)?;
        if decl.required {
            return Err(ValidationError::MissingRequiredField {
                type_name: self.type_name(),
                field: decl.name,
            });
        }
        Ok(self.slots[index].take())
    }

    /// Plain JSON containing exactly the bound fields.
    pub fn to_raw(&self) -> Value {
        let mut map = Map::new();
        for (name, value) in self.fields() {
            map.insert(name.to_string(), value.to_raw());
        }
        Value::Object(map)
    }

    fn lookup(&self, field: &str) -> Result<(usize, &'static Field), ValidationError> {
        let index = self
            .schema
            .position(field)
            .ok_or_else(|| ValidationError::UnknownField {
                type_name: self.type_name(),
                field: field.to_string(),
            })?;
        let fields: &'static [Field] = self.schema.fields;
        Ok((index, &fields[index]))
    }
}

impl fmt::Debug for DomainObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct(self.type_name());
        for (name, value) in self.fields() {
            s.field(name, value);
        }
        s.finish()
    }
}
