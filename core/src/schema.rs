//! Static per-type field schemas and the registry that resolves them by name.
//!
//! # Design
//! A `Schema` is an ordered list of `Field` declarations fixed at compile
//! time. Each field names its one-of candidate types, its cardinality and
//! whether it is required. Nested domain types are referenced by name
//! (`FieldType::Object`) and resolved through a `SchemaRegistry`, which is a
//! plain static table. Nothing here is mutated at runtime, so registries can
//! be shared freely between threads.

use std::fmt;

use serde_json::Value;

/// A candidate type a field value may take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    String,
    /// Any JSON number, integral or not.
    Number,
    /// A JSON number representable as `i64`.
    Integer,
    Boolean,
    /// A nested domain type, looked up by type name in the registry.
    Object(&'static str),
}

impl FieldType {
    /// Exact JSON-kind match for scalar candidates. Always false for
    /// `Object`, which needs a registry to be resolved.
    pub fn accepts_scalar(&self, raw: &Value) -> bool {
        match (self, raw) {
            (FieldType::String, Value::String(_)) => true,
            (FieldType::Number, Value::Number(_)) => true,
            (FieldType::Integer, Value::Number(n)) => n.is_i64(),
            (FieldType::Boolean, Value::Bool(_)) => true,
            _ => false,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::String => write!(f, "string"),
            FieldType::Number => write!(f, "number"),
            FieldType::Integer => write!(f, "integer"),
            FieldType::Boolean => write!(f, "boolean"),
            FieldType::Object(name) => write!(f, "{name}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    Single,
    Sequence,
}

/// One field declaration of a schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    /// One-of candidates, tried in declared order.
    pub types: &'static [FieldType],
    pub cardinality: Cardinality,
    pub required: bool,
}

impl Field {
    pub const fn required(name: &'static str, types: &'static [FieldType]) -> Self {
        Self {
            name,
            types,
            cardinality: Cardinality::Single,
            required: true,
        }
    }

    pub const fn optional(name: &'static str, types: &'static [FieldType]) -> Self {
        Self {
            name,
            types,
            cardinality: Cardinality::Single,
            required: false,
        }
    }

    /// Turn this declaration into an ordered sequence of its candidate types.
    pub const fn sequence(self) -> Self {
        Self {
            cardinality: Cardinality::Sequence,
            ..self
        }
    }

    pub fn is_sequence(&self) -> bool {
        self.cardinality == Cardinality::Sequence
    }
}

/// The field layout of one domain type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schema {
    pub type_name: &'static str,
    pub fields: &'static [Field],
}

impl Schema {
    pub const fn new(type_name: &'static str, fields: &'static [Field]) -> Self {
        Self { type_name, fields }
    }

    pub fn field(&self, name: &str) -> Option<&'static Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub(crate) fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }
}

/// Static table of schemas keyed by type name.
#[derive(Debug, Clone, Copy)]
pub struct SchemaRegistry {
    schemas: &'static [&'static Schema],
}

impl SchemaRegistry {
    pub const fn new(schemas: &'static [&'static Schema]) -> Self {
        Self { schemas }
    }

    pub fn get(&self, type_name: &str) -> Option<&'static Schema> {
        self.schemas.iter().copied().find(|s| s.type_name == type_name)
    }

    pub fn schemas(&self) -> &'static [&'static Schema] {
        self.schemas
    }

    /// `(owner, field, referenced type)` for every `Object` candidate that
    /// names a type missing from this registry.
    pub fn unresolved(&self) -> Vec<(&'static str, &'static str, &'static str)> {
        let mut missing = Vec::new();
        for schema in self.schemas {
            for field in schema.fields {
                for candidate in field.types {
                    if let FieldType::Object(name) = candidate {
                        if self.get(name).is_none() {
                            missing.push((schema.type_name, field.name, *name));
                        }
                    }
                }
            }
        }
        missing
    }
}
