//! Schema-driven construction of domain objects from raw JSON.
//!
//! # Design
//! `TypedValueBuilder` walks a `serde_json::Value` against a static `Schema`
//! and produces a `DomainObject`, or the first `ValidationError` it meets.
//! Fields are visited in schema order; the first failure aborts the whole
//! object, so no partially built value ever escapes.
//!
//! Scalars are matched by exact JSON kind with no coercion. Each field lists
//! one-of candidates which are tried in order; an object candidate matches a
//! mapping that builds cleanly against the candidate's schema. JSON `null`
//! counts as absent.
//!
//! Nesting is bounded by `max_depth` so a recursive schema fed adversarial
//! input cannot exhaust the stack.
//!
//! Typed models ride on top: a `Model` is a serde struct with a registered
//! schema. It is validated here first and only then decoded by serde, so
//! decode failures carry the builder's field context.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{Container, ErrorKind, ValidationError};
use crate::object::{DomainObject, FieldValue, TypedValue};
use crate::schema::{Cardinality, Field, FieldType, Schema, SchemaRegistry};

/// Deepest object nesting accepted unless overridden with `with_max_depth`.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// A serde type whose JSON layout is described by a registered schema.
pub trait Model: Serialize + DeserializeOwned {
    const TYPE_NAME: &'static str;
}

/// Builds and serializes domain objects for the schemas of one registry.
#[derive(Debug, Clone, Copy)]
pub struct TypedValueBuilder<'r> {
    registry: &'r SchemaRegistry,
    max_depth: usize,
}

impl<'r> TypedValueBuilder<'r> {
    pub fn new(registry: &'r SchemaRegistry) -> Self {
        Self {
            registry,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn registry(&self) -> &'r SchemaRegistry {
        self.registry
    }

    pub fn schema(&self, type_name: &str) -> Result<&'static Schema, ValidationError> {
        self.registry
            .get(type_name)
            .ok_or_else(|| ValidationError::UnknownType(type_name.to_string()))
    }

    pub fn build(&self, type_name: &str, raw: &Value) -> Result<DomainObject, ValidationError> {
        let schema = self.schema(type_name)?;
        self.build_schema(schema, raw)
    }

    pub fn build_schema(&self, schema: &'static Schema, raw: &Value) -> Result<DomainObject, ValidationError> {
        self.build_object(schema, raw, 1).inspect_err(|err| {
            debug!(
                type_name = schema.type_name,
                kind = err.kind().as_str(),
                path = %err.field_path(),
                "validation failed"
            );
        })
    }

    /// Validate `raw` against the schema of `T`, then decode it.
    pub fn build_model<T: Model>(&self, raw: &Value) -> Result<T, ValidationError> {
        let object = self.build(T::TYPE_NAME, raw)?;
        decode(&object)
    }

    /// Same as `build_model` for a JSON array of `T`. Stops at the first
    /// element that fails and wraps its error in `InvalidElement`.
    pub fn build_models<T: Model>(&self, raw: &Value) -> Result<Vec<T>, ValidationError> {
        let Value::Array(items) = raw else {
            return Err(ValidationError::MalformedContainer {
                type_name: T::TYPE_NAME,
                field: None,
                expected: Container::Sequence,
                value: raw.clone(),
            });
        };
        items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                self.build_model(item).map_err(|err| ValidationError::InvalidElement {
                    type_name: T::TYPE_NAME,
                    index,
                    source: Box::new(err),
                })
            })
            .collect()
    }

    /// Serialize a model and re-project it through its schema, so the output
    /// holds exactly the schema's bound fields.
    pub fn model_to_raw<T: Model>(&self, model: &T) -> Result<Value, ValidationError> {
        let raw = serde_json::to_value(model).map_err(|e| ValidationError::ModelMismatch {
            type_name: T::TYPE_NAME,
            message: e.to_string(),
        })?;
        Ok(self.build(T::TYPE_NAME, &raw)?.to_raw())
    }

    fn build_object(&self, schema: &'static Schema, raw: &Value, depth: usize) -> Result<DomainObject, ValidationError> {
        if depth > self.max_depth {
            return Err(ValidationError::DepthExceeded {
                type_name: schema.type_name,
                limit: self.max_depth,
            });
        }
        let Value::Object(map) = raw else {
            return Err(ValidationError::MalformedContainer {
                type_name: schema.type_name,
                field: None,
                expected: Container::Mapping,
                value: raw.clone(),
            });
        };

        let mut slots = Vec::with_capacity(schema.fields.len());
        for field in schema.fields {
            let slot = match map.get(field.name) {
                None | Some(Value::Null) if field.required => {
                    return Err(ValidationError::MissingRequiredField {
                        type_name: schema.type_name,
                        field: field.name,
                    });
                }
                None | Some(Value::Null) => None,
                Some(value) => Some(self.build_field(schema, field, value, depth)?),
            };
            slots.push(slot);
        }
        Ok(DomainObject::from_slots(schema, slots))
    }

    fn build_field(
        &self,
        owner: &'static Schema,
        field: &'static Field,
        raw: &Value,
        depth: usize,
    ) -> Result<FieldValue, ValidationError> {
        match (field.cardinality, raw) {
            (Cardinality::Sequence, Value::Array(items)) => items
                .iter()
                .enumerate()
                .map(|(i, item)| self.build_value(owner, field, Some(i), item, depth))
                .collect::<Result<Vec<_>, _>>()
                .map(FieldValue::Sequence),
            (Cardinality::Sequence, other) => Err(ValidationError::MalformedContainer {
                type_name: owner.type_name,
                field: Some(field.name),
                expected: Container::Sequence,
                value: other.clone(),
            }),
            (Cardinality::Single, Value::Array(_)) => Err(ValidationError::MalformedContainer {
                type_name: owner.type_name,
                field: Some(field.name),
                expected: Container::Single,
                value: raw.clone(),
            }),
            (Cardinality::Single, value) => self.build_value(owner, field, None, value, depth).map(FieldValue::Single),
        }
    }

    /// One-of matching of a single value against the field's candidates.
    fn build_value(
        &self,
        owner: &'static Schema,
        field: &'static Field,
        index: Option<usize>,
        raw: &Value,
        depth: usize,
    ) -> Result<TypedValue, ValidationError> {
        let mut objects_tried = 0;
        let mut nested_failure = None;

        for candidate in field.types {
            match candidate {
                FieldType::Object(name) => {
                    if !raw.is_object() {
                        continue;
                    }
                    let schema = self.schema(name)?;
                    objects_tried += 1;
                    match self.build_object(schema, raw, depth + 1) {
                        Ok(object) => return Ok(TypedValue::Object(object)),
                        Err(err) => {
                            let fatal = matches!(err.kind(), ErrorKind::DepthExceeded | ErrorKind::UnknownType);
                            let wrapped = ValidationError::InvalidField {
                                type_name: owner.type_name,
                                field: field.name,
                                index,
                                value: raw.clone(),
                                source: Box::new(err),
                            };
                            if fatal {
                                return Err(wrapped);
                            }
                            nested_failure.get_or_insert(wrapped);
                        }
                    }
                }
                scalar => {
                    if scalar.accepts_scalar(raw) {
                        if let Some(value) = scalar_value(raw) {
                            return Ok(value);
                        }
                    }
                }
            }
        }

        // A lone object candidate explains the failure better than a bare
        // mismatch; with several, none of them is more relevant than another.
        match nested_failure {
            Some(err) if objects_tried == 1 => Err(err),
            _ => Err(ValidationError::TypeMismatch {
                type_name: owner.type_name,
                field: field.name,
                index,
                value: raw.clone(),
                expected: field.types,
            }),
        }
    }
}

fn scalar_value(raw: &Value) -> Option<TypedValue> {
    match raw {
        Value::String(s) => Some(TypedValue::String(s.clone())),
        Value::Number(n) => Some(TypedValue::Number(n.clone())),
        Value::Bool(b) => Some(TypedValue::Boolean(*b)),
        _ => None,
    }
}

/// Decode an already validated object into its model type.
pub fn decode<T: Model>(object: &DomainObject) -> Result<T, ValidationError> {
    serde_json::from_value(object.to_raw()).map_err(|e| ValidationError::ModelMismatch {
        type_name: object.type_name(),
        message: e.to_string(),
    })
}
