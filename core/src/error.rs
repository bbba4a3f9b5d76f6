//! Error types for the typed value builder and the itsyouonline client.
//!
//! # Design
//! `ValidationError` carries the owning type name, the field name and the
//! offending raw value so a caller can report it verbatim (for example as a
//! 400 response body) or branch on `kind()`. Failures inside nested objects
//! are wrapped in `InvalidField`, one layer per level, which is what
//! `field_path()` walks. `InvalidElement` adds the array index when a whole
//! JSON array of models is built.
//!
//! `ApiError` keeps `NotFound` separate because callers frequently
//! distinguish "the resource does not exist" from "the server returned an
//! unexpected status."

use std::fmt;

use serde_json::Value;
use thiserror::Error;

use crate::schema::FieldType;

/// The container shape a raw value was expected to have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    Mapping,
    Sequence,
    Single,
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Container::Mapping => write!(f, "a mapping"),
            Container::Sequence => write!(f, "a sequence"),
            Container::Single => write!(f, "a single value"),
        }
    }
}

/// Root-cause category of a `ValidationError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MissingRequiredField,
    TypeMismatch,
    MalformedContainer,
    UnknownType,
    UnknownField,
    DepthExceeded,
    ModelMismatch,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::MissingRequiredField => "missing_required_field",
            ErrorKind::TypeMismatch => "type_mismatch",
            ErrorKind::MalformedContainer => "malformed_container",
            ErrorKind::UnknownType => "unknown_type",
            ErrorKind::UnknownField => "unknown_field",
            ErrorKind::DepthExceeded => "depth_exceeded",
            ErrorKind::ModelMismatch => "model_mismatch",
        }
    }
}

/// Errors raised while building a `DomainObject` from raw JSON.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{type_name}: missing required property {field}")]
    MissingRequiredField {
        type_name: &'static str,
        field: &'static str,
    },

    /// The value matched none of the field's candidate types.
    #[error(
        "{type_name}: property {field}{} has value {value} matching none of [{}]",
        index_suffix(.index),
        candidates(.expected)
    )]
    TypeMismatch {
        type_name: &'static str,
        field: &'static str,
        index: Option<usize>,
        value: Value,
        expected: &'static [FieldType],
    },

    /// A sequence was expected and something else arrived, or the other way
    /// round. `field` is `None` when the object itself is not a mapping.
    #[error("{type_name}: {} expected {expected}, got {value}", field_label(.field))]
    MalformedContainer {
        type_name: &'static str,
        field: Option<&'static str>,
        expected: Container,
        value: Value,
    },

    /// A nested object under `field` failed to build.
    #[error("{type_name}: unable to create {field}{} from value: {value}: {source}", index_suffix(.index))]
    InvalidField {
        type_name: &'static str,
        field: &'static str,
        index: Option<usize>,
        value: Value,
        source: Box<ValidationError>,
    },

    /// Element `index` of a top-level JSON array failed to build.
    #[error("{type_name}[{index}]: {source}")]
    InvalidElement {
        type_name: &'static str,
        index: usize,
        source: Box<ValidationError>,
    },

    #[error("no schema registered for type {0}")]
    UnknownType(String),

    #[error("{type_name} has no property {field}")]
    UnknownField { type_name: &'static str, field: String },

    #[error("{type_name}: nesting exceeds {limit} levels")]
    DepthExceeded { type_name: &'static str, limit: usize },

    #[error("{type_name}: validated value does not decode into the model: {message}")]
    ModelMismatch { type_name: &'static str, message: String },
}

fn index_suffix(index: &Option<usize>) -> String {
    index.map(|i| format!("[{i}]")).unwrap_or_default()
}

fn candidates(expected: &[FieldType]) -> String {
    expected.iter().map(|t| t.to_string()).collect::<Vec<_>>().join(", ")
}

fn field_label(field: &Option<&'static str>) -> String {
    match field {
        Some(name) => format!("property {name}"),
        None => "value".to_string(),
    }
}

impl ValidationError {
    /// The innermost error, skipping `InvalidField` wrappers.
    pub fn root_cause(&self) -> &ValidationError {
        let mut current = self;
        while let ValidationError::InvalidField { source, .. } | ValidationError::InvalidElement { source, .. } = current
        {
            current = source;
        }
        current
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ValidationError::InvalidField { source, .. } | ValidationError::InvalidElement { source, .. } => {
                source.kind()
            }
            ValidationError::MissingRequiredField { .. } => ErrorKind::MissingRequiredField,
            ValidationError::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            ValidationError::MalformedContainer { .. } => ErrorKind::MalformedContainer,
            ValidationError::UnknownType(_) => ErrorKind::UnknownType,
            ValidationError::UnknownField { .. } => ErrorKind::UnknownField,
            ValidationError::DepthExceeded { .. } => ErrorKind::DepthExceeded,
            ValidationError::ModelMismatch { .. } => ErrorKind::ModelMismatch,
        }
    }

    /// Dotted path from the outermost object to the failing field, e.g.
    /// `addresses[1].city`, or `[1].city` for an element of a model array.
    /// Empty when the failure is on the object itself.
    pub fn field_path(&self) -> String {
        let mut path = String::new();
        let mut current = self;
        loop {
            if let ValidationError::InvalidElement { index, source, .. } = current {
                path.push_str(&format!("[{index}]"));
                current = source;
                continue;
            }
            let (segment, index) = match current {
                ValidationError::InvalidField { field, index, .. }
                | ValidationError::TypeMismatch { field, index, .. } => (Some(*field), *index),
                ValidationError::MissingRequiredField { field, .. } => (Some(*field), None),
                ValidationError::MalformedContainer { field, .. } => (*field, None),
                _ => (None, None),
            };
            if let Some(segment) = segment {
                if !path.is_empty() {
                    path.push('.');
                }
                path.push_str(segment);
                path.push_str(&index_suffix(&index));
            }
            match current {
                ValidationError::InvalidField { source, .. } => current = source,
                _ => return path,
            }
        }
    }
}

/// Errors returned by `ItsYouOnlineClient` build and parse methods.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 404: the requested resource does not exist.
    #[error("resource not found")]
    NotFound,

    /// The server returned a status other than the expected one and 404.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body is not JSON.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// The JSON did not conform to the schema of the expected type.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}
