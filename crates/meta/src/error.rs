use serde_json::Value;
use std::fmt;

/// Every failure the metadata registry can report.
///
/// The `Display` text of each variant is part of the observable contract:
/// callers surface it verbatim to end users, so the exact wording is pinned
/// by tests and must not drift.
#[derive(Debug, Clone, PartialEq)]
pub enum MetadataError {
    /// A value was rejected by its property's handler. `message` is the
    /// fully rendered text; `name` and `value` are kept for callers that
    /// want the parts.
    InvalidValue {
        name: &'static str,
        value: String,
        message: String,
    },
    /// A required-key check found these properties absent. Sorted by name,
    /// reported as one error per check.
    Missing { names: Vec<&'static str> },
    /// A serialized key has no registered property.
    UnknownProperty { name: String },
    /// A marshalled node does not have the shape the handler expects.
    Mismatch {
        name: String,
        expected: &'static str,
        found: &'static str,
    },
}

impl MetadataError {
    /// The common rejection template: `Metadata {name}={value}, Expected {label}`.
    pub(crate) fn invalid_expected(name: &'static str, raw: &str, label: &str) -> MetadataError {
        MetadataError::InvalidValue {
            name,
            value: raw.to_string(),
            message: format!("Metadata {}={:?}, Expected {}", name, raw, label),
        }
    }

    pub(crate) fn mismatch(name: &str, expected: &'static str, node: &Value) -> MetadataError {
        MetadataError::Mismatch {
            name: name.to_string(),
            expected,
            found: node_kind(node),
        }
    }
}

/// JSON node kind for mismatch reporting.
pub(crate) fn node_kind(node: &Value) -> &'static str {
    match node {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl fmt::Display for MetadataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidValue { message, .. } => f.write_str(message),
            Self::Missing { names } => {
                write!(f, "Metadata missing: {}", names.join(", "))
            }
            Self::UnknownProperty { name } => {
                write!(f, "Unknown metadata property {:?}", name)
            }
            Self::Mismatch { name, expected, found } => {
                write!(f, "Metadata {}: expected {}, found {}", name, expected, found)
            }
        }
    }
}

impl std::error::Error for MetadataError {}
