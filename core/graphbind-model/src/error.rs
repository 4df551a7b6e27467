//! Error types for the schema and type model.

use thiserror::Error;

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors raised while normalizing schemas or converting values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// The author schema is not a key/value mapping of property triples.
    #[error("invalid schema: {0}")]
    InvalidSchema(String),

    /// A property names a type that is not registered.
    #[error("unknown type '{0}'")]
    UnknownType(String),

    /// Two handlers were registered under the same name.
    #[error("type '{0}' registered twice")]
    DuplicateType(String),

    /// A property's options do not fit its type.
    #[error("invalid options for '{key}': {reason}")]
    InvalidOptions { key: String, reason: String },

    /// A value could not be encoded for the store.
    #[error("cannot encode value as '{type_name}': {reason}")]
    Encode { type_name: String, reason: String },

    /// A stored value could not be decoded.
    #[error("cannot decode stored value as '{type_name}': {reason}")]
    Decode { type_name: String, reason: String },

    /// The handler does not implement this operation.
    #[error("type '{type_name}' does not support {op}")]
    UnsupportedOperation { type_name: String, op: &'static str },
}

impl ModelError {
    pub(crate) fn encode(type_name: &str, reason: impl Into<String>) -> Self {
        Self::Encode {
            type_name: type_name.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn decode(type_name: &str, reason: impl Into<String>) -> Self {
        Self::Decode {
            type_name: type_name.to_string(),
            reason: reason.into(),
        }
    }
}
