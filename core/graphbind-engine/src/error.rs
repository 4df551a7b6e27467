//! Error types for binding and bound-instance operations.

use graphbind_model::ModelError;
use thiserror::Error;

/// Result type for engine operations.
pub type BindResult<T> = Result<T, BindError>;

/// Errors surfaced by the binding engine.
///
/// Setup-time errors come back from [`Binder::build`](crate::Binder::build),
/// [`GraphContext`](crate::GraphContext) calls and
/// [`BoundInstance::mount`](crate::BoundInstance::mount). Access-time errors
/// come back from the state accessor and the default methods.
#[derive(Debug, Error)]
pub enum BindError {
    /// No usable component was supplied to the binder.
    #[error("`bind` expects a component, but {0}")]
    InvalidComponent(String),

    /// The schema is missing, malformed, or names unknown types.
    #[error("could not find a valid schema: {0}")]
    InvalidSchema(#[source] ModelError),

    /// Binding was attempted before the application declared its indices.
    #[error("indices not initialized")]
    IndicesNotInitialized,

    /// The application's indices were declared twice.
    #[error("indices already initialized")]
    IndicesAlreadyInitialized,

    /// The entity reference is malformed or was never declared.
    #[error("invalid index: {0}")]
    InvalidIndex(String),

    /// A method referenced a property the schema does not declare.
    #[error("property '{0}' not available from your pre-defined schema")]
    UnknownProperty(String),

    /// A single-key write was attempted on a multi-index property.
    #[error("`put` not supported on '{0}': its value spans derived indices")]
    UnsupportedWrite(String),

    /// `mount` was called on an instance that already ran its setup.
    #[error("instance already mounted")]
    AlreadyMounted,

    /// A value could not be converted by its type handler.
    #[error("value conversion failed: {0}")]
    Codec(#[from] ModelError),

    /// The configuration document could not be parsed.
    #[error("invalid config: {0}")]
    Config(#[from] serde_json::Error),
}

impl From<graphbind_types::Error> for BindError {
    fn from(err: graphbind_types::Error) -> Self {
        match err {
            graphbind_types::Error::InvalidIndex(reason) => Self::InvalidIndex(reason),
            graphbind_types::Error::IndicesNotInitialized => Self::IndicesNotInitialized,
        }
    }
}
