//! Core type definitions for graphbind.
//!
//! This crate defines the small set of types every other graphbind crate
//! depends on:
//! - [`Value`]: the JSON value stored at a single node key
//! - [`Index`]: a reference to a bindable entity (global id or symbolic name)
//! - [`IndexSet`]: the application's declared entity references
//! - [`NodeAddress`] / [`NodePath`]: where an entity lives in the graph store
//!
//! Nothing here talks to a store or a UI host. Those live in
//! `graphbind-store` and `graphbind-engine`.

mod address;
mod index;

pub use address::{NodeAddress, NodePath};
pub use index::{Index, IndexSet};

/// A value held at one key of a graph node.
///
/// `Value::Null` is treated as "absent" everywhere in graphbind.
pub type Value = serde_json::Value;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when working with entity references.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("invalid index: {0}")]
    InvalidIndex(String),

    #[error("indices not initialized")]
    IndicesNotInitialized,
}

/// Returns true when a stored value should be treated as missing.
#[must_use]
pub fn is_absent(value: Option<&Value>) -> bool {
    matches!(value, None | Some(Value::Null))
}
