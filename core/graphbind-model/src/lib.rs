//! Schema and typed-value model for graphbind.
//!
//! Defines the contract between an author's property schema and the
//! engine that binds it to a graph node:
//! - [`AuthorSchema`]: the terse `[type, default, options]` form authors write
//! - [`Schema`] / [`PropertyDescriptor`]: the normalized, type-resolved form
//! - [`TypeHandler`]: how a named type encodes values for the store
//! - [`TypeRegistry`]: the fixed table of handlers, built once at startup
//!
//! Type tags are resolved against the registry during normalization, so an
//! unknown type name fails when the schema is bound rather than on first use.

pub mod builtin;
mod error;
mod handler;
mod registry;
mod schema;

pub use error::{ModelError, ModelResult};
pub use handler::{AxisLayout, KeyWriter, TypeHandler};
pub use registry::{TypeRegistry, TypeRegistryBuilder};
pub use schema::{AuthorProperty, AuthorSchema, PropertyDescriptor, Schema};
