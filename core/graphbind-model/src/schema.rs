//! Author schemas and their normalized form.
//!
//! Authors declare properties as `[type, default, options]` triples:
//!
//! ```
//! use graphbind_model::{AuthorSchema, Schema, TypeRegistry};
//! use serde_json::json;
//!
//! let author = AuthorSchema::from_json(json!({
//!     "count": ["number", 0, {}],
//!     "title": [null, "untitled", {}],
//! }))
//! .unwrap();
//!
//! let schema = Schema::normalize(&author, &TypeRegistry::with_builtins()).unwrap();
//! assert_eq!(schema.get("count").unwrap().type_name(), Some("number"));
//! ```

use crate::{ModelError, ModelResult, TypeHandler, TypeRegistry};
use graphbind_types::Value;
use serde_json::Map;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// One property as written by an author.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthorProperty {
    pub type_name: Option<String>,
    pub default: Value,
    pub options: Value,
}

/// A property schema in author-facing form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthorSchema {
    properties: BTreeMap<String, AuthorProperty>,
}

impl AuthorSchema {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a property. A later declaration of the same key replaces it.
    #[must_use]
    pub fn prop(
        mut self,
        key: impl Into<String>,
        type_name: Option<&str>,
        default: Value,
        options: Value,
    ) -> Self {
        self.properties.insert(
            key.into(),
            AuthorProperty {
                type_name: type_name.map(str::to_string),
                default,
                options,
            },
        );
        self
    }

    /// Parses the JSON form: an object mapping keys to
    /// `[typeName | null, default, options]` arrays.
    ///
    /// Trailing elements may be omitted; a missing default is `null` and
    /// missing options are `{}`.
    pub fn from_json(value: Value) -> ModelResult<Self> {
        let entries = match value {
            Value::Object(entries) => entries,
            other => {
                return Err(ModelError::InvalidSchema(format!(
                    "expected an object of property triples, found {}",
                    json_kind(&other)
                )));
            }
        };

        let mut properties = BTreeMap::new();
        for (key, triple) in entries {
            let Value::Array(parts) = triple else {
                return Err(ModelError::InvalidSchema(format!(
                    "property '{key}' must be a [type, default, options] array"
                )));
            };
            if parts.is_empty() || parts.len() > 3 {
                return Err(ModelError::InvalidSchema(format!(
                    "property '{key}' has {} elements, expected 1 to 3",
                    parts.len()
                )));
            }

            let mut parts = parts.into_iter();
            let type_name = match parts.next() {
                Some(Value::String(name)) => Some(name),
                Some(Value::Null) | None => None,
                Some(other) => {
                    return Err(ModelError::InvalidSchema(format!(
                        "property '{key}' has a {} where a type name was expected",
                        json_kind(&other)
                    )));
                }
            };
            let default = parts.next().unwrap_or(Value::Null);
            let options = parts.next().unwrap_or_else(|| Value::Object(Map::new()));

            properties.insert(
                key,
                AuthorProperty {
                    type_name,
                    default,
                    options,
                },
            );
        }
        Ok(Self { properties })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AuthorProperty)> {
        self.properties.iter().map(|(k, p)| (k.as_str(), p))
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// A normalized property: its type resolved to a handler.
#[derive(Clone)]
pub struct PropertyDescriptor {
    key: String,
    type_name: Option<String>,
    default: Value,
    options: Value,
    handler: Option<Arc<dyn TypeHandler>>,
    axes: Vec<String>,
}

impl PropertyDescriptor {
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }

    #[must_use]
    pub fn default_value(&self) -> &Value {
        &self.default
    }

    #[must_use]
    pub fn options(&self) -> &Value {
        &self.options
    }

    #[must_use]
    pub fn handler(&self) -> Option<&Arc<dyn TypeHandler>> {
        self.handler.as_ref()
    }

    #[must_use]
    pub fn is_multi_index(&self) -> bool {
        self.handler.as_ref().is_some_and(|h| h.is_multi_index())
    }

    /// Axis names for a multi-index property; empty otherwise.
    #[must_use]
    pub fn axes(&self) -> &[String] {
        &self.axes
    }

    /// Encodes a value for the store. Untyped properties and `null` pass through.
    pub fn encode(&self, value: &Value) -> ModelResult<Value> {
        match &self.handler {
            Some(handler) if !value.is_null() => handler.store(value),
            _ => Ok(value.clone()),
        }
    }

    /// Decodes a stored value. Untyped properties and `null` pass through.
    pub fn decode(&self, encoded: &Value) -> ModelResult<Value> {
        match &self.handler {
            Some(handler) if !encoded.is_null() => handler.retrieve(encoded),
            _ => Ok(encoded.clone()),
        }
    }
}

impl fmt::Debug for PropertyDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyDescriptor")
            .field("key", &self.key)
            .field("type", &self.type_name)
            .field("default", &self.default)
            .field("options", &self.options)
            .field("axes", &self.axes)
            .finish()
    }
}

/// A normalized schema. Immutable once built; share it behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    properties: BTreeMap<String, PropertyDescriptor>,
}

impl Schema {
    /// Converts an author schema into descriptors, resolving every type tag.
    pub fn normalize(author: &AuthorSchema, registry: &TypeRegistry) -> ModelResult<Self> {
        let mut properties = BTreeMap::new();
        for (key, prop) in author.iter() {
            let handler = registry.resolve(prop.type_name.as_deref())?;
            let axes = match &handler {
                Some(h) if h.is_multi_index() => h.axes(key, &prop.options)?,
                _ => Vec::new(),
            };
            properties.insert(
                key.to_string(),
                PropertyDescriptor {
                    key: key.to_string(),
                    type_name: prop.type_name.clone(),
                    default: prop.default.clone(),
                    options: prop.options.clone(),
                    handler,
                    axes,
                },
            );
        }
        debug!("Normalized schema with {} properties", properties.len());
        Ok(Self { properties })
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&PropertyDescriptor> {
        self.properties.get(key)
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PropertyDescriptor> {
        self.properties.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}
