//! The fixed table of type handlers.
//!
//! Built once at startup and shared behind an `Arc`. There is no way to add
//! or remove handlers after [`TypeRegistryBuilder::build`].

use crate::builtin;
use crate::{ModelError, ModelResult, TypeHandler};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Named type handlers, looked up by schema type tags.
#[derive(Clone, Default)]
pub struct TypeRegistry {
    handlers: HashMap<String, Arc<dyn TypeHandler>>,
}

impl TypeRegistry {
    /// A registry with no handlers. Every typed property will be rejected.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// A registry holding the built-in handlers only.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut handlers: HashMap<String, Arc<dyn TypeHandler>> = HashMap::new();
        for handler in builtin::all() {
            handlers.insert(handler.name().to_string(), handler);
        }
        Self { handlers }
    }

    pub fn builder() -> TypeRegistryBuilder {
        TypeRegistryBuilder::default()
    }

    /// Looks up a handler by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<dyn TypeHandler>> {
        self.handlers.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Resolves an optional type tag.
    ///
    /// `None` means "no conversion" and resolves to no handler. A name that
    /// is not registered fails with [`ModelError::UnknownType`].
    pub fn resolve(&self, type_name: Option<&str>) -> ModelResult<Option<Arc<dyn TypeHandler>>> {
        match type_name {
            None => Ok(None),
            Some(name) => self
                .handlers
                .get(name)
                .cloned()
                .map(Some)
                .ok_or_else(|| ModelError::UnknownType(name.to_string())),
        }
    }

    /// Registered type names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("types", &self.names())
            .finish()
    }
}

/// Collects handlers and rejects duplicate names on [`build`](Self::build).
#[derive(Default)]
pub struct TypeRegistryBuilder {
    handlers: Vec<Arc<dyn TypeHandler>>,
}

impl TypeRegistryBuilder {
    /// Adds the built-in handlers.
    #[must_use]
    pub fn builtins(mut self) -> Self {
        self.handlers.extend(builtin::all());
        self
    }

    /// Adds a handler.
    #[must_use]
    pub fn register(mut self, handler: impl TypeHandler + 'static) -> Self {
        self.handlers.push(Arc::new(handler));
        self
    }

    /// Adds an already shared handler.
    #[must_use]
    pub fn register_arc(mut self, handler: Arc<dyn TypeHandler>) -> Self {
        self.handlers.push(handler);
        self
    }

    pub fn build(self) -> ModelResult<TypeRegistry> {
        let mut handlers: HashMap<String, Arc<dyn TypeHandler>> = HashMap::new();
        for handler in self.handlers {
            let name = handler.name().to_string();
            if handlers.contains_key(&name) {
                return Err(ModelError::DuplicateType(name));
            }
            handlers.insert(name, handler);
        }
        Ok(TypeRegistry { handlers })
    }
}
