//! Process-wide binding context.
//!
//! One [`GraphContext`] wraps the store client, the type registry and the
//! application's declared indices. Every bound instance holds an `Rc` to it.
//! Nothing in here changes after setup except the one-time index declaration.

use crate::{BindConfig, BindError, BindResult};
use graphbind_model::TypeRegistry;
use graphbind_store::GraphStore;
use graphbind_types::{Index, IndexSet};
use std::cell::OnceCell;
use std::fmt;
use std::sync::Arc;
use tracing::info;

pub struct GraphContext<S: GraphStore> {
    store: S,
    config: BindConfig,
    registry: Arc<TypeRegistry>,
    indices: OnceCell<IndexSet>,
}

impl<S: GraphStore> GraphContext<S> {
    /// Creates a context using the built-in type handlers.
    pub fn new(store: S, config: BindConfig) -> Self {
        Self::with_registry(store, config, Arc::new(TypeRegistry::with_builtins()))
    }

    /// Creates a context with a custom type registry.
    pub fn with_registry(store: S, config: BindConfig, registry: Arc<TypeRegistry>) -> Self {
        Self {
            store,
            config,
            registry,
            indices: OnceCell::new(),
        }
    }

    /// Declares the application's entity references. Allowed once.
    pub fn init_indices(&self, indices: impl IntoIterator<Item = Index>) -> BindResult<()> {
        let set = IndexSet::new(indices);
        let count = set.len();
        self.indices
            .set(set)
            .map_err(|_| BindError::IndicesAlreadyInitialized)?;
        info!("Declared {} indices under '{}'", count, self.config.app_root);
        Ok(())
    }

    /// The declared indices.
    pub fn indices(&self) -> BindResult<&IndexSet> {
        self.indices.get().ok_or(BindError::IndicesNotInitialized)
    }

    /// Checks that `index` is well formed and was declared.
    pub fn check_index(&self, index: &Index) -> BindResult<()> {
        let indices = self.indices()?;
        index.validate()?;
        if !indices.contains(index) {
            return Err(BindError::InvalidIndex(format!("{index} was not declared")));
        }
        Ok(())
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &BindConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<TypeRegistry> {
        &self.registry
    }
}

impl<S: GraphStore> fmt::Debug for GraphContext<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphContext")
            .field("config", &self.config)
            .field("registry", &self.registry)
            .field("indices", &self.indices.get().map(IndexSet::len))
            .finish()
    }
}
