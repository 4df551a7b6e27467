//! Reactive property binding for graphbind.
//!
//! Binds a UI component to one node of an eventually-consistent graph store.
//! The component declares a schema of properties; the engine keeps a local,
//! decoded copy of those properties in sync with the store and hands the
//! component a methods object for writing back.
//!
//! # Components
//!
//! - **Resolver**: maps an [`Index`](graphbind_types::Index) to its node
//! - **Lifecycle**: read, default, subscribe on mount; release on unmount
//! - **State**: the latest values, readable live or as a render snapshot
//! - **Methods**: default `get`/`put` plus author-supplied operations
//!
//! # Example
//!
//! ```
//! use graphbind_engine::{BindConfig, Binder, BoundProps, DefaultMethods, GraphContext, from_fn};
//! use graphbind_store::{MemoryGraph, MemoryNode};
//! use graphbind_types::Index;
//! use serde_json::json;
//! use std::rc::Rc;
//!
//! let counter = Index::named("counter");
//! let context = Rc::new(GraphContext::new(MemoryGraph::new(), BindConfig::default()));
//! context.init_indices([counter.clone()]).unwrap();
//!
//! let view = from_fn(|props: BoundProps<'_, (), DefaultMethods<MemoryNode>>| {
//!     props.state.get("count").cloned()
//! });
//! let bound = Binder::new(counter)
//!     .schema_json(json!({ "count": ["number", 0, {}] }))
//!     .component(view)
//!     .build(&context)
//!     .unwrap();
//!
//! let instance = bound.instantiate(&context, || {});
//! instance.mount().unwrap();
//! instance.methods().put("count", json!(5)).unwrap();
//! assert_eq!(instance.render(&()), Some(json!(5)));
//! ```

mod bind;
mod config;
mod context;
mod error;
mod lifecycle;
mod methods;
mod resolver;
mod state;

pub use bind::{Binder, BoundComponent, BoundInstance, BoundProps, Component, FnComponent, from_fn};
pub use config::BindConfig;
pub use context::GraphContext;
pub use error::{BindError, BindResult};
pub use lifecycle::{ListenerRegistry, RenderScheduler};
pub use methods::{DefaultMethods, MethodFactory};
pub use resolver::NodeResolver;
pub use state::{RenderView, StateAccessor, StateStore};
