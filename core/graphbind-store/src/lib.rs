//! Graph store client contract for graphbind.
//!
//! graphbind does not implement storage or replication. It talks to an
//! eventually-consistent key/value graph through the traits in this crate:
//!
//! - [`GraphStore`] hands out the global root and application roots
//! - [`GraphNode`] reads, writes and subscribes to one node
//! - [`ChainHandle`] is the opaque token used to unsubscribe
//!
//! Subscriptions are callback driven and never block. A subscription's handle
//! only becomes available inside its first delivery, so callers must treat it
//! as "present after first notification".
//!
//! [`MemoryGraph`] is an in-process implementation with the same delivery
//! semantics, used by tests and local tooling.

mod memory;

pub use memory::{MemoryChain, MemoryGraph, MemoryNode};

use graphbind_types::{NodePath, Value};

/// One-shot read callback. Receives `None` when the key holds nothing.
pub type OnceCallback = Box<dyn FnOnce(Option<Value>)>;

/// Persistent subscription callback: `(value, key, chain)`.
pub type OnCallback<C> = Box<dyn FnMut(Option<Value>, &str, &C)>;

/// Opaque subscription token.
pub trait ChainHandle: Clone + 'static {
    /// Ends the subscription. Calling it again has no effect.
    fn off(&self);
}

/// A handle to one node of the graph.
pub trait GraphNode: Clone + 'static {
    type Chain: ChainHandle;

    /// The child node under `key`.
    fn get(&self, key: &str) -> Self;

    /// Writes a value at this node. Subscribers, including any held by the
    /// writer itself, are notified.
    fn put(&self, value: Value);

    /// Reads the current value once.
    fn once(&self, callback: OnceCallback);

    /// Subscribes to this node. The callback fires for the current value, if
    /// any, and then for every later change from any writer.
    fn on(&self, callback: OnCallback<Self::Chain>);

    /// Where this node lives.
    fn path(&self) -> &NodePath;
}

/// The entry points of a graph store client.
pub trait GraphStore {
    type Node: GraphNode;

    /// The global root, under which explicit ids live.
    fn root(&self) -> Self::Node;

    /// The root of one application's namespace.
    fn app(&self, app_root: &str) -> Self::Node {
        self.root().get(app_root)
    }
}
