//! Node resolution.
//!
//! Explicit ids are unique across the whole store, so they are looked up
//! from the global root:
//!
//! ```text
//! root.get("jsdk24ys")
//! root.get("app").get("todo")    // symbolic name, scoped to the app
//! ```

use graphbind_store::{GraphNode, GraphStore};
use graphbind_types::{Index, NodeAddress};
use tracing::debug;

/// Resolves entity references to store nodes.
pub struct NodeResolver<'a, S: GraphStore> {
    store: &'a S,
    app_root: &'a str,
}

impl<'a, S: GraphStore> NodeResolver<'a, S> {
    pub fn new(store: &'a S, app_root: &'a str) -> Self {
        Self { store, app_root }
    }

    /// The address of `index`. Stable for the lifetime of the reference.
    pub fn address(&self, index: &Index) -> NodeAddress {
        NodeAddress::resolve(index, self.app_root)
    }

    /// The store node at `address`.
    pub fn node(&self, address: &NodeAddress) -> S::Node {
        match address {
            NodeAddress::Global { id } => self.store.root().get(id),
            NodeAddress::Scoped { app_root, name } => self.store.app(app_root).get(name),
        }
    }

    /// Address and node in one step.
    pub fn resolve(&self, index: &Index) -> (NodeAddress, S::Node) {
        let address = self.address(index);
        let node = self.node(&address);
        debug!("Resolved {} to {}", index, address);
        (address, node)
    }
}
