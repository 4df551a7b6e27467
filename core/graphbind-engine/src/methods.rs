//! The operations injected into a bound component.
//!
//! Every instance gets [`DefaultMethods`] (`get` and `put` against its node).
//! An author can wrap them with a factory that also receives the live
//! [`StateAccessor`]; whatever the factory returns becomes the methods
//! object. It is built once per instance and kept for its whole lifetime.

use crate::state::StateAccessor;
use crate::{BindError, BindResult};
use graphbind_model::{AxisLayout, KeyWriter, PropertyDescriptor, Schema};
use graphbind_store::GraphNode;
use graphbind_types::{NodeAddress, Value};
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;
use tracing::{debug, warn};

/// Builds an instance's methods object from its accessor and defaults.
pub type MethodFactory<N, M> = Rc<dyn Fn(StateAccessor, DefaultMethods<N>) -> M>;

/// Writes the keys of one node on behalf of a multi-index handler.
pub(crate) struct NodeWriter<'a, N>(pub(crate) &'a N);

impl<N: GraphNode> KeyWriter for NodeWriter<'_, N> {
    fn put_key(&self, key: &str, value: Value) {
        self.0.get(key).put(value);
    }
}

/// `get` and `put` against the bound node.
#[derive(Clone)]
pub struct DefaultMethods<N: GraphNode> {
    node: N,
    address: NodeAddress,
    schema: Arc<Schema>,
    separator: String,
}

impl<N: GraphNode> DefaultMethods<N> {
    pub(crate) fn new(node: N, address: NodeAddress, schema: Arc<Schema>, separator: String) -> Self {
        Self {
            node,
            address,
            schema,
            separator,
        }
    }

    /// The raw store handle for `key`. No schema check and no decoding.
    pub fn get(&self, key: &str) -> N {
        self.node.get(key)
    }

    /// Encodes `value` with the property's type and writes it to the node.
    ///
    /// Multi-index properties refuse single-key writes with
    /// [`BindError::UnsupportedWrite`]; use [`set_derived`](Self::set_derived).
    pub fn put(&self, key: &str, value: Value) -> BindResult<()> {
        let descriptor = self.descriptor(key)?;
        if descriptor.is_multi_index() {
            warn!("Rejected single-key write to multi-index '{}'", key);
            return Err(BindError::UnsupportedWrite(key.to_string()));
        }
        let encoded = descriptor.encode(&value)?;
        debug!("put '{}' at {}", key, self.address);
        self.node.get(key).put(encoded);
        Ok(())
    }

    /// Writes a multi-index property through its type's own setter, updating
    /// every axis together.
    pub fn set_derived(&self, key: &str, value: Value) -> BindResult<()> {
        let descriptor = self.descriptor(key)?;
        let handler = descriptor
            .handler()
            .filter(|h| h.is_multi_index())
            .ok_or_else(|| {
                BindError::Codec(graphbind_model::ModelError::UnsupportedOperation {
                    type_name: descriptor.type_name().unwrap_or("untyped").to_string(),
                    op: "set",
                })
            })?;
        let layout = AxisLayout::new(key, descriptor.axes().to_vec(), self.separator.as_str());
        handler.set(&value, &layout, &NodeWriter(&self.node))?;
        debug!("set '{}' across {} axes", key, layout.axes.len());
        Ok(())
    }

    /// Where the bound entity lives.
    pub fn address(&self) -> &NodeAddress {
        &self.address
    }

    /// The bound node itself.
    pub fn node(&self) -> &N {
        &self.node
    }

    fn descriptor(&self, key: &str) -> BindResult<&PropertyDescriptor> {
        self.schema
            .get(key)
            .ok_or_else(|| BindError::UnknownProperty(key.to_string()))
    }
}

impl<N: GraphNode> fmt::Debug for DefaultMethods<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefaultMethods")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}
