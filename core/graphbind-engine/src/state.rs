//! Per-instance state and the two ways of reading it.
//!
//! The [`StateStore`] holds the latest raw value delivered for each key. It
//! lives in an `Rc<RefCell<..>>` cell owned by the instance; the
//! [`StateAccessor`] handed to author methods reads through that cell, so
//! methods built once still see every later delivery.

use crate::{BindError, BindResult};
use graphbind_model::Schema;
use graphbind_types::Value;
use serde::Serialize;
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;
use std::sync::Arc;
use tracing::warn;

/// Latest raw value per schema key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StateStore {
    values: HashMap<String, Value>,
}

impl StateStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a delivered value. Returns false when it was already current,
    /// so redelivery leaves the store untouched.
    pub fn merge(&mut self, key: &str, value: Value) -> bool {
        if self.values.get(key) == Some(&value) {
            return false;
        }
        self.values.insert(key.to_string(), value);
        true
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Live, decoded read access to an instance's state.
///
/// Cheap to clone; every clone reads the same cell.
#[derive(Clone)]
pub struct StateAccessor {
    cell: Rc<RefCell<StateStore>>,
    schema: Arc<Schema>,
}

impl StateAccessor {
    pub(crate) fn new(cell: Rc<RefCell<StateStore>>, schema: Arc<Schema>) -> Self {
        Self { cell, schema }
    }

    /// The current decoded value of `key`, or `null` before its first delivery.
    ///
    /// Fails with [`BindError::UnknownProperty`] for keys the schema does not
    /// declare.
    pub fn get(&self, key: &str) -> BindResult<Value> {
        let descriptor = self
            .schema
            .get(key)
            .ok_or_else(|| BindError::UnknownProperty(key.to_string()))?;
        let raw = self.cell.borrow().get(key).cloned().unwrap_or(Value::Null);
        Ok(descriptor.decode(&raw)?)
    }

    /// The full decoded state, as handed to the component on render.
    #[must_use]
    pub fn snapshot(&self) -> RenderView {
        RenderView::build(&self.cell.borrow(), &self.schema)
    }
}

impl std::fmt::Debug for StateAccessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateAccessor")
            .field("state", &*self.cell.borrow())
            .finish()
    }
}

/// An immutable, decoded snapshot of an instance's state.
///
/// Only keys that have received a delivery appear.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RenderView(BTreeMap<String, Value>);

impl RenderView {
    /// Decodes every stored value through its property's type handler.
    ///
    /// Values that fail to decode are passed through raw.
    #[must_use]
    pub fn build(state: &StateStore, schema: &Schema) -> Self {
        let mut view = BTreeMap::new();
        for (key, raw) in state.iter() {
            let Some(descriptor) = schema.get(key) else {
                continue;
            };
            let value = match descriptor.decode(raw) {
                Ok(value) => value,
                Err(e) => {
                    warn!("Rendering raw value for '{}': {}", key, e);
                    raw.clone()
                }
            };
            view.insert(key.to_string(), value);
        }
        Self(view)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The view as a JSON object.
    #[must_use]
    pub fn to_json(&self) -> Value {
        Value::Object(self.0.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
    }
}
