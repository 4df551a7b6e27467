//! Subscription lifecycle for one bound instance.
//!
//! At mount, every schema key goes through the same sequence:
//!
//! 1. one-shot read of the key;
//! 2. inside that read's callback, write the default if the key is empty
//!    (or let a multi-index handler lay out its axes);
//! 3. still inside the callback, register the persistent subscription.
//!
//! Subscribing only after the default write means a stale one-shot read can
//! never land after the subscription has already reported a newer value.
//!
//! The store hands out a subscription's handle only inside its deliveries,
//! so handles are captured on first delivery. Keys that never received one
//! hold nothing and need no release; if such a delivery arrives after
//! teardown, its handle is released on the spot.

use crate::methods::NodeWriter;
use crate::state::StateStore;
use graphbind_model::{AxisLayout, PropertyDescriptor, Schema};
use graphbind_store::{ChainHandle, GraphNode};
use graphbind_types::{Value, is_absent};
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;
use std::sync::Arc;
use tracing::{debug, warn};

/// The host's "state changed, render again" primitive.
pub trait RenderScheduler {
    fn request_render(&self);
}

impl<F: Fn()> RenderScheduler for F {
    fn request_render(&self) {
        self()
    }
}

/// Subscription handles captured per key.
#[derive(Debug)]
pub struct ListenerRegistry<C> {
    handles: HashMap<String, C>,
    released: HashSet<String>,
}

impl<C> Default for ListenerRegistry<C> {
    fn default() -> Self {
        Self {
            handles: HashMap::new(),
            released: HashSet::new(),
        }
    }
}

impl<C: ChainHandle> ListenerRegistry<C> {
    /// Records the handle for `key` unless one is already held.
    pub fn capture(&mut self, key: &str, chain: &C) -> bool {
        if self.handles.contains_key(key) || self.released.contains(key) {
            return false;
        }
        self.handles.insert(key.to_string(), chain.clone());
        true
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.handles.contains_key(key)
    }

    /// True once the handle for `key` has been released.
    #[must_use]
    pub fn was_released(&self, key: &str) -> bool {
        self.released.contains(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Empties the registry, marking every key released.
    fn take_all(&mut self) -> Vec<(String, C)> {
        let handles: Vec<(String, C)> = self.handles.drain().collect();
        self.released.extend(handles.iter().map(|(k, _)| k.clone()));
        handles
    }
}

/// State and subscriptions owned by one bound instance.
pub(crate) struct Subscriptions<C> {
    state: Rc<RefCell<StateStore>>,
    listeners: RefCell<ListenerRegistry<C>>,
    torn_down: Cell<bool>,
    scheduler: Box<dyn RenderScheduler>,
    skip_unchanged: bool,
}

impl<C: ChainHandle> Subscriptions<C> {
    pub(crate) fn new(
        state: Rc<RefCell<StateStore>>,
        scheduler: Box<dyn RenderScheduler>,
        skip_unchanged: bool,
    ) -> Self {
        Self {
            state,
            listeners: RefCell::new(ListenerRegistry::default()),
            torn_down: Cell::new(false),
            scheduler,
            skip_unchanged,
        }
    }

    /// Starts read-then-subscribe for every schema key.
    pub(crate) fn start<N>(
        self: &Rc<Self>,
        node: &N,
        schema: &Arc<Schema>,
        materialize: bool,
        separator: &str,
    ) where
        N: GraphNode<Chain = C>,
    {
        for descriptor in schema.iter() {
            let key = descriptor.key().to_string();
            let target = node.get(&key);
            let parent = node.clone();
            let weak = Rc::downgrade(self);
            let schema = Arc::clone(schema);
            let separator = separator.to_string();

            debug!("Reading '{}' at {}", key, target.path());
            target.clone().once(Box::new(move |current: Option<Value>| {
                let Some(this) = weak.upgrade() else {
                    return;
                };
                if this.is_torn_down() {
                    debug!("Skipping setup of '{}' after teardown", key);
                    return;
                }
                if materialize {
                    if let Some(descriptor) = schema.get(&key) {
                        materialize_default(descriptor, &parent, &target, current.as_ref(), &separator);
                    }
                }
                this.subscribe(&target, key);
            }));
        }
    }

    fn subscribe<N>(self: &Rc<Self>, node: &N, key: String)
    where
        N: GraphNode<Chain = C>,
    {
        let weak = Rc::downgrade(self);
        node.on(Box::new(move |value: Option<Value>, _key: &str, chain: &C| match weak.upgrade() {
            Some(this) => this.deliver(&key, value, chain),
            None => chain.off(),
        }));
    }

    fn deliver(&self, key: &str, value: Option<Value>, chain: &C) {
        if self.is_torn_down() {
            let late = {
                let mut listeners = self.listeners.borrow_mut();
                let late = !listeners.was_released(key);
                if late {
                    listeners.released.insert(key.to_string());
                }
                late
            };
            if late {
                warn!("Releasing late subscription for '{}'", key);
                chain.off();
            }
            return;
        }

        if self.listeners.borrow_mut().capture(key, chain) {
            debug!("Captured handle for '{}'", key);
        }

        let changed = self
            .state
            .borrow_mut()
            .merge(key, value.unwrap_or(Value::Null));
        debug!("Delivery for '{}' (changed: {})", key, changed);
        if changed || !self.skip_unchanged {
            self.scheduler.request_render();
        }
    }

    /// Releases every captured handle once. Later calls do nothing.
    pub(crate) fn teardown(&self) -> usize {
        if self.torn_down.replace(true) {
            return 0;
        }
        let handles = self.listeners.borrow_mut().take_all();
        for (key, chain) in &handles {
            debug!("Releasing '{}'", key);
            chain.off();
        }
        handles.len()
    }

    pub(crate) fn is_torn_down(&self) -> bool {
        self.torn_down.get()
    }

    pub(crate) fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }
}

fn materialize_default<N: GraphNode>(
    descriptor: &PropertyDescriptor,
    parent: &N,
    target: &N,
    current: Option<&Value>,
    separator: &str,
) {
    let key = descriptor.key();

    if let Some(handler) = descriptor.handler().filter(|h| h.is_multi_index()) {
        let layout = AxisLayout::new(key, descriptor.axes().to_vec(), separator);
        let existing = current.filter(|v| !v.is_null());
        if let Err(e) = handler.init(descriptor.default_value(), existing, &layout, &NodeWriter(parent)) {
            warn!("Could not lay out axes for '{}': {}", key, e);
        }
        return;
    }

    if !is_absent(current) || descriptor.default_value().is_null() {
        return;
    }
    match descriptor.encode(descriptor.default_value()) {
        Ok(encoded) => {
            debug!("Writing default for '{}'", key);
            target.put(encoded);
        }
        Err(e) => warn!("Could not encode default for '{}': {}", key, e),
    }
}
