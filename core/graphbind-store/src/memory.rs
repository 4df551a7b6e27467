//! In-process graph store.
//!
//! Values live in a map keyed by [`NodePath`]. Every read, write and
//! subscription is turned into a pending delivery and run from a single
//! queue, so a callback that writes (or subscribes, or unsubscribes) never
//! re-enters another callback. Deliveries run immediately unless the graph
//! is deferred, in which case they wait for [`MemoryGraph::flush`].

use crate::{ChainHandle, GraphNode, GraphStore, OnCallback, OnceCallback};
use graphbind_types::{NodePath, Value};
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::rc::{Rc, Weak};
use tracing::{debug, trace};

type SharedCallback = Rc<RefCell<OnCallback<MemoryChain>>>;

struct Listener {
    id: u64,
    callback: SharedCallback,
    chain: MemoryChain,
}

enum Pending {
    Once { path: NodePath, callback: OnceCallback },
    Initial { path: NodePath, id: u64 },
    Change { path: NodePath, value: Option<Value> },
}

#[derive(Default)]
struct Inner {
    values: HashMap<NodePath, Value>,
    listeners: HashMap<NodePath, Vec<Listener>>,
    queue: VecDeque<Pending>,
    next_id: u64,
    deferred: bool,
    draining: bool,
    puts: HashMap<NodePath, usize>,
    offs: HashMap<NodePath, usize>,
}

impl Inner {
    fn present(&self, path: &NodePath) -> Option<Value> {
        self.values.get(path).filter(|v| !v.is_null()).cloned()
    }
}

/// A single-threaded, in-memory graph store.
///
/// Cloning yields another handle to the same graph.
#[derive(Clone, Default)]
pub struct MemoryGraph {
    inner: Rc<RefCell<Inner>>,
}

impl MemoryGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A handle to the node at `path`.
    #[must_use]
    pub fn node(&self, path: &NodePath) -> MemoryNode {
        MemoryNode {
            graph: self.clone(),
            path: path.clone(),
        }
    }

    /// The value currently stored at `path`, ignoring pending deliveries.
    #[must_use]
    pub fn value(&self, path: &NodePath) -> Option<Value> {
        self.inner.borrow().present(path)
    }

    /// Holds deliveries until [`flush`](Self::flush) when `true`.
    ///
    /// Switching back to immediate mode does not flush what is queued.
    pub fn set_deferred(&self, deferred: bool) {
        self.inner.borrow_mut().deferred = deferred;
    }

    /// Runs every queued delivery, including ones queued while flushing.
    /// Returns the number of callbacks invoked.
    pub fn flush(&self) -> usize {
        self.drain()
    }

    /// Deliveries waiting to run.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.inner.borrow().queue.len()
    }

    /// Live subscriptions on `path`.
    #[must_use]
    pub fn listener_count(&self, path: &NodePath) -> usize {
        self.inner.borrow().listeners.get(path).map_or(0, Vec::len)
    }

    /// Writes made to `path` so far.
    #[must_use]
    pub fn put_count(&self, path: &NodePath) -> usize {
        self.inner.borrow().puts.get(path).copied().unwrap_or(0)
    }

    /// Calls to [`ChainHandle::off`] for subscriptions on `path`, counting
    /// redundant calls too.
    #[must_use]
    pub fn off_count(&self, path: &NodePath) -> usize {
        self.inner.borrow().offs.get(path).copied().unwrap_or(0)
    }

    fn enqueue(&self, pending: Pending) {
        let run_now = {
            let mut inner = self.inner.borrow_mut();
            inner.queue.push_back(pending);
            !inner.deferred
        };
        if run_now {
            self.drain();
        }
    }

    fn drain(&self) -> usize {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.draining {
                return 0;
            }
            inner.draining = true;
        }

        let mut delivered = 0;
        loop {
            let next = self.inner.borrow_mut().queue.pop_front();
            let Some(pending) = next else { break };
            delivered += self.deliver(pending);
        }

        self.inner.borrow_mut().draining = false;
        delivered
    }

    fn deliver(&self, pending: Pending) -> usize {
        match pending {
            Pending::Once { path, callback } => {
                let value = self.inner.borrow().present(&path);
                trace!("once {} -> {:?}", path, value);
                callback(value);
                1
            }
            Pending::Initial { path, id } => {
                let (value, target) = {
                    let inner = self.inner.borrow();
                    let target = inner
                        .listeners
                        .get(&path)
                        .and_then(|ls| ls.iter().find(|l| l.id == id))
                        .map(|l| (Rc::clone(&l.callback), l.chain.clone()));
                    (inner.present(&path), target)
                };
                match (value, target) {
                    (Some(value), Some((callback, chain))) => {
                        invoke(&callback, Some(value), &path, &chain);
                        1
                    }
                    _ => 0,
                }
            }
            Pending::Change { path, value } => {
                let targets: Vec<(SharedCallback, MemoryChain)> = self
                    .inner
                    .borrow()
                    .listeners
                    .get(&path)
                    .map(|ls| {
                        ls.iter()
                            .map(|l| (Rc::clone(&l.callback), l.chain.clone()))
                            .collect()
                    })
                    .unwrap_or_default();

                let mut delivered = 0;
                for (callback, chain) in targets {
                    // an earlier callback in this round may have unsubscribed it
                    if chain.is_active() {
                        invoke(&callback, value.clone(), &path, &chain);
                        delivered += 1;
                    }
                }
                delivered
            }
        }
    }

    fn release(&self, chain: &MemoryChain) {
        let removed: Vec<Listener> = {
            let mut inner = self.inner.borrow_mut();
            *inner.offs.entry(chain.path.clone()).or_default() += 1;
            if !chain.active.replace(false) {
                return;
            }
            match inner.listeners.get_mut(&chain.path) {
                Some(listeners) => {
                    let (gone, kept) = std::mem::take(listeners)
                        .into_iter()
                        .partition(|l| l.id == chain.id);
                    *listeners = kept;
                    gone
                }
                None => Vec::new(),
            }
        };
        debug!("Released subscription {} on {}", chain.id, chain.path);
        // callbacks are dropped outside the borrow; they may own graph handles
        drop(removed);
    }
}

fn invoke(callback: &SharedCallback, value: Option<Value>, path: &NodePath, chain: &MemoryChain) {
    let key = path.key().unwrap_or_default();
    trace!("on {} -> {:?}", path, value);
    let mut callback = callback.borrow_mut();
    (&mut *callback)(value, key, chain);
}

impl fmt::Debug for MemoryGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("MemoryGraph")
            .field("values", &inner.values.len())
            .field("pending", &inner.queue.len())
            .field("deferred", &inner.deferred)
            .finish()
    }
}

impl GraphStore for MemoryGraph {
    type Node = MemoryNode;

    fn root(&self) -> MemoryNode {
        self.node(&NodePath::root())
    }
}

/// A handle to one node of a [`MemoryGraph`].
#[derive(Clone)]
pub struct MemoryNode {
    graph: MemoryGraph,
    path: NodePath,
}

impl fmt::Debug for MemoryNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("MemoryNode").field(&self.path.to_string()).finish()
    }
}

impl GraphNode for MemoryNode {
    type Chain = MemoryChain;

    fn get(&self, key: &str) -> Self {
        Self {
            graph: self.graph.clone(),
            path: self.path.child(key),
        }
    }

    fn put(&self, value: Value) {
        let change = {
            let mut inner = self.graph.inner.borrow_mut();
            *inner.puts.entry(self.path.clone()).or_default() += 1;
            if value.is_null() {
                inner.values.remove(&self.path);
                None
            } else {
                inner.values.insert(self.path.clone(), value.clone());
                Some(value)
            }
        };
        debug!("put {}", self.path);
        self.graph.enqueue(Pending::Change {
            path: self.path.clone(),
            value: change,
        });
    }

    fn once(&self, callback: OnceCallback) {
        self.graph.enqueue(Pending::Once {
            path: self.path.clone(),
            callback,
        });
    }

    fn on(&self, callback: OnCallback<MemoryChain>) {
        let id = {
            let mut inner = self.graph.inner.borrow_mut();
            inner.next_id += 1;
            let id = inner.next_id;
            let chain = MemoryChain {
                id,
                path: self.path.clone(),
                active: Rc::new(Cell::new(true)),
                graph: Rc::downgrade(&self.graph.inner),
            };
            inner
                .listeners
                .entry(self.path.clone())
                .or_default()
                .push(Listener {
                    id,
                    callback: Rc::new(RefCell::new(callback)),
                    chain,
                });
            id
        };
        self.graph.enqueue(Pending::Initial {
            path: self.path.clone(),
            id,
        });
    }

    fn path(&self) -> &NodePath {
        &self.path
    }
}

/// Subscription token handed out by [`MemoryNode::on`].
#[derive(Clone)]
pub struct MemoryChain {
    id: u64,
    path: NodePath,
    active: Rc<Cell<bool>>,
    graph: Weak<RefCell<Inner>>,
}

impl MemoryChain {
    /// False once [`off`](ChainHandle::off) has been called.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    #[must_use]
    pub fn path(&self) -> &NodePath {
        &self.path
    }
}

impl fmt::Debug for MemoryChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryChain")
            .field("id", &self.id)
            .field("path", &self.path.to_string())
            .field("active", &self.active.get())
            .finish()
    }
}

impl ChainHandle for MemoryChain {
    fn off(&self) {
        match self.graph.upgrade() {
            Some(inner) => MemoryGraph { inner }.release(self),
            None => self.active.set(false),
        }
    }
}
