use graphbind_store::{ChainHandle, GraphNode, GraphStore, MemoryChain, MemoryGraph};
use graphbind_types::{NodePath, Value};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::cell::RefCell;
use std::rc::Rc;

type Seen = Rc<RefCell<Vec<Option<Value>>>>;

fn record(node: &impl GraphNode<Chain = MemoryChain>) -> (Seen, Rc<RefCell<Option<MemoryChain>>>) {
    let seen: Seen = Rc::default();
    let chain: Rc<RefCell<Option<MemoryChain>>> = Rc::default();
    let (s, c) = (Rc::clone(&seen), Rc::clone(&chain));
    node.on(Box::new(move |value: Option<Value>, _key: &str, handle: &MemoryChain| {
        s.borrow_mut().push(value);
        c.borrow_mut().get_or_insert_with(|| handle.clone());
    }));
    (seen, chain)
}

// ── Addressing ───────────────────────────────────────────────────

#[test]
fn roots_and_children_build_paths() {
    let graph = MemoryGraph::new();
    assert!(graph.root().path().is_root());
    let node = graph.app("app").get("todo").get("title");
    assert_eq!(node.path(), &NodePath::from_segments(["app", "todo", "title"]));
}

// ── Reads and writes ─────────────────────────────────────────────

#[test]
fn once_reads_current_value() {
    let graph = MemoryGraph::new();
    let node = graph.root().get("k");
    node.put(json!(3));

    let got = Rc::new(RefCell::new(None));
    let g = Rc::clone(&got);
    node.once(Box::new(move |v: Option<Value>| *g.borrow_mut() = Some(v)));
    assert_eq!(*got.borrow(), Some(Some(json!(3))));
}

#[test]
fn once_on_empty_key_yields_none() {
    let graph = MemoryGraph::new();
    let got = Rc::new(RefCell::new(None));
    let g = Rc::clone(&got);
    graph.root().get("missing").once(Box::new(move |v: Option<Value>| *g.borrow_mut() = Some(v)));
    assert_eq!(*got.borrow(), Some(None));
}

#[test]
fn null_put_clears_value() {
    let graph = MemoryGraph::new();
    let node = graph.root().get("k");
    node.put(json!("x"));
    node.put(Value::Null);
    assert_eq!(graph.value(node.path()), None);
    assert_eq!(graph.put_count(node.path()), 2);
}

// ── Subscriptions ────────────────────────────────────────────────

#[test]
fn on_without_value_waits_for_first_write() {
    let graph = MemoryGraph::new();
    let node = graph.root().get("k");
    let (seen, chain) = record(&node);
    assert!(seen.borrow().is_empty());
    assert!(chain.borrow().is_none());

    node.put(json!(1));
    assert_eq!(*seen.borrow(), vec![Some(json!(1))]);
    assert!(chain.borrow().is_some());
}

#[test]
fn on_delivers_current_then_changes() {
    let graph = MemoryGraph::new();
    let node = graph.root().get("k");
    node.put(json!("a"));
    let (seen, _) = record(&node);
    graph.node(node.path()).put(json!("b"));
    assert_eq!(*seen.borrow(), vec![Some(json!("a")), Some(json!("b"))]);
}

#[test]
fn off_stops_delivery_and_is_idempotent() {
    let graph = MemoryGraph::new();
    let node = graph.root().get("k");
    node.put(json!(1));
    let (seen, chain) = record(&node);
    let handle = chain.borrow().clone().unwrap();

    handle.off();
    handle.off();
    assert!(!handle.is_active());
    assert_eq!(graph.listener_count(node.path()), 0);
    assert_eq!(graph.off_count(node.path()), 2);

    node.put(json!(2));
    assert_eq!(seen.borrow().len(), 1);
}

#[test]
fn writes_from_inside_callbacks_are_queued_not_reentrant() {
    let graph = MemoryGraph::new();
    let node = graph.root().get("k");
    let writer = node.clone();
    let seen: Seen = Rc::default();
    let s = Rc::clone(&seen);
    node.on(Box::new(move |value: Option<Value>, _: &str, _: &MemoryChain| {
        if value == Some(json!(1)) {
            writer.put(json!(2));
        }
        s.borrow_mut().push(value);
    }));

    node.put(json!(1));
    assert_eq!(*seen.borrow(), vec![Some(json!(1)), Some(json!(2))]);
}

#[test]
fn callback_receives_its_key() {
    let graph = MemoryGraph::new();
    let node = graph.app("app").get("counter").get("count");
    let key = Rc::new(RefCell::new(String::new()));
    let k = Rc::clone(&key);
    node.on(Box::new(move |_: Option<Value>, key: &str, _: &MemoryChain| {
        *k.borrow_mut() = key.to_string();
    }));
    node.put(json!(0));
    assert_eq!(*key.borrow(), "count");
}

// ── Deferred delivery ────────────────────────────────────────────

#[test]
fn deferred_graph_waits_for_flush() {
    let graph = MemoryGraph::new();
    graph.set_deferred(true);
    let node = graph.root().get("k");
    let (seen, _) = record(&node);
    node.put(json!(1));

    assert!(seen.borrow().is_empty());
    assert_eq!(graph.value(node.path()), Some(json!(1)));
    assert_eq!(graph.pending(), 2);

    // initial delivery and the change notification
    assert_eq!(graph.flush(), 2);
    assert_eq!(*seen.borrow(), vec![Some(json!(1)), Some(json!(1))]);
    assert_eq!(graph.pending(), 0);
}

#[test]
fn chain_outlives_graph_safely() {
    let graph = MemoryGraph::new();
    let node = graph.root().get("k");
    node.put(json!(1));
    let (_, chain) = record(&node);
    let handle = chain.borrow_mut().take().unwrap();
    drop(node);
    drop(graph);
    handle.off();
    assert!(!handle.is_active());
}
