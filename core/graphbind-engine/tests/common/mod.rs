//! Shared test helpers for engine tests.

#![allow(dead_code)]

use graphbind_engine::{
    BindConfig, Binder, BoundComponent, BoundInstance, BoundProps, Component, DefaultMethods,
    GraphContext, RenderView,
};
use graphbind_store::{MemoryGraph, MemoryNode};
use graphbind_types::{Index, Value};
use std::cell::Cell;
use std::rc::Rc;

/// Renders the decoded state as-is.
pub struct View;

impl<M> Component<M> for View {
    type Props = ();
    type Output = RenderView;

    fn render(&self, props: BoundProps<'_, (), M>) -> RenderView {
        props.state
    }
}

pub type Instance = BoundInstance<MemoryGraph, DefaultMethods<MemoryNode>, View>;

/// Routes engine logs to the test output when `RUST_LOG` is set.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A context over a fresh in-memory graph, with `indices` declared.
pub fn context_with(config: BindConfig, indices: &[&Index]) -> Rc<GraphContext<MemoryGraph>> {
    init_tracing();
    let context = Rc::new(GraphContext::new(MemoryGraph::new(), config));
    context
        .init_indices(indices.iter().map(|i| (*i).clone()))
        .unwrap();
    context
}

pub fn context(indices: &[&Index]) -> Rc<GraphContext<MemoryGraph>> {
    context_with(BindConfig::default(), indices)
}

/// Binds [`View`] to `index` with the default methods.
pub fn bind(
    context: &GraphContext<MemoryGraph>,
    index: &Index,
    schema: Value,
) -> BoundComponent<MemoryNode, DefaultMethods<MemoryNode>, View> {
    Binder::new(index.clone())
        .schema_json(schema)
        .component(View)
        .build(context)
        .unwrap()
}

/// A render scheduler that counts its calls.
pub fn render_counter() -> (Rc<Cell<usize>>, impl Fn() + 'static) {
    let renders = Rc::new(Cell::new(0));
    let counter = Rc::clone(&renders);
    (renders, move || counter.set(counter.get() + 1))
}

/// Binds, instantiates and mounts in one step.
pub fn mount(
    context: &Rc<GraphContext<MemoryGraph>>,
    index: &Index,
    schema: Value,
) -> (Instance, Rc<Cell<usize>>) {
    let (renders, scheduler) = render_counter();
    let instance = bind(context, index, schema).instantiate(context, scheduler);
    instance.mount().unwrap();
    (instance, renders)
}
