//! Binding components to graph nodes.
//!
//! [`Binder`] validates and normalizes everything up front and produces a
//! [`BoundComponent`]. Each mounted use of that component is a
//! [`BoundInstance`] with its own state, subscriptions and methods object.

use crate::lifecycle::{RenderScheduler, Subscriptions};
use crate::methods::{DefaultMethods, MethodFactory};
use crate::resolver::NodeResolver;
use crate::state::{RenderView, StateAccessor, StateStore};
use crate::{BindError, BindResult, GraphContext};
use graphbind_model::{AuthorSchema, ModelError, Schema};
use graphbind_store::{GraphNode, GraphStore};
use graphbind_types::{Index, NodeAddress, Value};
use std::cell::{Cell, OnceCell, RefCell};
use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;
use std::sync::Arc;
use tracing::{debug, info};

/// What a bound component receives on every render.
pub struct BoundProps<'a, P, M> {
    /// Props passed in by the parent.
    pub own: &'a P,
    /// The decoded state snapshot.
    pub state: RenderView,
    /// The instance's methods object.
    pub methods: &'a M,
}

/// A component that renders from bound state.
pub trait Component<M> {
    type Props;
    type Output;

    fn render(&self, props: BoundProps<'_, Self::Props, M>) -> Self::Output;
}

/// A [`Component`] backed by a closure. See [`from_fn`].
pub struct FnComponent<P, M, O, F> {
    render: F,
    _marker: PhantomData<fn(&P, &M) -> O>,
}

/// Wraps a render closure as a component.
pub fn from_fn<P, M, O, F>(render: F) -> FnComponent<P, M, O, F>
where
    F: Fn(BoundProps<'_, P, M>) -> O,
{
    FnComponent {
        render,
        _marker: PhantomData,
    }
}

impl<P, M, O, F> Component<M> for FnComponent<P, M, O, F>
where
    F: Fn(BoundProps<'_, P, M>) -> O,
{
    type Props = P;
    type Output = O;

    fn render(&self, props: BoundProps<'_, P, M>) -> O {
        (self.render)(props)
    }
}

enum SchemaInput {
    Author(AuthorSchema),
    Json(Value),
}

/// Collects the pieces of a binding and validates them in [`build`](Self::build).
pub struct Binder<N: GraphNode, M, C> {
    index: Index,
    schema: Option<SchemaInput>,
    methods: MethodFactory<N, M>,
    component: Option<C>,
}

impl<N: GraphNode, C> Binder<N, DefaultMethods<N>, C> {
    /// Starts a binding for `index` with the default methods.
    pub fn new(index: Index) -> Self {
        Self {
            index,
            schema: None,
            methods: Rc::new(|_: StateAccessor, defaults: DefaultMethods<N>| defaults),
            component: None,
        }
    }
}

impl<N: GraphNode, M: 'static, C> Binder<N, M, C> {
    /// Sets the schema from its builder form.
    #[must_use]
    pub fn schema(mut self, schema: AuthorSchema) -> Self {
        self.schema = Some(SchemaInput::Author(schema));
        self
    }

    /// Sets the schema from its JSON form.
    #[must_use]
    pub fn schema_json(mut self, schema: Value) -> Self {
        self.schema = Some(SchemaInput::Json(schema));
        self
    }

    /// Replaces the default methods with an author factory.
    ///
    /// The factory runs once per instance, on first use.
    pub fn methods<M2, F>(self, factory: F) -> Binder<N, M2, C>
    where
        F: Fn(StateAccessor, DefaultMethods<N>) -> M2 + 'static,
    {
        Binder {
            index: self.index,
            schema: self.schema,
            methods: Rc::new(factory),
            component: self.component,
        }
    }

    /// Sets the component to wrap.
    #[must_use]
    pub fn component(mut self, component: C) -> Self {
        self.component = Some(component);
        self
    }

    /// Validates the binding and normalizes its schema.
    ///
    /// Everything that can be checked without an instance is checked here:
    /// the component is present, the schema is a mapping of property
    /// triples, every type is registered, and every default encodes.
    pub fn build<S>(self, context: &GraphContext<S>) -> BindResult<BoundComponent<N, M, C>>
    where
        S: GraphStore<Node = N>,
        C: Component<M>,
    {
        let component = self
            .component
            .ok_or_else(|| BindError::InvalidComponent("none was supplied".into()))?;

        let author = match self.schema {
            Some(SchemaInput::Author(author)) => author,
            Some(SchemaInput::Json(value)) => {
                AuthorSchema::from_json(value).map_err(BindError::InvalidSchema)?
            }
            None => {
                return Err(BindError::InvalidSchema(ModelError::InvalidSchema(
                    "no schema was supplied".into(),
                )));
            }
        };

        let schema =
            Schema::normalize(&author, context.registry()).map_err(BindError::InvalidSchema)?;
        for descriptor in schema.iter() {
            let default = descriptor.default_value();
            let checked = match descriptor.handler() {
                Some(handler) if !default.is_null() => handler.store(default).map(|_| ()),
                _ => Ok(()),
            };
            checked.map_err(BindError::InvalidSchema)?;
        }

        debug!("Bound {} with {} properties", self.index, schema.len());
        Ok(BoundComponent {
            shared: Rc::new(SharedBinding {
                index: self.index,
                schema: Arc::new(schema),
                methods: self.methods,
                component,
            }),
        })
    }
}

struct SharedBinding<N: GraphNode, M, C> {
    index: Index,
    schema: Arc<Schema>,
    methods: MethodFactory<N, M>,
    component: C,
}

/// A validated binding, shared by all of its instances.
pub struct BoundComponent<N: GraphNode, M, C> {
    shared: Rc<SharedBinding<N, M, C>>,
}

impl<N: GraphNode, M, C> Clone for BoundComponent<N, M, C> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
        }
    }
}

impl<N: GraphNode, M: 'static, C: Component<M>> BoundComponent<N, M, C> {
    /// Creates an instance; `scheduler` is called whenever its state changes.
    pub fn instantiate<S>(
        &self,
        context: &Rc<GraphContext<S>>,
        scheduler: impl RenderScheduler + 'static,
    ) -> BoundInstance<S, M, C>
    where
        S: GraphStore<Node = N>,
    {
        let config = context.config();
        let (address, node) = NodeResolver::new(context.store(), &config.app_root)
            .resolve(&self.shared.index);
        let state = Rc::new(RefCell::new(StateStore::new()));
        let subscriptions = Rc::new(Subscriptions::new(
            Rc::clone(&state),
            Box::new(scheduler),
            config.skip_unchanged,
        ));

        BoundInstance {
            shared: Rc::clone(&self.shared),
            context: Rc::clone(context),
            address,
            node,
            state,
            subscriptions,
            methods: OnceCell::new(),
            mounted: Cell::new(false),
        }
    }

    pub fn index(&self) -> &Index {
        &self.shared.index
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.shared.schema
    }
}

impl<N: GraphNode, M, C> fmt::Debug for BoundComponent<N, M, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundComponent")
            .field("index", &self.shared.index)
            .field("schema", &self.shared.schema)
            .finish_non_exhaustive()
    }
}

/// One mounted use of a bound component.
///
/// Dropping the instance unmounts it.
pub struct BoundInstance<S: GraphStore, M, C> {
    shared: Rc<SharedBinding<S::Node, M, C>>,
    context: Rc<GraphContext<S>>,
    address: NodeAddress,
    node: S::Node,
    state: Rc<RefCell<StateStore>>,
    subscriptions: Rc<Subscriptions<<S::Node as GraphNode>::Chain>>,
    methods: OnceCell<M>,
    mounted: Cell<bool>,
}

impl<S: GraphStore, M: 'static, C: Component<M>> BoundInstance<S, M, C> {
    /// Runs the one-time setup: checks the index, materializes defaults and
    /// subscribes to every schema key.
    pub fn mount(&self) -> BindResult<()> {
        if self.mounted.get() || self.subscriptions.is_torn_down() {
            return Err(BindError::AlreadyMounted);
        }
        self.context.check_index(&self.shared.index)?;
        self.mounted.set(true);

        let config = self.context.config();
        info!("Mounting {} at {}", self.shared.index, self.address);
        self.subscriptions.start(
            &self.node,
            &self.shared.schema,
            config.materialize_defaults,
            &config.axis_separator,
        );
        Ok(())
    }

    /// Renders the wrapped component with the current state and methods.
    pub fn render(&self, own: &C::Props) -> C::Output {
        let props = BoundProps {
            own,
            state: self.view(),
            methods: self.methods(),
        };
        self.shared.component.render(props)
    }

    /// Releases every captured subscription. Safe to call more than once;
    /// returns how many handles this call released.
    pub fn unmount(&self) -> usize {
        let released = self.subscriptions.teardown();
        if released > 0 || self.mounted.get() {
            info!("Unmounted {} ({} subscriptions released)", self.address, released);
        }
        self.mounted.set(false);
        released
    }
}

impl<S: GraphStore, M: 'static, C> BoundInstance<S, M, C> {
    /// The methods object, built on first access.
    pub fn methods(&self) -> &M {
        self.methods.get_or_init(|| {
            debug!("Building methods for {}", self.address);
            let defaults = DefaultMethods::new(
                self.node.clone(),
                self.address.clone(),
                Arc::clone(&self.shared.schema),
                self.context.config().axis_separator.clone(),
            );
            (self.shared.methods)(self.accessor(), defaults)
        })
    }

    /// A live accessor over this instance's state.
    pub fn accessor(&self) -> StateAccessor {
        StateAccessor::new(Rc::clone(&self.state), Arc::clone(&self.shared.schema))
    }

    /// The decoded state, as the component would see it now.
    pub fn view(&self) -> RenderView {
        RenderView::build(&self.state.borrow(), &self.shared.schema)
    }

    pub fn address(&self) -> &NodeAddress {
        &self.address
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.get()
    }

    /// Subscription handles currently held.
    pub fn listener_count(&self) -> usize {
        self.subscriptions.listener_count()
    }
}

impl<S: GraphStore, M, C> Drop for BoundInstance<S, M, C> {
    fn drop(&mut self) {
        self.subscriptions.teardown();
    }
}

impl<S: GraphStore, M, C> fmt::Debug for BoundInstance<S, M, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundInstance")
            .field("address", &self.address)
            .field("mounted", &self.mounted.get())
            .field("state", &*self.state.borrow())
            .finish_non_exhaustive()
    }
}
