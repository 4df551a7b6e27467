use graphbind_engine::{BindConfig, BindError, GraphContext, NodeResolver};
use graphbind_model::TypeRegistry;
use graphbind_store::{GraphNode, MemoryGraph};
use graphbind_types::{Index, NodeAddress, NodePath};
use pretty_assertions::assert_eq;
use std::sync::Arc;

// ── BindConfig ───────────────────────────────────────────────────

#[test]
fn config_defaults() {
    let config = BindConfig::default();
    assert_eq!(config.app_root, "app");
    assert!(config.materialize_defaults);
    assert_eq!(config.axis_separator, "_");
    assert!(config.skip_unchanged);
}

#[test]
fn config_from_partial_json() {
    let config = BindConfig::from_json(r#"{ "app_root": "notes", "skip_unchanged": false }"#)
        .unwrap();
    assert_eq!(
        config,
        BindConfig {
            app_root: "notes".into(),
            skip_unchanged: false,
            ..BindConfig::default()
        }
    );
}

#[test]
fn config_from_empty_json_is_default() {
    assert_eq!(BindConfig::from_json("{}").unwrap(), BindConfig::default());
}

#[test]
fn config_rejects_malformed_json() {
    assert!(matches!(
        BindConfig::from_json(r#"{ "app_root": 7 }"#),
        Err(BindError::Config(_))
    ));
    assert!(matches!(BindConfig::from_json("app_root = 'x'"), Err(BindError::Config(_))));
}

#[test]
fn config_round_trips_through_json() {
    let config = BindConfig::with_app_root("tasks");
    let text = serde_json::to_string(&config).unwrap();
    assert_eq!(BindConfig::from_json(&text).unwrap(), config);
}

// ── GraphContext ─────────────────────────────────────────────────

#[test]
fn indices_must_be_declared_first() {
    let ctx = GraphContext::new(MemoryGraph::new(), BindConfig::default());
    assert!(matches!(ctx.indices(), Err(BindError::IndicesNotInitialized)));
    assert!(matches!(
        ctx.check_index(&Index::named("todo")),
        Err(BindError::IndicesNotInitialized)
    ));
}

#[test]
fn declared_indices_pass_the_check() {
    let todo = Index::named("todo");
    let user = Index::with_id("user-42");
    let ctx = GraphContext::new(MemoryGraph::new(), BindConfig::default());
    ctx.init_indices([todo.clone(), user.clone(), todo.clone()]).unwrap();

    assert_eq!(ctx.indices().unwrap().len(), 2);
    ctx.check_index(&todo).unwrap();
    ctx.check_index(&user).unwrap();
}

#[test]
fn lookalike_index_is_not_declared() {
    let ctx = GraphContext::new(MemoryGraph::new(), BindConfig::default());
    ctx.init_indices([Index::named("todo")]).unwrap();

    let err = ctx.check_index(&Index::named("todo")).unwrap_err();
    assert!(matches!(&err, BindError::InvalidIndex(reason) if reason.contains("not declared")));
}

#[test]
fn blank_id_is_invalid_even_when_declared() {
    let blank = Index::with_id("  ");
    let ctx = GraphContext::new(MemoryGraph::new(), BindConfig::default());
    ctx.init_indices([blank.clone()]).unwrap();
    assert!(matches!(ctx.check_index(&blank), Err(BindError::InvalidIndex(_))));
}

#[test]
fn second_declaration_fails() {
    let ctx = GraphContext::new(MemoryGraph::new(), BindConfig::default());
    ctx.init_indices(Vec::new()).unwrap();
    assert!(matches!(
        ctx.init_indices([Index::named("late")]),
        Err(BindError::IndicesAlreadyInitialized)
    ));
    assert!(ctx.indices().unwrap().is_empty());
}

#[test]
fn context_uses_builtin_types_by_default() {
    let ctx = GraphContext::new(MemoryGraph::new(), BindConfig::default());
    for name in ["number", "json", "list", "date", "point"] {
        assert!(ctx.registry().contains(name), "{name}");
    }

    let custom = GraphContext::with_registry(
        MemoryGraph::new(),
        BindConfig::default(),
        Arc::new(TypeRegistry::empty()),
    );
    assert!(custom.registry().is_empty());
}

// ── NodeResolver ─────────────────────────────────────────────────

#[test]
fn symbolic_index_resolves_under_app_root() {
    let graph = MemoryGraph::new();
    let todo = Index::named("todo");
    let (address, node) = NodeResolver::new(&graph, "app").resolve(&todo);

    assert_eq!(
        address,
        NodeAddress::Scoped {
            app_root: "app".into(),
            name: "todo".into()
        }
    );
    assert_eq!(node.path(), &NodePath::from_segments(["app", "todo"]));
}

#[test]
fn explicit_id_resolves_from_global_root() {
    let graph = MemoryGraph::new();
    let user = Index::with_id("jsdk24ys");
    let resolver = NodeResolver::new(&graph, "app");

    let address = resolver.address(&user);
    assert!(address.is_global());
    assert_eq!(resolver.node(&address).path(), &NodePath::from_segments(["jsdk24ys"]));
}

#[test]
fn resolution_is_stable_per_reference() {
    let graph = MemoryGraph::new();
    let todo = Index::named("todo");
    let copy = todo.clone();
    let resolver = NodeResolver::new(&graph, "app");

    assert_eq!(resolver.address(&todo), resolver.address(&copy));
    assert_eq!(resolver.resolve(&todo).1.path(), resolver.resolve(&todo).1.path());
}
