use graphbind_model::builtin::{NumberType, PointType};
use graphbind_model::{ModelError, ModelResult, TypeHandler, TypeRegistry};
use graphbind_types::Value;
use serde_json::json;
use std::sync::Arc;

/// Upper-cases strings on the way in.
struct Shout;

impl TypeHandler for Shout {
    fn name(&self) -> &str {
        "shout"
    }

    fn store(&self, value: &Value) -> ModelResult<Value> {
        Ok(json!(value.as_str().unwrap_or_default().to_uppercase()))
    }

    fn retrieve(&self, encoded: &Value) -> ModelResult<Value> {
        Ok(encoded.clone())
    }
}

// ── Builtins ─────────────────────────────────────────────────────

#[test]
fn builtins_are_registered() {
    let registry = TypeRegistry::with_builtins();
    assert_eq!(registry.names(), vec!["date", "json", "list", "number", "point"]);
    assert_eq!(registry.len(), 5);
    assert!(registry.get("point").unwrap().is_multi_index());
    assert!(!registry.get("number").unwrap().is_multi_index());
}

#[test]
fn empty_registry_has_nothing() {
    let registry = TypeRegistry::empty();
    assert!(registry.is_empty());
    assert!(!registry.contains("number"));
}

// ── Resolution ───────────────────────────────────────────────────

#[test]
fn resolve_none_is_no_conversion() {
    let registry = TypeRegistry::with_builtins();
    assert!(registry.resolve(None).unwrap().is_none());
}

#[test]
fn resolve_known_and_unknown() {
    let registry = TypeRegistry::with_builtins();
    let handler = registry.resolve(Some("number")).unwrap().unwrap();
    assert_eq!(handler.name(), "number");

    let err = registry.resolve(Some("nope")).err().unwrap();
    assert_eq!(err, ModelError::UnknownType("nope".into()));
}

// ── Builder ──────────────────────────────────────────────────────

#[test]
fn builder_adds_custom_handlers() {
    let registry = TypeRegistry::builder().builtins().register(Shout).build().unwrap();
    assert!(registry.contains("shout"));
    assert!(registry.contains("point"));

    let shout = registry.get("shout").unwrap();
    assert_eq!(shout.store(&json!("hey")).unwrap(), json!("HEY"));
}

#[test]
fn builder_shares_one_handler_across_registries() {
    let shout: Arc<dyn TypeHandler> = Arc::new(Shout);
    let first = TypeRegistry::builder().register_arc(Arc::clone(&shout)).build().unwrap();
    let second = TypeRegistry::builder()
        .builtins()
        .register_arc(Arc::clone(&shout))
        .build()
        .unwrap();

    assert!(Arc::ptr_eq(first.get("shout").unwrap(), &shout));
    assert!(Arc::ptr_eq(second.get("shout").unwrap(), &shout));
    assert_eq!(second.len(), 6);

    let err = TypeRegistry::builder()
        .register_arc(Arc::clone(&shout))
        .register(Shout)
        .build()
        .unwrap_err();
    assert_eq!(err, ModelError::DuplicateType("shout".into()));
}

#[test]
fn builder_rejects_duplicates() {
    let err = TypeRegistry::builder()
        .register(NumberType)
        .register(NumberType)
        .build()
        .unwrap_err();
    assert_eq!(err, ModelError::DuplicateType("number".into()));
}

#[test]
fn builder_rejects_custom_shadowing_builtin() {
    let err = TypeRegistry::builder().builtins().register(PointType).build().unwrap_err();
    assert!(matches!(err, ModelError::DuplicateType(name) if name == "point"));
}

#[test]
fn simple_handlers_refuse_multi_index_operations() {
    let registry = TypeRegistry::builder().register(Shout).build().unwrap();
    let shout = registry.get("shout").unwrap();
    assert!(shout.axes("k", &json!(["a"])).is_err());
}

#[test]
fn debug_lists_type_names() {
    let registry = TypeRegistry::builder().register(Shout).build().unwrap();
    assert_eq!(format!("{registry:?}"), r#"TypeRegistry { types: ["shout"] }"#);
}
