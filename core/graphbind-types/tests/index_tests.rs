use graphbind_types::{Error, Index, IndexSet};
use std::collections::HashSet;

// ── Index identity ────────────────────────────────────────────────

#[test]
fn named_indices_with_equal_names_are_distinct() {
    let a = Index::named("todo");
    let b = Index::named("todo");
    assert_ne!(a, b);
    assert_eq!(a.symbol_name(), b.symbol_name());
}

#[test]
fn clone_shares_identity() {
    let a = Index::named("todo");
    let b = a.clone();
    assert_eq!(a, b);
    assert_eq!(a.identity(), b.identity());
}

#[test]
fn indices_hash_by_identity() {
    let a = Index::named("todo");
    let mut set = HashSet::new();
    set.insert(a.clone());
    set.insert(a.clone());
    set.insert(Index::named("todo"));
    assert_eq!(set.len(), 2);
}

#[test]
fn with_id_exposes_id() {
    let index = Index::with_id("abc123");
    assert_eq!(index.id(), Some("abc123"));
    assert_eq!(index.to_string(), "#abc123");
}

#[test]
fn named_has_no_id() {
    let index = Index::named("settings");
    assert_eq!(index.id(), None);
    assert_eq!(index.to_string(), "Index(settings)");
}

// ── Validation ────────────────────────────────────────────────────

#[test]
fn empty_id_is_invalid() {
    let err = Index::with_id("  ").validate().unwrap_err();
    assert!(matches!(err, Error::InvalidIndex(_)));
}

#[test]
fn empty_name_is_invalid() {
    assert!(Index::named("").validate().is_err());
}

#[test]
fn ordinary_indices_validate() {
    assert!(Index::named("todo").validate().is_ok());
    assert!(Index::with_id("abc123").validate().is_ok());
}

// ── IndexSet ──────────────────────────────────────────────────────

#[test]
fn set_contains_by_identity_not_name() {
    let declared = Index::named("todo");
    let set = IndexSet::new([declared.clone()]);
    assert!(set.contains(&declared));
    assert!(!set.contains(&Index::named("todo")));
}

#[test]
fn set_drops_duplicates() {
    let a = Index::named("a");
    let mut set = IndexSet::new([a.clone(), a.clone()]);
    assert_eq!(set.len(), 1);
    assert!(!set.insert(a));
    assert!(set.insert(Index::named("b")));
    assert_eq!(set.len(), 2);
}

#[test]
fn set_lookup_by_name() {
    let set: IndexSet = [Index::named("a"), Index::with_id("xyz")].into_iter().collect();
    assert_eq!(set.by_name("xyz").and_then(Index::id), Some("xyz"));
    assert!(set.by_name("missing").is_none());
}

#[test]
fn empty_set() {
    let set = IndexSet::default();
    assert!(set.is_empty());
    assert_eq!(set.iter().count(), 0);
}
