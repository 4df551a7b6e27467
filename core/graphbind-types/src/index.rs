//! Entity references.
//!
//! An [`Index`] names the entity a component is bound to. It either carries an
//! explicit id, which is unique across the whole store, or only a symbolic
//! name that is unique within one application.
//!
//! Identity is per reference: two `Index::named("todo")` calls produce two
//! distinct references, exactly like two freshly minted symbols. Clones share
//! the identity of the reference they were cloned from.
//!
//! Identity decides declaration membership only, not addressing. A scoped
//! address is built from the name, so two references named `"todo"` resolve
//! to the same node, `<app_root>/todo`, and see the same data. Each one must
//! still be declared on its own before it can be bound.

use crate::{Error, Result};
use std::fmt;
use std::hash::{Hash, Hasher};
use uuid::Uuid;

/// A reference to a bindable entity.
#[derive(Debug, Clone)]
pub struct Index {
    identity: Uuid,
    name: String,
    id: Option<String>,
}

impl Index {
    /// Creates a symbolic reference, addressed under the application root.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            identity: Uuid::new_v4(),
            name: name.into(),
            id: None,
        }
    }

    /// Creates a reference carrying an explicit store-wide identifier.
    #[must_use]
    pub fn with_id(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            identity: Uuid::new_v4(),
            name: id.clone(),
            id: Some(id),
        }
    }

    /// The explicit identifier, if this reference carries one.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// The symbolic name this reference was created with.
    #[must_use]
    pub fn symbol_name(&self) -> &str {
        &self.name
    }

    /// The identity shared by this reference and all of its clones.
    #[must_use]
    pub const fn identity(&self) -> Uuid {
        self.identity
    }

    /// Rejects references that cannot be turned into an address.
    pub fn validate(&self) -> Result<()> {
        match &self.id {
            Some(id) if id.trim().is_empty() => {
                Err(Error::InvalidIndex("explicit id must not be empty".into()))
            }
            None if self.name.is_empty() => {
                Err(Error::InvalidIndex("symbolic name must not be empty".into()))
            }
            _ => Ok(()),
        }
    }
}

impl PartialEq for Index {
    fn eq(&self, other: &Self) -> bool {
        self.identity == other.identity
    }
}

impl Eq for Index {}

impl Hash for Index {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity.hash(state);
    }
}

impl fmt::Display for Index {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.id {
            Some(id) => write!(f, "#{id}"),
            None => write!(f, "Index({})", self.name),
        }
    }
}

/// The set of entity references an application declares up front.
///
/// Binding is only allowed against members of this set.
#[derive(Debug, Clone, Default)]
pub struct IndexSet {
    indices: Vec<Index>,
}

impl IndexSet {
    /// Creates a set from the given references, dropping duplicates.
    pub fn new(indices: impl IntoIterator<Item = Index>) -> Self {
        let mut set = Self::default();
        for index in indices {
            set.insert(index);
        }
        set
    }

    /// Adds a reference. Returns false if it was already present.
    pub fn insert(&mut self, index: Index) -> bool {
        if self.contains(&index) {
            return false;
        }
        self.indices.push(index);
        true
    }

    /// Returns true if this exact reference (by identity) was declared.
    #[must_use]
    pub fn contains(&self, index: &Index) -> bool {
        self.indices.iter().any(|i| i == index)
    }

    /// Looks up a declared reference by its symbolic name.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<&Index> {
        self.indices.iter().find(|i| i.symbol_name() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Index> {
        self.indices.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

impl FromIterator<Index> for IndexSet {
    fn from_iter<T: IntoIterator<Item = Index>>(iter: T) -> Self {
        Self::new(iter)
    }
}
