//! Node addressing.
//!
//! Explicit ids are global: they sit directly under the store root.
//! Symbolic names are only unique inside one application, so they sit under
//! the application root.

use crate::Index;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a bound entity lives in the graph store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum NodeAddress {
    /// An explicit id directly under the store's global root.
    Global { id: String },
    /// A symbolic name under an application root.
    Scoped { app_root: String, name: String },
}

impl NodeAddress {
    /// Resolves the address of an entity reference.
    ///
    /// Pure: the same reference always yields the same address. Scoped
    /// addresses come from the symbolic name alone, so distinct references
    /// created with the same name share one node.
    #[must_use]
    pub fn resolve(index: &Index, app_root: &str) -> Self {
        match index.id() {
            Some(id) => Self::Global { id: id.to_string() },
            None => Self::Scoped {
                app_root: app_root.to_string(),
                name: index.symbol_name().to_string(),
            },
        }
    }

    #[must_use]
    pub fn is_global(&self) -> bool {
        matches!(self, Self::Global { .. })
    }

    /// The lookup key used against the selected root.
    #[must_use]
    pub fn lookup_key(&self) -> &str {
        match self {
            Self::Global { id } => id,
            Self::Scoped { name, .. } => name,
        }
    }

    /// The full path of the node, from the global root.
    #[must_use]
    pub fn to_path(&self) -> NodePath {
        match self {
            Self::Global { id } => NodePath::root().child(id),
            Self::Scoped { app_root, name } => NodePath::root().child(app_root).child(name),
        }
    }
}

impl fmt::Display for NodeAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

/// A path of keys from the store's global root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodePath(Vec<String>);

impl NodePath {
    /// The global root (empty path).
    #[must_use]
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Builds a path from its segments.
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    /// Returns this path extended by one key.
    #[must_use]
    pub fn child(&self, key: &str) -> Self {
        let mut segments = self.0.clone();
        segments.push(key.to_string());
        Self(segments)
    }

    /// The last key of the path, or `None` for the root.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("/"))
    }
}
