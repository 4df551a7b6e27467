use serde::{Deserialize, Serialize};

use crate::BindResult;

/// Configuration shared by every binding made through one context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BindConfig {
    /// Name of the application-scoped root that symbolic indices live under.
    pub app_root: String,
    /// Write schema defaults into keys that are empty at mount.
    pub materialize_defaults: bool,
    /// Joins a multi-index base key to an axis name (`position` + `x`).
    pub axis_separator: String,
    /// Skip re-render requests when a delivery does not change state.
    pub skip_unchanged: bool,
}

impl Default for BindConfig {
    fn default() -> Self {
        Self {
            app_root: "app".to_string(),
            materialize_defaults: true,
            axis_separator: "_".to_string(),
            skip_unchanged: true,
        }
    }
}

impl BindConfig {
    /// Parses a JSON config document. Missing fields take their defaults.
    pub fn from_json(text: &str) -> BindResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Same defaults, different application root.
    #[must_use]
    pub fn with_app_root(app_root: impl Into<String>) -> Self {
        Self {
            app_root: app_root.into(),
            ..Self::default()
        }
    }
}
