use crate::{ModelError, ModelResult};
use graphbind_types::Value;

/// A named value type that knows how to persist itself in a graph node.
///
/// Simple types map one property to one store key and only convert values.
/// Multi-index types spread one property over several derived keys ("axes")
/// and must be written through [`TypeHandler::set`]; a plain single-key write
/// could leave the axes disagreeing with each other.
///
/// Handlers are registered once in a [`TypeRegistry`](crate::TypeRegistry) and
/// shared read-only by every bound instance.
pub trait TypeHandler: Send + Sync {
    /// The name schemas use to refer to this type.
    fn name(&self) -> &str;

    /// Encodes a value into a form the store can persist verbatim.
    fn store(&self, value: &Value) -> ModelResult<Value>;

    /// Decodes a stored value. Left inverse of [`TypeHandler::store`].
    fn retrieve(&self, encoded: &Value) -> ModelResult<Value>;

    /// Whether the value spans several derived keys.
    fn is_multi_index(&self) -> bool {
        false
    }

    /// Parses the axis names out of a property's options.
    ///
    /// Only called for multi-index types.
    fn axes(&self, key: &str, options: &Value) -> ModelResult<Vec<String>> {
        let _ = options;
        Err(ModelError::InvalidOptions {
            key: key.to_string(),
            reason: format!("type '{}' has no axes", self.name()),
        })
    }

    /// Establishes the derived-key layout for one instance.
    ///
    /// `existing` is the composite value currently stored at the base key,
    /// if any; handlers should keep it rather than reset to `default`.
    fn init(
        &self,
        default: &Value,
        existing: Option<&Value>,
        layout: &AxisLayout,
        writer: &dyn KeyWriter,
    ) -> ModelResult<()> {
        let _ = (default, existing, layout, writer);
        Err(ModelError::UnsupportedOperation {
            type_name: self.name().to_string(),
            op: "init",
        })
    }

    /// Writes a value across every axis, then the base key.
    fn set(&self, value: &Value, layout: &AxisLayout, writer: &dyn KeyWriter) -> ModelResult<()> {
        let _ = (value, layout, writer);
        Err(ModelError::UnsupportedOperation {
            type_name: self.name().to_string(),
            op: "set",
        })
    }
}

/// Write access to the keys of one node, handed to multi-index handlers.
pub trait KeyWriter {
    fn put_key(&self, key: &str, value: Value);
}

/// The keys a multi-index property occupies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AxisLayout {
    pub base: String,
    pub axes: Vec<String>,
    pub separator: String,
}

impl AxisLayout {
    pub fn new(base: impl Into<String>, axes: Vec<String>, separator: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            axes,
            separator: separator.into(),
        }
    }

    /// The store key holding one axis, e.g. `position_x`.
    #[must_use]
    pub fn axis_key(&self, axis: &str) -> String {
        format!("{}{}{}", self.base, self.separator, axis)
    }

    /// Every derived key, in axis order.
    #[must_use]
    pub fn axis_keys(&self) -> Vec<String> {
        self.axes.iter().map(|a| self.axis_key(a)).collect()
    }
}
