use crate::{ModelError, ModelResult, TypeHandler};
use graphbind_types::Value;

/// Arbitrary JSON, persisted as its compact text encoding.
///
/// A single string is one store value, replaced as a whole on every write.
/// Use this for structured values of any shape that must change atomically.
/// `list` and `point` store objects whose members are keyed so that each one
/// can be read and merged on its own.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonType;

impl JsonType {
    pub const NAME: &'static str = "json";
}

impl TypeHandler for JsonType {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn store(&self, value: &Value) -> ModelResult<Value> {
        serde_json::to_string(value)
            .map(Value::String)
            .map_err(|e| ModelError::encode(Self::NAME, e.to_string()))
    }

    fn retrieve(&self, encoded: &Value) -> ModelResult<Value> {
        let Value::String(text) = encoded else {
            return Err(ModelError::decode(Self::NAME, "expected JSON text"));
        };
        serde_json::from_str(text).map_err(|e| ModelError::decode(Self::NAME, e.to_string()))
    }
}
