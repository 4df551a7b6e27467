use crate::{ModelError, ModelResult, TypeHandler};
use graphbind_types::Value;

/// Plain numbers. Numeric strings written by other clients decode as numbers.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumberType;

impl NumberType {
    pub const NAME: &'static str = "number";
}

impl TypeHandler for NumberType {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn store(&self, value: &Value) -> ModelResult<Value> {
        match value {
            Value::Number(_) => Ok(value.clone()),
            other => Err(ModelError::encode(Self::NAME, format!("{other} is not a number"))),
        }
    }

    fn retrieve(&self, encoded: &Value) -> ModelResult<Value> {
        match encoded {
            Value::Number(_) => Ok(encoded.clone()),
            Value::String(s) => parse_number(s.trim())
                .ok_or_else(|| ModelError::decode(Self::NAME, format!("'{s}' is not numeric"))),
            other => Err(ModelError::decode(Self::NAME, format!("{other} is not a number"))),
        }
    }
}

fn parse_number(s: &str) -> Option<Value> {
    if let Ok(i) = s.parse::<i64>() {
        return Some(Value::from(i));
    }
    s.parse::<f64>()
        .ok()
        .and_then(serde_json::Number::from_f64)
        .map(Value::Number)
}
