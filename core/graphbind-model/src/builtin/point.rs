use crate::{AxisLayout, KeyWriter, ModelError, ModelResult, TypeHandler};
use graphbind_types::Value;
use serde_json::Map;
use tracing::debug;

/// A numeric point spread across one store key per axis.
///
/// Options name the axes (`["x", "y"]` when omitted). Each axis lives at
/// `<base><separator><axis>` so it can be indexed and queried on its own,
/// and the composite object lives at `<base>` for subscribers.
#[derive(Debug, Clone, Copy, Default)]
pub struct PointType;

impl PointType {
    pub const NAME: &'static str = "point";
    pub const DEFAULT_AXES: [&'static str; 2] = ["x", "y"];

    fn coordinate(value: &Value, axis: &str) -> ModelResult<Value> {
        match value.get(axis) {
            Some(v @ Value::Number(_)) => Ok(v.clone()),
            Some(other) => Err(ModelError::encode(
                Self::NAME,
                format!("axis '{axis}' is {other}, expected a number"),
            )),
            None => Err(ModelError::encode(Self::NAME, format!("missing axis '{axis}'"))),
        }
    }

    fn write_all(layout: &AxisLayout, coords: Map<String, Value>, writer: &dyn KeyWriter) {
        for axis in &layout.axes {
            if let Some(v) = coords.get(axis) {
                writer.put_key(&layout.axis_key(axis), v.clone());
            }
        }
        writer.put_key(&layout.base, Value::Object(coords));
    }
}

impl TypeHandler for PointType {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn store(&self, value: &Value) -> ModelResult<Value> {
        let Value::Object(map) = value else {
            return Err(ModelError::encode(Self::NAME, format!("{value} is not a point")));
        };
        if let Some((axis, v)) = map.iter().find(|(_, v)| !v.is_number()) {
            return Err(ModelError::encode(
                Self::NAME,
                format!("axis '{axis}' is {v}, expected a number"),
            ));
        }
        Ok(value.clone())
    }

    fn retrieve(&self, encoded: &Value) -> ModelResult<Value> {
        let Value::Object(map) = encoded else {
            return Err(ModelError::decode(Self::NAME, format!("{encoded} is not a point")));
        };
        let coords: Map<String, Value> = map
            .iter()
            .filter(|(_, v)| v.is_number())
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        Ok(Value::Object(coords))
    }

    fn is_multi_index(&self) -> bool {
        true
    }

    fn axes(&self, key: &str, options: &Value) -> ModelResult<Vec<String>> {
        let invalid = |reason: String| ModelError::InvalidOptions {
            key: key.to_string(),
            reason,
        };
        match options {
            Value::Null => Ok(Self::DEFAULT_AXES.iter().map(|a| a.to_string()).collect()),
            Value::Object(map) if map.is_empty() => {
                Ok(Self::DEFAULT_AXES.iter().map(|a| a.to_string()).collect())
            }
            Value::Array(items) if !items.is_empty() => {
                let mut axes: Vec<String> = Vec::with_capacity(items.len());
                for item in items {
                    let Some(name) = item.as_str().filter(|s| !s.is_empty()) else {
                        return Err(invalid(format!("axis name {item} is not a non-empty string")));
                    };
                    if axes.iter().any(|a| a == name) {
                        return Err(invalid(format!("axis '{name}' listed twice")));
                    }
                    axes.push(name.to_string());
                }
                Ok(axes)
            }
            other => Err(invalid(format!("expected a list of axis names, found {other}"))),
        }
    }

    fn init(
        &self,
        default: &Value,
        existing: Option<&Value>,
        layout: &AxisLayout,
        writer: &dyn KeyWriter,
    ) -> ModelResult<()> {
        let source = existing.filter(|v| v.is_object()).unwrap_or(default);
        let mut coords = Map::new();
        for axis in &layout.axes {
            let v = match source.get(axis) {
                Some(v @ Value::Number(_)) => v.clone(),
                _ => Value::from(0),
            };
            coords.insert(axis.clone(), v);
        }
        debug!("Initializing {} axes under '{}'", layout.axes.len(), layout.base);
        Self::write_all(layout, coords, writer);
        Ok(())
    }

    fn set(&self, value: &Value, layout: &AxisLayout, writer: &dyn KeyWriter) -> ModelResult<()> {
        let mut coords = Map::new();
        for axis in &layout.axes {
            coords.insert(axis.clone(), Self::coordinate(value, axis)?);
        }
        Self::write_all(layout, coords, writer);
        Ok(())
    }
}
