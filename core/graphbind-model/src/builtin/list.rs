use crate::{ModelError, ModelResult, TypeHandler};
use graphbind_types::Value;
use serde_json::Map;

/// Ordered lists.
///
/// Graph nodes hold maps, not arrays, so a list is stored as an object keyed
/// by the decimal position of each element. Keys that are not positions
/// (store metadata such as `_`) are ignored on the way back.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListType;

impl ListType {
    pub const NAME: &'static str = "list";
}

impl TypeHandler for ListType {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn store(&self, value: &Value) -> ModelResult<Value> {
        let Value::Array(items) = value else {
            return Err(ModelError::encode(Self::NAME, format!("{value} is not a list")));
        };
        let map: Map<String, Value> = items
            .iter()
            .enumerate()
            .map(|(i, item)| (i.to_string(), item.clone()))
            .collect();
        Ok(Value::Object(map))
    }

    fn retrieve(&self, encoded: &Value) -> ModelResult<Value> {
        let Value::Object(map) = encoded else {
            return Err(ModelError::decode(Self::NAME, "expected an index-keyed object"));
        };
        let mut items: Vec<(usize, &Value)> = map
            .iter()
            .filter_map(|(k, v)| k.parse::<usize>().ok().map(|i| (i, v)))
            .collect();
        items.sort_by_key(|(i, _)| *i);
        Ok(Value::Array(items.into_iter().map(|(_, v)| v.clone()).collect()))
    }
}
