//! Handlers registered by [`TypeRegistry::with_builtins`](crate::TypeRegistry::with_builtins).
//!
//! | name     | kind        | stored form                          |
//! |----------|-------------|--------------------------------------|
//! | `number` | simple      | JSON number                          |
//! | `json`   | simple      | compact JSON text                    |
//! | `list`   | simple      | object keyed by decimal index        |
//! | `date`   | simple      | epoch milliseconds                   |
//! | `point`  | multi-index | one key per axis plus the composite  |

mod date;
mod json;
mod list;
mod number;
mod point;

pub use date::DateType;
pub use json::JsonType;
pub use list::ListType;
pub use number::NumberType;
pub use point::PointType;

use crate::TypeHandler;
use std::sync::Arc;

/// Every built-in handler.
pub fn all() -> Vec<Arc<dyn TypeHandler>> {
    vec![
        Arc::new(NumberType),
        Arc::new(JsonType),
        Arc::new(ListType),
        Arc::new(DateType),
        Arc::new(PointType),
    ]
}
