use crate::{ModelError, ModelResult, TypeHandler};
use chrono::{DateTime, SecondsFormat, Utc};
use graphbind_types::Value;

/// Points in time.
///
/// Authors read and write RFC 3339 strings; the store holds epoch
/// milliseconds so that every client compares instants numerically.
///
/// Only the canonical form is accepted: UTC with a `Z` suffix and exactly
/// three fractional digits, e.g. `2024-01-01T00:00:00.000Z`. That is the form
/// [`retrieve`](TypeHandler::retrieve) produces, so every accepted string
/// reads back unchanged. Other offsets or precisions are rejected with the
/// canonical spelling of the same instant in the error.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateType;

impl DateType {
    pub const NAME: &'static str = "date";
}

impl TypeHandler for DateType {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn store(&self, value: &Value) -> ModelResult<Value> {
        let Value::String(text) = value else {
            return Err(ModelError::encode(Self::NAME, format!("{value} is not an RFC 3339 string")));
        };
        let parsed = DateTime::parse_from_rfc3339(text)
            .map_err(|e| ModelError::encode(Self::NAME, format!("'{text}': {e}")))?;
        let canonical = canonical(&parsed.with_timezone(&Utc));
        if canonical != *text {
            return Err(ModelError::encode(
                Self::NAME,
                format!("'{text}' is not canonical, write '{canonical}'"),
            ));
        }
        Ok(Value::from(parsed.timestamp_millis()))
    }

    fn retrieve(&self, encoded: &Value) -> ModelResult<Value> {
        let millis = encoded
            .as_i64()
            .ok_or_else(|| ModelError::decode(Self::NAME, format!("{encoded} is not epoch milliseconds")))?;
        let instant = DateTime::<Utc>::from_timestamp_millis(millis)
            .ok_or_else(|| ModelError::decode(Self::NAME, format!("{millis} is out of range")))?;
        Ok(Value::String(canonical(&instant)))
    }
}

fn canonical(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}
