pub mod candidate;
pub mod job;
pub mod profile;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::matching::models::ValidationError;

/// Decodes a JSONB column into a typed record, naming the column on failure.
pub(crate) fn decode_column<T: DeserializeOwned>(
    field: &'static str,
    value: &Value,
) -> Result<T, ValidationError> {
    serde_json::from_value(value.clone()).map_err(|e| ValidationError::Malformed {
        field,
        reason: e.to_string(),
    })
}
