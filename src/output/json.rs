//! JSON output through serde.

use serde::Serialize;

/// Pretty-printed JSON for any serializable result.
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<String> {
    serde_json::to_string_pretty(value)
}
