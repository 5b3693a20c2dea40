use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A catalog entity as fetched: field name to scalar, related reference or
/// list of related references. Drafts are the same shape without an `id`.
pub type Entity = Map<String, Value>;

/// Numeric id of an entity or inline related reference
pub fn entity_id(entity: &Entity) -> Option<i64> {
    entity.get("id").and_then(Value::as_i64)
}

/// Id carried by a field value if it is a related reference
pub fn reference_id(value: &Value) -> Option<i64> {
    value.as_object().and_then(entity_id)
}

/// A related reference as the catalog expects it in writes
pub fn reference(id: i64) -> Value {
    serde_json::json!({ "id": id })
}

/// Equality used when deciding whether an edit reverts a field: related
/// references compare by id, everything else by value.
pub fn field_values_equal(a: &Value, b: &Value) -> bool {
    match (reference_id(a), reference_id(b)) {
        (Some(a), Some(b)) => a == b,
        _ => a == b,
    }
}

/// Credentials for one authenticated catalog session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub server: String,
    pub session_id: String,
    pub username: String,
}

/// Server view of a session
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    pub user_name: String,
    #[serde(default)]
    pub remaining_minutes: f64,
}
