//! Catalog response envelope handling
//!
//! Query rows come back type-tagged: `[{"Facility": {...}}, ...]`.

use crate::api::error::CatalogError;
use crate::api::models::Entity;
use serde_json::Value;

fn untag(row: Value) -> Result<Entity, CatalogError> {
    match row {
        Value::Object(tagged) if tagged.len() == 1 => {
            match tagged.into_iter().next().map(|(_, inner)| inner) {
                Some(Value::Object(entity)) => Ok(entity),
                other => Err(CatalogError::Decode(format!(
                    "expected an entity object inside the type tag, got {:?}",
                    other
                ))),
            }
        }
        other => Err(CatalogError::Decode(format!(
            "expected a type-tagged entity, got {}",
            other
        ))),
    }
}

/// Unwrap a query response into plain entity objects
pub fn unwrap_entities(response: Value) -> Result<Vec<Entity>, CatalogError> {
    match response {
        Value::Array(rows) => rows.into_iter().map(untag).collect(),
        Value::Null => Ok(Vec::new()),
        other => Err(CatalogError::Decode(format!(
            "expected an array of entities, got {}",
            other
        ))),
    }
}

/// Unwrap a single fetched entity
pub fn unwrap_entity(response: Value) -> Result<Entity, CatalogError> {
    untag(response)
}

/// Read the single number a count query returns
pub fn unwrap_count(response: Value) -> Result<u64, CatalogError> {
    let count = match &response {
        Value::Array(values) => values.first().and_then(Value::as_u64),
        Value::Number(n) => n.as_u64(),
        _ => None,
    };
    count.ok_or_else(|| CatalogError::Decode(format!("expected a count, got {}", response)))
}

/// Read the ids a write returns
pub fn unwrap_ids(response: Value) -> Result<Vec<i64>, CatalogError> {
    match &response {
        Value::Array(values) => values
            .iter()
            .map(|v| {
                v.as_i64()
                    .ok_or_else(|| CatalogError::Decode(format!("expected an id, got {}", v)))
            })
            .collect(),
        Value::Number(n) => n
            .as_i64()
            .map(|id| vec![id])
            .ok_or_else(|| CatalogError::Decode(format!("expected an id, got {}", n))),
        _ => Err(CatalogError::Decode(format!("expected ids, got {}", response))),
    }
}
