//! Single-entity write round trips
//!
//! A write is followed by a fetch of the stored entity so the caller can
//! replace its local draft or overlay with what the server holds.

use crate::api::client::CatalogClient;
use crate::api::error::CatalogError;
use crate::api::models::Entity;
use log::debug;
use serde_json::Value;

/// Create an entity from a draft and fetch the stored version
pub async fn save_creation(
    client: &CatalogClient,
    entity_type: &str,
    draft: &Entity,
) -> Result<Entity, CatalogError> {
    let mut draft = draft.clone();
    draft.remove("id");

    let ids = client.write_entity(entity_type, &draft).await?;
    let id = ids.first().copied().ok_or_else(|| {
        CatalogError::Decode(format!("creating {} returned no id", entity_type))
    })?;

    debug!("Created {} {}", entity_type, id);
    client.get_by_id(entity_type, id, None).await
}

/// Write a sparse modification to an existing entity and fetch the result
pub async fn save_modification(
    client: &CatalogClient,
    entity_type: &str,
    id: i64,
    modification: &Entity,
) -> Result<Entity, CatalogError> {
    let update = modification_payload(id, modification);
    client.write_entity(entity_type, &update).await?;

    debug!("Updated {} {}", entity_type, id);
    client.get_by_id(entity_type, id, None).await
}

/// The update body: the overlay fields plus the target id
pub fn modification_payload(id: i64, modification: &Entity) -> Entity {
    let mut update = modification.clone();
    update.insert("id".to_string(), Value::from(id));
    update
}
