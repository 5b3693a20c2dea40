//! Static entity metadata for the ICAT schema
//!
//! Lookups are pure and return `None` for type names outside the catalog's
//! entity universe.

pub mod models;
pub mod relations;
mod schema;

pub use models::{EntityType, Relation, RelationKind};
pub use relations::{
    id_reference_from_related_entity, related_filter, related_type_for_to_many_field,
    related_type_for_to_one_field,
};

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Fields present on every catalog entity
pub const AUDIT_FIELDS: &[&str] = &["id", "createId", "createTime", "modId", "modTime"];

static INDEX: Lazy<HashMap<&'static str, &'static EntityType>> = Lazy::new(|| {
    schema::ENTITY_TYPES
        .iter()
        .map(|entity_type| (entity_type.name, entity_type))
        .collect()
});

/// Look up the full description of an entity type
pub fn entity_type(name: &str) -> Option<&'static EntityType> {
    INDEX.get(name).copied()
}

/// Every known entity type name, in schema order
pub fn entity_types() -> impl Iterator<Item = &'static str> {
    schema::ENTITY_TYPES.iter().map(|entity_type| entity_type.name)
}

pub fn fields(name: &str) -> Option<&'static [&'static str]> {
    entity_type(name).map(|entity_type| entity_type.fields)
}

pub fn to_one_relations(name: &str) -> Option<&'static [Relation]> {
    entity_type(name).map(|entity_type| entity_type.to_one)
}

pub fn to_many_relations(name: &str) -> Option<&'static [Relation]> {
    entity_type(name).map(|entity_type| entity_type.to_many)
}

/// Find a relation on `name` by field, with its cardinality
pub fn relation(name: &str, field: &str) -> Option<(Relation, RelationKind)> {
    entity_type(name)?.relation(field)
}
