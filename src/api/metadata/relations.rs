//! Relationship resolution between entity types
//!
//! Forward resolution maps an origin type and a field name to the related
//! entity type. Inverse resolution computes the predicate that restricts the
//! related table to rows joined to a single origin instance. Both return
//! `None` for fields that are not recognised relations.

use super::{RelationKind, entity_type, relation};
use crate::api::query::TableFilter;
use log::{debug, warn};

/// Free-text fields named like relations
const OPAQUE_FIELDS: &[(&str, &str)] = &[("Instrument", "type"), ("DatafileFormat", "type")];

/// To-many field names that do not singularize by dropping a trailing `s`
const IRREGULAR_TO_MANY: &[(&str, &str)] = &[
    ("studies", "Study"),
    ("dates", "DataPublicationDate"),
    ("users", "DataPublicationUser"),
    ("affiliations", "Affiliation"),
    ("sourceDatafiles", "RelatedDatafile"),
    ("destDatafiles", "RelatedDatafile"),
    ("jobsAsInput", "Job"),
    ("jobsAsOutput", "Job"),
];

/// Back-references that diverge from the lower-camel origin name,
/// keyed by (origin, to-many field)
const INVERSE_OVERRIDES: &[(&str, &str, &str)] = &[
    ("DataCollection", "jobsAsInput", "inputDataCollection"),
    ("DataCollection", "jobsAsOutput", "outputDataCollection"),
    ("DataCollection", "dataPublications", "content"),
    ("DataPublication", "dates", "publication"),
    ("DataPublication", "relatedItems", "publication"),
    ("DataPublication", "users", "publication"),
    ("DataPublicationUser", "affiliations", "user"),
    ("Datafile", "sourceDatafiles", "destDatafile"),
    ("Datafile", "destDatafiles", "sourceDatafile"),
];

fn is_opaque(origin: &str, field: &str) -> bool {
    OPAQUE_FIELDS.iter().any(|(o, f)| *o == origin && *f == field)
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn lower_first(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Keep a guessed type name only if the catalog knows it
fn known(candidate: String) -> Option<&'static str> {
    entity_type(&candidate).map(|entity_type| entity_type.name)
}

fn guess_to_many(origin: &str, field: &str) -> Option<&'static str> {
    if let Some((_, related)) = IRREGULAR_TO_MANY.iter().find(|(f, _)| *f == field) {
        return Some(related);
    }
    let singular = field.strip_suffix('s').unwrap_or(field);
    let candidate = capitalize(singular);
    if candidate == "Parameter" {
        return known(format!("{origin}Parameter"));
    }
    known(candidate)
}

fn guess_to_one(origin: &str, field: &str) -> Option<&'static str> {
    match field {
        "type" if origin.ends_with("Parameter") || origin == "PermissibleStringValue" => {
            return Some("ParameterType");
        }
        "type" => return known(format!("{origin}Type")),
        "content" => return Some("DataCollection"),
        "funding" => return Some("FundingReference"),
        "publication" if origin.starts_with("DataPublication") || origin == "RelatedItem" => {
            return Some("DataPublication");
        }
        _ => {}
    }
    if field.ends_with("Datafile") {
        return Some("Datafile");
    }
    if field.ends_with("DataCollection") {
        return Some("DataCollection");
    }
    known(capitalize(field))
}

/// Entity type reached through a to-many field of `origin`
pub fn related_type_for_to_many_field(origin: &str, field: &str) -> Option<&'static str> {
    if let Some((relation, RelationKind::ToMany)) = relation(origin, field) {
        return Some(relation.related_type);
    }
    let guessed = guess_to_many(origin, field);
    if guessed.is_none() {
        debug!("No to-many relation {}.{}", origin, field);
    }
    guessed
}

/// Entity type reached through a to-one field of `origin`
pub fn related_type_for_to_one_field(origin: &str, field: &str) -> Option<&'static str> {
    if is_opaque(origin, field) {
        return None;
    }
    if let Some((relation, RelationKind::ToOne)) = relation(origin, field) {
        return Some(relation.related_type);
    }
    let guessed = guess_to_one(origin, field);
    if guessed.is_none() {
        debug!("No to-one relation {}.{}", origin, field);
    }
    guessed
}

/// Field on the related entity that points back at `origin` through `field`
fn back_reference(origin: &str, field: &str) -> String {
    if let Some((_, _, back)) = INVERSE_OVERRIDES
        .iter()
        .find(|(o, f, _)| *o == origin && *f == field)
    {
        return back.to_string();
    }
    if origin.ends_with("Type") {
        return "type".to_string();
    }
    if origin == "FundingReference" {
        return "funding".to_string();
    }
    lower_first(origin)
}

/// Join predicate that filters the related table down to rows related to one
/// instance of `origin`.
///
/// Returns `"id"` when `origin` is the many side (the related row is matched
/// on its own id) and `"<back-reference>.id"` when `origin` is the one side.
pub fn id_reference_from_related_entity(
    origin: &str,
    field: &str,
    to_many: bool,
) -> Option<String> {
    if !to_many {
        return related_type_for_to_one_field(origin, field).map(|_| "id".to_string());
    }
    related_type_for_to_many_field(origin, field)?;
    Some(format!("{}.id", back_reference(origin, field)))
}

/// Filter for the "show related" navigation from one origin row.
///
/// `related_id` is the id the predicate compares against: the related row's
/// own id for to-one fields, the origin row's id for to-many fields.
pub fn related_filter(
    origin: &str,
    field: &str,
    to_many: bool,
    related_id: i64,
    limit: u32,
) -> Option<TableFilter> {
    let related_type = if to_many {
        related_type_for_to_many_field(origin, field)
    } else {
        related_type_for_to_one_field(origin, field)
    };
    let (Some(related_type), Some(reference)) = (
        related_type,
        id_reference_from_related_entity(origin, field, to_many),
    ) else {
        warn!("Cannot navigate {}.{}: not a known relation", origin, field);
        return None;
    };

    Some(
        TableFilter::new(related_type)
            .with_limit(limit)
            .with_where(format!("{reference} = {related_id}")),
    )
}
