//! ICAT entity metadata models

/// A named relation from one entity type to another
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Relation {
    pub name: &'static str,
    pub related_type: &'static str,
}

/// Cardinality of a relation as seen from its origin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationKind {
    ToOne,
    ToMany,
}

impl RelationKind {
    pub fn is_to_many(self) -> bool {
        matches!(self, RelationKind::ToMany)
    }
}

/// Static description of one catalog entity type
#[derive(Debug, Clone, Copy)]
pub struct EntityType {
    pub name: &'static str,
    /// Scalar fields, excluding the audit fields every entity carries
    pub fields: &'static [&'static str],
    pub to_one: &'static [Relation],
    pub to_many: &'static [Relation],
}

impl EntityType {
    /// Look up a relation by field name together with its cardinality
    pub fn relation(&self, field: &str) -> Option<(Relation, RelationKind)> {
        if let Some(relation) = self.to_one.iter().find(|r| r.name == field) {
            return Some((*relation, RelationKind::ToOne));
        }
        self.to_many
            .iter()
            .find(|r| r.name == field)
            .map(|r| (*r, RelationKind::ToMany))
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.fields.contains(&field) || super::AUDIT_FIELDS.contains(&field)
    }
}

pub(crate) const fn rel(name: &'static str, related_type: &'static str) -> Relation {
    Relation { name, related_type }
}
