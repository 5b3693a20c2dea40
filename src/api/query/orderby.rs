//! Order clause building

use super::filters::ENTITY_ALIAS;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderBy {
    Asc(String),
    Desc(String),
}

impl OrderBy {
    pub fn asc(field: impl Into<String>) -> Self {
        Self::Asc(field.into())
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self::Desc(field.into())
    }

    /// Build from a sort field and an optional direction (ascending if unset)
    pub fn from_sort(field: impl Into<String>, asc: Option<bool>) -> Self {
        if asc.unwrap_or(true) {
            Self::asc(field)
        } else {
            Self::desc(field)
        }
    }

    pub fn field(&self) -> &str {
        match self {
            OrderBy::Asc(field) | OrderBy::Desc(field) => field,
        }
    }

    /// Render as an order clause with its leading space
    pub fn to_clause(&self) -> String {
        match self {
            OrderBy::Asc(field) => format!(" order by {ENTITY_ALIAS}.{field} asc"),
            OrderBy::Desc(field) => format!(" order by {ENTITY_ALIAS}.{field} desc"),
        }
    }
}
