//! Table filter and catalog query generation
//!
//! A `TableFilter` identifies exactly one page of one entity table and
//! renders to the catalog's query language:
//! `select e from <Type> e [where ..] [order by ..] [limit o, n] include ..`

use super::filters::{ENTITY_ALIAS, query_where_from_input};
use super::orderby::OrderBy;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableFilter {
    pub table: String,
    #[serde(default)]
    pub offset: u32,
    /// Zero means unlimited
    #[serde(default)]
    pub limit: u32,
    #[serde(rename = "where", default, skip_serializing_if = "Option::is_none")]
    pub where_clause: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_asc: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub includes: Option<Vec<String>>,
}

/// Tab matching compares the table, the where input and the page window.
/// Sorting and includes do not make a different tab.
impl PartialEq for TableFilter {
    fn eq(&self, other: &Self) -> bool {
        self.table == other.table
            && self.where_input() == other.where_input()
            && self.offset == other.offset
            && self.limit == other.limit
    }
}

impl Eq for TableFilter {}

impl TableFilter {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            offset: 0,
            limit: 0,
            where_clause: None,
            sort_field: None,
            sort_asc: None,
            includes: None,
        }
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_offset(mut self, offset: u32) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_where(mut self, where_clause: impl Into<String>) -> Self {
        self.where_clause = Some(where_clause.into());
        self
    }

    pub fn with_sort(mut self, field: impl Into<String>, asc: bool) -> Self {
        self.sort_field = Some(field.into());
        self.sort_asc = Some(asc);
        self
    }

    pub fn with_includes(mut self, includes: &[&str]) -> Self {
        self.includes = Some(includes.iter().map(|i| i.to_string()).collect());
        self
    }

    /// The raw where input, with blank input normalised to empty
    pub fn where_input(&self) -> &str {
        self.where_clause.as_deref().map(str::trim).unwrap_or("")
    }

    pub fn order_by(&self) -> Option<OrderBy> {
        self.sort_field
            .as_ref()
            .map(|field| OrderBy::from_sort(field.clone(), self.sort_asc))
    }

    /// Next page of the same query
    pub fn next_page(&self) -> Self {
        let mut next = self.clone();
        next.offset = self.offset.saturating_add(self.limit);
        next
    }

    fn include_clause(&self) -> String {
        let paths: Vec<String> = self
            .includes
            .iter()
            .flatten()
            .map(|path| path.trim())
            .filter(|path| !path.is_empty())
            .map(|path| {
                if path.starts_with(&format!("{ENTITY_ALIAS}.")) {
                    path.to_string()
                } else {
                    format!("{ENTITY_ALIAS}.{path}")
                }
            })
            .collect();

        if paths.is_empty() {
            "1".to_string()
        } else {
            paths.join(", ")
        }
    }

    /// Render the page query
    pub fn to_query_string(&self) -> String {
        let where_part = query_where_from_input(self.where_input());
        let order_part = self.order_by().map(|o| o.to_clause()).unwrap_or_default();
        let limit_part = if self.limit > 0 {
            format!(" limit {}, {}", self.offset, self.limit)
        } else {
            String::new()
        };

        format!(
            "select {alias} from {table} {alias}{where_part}{order_part}{limit_part} include {includes}",
            alias = ENTITY_ALIAS,
            table = self.table,
            includes = self.include_clause(),
        )
    }

    /// Render the count query: no ordering, paging or includes
    pub fn to_count_query(&self) -> String {
        format!(
            "select count({alias}) from {table} {alias}{where_part}",
            alias = ENTITY_ALIAS,
            table = self.table,
            where_part = query_where_from_input(self.where_input()),
        )
    }
}

pub fn build_query(filter: &TableFilter) -> String {
    filter.to_query_string()
}

pub fn build_count_query(filter: &TableFilter) -> String {
    filter.to_count_query()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_query() {
        let filter = TableFilter::new("Facility")
            .with_where("id = 1")
            .with_sort("name", false)
            .with_offset(20)
            .with_limit(10)
            .with_includes(&["facilityCycles", "e.instruments"]);

        assert_eq!(
            build_query(&filter),
            "select e from Facility e where e.id = 1 order by e.name desc limit 20, 10 include e.facilityCycles, e.instruments"
        );
    }

    #[test]
    fn test_minimal_query() {
        let filter = TableFilter::new("Dataset");
        assert_eq!(build_query(&filter), "select e from Dataset e  include 1");
    }

    #[test]
    fn test_no_order_without_sort_field() {
        for filter in [
            TableFilter::new("Dataset").with_limit(50),
            TableFilter::new("Dataset").with_where("name like 'a%'"),
            TableFilter { sort_asc: Some(true), ..TableFilter::new("Dataset") },
        ] {
            assert!(!build_query(&filter).contains("order by"));
        }
    }

    #[test]
    fn test_exactly_one_order_clause() {
        for asc in [true, false] {
            let query = build_query(&TableFilter::new("Datafile").with_sort("fileSize", asc));
            assert_eq!(query.matches("order by").count(), 1);
            let expected = if asc { "order by e.fileSize asc" } else { "order by e.fileSize desc" };
            assert!(query.contains(expected));
        }
    }

    #[test]
    fn test_count_query_ignores_paging_and_order() {
        let filter = TableFilter::new("Investigation")
            .with_where("visitId = 'x'")
            .with_sort("name", true)
            .with_limit(50)
            .with_includes(&["facility"]);

        assert_eq!(
            build_count_query(&filter),
            "select count(e) from Investigation e where e.visitId = 'x'"
        );
    }

    #[test]
    fn test_equality_ignores_sort_and_includes() {
        let a = TableFilter::new("User").with_where("name = 'x'").with_limit(50);
        let b = a.clone().with_sort("name", true).with_includes(&["userGroups"]);
        assert_eq!(a, b);

        assert_ne!(a, a.clone().with_offset(50));
        assert_ne!(a, a.clone().with_where("name = 'y'"));
        assert_eq!(
            TableFilter::new("User").with_where("  "),
            TableFilter::new("User")
        );
    }

    #[test]
    fn test_next_page() {
        let filter = TableFilter::new("User").with_limit(25).with_offset(50);
        assert_eq!(filter.next_page().offset, 75);
    }

    #[test]
    fn test_serde_uses_catalog_field_names() {
        let filter: TableFilter = serde_json::from_str(
            r#"{"table":"Facility","offset":0,"limit":5,"where":"id = 1","sortField":"name","sortAsc":true}"#,
        )
        .unwrap();
        assert_eq!(filter.where_clause.as_deref(), Some("id = 1"));
        assert_eq!(filter.sort_field.as_deref(), Some("name"));

        let json = serde_json::to_value(&filter).unwrap();
        assert_eq!(json["where"], "id = 1");
        assert!(json.get("includes").is_none());
    }
}
