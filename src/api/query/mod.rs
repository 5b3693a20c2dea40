//! Catalog query building
//!
//! `TableFilter` is the reusable description of one table page; it renders
//! the page query and the matching count query.

pub mod query;
pub mod filters;
pub mod orderby;
pub mod result;

pub use query::{TableFilter, build_count_query, build_query};
pub use filters::{ENTITY_ALIAS, query_where_from_input};
pub use orderby::OrderBy;
pub use result::{unwrap_count, unwrap_entities, unwrap_entity, unwrap_ids};
