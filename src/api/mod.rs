//! Catalog REST interface
//!
//! Entity metadata and relation resolution, query building, the HTTP
//! client with error normalization and cancellation, and write operations.

pub mod client;
pub mod constants;
pub mod error;
pub mod manager;
pub mod metadata;
pub mod models;
pub mod operations;
pub mod query;
pub mod resilience;
pub mod source;

pub use client::{CatalogClient, ClientConfig, cancellable};
pub use error::{CatalogError, normalize_error_message};
pub use manager::ClientManager;
pub use models::{Connection, Entity, SessionInfo};
pub use operations::{BulkOutcome, BulkProgress};
pub use query::{OrderBy, TableFilter, build_count_query, build_query, query_where_from_input};
pub use resilience::{BulkConfig, ResilienceConfig, RetryConfig, RetryPolicy};
pub use source::EntitySource;
