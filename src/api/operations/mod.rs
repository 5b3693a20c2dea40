//! Catalog write operations
//!
//! Single-entity round trips and chunked bulk variants of delete, create
//! and move.

pub mod bulk;
pub mod entity;

pub use bulk::{BulkFailure, BulkOutcome, BulkProgress, create_entities, delete_entities, move_entities, run_bulk};
pub use entity::{modification_payload, save_creation, save_modification};
