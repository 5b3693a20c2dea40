//! Administrative client core for an ICAT data catalog
//!
//! `api` talks to the catalog and knows its schema, `state` keeps the open
//! tabs with their pending edits, `config` holds settings and saved
//! connections, and `cli` is a thin front end over all three.

pub mod api;
pub mod cli;
pub mod config;
pub mod state;
