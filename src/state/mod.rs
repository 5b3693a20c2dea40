//! Client-side tab state
//!
//! Each connection owns a `TabStore`; every tab changes only through
//! `EntityTab::update`. `TabLoader` runs the fetches a `Command::Reload`
//! asks for and feeds the results back in.

pub mod loader;
pub mod store;
pub mod tab;

pub use loader::{LoadOutcome, TabLoader};
pub use store::{AppState, TabStore};
pub use tab::{Command, EntityTab, Msg, NO_ENTRIES};
