pub mod browse;
pub mod edit;
pub mod session;

pub use browse::{browse, count, related};
pub use edit::{create, delete, move_entities, update};
pub use session::{connections, login, logout};
