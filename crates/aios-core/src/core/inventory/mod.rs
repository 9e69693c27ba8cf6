mod service;
mod store;

pub use service::{Canonicalizer, Clock, InventoryService};
pub use store::{FileInventoryStore, InventoryStore};
