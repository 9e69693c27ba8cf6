//! Internal implementation modules for `aios-core`.
//!
//! Callers should go through the re-exports at the crate root.

pub mod commands;
pub mod config;
pub(crate) mod fs;
pub mod inventory;
pub mod links;
pub mod reconcile;
pub mod tooling;
pub mod watch;
