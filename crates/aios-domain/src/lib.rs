#![deny(clippy::all)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate
)]

pub mod error;
pub mod links;
pub mod paths;
pub mod project;
pub mod sync;

pub use error::{ErrorKind, IoResultExt, Result, WorkspaceError};
pub use links::{
    link_name, LinkReport, LinkStatus, PlanAction, PlanActionKind, PlanResult, RepairResult,
    ValidationResult, REASON_CONFLICT, REASON_HEALTHY, REASON_MISMATCH, REASON_MISSING,
};
pub use paths::{canonicalize, canonicalize_from, clean};
pub use project::{format_timestamp, Inventory, Project, INVENTORY_VERSION};
pub use sync::{next_state, SyncEvent, SyncState, SyncStateMachine, Transition};
