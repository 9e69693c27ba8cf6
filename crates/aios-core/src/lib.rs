#![deny(clippy::all)]

mod core;

pub(crate) use crate::core::config;
pub(crate) use crate::core::fs;

pub mod inventory {
    pub use crate::core::inventory::*;
}

pub mod links {
    pub use crate::core::links::*;
}

pub mod reconcile {
    pub use crate::core::reconcile::*;
}

pub mod watch {
    pub use crate::core::watch::*;
}

pub use crate::core::config::context::CommandContext;
pub use crate::core::config::{
    Config, GlobalOptions, WatchConfig, WorkspaceConfig, DEFAULT_WATCH_INTERVAL,
    DEFAULT_WORKSPACE_DIR, WATCH_INTERVAL_ENV, WORKSPACE_DIR_ENV,
};
pub use crate::core::tooling::outcome::{
    format_status_message, to_json_response, CommandGroup, CommandInfo, CommandStatus,
    ExecutionOutcome,
};

pub use crate::core::commands::{
    project_inspect, project_list, project_track, project_untrack, watch_paths,
    workspace_plan, workspace_repair, workspace_validate, ProjectSelectRequest,
    ProjectTrackRequest, WatchRequest,
};
