mod project;
mod watch;
mod workspace;

pub use project::{
    project_inspect, project_list, project_track, project_untrack, ProjectSelectRequest,
    ProjectTrackRequest,
};
pub use watch::{watch_paths, WatchRequest};
pub use workspace::{workspace_plan, workspace_repair, workspace_validate};
