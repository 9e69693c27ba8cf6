use serde_json::json;
use tracing::debug;

use crate::{CommandContext, ExecutionOutcome};

#[derive(Clone, Debug)]
pub struct ProjectTrackRequest {
    pub path: String,
}

#[derive(Clone, Debug)]
pub struct ProjectSelectRequest {
    pub selector: String,
}

pub fn project_track(ctx: &CommandContext, request: &ProjectTrackRequest) -> ExecutionOutcome {
    match ctx.inventory().track(&request.path) {
        Ok(project) => ExecutionOutcome::success(
            format!("tracking {}", project.path.display()),
            json!({ "project": project }),
        ),
        Err(err) => ExecutionOutcome::from_error(&err),
    }
}

pub fn project_untrack(ctx: &CommandContext, request: &ProjectSelectRequest) -> ExecutionOutcome {
    match ctx.inventory().untrack(&request.selector) {
        Ok(project) => ExecutionOutcome::success(
            format!("untracked {}", project.path.display()),
            json!({ "project": project }),
        ),
        Err(err) => ExecutionOutcome::from_error(&err),
    }
}

pub fn project_inspect(ctx: &CommandContext, request: &ProjectSelectRequest) -> ExecutionOutcome {
    match ctx.inventory().inspect(&request.selector) {
        Ok(project) => {
            ExecutionOutcome::success(project.path.display().to_string(), json!({ "project": project }))
        }
        Err(err) => ExecutionOutcome::from_error(&err),
    }
}

pub fn project_list(ctx: &CommandContext) -> ExecutionOutcome {
    match ctx.inventory().list() {
        Ok(projects) => {
            debug!(count = projects.len(), "listing projects");
            let message = match projects.len() {
                0 => "no projects tracked".to_string(),
                1 => "1 project tracked".to_string(),
                n => format!("{n} projects tracked"),
            };
            ExecutionOutcome::success(
                message,
                json!({ "count": projects.len(), "projects": projects }),
            )
        }
        Err(err) => ExecutionOutcome::from_error(&err),
    }
}
