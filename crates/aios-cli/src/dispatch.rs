use std::time::Duration;

use color_eyre::Result;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use aios_core::{
    project_inspect, project_list, project_track, project_untrack, watch_paths, workspace_plan,
    workspace_repair, workspace_validate, CommandContext, CommandGroup, CommandInfo,
    ExecutionOutcome, ProjectSelectRequest, ProjectTrackRequest, WatchRequest,
};
use aios_domain::format_timestamp;

use crate::cli::{CommandGroupCli, ProjectCommand, WatchArgs, WorkspaceCommand};

pub fn command_info(group: &CommandGroupCli) -> CommandInfo {
    match group {
        CommandGroupCli::Project { command } => {
            let name = match command {
                ProjectCommand::Track(_) => "track",
                ProjectCommand::Untrack(_) => "untrack",
                ProjectCommand::Inspect(_) => "inspect",
                ProjectCommand::List => "list",
            };
            CommandInfo::new(CommandGroup::Project, name)
        }
        CommandGroupCli::Workspace { command } => {
            let name = match command {
                WorkspaceCommand::Validate => "validate",
                WorkspaceCommand::Plan => "plan",
                WorkspaceCommand::Repair => "repair",
            };
            CommandInfo::new(CommandGroup::Workspace, name)
        }
        CommandGroupCli::Watch(_) => CommandInfo::new(CommandGroup::Watch, "watch"),
    }
}

pub fn dispatch_command(ctx: &CommandContext, group: &CommandGroupCli) -> Result<ExecutionOutcome> {
    let outcome = match group {
        CommandGroupCli::Project { command } => match command {
            ProjectCommand::Track(args) => project_track(
                ctx,
                &ProjectTrackRequest {
                    path: args.path.clone(),
                },
            ),
            ProjectCommand::Untrack(args) => project_untrack(ctx, &select_request(&args.selector)),
            ProjectCommand::Inspect(args) => project_inspect(ctx, &select_request(&args.selector)),
            ProjectCommand::List => project_list(ctx),
        },
        CommandGroupCli::Workspace { command } => match command {
            WorkspaceCommand::Validate => workspace_validate(ctx),
            WorkspaceCommand::Plan => workspace_plan(ctx),
            WorkspaceCommand::Repair => workspace_repair(ctx),
        },
        CommandGroupCli::Watch(args) => run_watch(ctx, args)?,
    };
    Ok(outcome)
}

fn select_request(selector: &str) -> ProjectSelectRequest {
    ProjectSelectRequest {
        selector: selector.to_string(),
    }
}

/// Drives the watcher on a dedicated runtime until Ctrl-C.
fn run_watch(ctx: &CommandContext, args: &WatchArgs) -> Result<ExecutionOutcome> {
    let request = WatchRequest {
        paths: args.paths.clone(),
        interval: args.interval_ms.map(Duration::from_millis),
        repair_links: args.repair_links,
    };
    let print_events = !(ctx.global.json || ctx.global.quiet);
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let outcome = runtime.block_on(async {
        let cancel = CancellationToken::new();
        let interrupt = cancel.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    debug!("interrupt received; stopping watcher");
                    interrupt.cancel();
                }
                Err(err) => warn!(error = %err, "unable to listen for Ctrl-C"),
            }
        });
        watch_paths(ctx, &request, cancel, |event| {
            if print_events {
                println!(
                    "drift: {} at {}",
                    event.path.display(),
                    format_timestamp(event.timestamp)
                );
            }
        })
        .await
    });
    Ok(outcome)
}
