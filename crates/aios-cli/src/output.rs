use atty::Stream;
use color_eyre::Result;
use serde_json::Value;

use aios_core::{
    format_status_message, to_json_response, CommandGroup, CommandInfo, ExecutionOutcome,
};

use crate::style::Style;

#[derive(Clone, Copy, Debug)]
pub struct OutputOptions {
    pub quiet: bool,
    pub json: bool,
    pub no_color: bool,
}

pub fn emit_output(
    opts: &OutputOptions,
    info: CommandInfo,
    outcome: &ExecutionOutcome,
) -> Result<i32> {
    let code = outcome.status.exit_code();
    let style = Style::new(opts.no_color, atty::is(Stream::Stdout));

    if opts.json {
        let payload = to_json_response(info, outcome);
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(code);
    }
    if opts.quiet {
        if code != 0 {
            eprintln!("{}", format_status_message(info, &outcome.message));
        }
        return Ok(code);
    }

    let message = format_status_message(info, &outcome.message);
    println!("{}", style.status(&outcome.status, &message));
    for row in detail_rows(&style, info, &outcome.details) {
        println!("  {row}");
    }
    if let Some(hint) = hint_from_details(&outcome.details) {
        println!("{} {hint}", style.label("Hint:"));
    }
    Ok(code)
}

fn hint_from_details(details: &Value) -> Option<&str> {
    details
        .as_object()
        .and_then(|map| map.get("hint"))
        .and_then(Value::as_str)
}

/// One line per project, link report or plan action in the details payload.
fn detail_rows(style: &Style, info: CommandInfo, details: &Value) -> Vec<String> {
    match (info.group, info.name) {
        (CommandGroup::Project, "list") => array(details, "projects")
            .filter_map(|project| {
                let path = project.get("Path")?.as_str()?;
                let added = project.get("AddedAt")?.as_str()?;
                Some(format!("{path}  (added {added})"))
            })
            .collect(),
        (CommandGroup::Workspace, "validate") => array(details, "reports")
            .filter_map(|report| {
                let status = report.get("status")?.as_str()?;
                let id = report.get("project_id")?.as_str()?;
                let link = report.get("link_path")?.as_str()?;
                Some(format!("{} {id} -> {link}", style.label(status)))
            })
            .collect(),
        (CommandGroup::Workspace, "plan") => action_rows(style, array(details, "actions")),
        (CommandGroup::Workspace, "repair") => {
            action_rows(style, array(details, "applied").chain(array(details, "skipped")))
        }
        (CommandGroup::Watch, _) => array(details, "history")
            .filter_map(|transition| {
                let from = transition.get("from")?.as_str()?;
                let to = transition.get("to")?.as_str()?;
                Some(format!("{from} -> {to}"))
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn action_rows<'a>(style: &Style, actions: impl Iterator<Item = &'a Value>) -> Vec<String> {
    actions
        .filter_map(|action| {
            let kind = action.get("kind")?.as_str()?;
            let id = action.get("project_id")?.as_str()?;
            let reason = action.get("reason")?.as_str()?;
            Some(format!("{} {id}: {reason}", style.label(kind)))
        })
        .collect()
}

fn array<'a>(details: &'a Value, key: &str) -> impl Iterator<Item = &'a Value> {
    details
        .get(key)
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
}
