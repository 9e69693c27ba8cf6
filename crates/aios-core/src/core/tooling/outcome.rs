use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use aios_domain::{ErrorKind, WorkspaceError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionOutcome {
    pub status: CommandStatus,
    pub message: String,
    #[serde(default)]
    pub details: Value,
}

impl ExecutionOutcome {
    pub fn success(message: impl Into<String>, details: Value) -> Self {
        Self {
            status: CommandStatus::Ok,
            message: message.into(),
            details,
        }
    }

    pub fn failure(message: impl Into<String>, details: Value) -> Self {
        Self {
            status: CommandStatus::Failure,
            message: message.into(),
            details,
        }
    }

    pub fn user_error(message: impl Into<String>, details: Value) -> Self {
        Self {
            status: CommandStatus::UserError,
            message: message.into(),
            details,
        }
    }

    /// Input, not-found and conflict errors are the caller's to fix; the rest
    /// are failures.
    #[must_use]
    pub fn from_error(err: &WorkspaceError) -> Self {
        let kind = err.kind();
        let mut details = json!({ "reason": kind.as_str() });
        if let Some(hint) = hint_for(err) {
            details["hint"] = json!(hint);
        }
        match err {
            WorkspaceError::NonSymlinkConflict { path } => {
                details["link_path"] = json!(path.display().to_string());
            }
            WorkspaceError::Corrupt { path, .. } => {
                details["inventory"] = json!(path.display().to_string());
            }
            _ => {}
        }
        match kind {
            ErrorKind::Input | ErrorKind::NotFound | ErrorKind::Conflict => {
                Self::user_error(err.to_string(), details)
            }
            ErrorKind::Filesystem | ErrorKind::Corruption => {
                Self::failure(err.to_string(), details)
            }
        }
    }
}

fn hint_for(err: &WorkspaceError) -> Option<&'static str> {
    match err {
        WorkspaceError::ProjectNotFound => Some("Run `aios project list` to see tracked projects."),
        WorkspaceError::NonSymlinkConflict { .. } => {
            Some("Move the file out of the way, then run `aios workspace repair`.")
        }
        WorkspaceError::Corrupt { .. } => {
            Some("Restore or remove the inventory file; it is not rewritten automatically.")
        }
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CommandStatus {
    Ok,
    UserError,
    Failure,
}

impl CommandStatus {
    #[must_use]
    pub fn exit_code(self) -> i32 {
        match self {
            CommandStatus::Ok => 0,
            CommandStatus::UserError => 1,
            CommandStatus::Failure => 2,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommandGroup {
    Project,
    Workspace,
    Watch,
}

impl fmt::Display for CommandGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CommandGroup::Project => "project",
            CommandGroup::Workspace => "workspace",
            CommandGroup::Watch => "watch",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Copy, Debug)]
pub struct CommandInfo {
    pub group: CommandGroup,
    pub name: &'static str,
}

impl CommandInfo {
    #[must_use]
    pub const fn new(group: CommandGroup, name: &'static str) -> Self {
        Self { group, name }
    }
}

#[must_use]
pub fn to_json_response(info: CommandInfo, outcome: &ExecutionOutcome) -> Value {
    let status = match outcome.status {
        CommandStatus::Ok => "ok",
        CommandStatus::UserError => "user-error",
        CommandStatus::Failure => "error",
    };
    let details = match &outcome.details {
        Value::Object(_) => outcome.details.clone(),
        Value::Null => json!({}),
        other => json!({ "value": other }),
    };
    json!({
        "status": status,
        "message": format_status_message(info, &outcome.message),
        "details": details,
    })
}

#[must_use]
pub fn format_status_message(info: CommandInfo, message: &str) -> String {
    let group_name = info.group.to_string();
    let prefix = if group_name == info.name {
        format!("aios {}", info.name)
    } else {
        format!("aios {} {}", group_name, info.name)
    };
    if message.is_empty() {
        prefix
    } else if message.starts_with(&prefix) {
        message.to_string()
    } else {
        format!("{prefix}: {message}")
    }
}
