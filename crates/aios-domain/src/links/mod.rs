use std::fmt;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, WorkspaceError};

/// Separator standing in for `/` inside a link name.
const NAME_SEPARATOR: &str = "%2F";

/// Name of a project's entry directly under the links root.
///
/// The id's normal components are joined with `%2F` after `%` is escaped as
/// `%25`, so every id gets its own flat entry and no link ever sits below
/// another project's link. `.`, `..` and root components are dropped.
pub fn link_name(project_id: &str) -> Result<String> {
    let parts: Vec<String> = Path::new(project_id)
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().replace('%', "%25")),
            _ => None,
        })
        .collect();
    if parts.is_empty() {
        return Err(WorkspaceError::InvalidProjectId(project_id.to_string()));
    }
    Ok(parts.join(NAME_SEPARATOR))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkStatus {
    Ok,
    Missing,
    Broken,
    Conflict,
}

impl LinkStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            LinkStatus::Ok => "ok",
            LinkStatus::Missing => "missing",
            LinkStatus::Broken => "broken",
            LinkStatus::Conflict => "conflict",
        }
    }
}

impl fmt::Display for LinkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkReport {
    pub project_id: String,
    pub project_path: PathBuf,
    pub link_path: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_target: Option<PathBuf>,
    pub status: LinkStatus,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanActionKind {
    Create,
    Repair,
    Skip,
}

impl PlanActionKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            PlanActionKind::Create => "create",
            PlanActionKind::Repair => "repair",
            PlanActionKind::Skip => "skip",
        }
    }

    /// Whether the action writes to the link tree.
    #[must_use]
    pub fn is_mutation(self) -> bool {
        matches!(self, PlanActionKind::Create | PlanActionKind::Repair)
    }
}

impl fmt::Display for PlanActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const REASON_HEALTHY: &str = "already healthy";
pub const REASON_MISSING: &str = "link missing";
pub const REASON_MISMATCH: &str = "link target mismatch";
pub const REASON_CONFLICT: &str = "non-symlink conflict at link path";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanAction {
    pub kind: PlanActionKind,
    pub project_id: String,
    pub link_path: PathBuf,
    pub target_path: PathBuf,
    pub reason: String,
}

impl PlanAction {
    /// Maps one inspection result onto the action that would heal it.
    #[must_use]
    pub fn for_report(report: &LinkReport) -> Self {
        let (kind, reason) = match report.status {
            LinkStatus::Ok => (PlanActionKind::Skip, REASON_HEALTHY),
            LinkStatus::Missing => (PlanActionKind::Create, REASON_MISSING),
            LinkStatus::Broken => (PlanActionKind::Repair, REASON_MISMATCH),
            LinkStatus::Conflict => (PlanActionKind::Skip, REASON_CONFLICT),
        };
        Self {
            kind,
            project_id: report.project_id.clone(),
            link_path: report.link_path.clone(),
            target_path: report.project_path.clone(),
            reason: reason.to_string(),
        }
    }

    #[must_use]
    pub fn with_failure(mut self, error: &dyn fmt::Display) -> Self {
        self.reason = format!("{}: {error}", self.reason);
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub healthy: bool,
    pub reports: Vec<LinkReport>,
}

impl ValidationResult {
    #[must_use]
    pub fn from_reports(reports: Vec<LinkReport>) -> Self {
        let healthy = reports
            .iter()
            .all(|report| report.status == LinkStatus::Ok);
        Self { healthy, reports }
    }

    #[must_use]
    pub fn count(&self, status: LinkStatus) -> usize {
        self.reports
            .iter()
            .filter(|report| report.status == status)
            .count()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanResult {
    pub healthy: bool,
    pub actions: Vec<PlanAction>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepairResult {
    pub healthy: bool,
    pub applied: Vec<PlanAction>,
    pub skipped: Vec<PlanAction>,
}

impl RepairResult {
    /// Mutating actions that were attempted and did not apply.
    pub fn failed(&self) -> impl Iterator<Item = &PlanAction> {
        self.skipped.iter().filter(|action| action.kind.is_mutation())
    }
}
