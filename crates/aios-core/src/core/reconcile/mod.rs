//! Validate → plan → repair over the project inventory and the link tree.
//!
//! `validate` and `plan` never write and abort on the first error. `repair`
//! is best-effort: a failed `ensure` becomes a skipped action carrying the
//! error in its reason.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info, warn};

use aios_domain::{
    LinkStatus, PlanAction, PlanResult, RepairResult, Result, ValidationResult,
};

use crate::links::LinkDriver;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProjectRef {
    pub id: String,
    pub path: PathBuf,
}

pub trait ProjectSource: Send + Sync {
    fn projects(&self) -> Result<Vec<ProjectRef>>;
}

#[derive(Clone)]
pub struct Reconciler {
    source: Arc<dyn ProjectSource>,
    links: Arc<dyn LinkDriver>,
}

impl Reconciler {
    pub fn new(source: Arc<dyn ProjectSource>, links: Arc<dyn LinkDriver>) -> Self {
        Self { source, links }
    }

    pub fn validate(&self) -> Result<ValidationResult> {
        let projects = self.source.projects()?;
        let mut reports = Vec::with_capacity(projects.len());
        for project in &projects {
            reports.push(self.links.inspect(&project.id, &project.path)?);
        }
        let result = ValidationResult::from_reports(reports);
        debug!(
            projects = result.reports.len(),
            healthy = result.healthy,
            "validated link tree"
        );
        Ok(result)
    }

    pub fn plan(&self) -> Result<PlanResult> {
        let validation = self.validate()?;
        Ok(plan_for(&validation))
    }

    /// Enacts the plan. `healthy` on the result describes the tree afterwards:
    /// false while any conflict remains or any ensure failed.
    pub fn repair(&self) -> Result<RepairResult> {
        let validation = self.validate()?;
        let conflicts = validation.count(LinkStatus::Conflict);
        let plan = plan_for(&validation);
        let mut applied = Vec::new();
        let mut skipped = Vec::new();
        for action in plan.actions {
            if !action.kind.is_mutation() {
                skipped.push(action);
                continue;
            }
            match self.links.ensure(&action.project_id, &action.target_path) {
                Ok(()) => applied.push(action),
                Err(err) => {
                    warn!(
                        project = %action.project_id,
                        kind = action.kind.as_str(),
                        error = %err,
                        "link repair failed"
                    );
                    skipped.push(action.with_failure(&err));
                }
            }
        }
        info!(
            applied = applied.len(),
            skipped = skipped.len(),
            "reconciled link tree"
        );
        let failures = skipped
            .iter()
            .filter(|action| action.kind.is_mutation())
            .count();
        Ok(RepairResult {
            healthy: conflicts == 0 && failures == 0,
            applied,
            skipped,
        })
    }
}

fn plan_for(validation: &ValidationResult) -> PlanResult {
    PlanResult {
        healthy: validation.healthy,
        actions: validation
            .reports
            .iter()
            .map(PlanAction::for_report)
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::path::Path;
    use std::sync::Mutex;

    use aios_domain::{LinkReport, PlanActionKind, WorkspaceError, REASON_CONFLICT};

    struct FixedSource(Vec<ProjectRef>);

    impl ProjectSource for FixedSource {
        fn projects(&self) -> Result<Vec<ProjectRef>> {
            Ok(self.0.clone())
        }
    }

    struct FailingSource;

    impl ProjectSource for FailingSource {
        fn projects(&self) -> Result<Vec<ProjectRef>> {
            Err(WorkspaceError::ProjectNotFound)
        }
    }

    /// In-memory link tree keyed by project id.
    #[derive(Default)]
    struct MemoryLinks {
        links: Mutex<HashMap<String, LinkStatus>>,
        fail_ensure: Vec<String>,
        fail_inspect: Vec<String>,
        ensured: Mutex<Vec<String>>,
    }

    impl MemoryLinks {
        fn with(statuses: &[(&str, LinkStatus)]) -> Self {
            let links = statuses
                .iter()
                .map(|(id, status)| ((*id).to_string(), *status))
                .collect();
            Self {
                links: Mutex::new(links),
                ..Self::default()
            }
        }
    }

    impl LinkDriver for MemoryLinks {
        fn inspect(&self, project_id: &str, target: &Path) -> Result<LinkReport> {
            if self.fail_inspect.iter().any(|id| id == project_id) {
                return Err(WorkspaceError::io(
                    "failed to stat link",
                    std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
                ));
            }
            let status = self
                .links
                .lock()
                .unwrap()
                .get(project_id)
                .copied()
                .unwrap_or(LinkStatus::Missing);
            Ok(LinkReport {
                project_id: project_id.to_string(),
                project_path: target.to_path_buf(),
                link_path: PathBuf::from("/ws/projects/links").join(project_id),
                current_target: (status == LinkStatus::Broken).then(|| PathBuf::from("/stale")),
                status,
            })
        }

        fn ensure(&self, project_id: &str, _target: &Path) -> Result<()> {
            let mut links = self.links.lock().unwrap();
            if links.get(project_id) == Some(&LinkStatus::Conflict) {
                return Err(WorkspaceError::NonSymlinkConflict {
                    path: PathBuf::from("/ws/projects/links").join(project_id),
                });
            }
            if self.fail_ensure.iter().any(|id| id == project_id) {
                return Err(WorkspaceError::io(
                    "failed to create symlink",
                    std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
                ));
            }
            links.insert(project_id.to_string(), LinkStatus::Ok);
            self.ensured.lock().unwrap().push(project_id.to_string());
            Ok(())
        }
    }

    fn three_projects() -> Vec<ProjectRef> {
        ["p1", "p2", "p3"]
            .iter()
            .enumerate()
            .map(|(idx, id)| ProjectRef {
                id: (*id).to_string(),
                path: PathBuf::from(format!("/repo{}", idx + 1)),
            })
            .collect()
    }

    fn reconciler(projects: Vec<ProjectRef>, links: Arc<MemoryLinks>) -> Reconciler {
        Reconciler::new(Arc::new(FixedSource(projects)), links)
    }

    #[test]
    fn plan_maps_statuses_in_source_order() {
        let links = Arc::new(MemoryLinks::with(&[
            ("p1", LinkStatus::Ok),
            ("p3", LinkStatus::Broken),
        ]));
        let plan = reconciler(three_projects(), links).plan().unwrap();
        let kinds: Vec<_> = plan.actions.iter().map(|a| a.kind).collect();
        assert_eq!(
            kinds,
            vec![
                PlanActionKind::Skip,
                PlanActionKind::Create,
                PlanActionKind::Repair
            ]
        );
        assert!(!plan.healthy);
        assert_eq!(plan.actions[2].target_path, PathBuf::from("/repo3"));
    }

    #[test]
    fn repair_applies_create_and_repair() {
        let links = Arc::new(MemoryLinks::with(&[
            ("p1", LinkStatus::Ok),
            ("p3", LinkStatus::Broken),
        ]));
        let result = reconciler(three_projects(), Arc::clone(&links))
            .repair()
            .unwrap();
        let applied: Vec<_> = result.applied.iter().map(|a| a.kind).collect();
        let skipped: Vec<_> = result.skipped.iter().map(|a| a.kind).collect();
        assert_eq!(
            applied,
            vec![PlanActionKind::Create, PlanActionKind::Repair]
        );
        assert_eq!(skipped, vec![PlanActionKind::Skip]);
        assert_eq!(*links.ensured.lock().unwrap(), vec!["p2", "p3"]);
        assert!(result.healthy);

        let after = reconciler(three_projects(), links).validate().unwrap();
        assert!(after.healthy);
    }

    #[test]
    fn conflict_is_never_applied() {
        let links = Arc::new(MemoryLinks::with(&[("p1", LinkStatus::Conflict)]));
        let projects = vec![ProjectRef {
            id: "p1".into(),
            path: PathBuf::from("/repo1"),
        }];
        let rec = reconciler(projects, Arc::clone(&links));
        assert!(!rec.validate().unwrap().healthy);
        let plan = rec.plan().unwrap();
        assert_eq!(plan.actions.len(), 1);
        assert_eq!(plan.actions[0].kind, PlanActionKind::Skip);
        assert_eq!(plan.actions[0].reason, REASON_CONFLICT);

        let result = rec.repair().unwrap();
        assert!(result.applied.is_empty());
        assert_eq!(result.skipped.len(), 1);
        assert!(!result.healthy);
        assert!(links.ensured.lock().unwrap().is_empty());
    }

    #[test]
    fn failed_ensure_becomes_skipped_with_reason_suffix() {
        let links = Arc::new(MemoryLinks {
            fail_ensure: vec!["p2".into()],
            ..MemoryLinks::with(&[("p1", LinkStatus::Ok)])
        });
        let result = reconciler(three_projects(), links).repair().unwrap();
        assert_eq!(result.applied.len() + result.skipped.len(), 3);
        assert_eq!(result.applied.len(), 1);
        let failed: Vec<_> = result.failed().collect();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].project_id, "p2");
        assert!(
            failed[0]
                .reason
                .starts_with("link missing: failed to create symlink"),
            "{}",
            failed[0].reason
        );
    }

    #[test]
    fn inspection_error_aborts_validate_plan_and_repair() {
        let links = Arc::new(MemoryLinks {
            fail_inspect: vec!["p2".into()],
            ..MemoryLinks::default()
        });
        let rec = reconciler(three_projects(), Arc::clone(&links));
        assert!(rec.validate().is_err());
        assert!(rec.plan().is_err());
        assert!(rec.repair().is_err());
        assert!(links.ensured.lock().unwrap().is_empty());
    }

    #[test]
    fn source_error_propagates() {
        let rec = Reconciler::new(Arc::new(FailingSource), Arc::new(MemoryLinks::default()));
        assert!(matches!(rec.validate(), Err(WorkspaceError::ProjectNotFound)));
    }

    #[test]
    fn empty_inventory_is_healthy() {
        let rec = reconciler(Vec::new(), Arc::new(MemoryLinks::default()));
        let result = rec.repair().unwrap();
        assert!(result.healthy);
        assert!(result.applied.is_empty() && result.skipped.is_empty());
    }
}
