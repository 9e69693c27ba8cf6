use std::path::PathBuf;
use std::sync::Arc;

use time::OffsetDateTime;
use tracing::{debug, info};

use aios_domain::{canonicalize, link_name, Inventory, Project, Result, WorkspaceError};

use super::store::InventoryStore;
use crate::reconcile::{ProjectRef, ProjectSource};

pub type Canonicalizer = Arc<dyn Fn(&str) -> Result<PathBuf> + Send + Sync>;
pub type Clock = Arc<dyn Fn() -> OffsetDateTime + Send + Sync>;

/// Track / untrack / inspect / list over an [`InventoryStore`].
///
/// Every call performs exactly one `load`; mutating calls `save` once, and
/// only when the inventory actually changed.
pub struct InventoryService {
    store: Arc<dyn InventoryStore>,
    canonicalize: Canonicalizer,
    now: Clock,
}

impl InventoryService {
    pub fn new(store: Arc<dyn InventoryStore>) -> Self {
        Self {
            store,
            canonicalize: Arc::new(canonicalize),
            now: Arc::new(OffsetDateTime::now_utc),
        }
    }

    #[must_use]
    pub fn with_canonicalizer(mut self, canonicalize: Canonicalizer) -> Self {
        self.canonicalize = canonicalize;
        self
    }

    #[must_use]
    pub fn with_clock(mut self, now: Clock) -> Self {
        self.now = now;
        self
    }

    /// All tracked projects in ascending path order.
    pub fn list(&self) -> Result<Vec<Project>> {
        Ok(self.store.load()?.sorted_projects())
    }

    pub fn track(&self, raw_path: &str) -> Result<Project> {
        let raw_path = raw_path.trim();
        if raw_path.is_empty() {
            return Err(WorkspaceError::PathRequired);
        }
        let canonical = (self.canonicalize)(raw_path)?;
        let candidate = Project::from_canonical(canonical, (self.now)());
        // Every tracked id must map to a link entry.
        link_name(&candidate.id)?;
        let mut inventory = self.store.load()?;
        let (project, inserted) = inventory.insert(candidate);
        if inserted {
            self.store.save(&inventory)?;
            info!(project = %project.id, "tracking project");
        } else {
            debug!(project = %project.id, "project already tracked");
        }
        Ok(project)
    }

    pub fn untrack(&self, selector: &str) -> Result<Project> {
        let mut inventory = self.store.load()?;
        let index = self.resolve(&inventory, selector)?;
        let removed = inventory.remove_at(index);
        self.store.save(&inventory)?;
        info!(project = %removed.id, "untracked project");
        Ok(removed)
    }

    pub fn inspect(&self, selector: &str) -> Result<Project> {
        let inventory = self.store.load()?;
        let index = self.resolve(&inventory, selector)?;
        Ok(inventory.projects[index].clone())
    }

    /// Direct id/path match first, then the canonical form of the selector.
    fn resolve(&self, inventory: &Inventory, selector: &str) -> Result<usize> {
        let selector = selector.trim();
        if selector.is_empty() {
            return Err(WorkspaceError::SelectorRequired);
        }
        if let Some(index) = inventory.position_of(selector) {
            return Ok(index);
        }
        let canonical = (self.canonicalize)(selector)?;
        let canonical = canonical.display().to_string();
        inventory
            .position_of(&canonical)
            .ok_or(WorkspaceError::ProjectNotFound)
    }
}

impl ProjectSource for InventoryService {
    fn projects(&self) -> Result<Vec<ProjectRef>> {
        Ok(self
            .list()?
            .into_iter()
            .map(|project| ProjectRef {
                id: project.id,
                path: project.path,
            })
            .collect())
    }
}
