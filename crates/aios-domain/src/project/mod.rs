use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

pub const INVENTORY_VERSION: u32 = 1;

/// A tracked project. `id` is derived from the canonical path and never changes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Path")]
    pub path: PathBuf,
    #[serde(rename = "AddedAt")]
    pub added_at: String,
}

impl Project {
    /// Builds a record whose id is the canonical path itself.
    #[must_use]
    pub fn from_canonical(path: PathBuf, added_at: OffsetDateTime) -> Self {
        Self {
            id: path.display().to_string(),
            path,
            added_at: format_timestamp(added_at),
        }
    }

    /// True when `selector` names this project by id or by path verbatim.
    #[must_use]
    pub fn matches(&self, selector: &str) -> bool {
        self.id == selector || self.path == Path::new(selector)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    pub version: u32,
    #[serde(default)]
    pub updated_at: String,
    #[serde(default)]
    pub projects: Vec<Project>,
}

impl Inventory {
    #[must_use]
    pub fn empty() -> Self {
        Self {
            version: INVENTORY_VERSION,
            updated_at: String::new(),
            projects: Vec::new(),
        }
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|project| project.id == id)
    }

    #[must_use]
    pub fn position_of(&self, selector: &str) -> Option<usize> {
        self.projects
            .iter()
            .position(|project| project.matches(selector))
    }

    /// Inserts `project` unless its id is already present.
    ///
    /// Returns the record that ends up in the inventory and whether it was new.
    pub fn insert(&mut self, project: Project) -> (Project, bool) {
        if let Some(existing) = self.get(&project.id) {
            return (existing.clone(), false);
        }
        self.projects.push(project.clone());
        (project, true)
    }

    pub fn remove_at(&mut self, index: usize) -> Project {
        self.projects.remove(index)
    }

    /// Orders projects by the raw path string, not component-wise.
    pub fn sort(&mut self) {
        self.projects.sort_by(by_path_string);
    }

    #[must_use]
    pub fn sorted_projects(&self) -> Vec<Project> {
        let mut projects = self.projects.clone();
        projects.sort_by(by_path_string);
        projects
    }
}

fn by_path_string(a: &Project, b: &Project) -> Ordering {
    a.path.as_os_str().cmp(b.path.as_os_str())
}

#[must_use]
pub fn format_timestamp(timestamp: OffsetDateTime) -> String {
    timestamp
        .to_offset(time::UtcOffset::UTC)
        .format(&Rfc3339)
        .unwrap_or_default()
}
