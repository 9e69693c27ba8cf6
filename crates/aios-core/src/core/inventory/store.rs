// inventory.json persistence.
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use time::OffsetDateTime;
use tracing::debug;

use aios_domain::{
    format_timestamp, Inventory, IoResultExt, Result, WorkspaceError, INVENTORY_VERSION,
};

use crate::fs::{create_private_dir_all, open_private_file};

pub trait InventoryStore: Send + Sync {
    /// Loads the inventory. A missing file yields an empty inventory.
    fn load(&self) -> Result<Inventory>;
    fn save(&self, inventory: &Inventory) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileInventoryStore {
    path: PathBuf,
}

impl FileInventoryStore {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl InventoryStore for FileInventoryStore {
    fn load(&self) -> Result<Inventory> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "inventory missing; starting empty");
                return Ok(Inventory::empty());
            }
            Err(err) => return Err(err).at("read", &self.path),
        };
        let inventory: Inventory =
            serde_json::from_str(&contents).map_err(|source| WorkspaceError::Corrupt {
                path: self.path.clone(),
                source,
            })?;
        debug!(
            path = %self.path.display(),
            projects = inventory.projects.len(),
            "loaded inventory"
        );
        Ok(inventory)
    }

    fn save(&self, inventory: &Inventory) -> Result<()> {
        let mut on_disk = Inventory {
            version: INVENTORY_VERSION,
            updated_at: format_timestamp(OffsetDateTime::now_utc()),
            projects: inventory.projects.clone(),
        };
        on_disk.sort();
        let mut contents = serde_json::to_vec_pretty(&on_disk).map_err(|source| {
            WorkspaceError::Corrupt {
                path: self.path.clone(),
                source,
            }
        })?;
        contents.push(b'\n');

        if let Some(dir) = self.path.parent() {
            create_private_dir_all(dir)?;
        }
        let tmp_path = self.path.with_extension("json.tmp");
        let mut file = open_private_file(&tmp_path)?;
        file.write_all(&contents).at("write", &tmp_path)?;
        file.sync_all().at("sync", &tmp_path)?;
        drop(file);
        fs::rename(&tmp_path, &self.path).at("replace", &self.path)?;
        debug!(
            path = %self.path.display(),
            projects = on_disk.projects.len(),
            "saved inventory"
        );
        Ok(())
    }
}
