//! Symlink tree under `<workspace>/projects/links`.
//!
//! Each tracked project owns exactly one entry directly under the links root,
//! named by [`link_name`], which must be a symbolic link whose stored target is
//! the project's absolute path. Anything else occupying that path is reported
//! as a conflict and never removed.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use aios_domain::{
    clean, link_name, IoResultExt, LinkReport, LinkStatus, Result, WorkspaceError,
};

use crate::fs::{create_private_dir_all, create_symlink, remove_symlink};

pub trait LinkDriver: Send + Sync {
    fn inspect(&self, project_id: &str, target: &Path) -> Result<LinkReport>;

    /// Points the project's link at `target`, replacing an existing symlink.
    ///
    /// Unlink and create are two steps; the link is briefly absent in between.
    fn ensure(&self, project_id: &str, target: &Path) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct FsLinkDriver {
    links_root: PathBuf,
}

impl FsLinkDriver {
    #[must_use]
    pub fn new(links_root: PathBuf) -> Self {
        Self { links_root }
    }

    #[must_use]
    pub fn links_root(&self) -> &Path {
        &self.links_root
    }

    /// `links_root` joined with the project's flat [`link_name`].
    pub fn link_path(&self, project_id: &str) -> Result<PathBuf> {
        Ok(self.links_root.join(link_name(project_id)?))
    }
}

impl LinkDriver for FsLinkDriver {
    fn inspect(&self, project_id: &str, target: &Path) -> Result<LinkReport> {
        let link_path = self.link_path(project_id)?;
        let mut report = LinkReport {
            project_id: project_id.to_string(),
            project_path: target.to_path_buf(),
            link_path,
            current_target: None,
            status: LinkStatus::Missing,
        };
        let meta = match fs::symlink_metadata(&report.link_path) {
            Ok(meta) => meta,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(report),
            Err(err) => return Err(err).at("stat", &report.link_path),
        };
        if !meta.file_type().is_symlink() {
            report.status = LinkStatus::Conflict;
            return Ok(report);
        }
        let current = fs::read_link(&report.link_path).at("read link", &report.link_path)?;
        report.status = if clean(&current) == clean(target) {
            LinkStatus::Ok
        } else {
            LinkStatus::Broken
        };
        report.current_target = Some(current);
        Ok(report)
    }

    fn ensure(&self, project_id: &str, target: &Path) -> Result<()> {
        let link_path = self.link_path(project_id)?;
        create_private_dir_all(&self.links_root)?;
        match fs::symlink_metadata(&link_path) {
            Ok(meta) if !meta.file_type().is_symlink() => {
                return Err(WorkspaceError::NonSymlinkConflict { path: link_path });
            }
            Ok(_) => {
                debug!(link = %link_path.display(), "replacing existing symlink");
                remove_symlink(&link_path)?;
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => return Err(err).at("stat", &link_path),
        }
        create_symlink(target, &link_path)?;
        info!(
            project = project_id,
            link = %link_path.display(),
            target = %target.display(),
            "linked project"
        );
        Ok(())
    }
}
