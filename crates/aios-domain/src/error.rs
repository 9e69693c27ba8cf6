use std::io;
use std::path::{Path, PathBuf};

/// Coarse classification of [`WorkspaceError`] values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Input,
    NotFound,
    Filesystem,
    Conflict,
    Corruption,
}

impl ErrorKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Input => "input",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Filesystem => "filesystem",
            ErrorKind::Conflict => "conflict",
            ErrorKind::Corruption => "corruption",
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum WorkspaceError {
    #[error("path required")]
    PathRequired,
    #[error("selector required")]
    SelectorRequired,
    #[error("at least one watch path is required")]
    NoWatchPaths,
    #[error("invalid project id {0:?}")]
    InvalidProjectId(String),
    #[error("project not found")]
    ProjectNotFound,
    #[error("non-symlink at link path")]
    NonSymlinkConflict { path: PathBuf },
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl WorkspaceError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            WorkspaceError::PathRequired
            | WorkspaceError::SelectorRequired
            | WorkspaceError::NoWatchPaths
            | WorkspaceError::InvalidProjectId(_) => ErrorKind::Input,
            WorkspaceError::ProjectNotFound => ErrorKind::NotFound,
            WorkspaceError::NonSymlinkConflict { .. } => ErrorKind::Conflict,
            WorkspaceError::Io { .. } => ErrorKind::Filesystem,
            WorkspaceError::Corrupt { .. } => ErrorKind::Corruption,
        }
    }

    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        WorkspaceError::Io {
            context: context.into(),
            source,
        }
    }

    pub(crate) fn io_at(verb: &str, path: &Path, source: io::Error) -> Self {
        Self::io(format!("failed to {verb} {}", path.display()), source)
    }
}

pub type Result<T, E = WorkspaceError> = std::result::Result<T, E>;

/// Adds path context to raw `io::Result`s.
pub trait IoResultExt<T> {
    fn at(self, verb: &str, path: &Path) -> Result<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn at(self, verb: &str, path: &Path) -> Result<T> {
        self.map_err(|err| WorkspaceError::io_at(verb, path, err))
    }
}
