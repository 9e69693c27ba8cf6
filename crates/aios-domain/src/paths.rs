use std::env;
use std::path::{Component, Path, PathBuf};

use crate::error::{IoResultExt, Result, WorkspaceError};

/// Normalizes a selector string into an absolute, lexically cleaned path.
///
/// Relative inputs are resolved against the process working directory. The
/// path does not need to exist.
pub fn canonicalize(input: &str) -> Result<PathBuf> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(WorkspaceError::PathRequired);
    }
    let cwd = env::current_dir().at("determine working directory", Path::new("."))?;
    canonicalize_from(trimmed, &cwd)
}

/// Same as [`canonicalize`] with an explicit base directory.
pub fn canonicalize_from(input: &str, base: &Path) -> Result<PathBuf> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(WorkspaceError::PathRequired);
    }
    let raw = Path::new(trimmed);
    if raw.is_absolute() {
        Ok(clean(raw))
    } else {
        Ok(clean(&base.join(raw)))
    }
}

/// Lexically removes `.` and `..` segments and redundant separators.
///
/// `..` at the root stays at the root. Symlinks are not consulted.
#[must_use]
pub fn clean(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    let mut depth = 0usize;
    let mut anchored = false;
    for component in path.components() {
        match component {
            Component::Prefix(prefix) => out.push(prefix.as_os_str()),
            Component::RootDir => {
                out.push(Component::RootDir.as_os_str());
                anchored = true;
            }
            Component::CurDir => {}
            Component::ParentDir => {
                if depth > 0 {
                    out.pop();
                    depth -= 1;
                } else if !anchored {
                    out.push("..");
                }
            }
            Component::Normal(part) => {
                out.push(part);
                depth += 1;
            }
        }
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}
