use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;

use aios_domain::{IoResultExt, Result};

const PRIVATE_DIR_MODE: u32 = 0o750;
const PRIVATE_FILE_MODE: u32 = 0o600;

/// `mkdir -p` with `rwxr-x---` on every directory created.
pub(crate) fn create_private_dir_all(path: &Path) -> Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(PRIVATE_DIR_MODE);
    }
    #[cfg(not(unix))]
    let _ = PRIVATE_DIR_MODE;
    builder.create(path).at("create", path)
}

/// Opens `path` for writing, truncated, readable only by the owner.
pub(crate) fn open_private_file(path: &Path) -> Result<File> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(PRIVATE_FILE_MODE);
    }
    let file = options.open(path).at("open", path)?;
    #[cfg(unix)]
    {
        // A pre-existing file keeps its old mode through `open`.
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(PRIVATE_FILE_MODE))
            .at("chmod", path)?;
    }
    #[cfg(not(unix))]
    let _ = PRIVATE_FILE_MODE;
    Ok(file)
}

/// Removes a symlink without following it. Missing entries are fine.
pub(crate) fn remove_symlink(path: &Path) -> Result<()> {
    let removed = fs::remove_file(path).or_else(|err| {
        if err.kind() == io::ErrorKind::NotFound {
            return Ok(());
        }
        // Directory symlinks on Windows need `remove_dir`.
        fs::remove_dir(path).or_else(|dir_err| {
            if dir_err.kind() == io::ErrorKind::NotFound {
                Ok(())
            } else {
                Err(err)
            }
        })
    });
    removed.at("remove symlink", path)
}

/// Creates a symlink at `link` whose stored target is exactly `target`.
pub(crate) fn create_symlink(target: &Path, link: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        std::os::unix::fs::symlink(target, link).map_err(|err| {
            aios_domain::WorkspaceError::io(
                format!(
                    "failed to create symlink {} -> {}",
                    link.display(),
                    target.display()
                ),
                err,
            )
        })
    }

    #[cfg(windows)]
    {
        std::os::windows::fs::symlink_dir(target, link).map_err(|err| {
            aios_domain::WorkspaceError::io(
                format!(
                    "failed to create symlink {} -> {}",
                    link.display(),
                    target.display()
                ),
                err,
            )
        })
    }

    #[cfg(not(any(unix, windows)))]
    {
        let _ = target;
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "symbolic links are not supported on this platform",
        ))
        .at("create symlink", link)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    #[test]
    fn private_file_tightens_existing_mode() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("state.json");
        fs::write(&path, b"old").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        drop(open_private_file(&path).unwrap());

        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600);
        assert_eq!(fs::read(&path).unwrap(), b"");
    }

    #[test]
    fn remove_symlink_leaves_target_alone() {
        let tmp = tempfile::tempdir().unwrap();
        let target = tmp.path().join("target");
        fs::create_dir_all(&target).unwrap();
        fs::write(target.join("keep.txt"), b"keep").unwrap();
        let link = tmp.path().join("link");
        create_symlink(&target, &link).unwrap();

        remove_symlink(&link).unwrap();
        remove_symlink(&link).unwrap();

        assert!(fs::symlink_metadata(&link).is_err());
        assert!(target.join("keep.txt").exists());
    }

    #[test]
    fn symlink_target_is_stored_verbatim() {
        let tmp = tempfile::tempdir().unwrap();
        let link = tmp.path().join("dangling");
        create_symlink(Path::new("/does/not/exist"), &link).unwrap();
        assert_eq!(
            fs::read_link(&link).unwrap(),
            Path::new("/does/not/exist").to_path_buf()
        );
    }
}
