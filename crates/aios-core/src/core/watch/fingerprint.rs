use std::fs::{self, Metadata};
use std::io;
use std::path::Path;
use std::time::UNIX_EPOCH;

use walkdir::WalkDir;

use aios_domain::{IoResultExt, Result};

/// Metadata-only summary of `path`, compared for equality between polls.
///
/// Files hash to `f:<mtime_nanos>:<size>`. Directories concatenate
/// `<path>:<mtime_nanos>:<size>|` for every non-directory entry, walking in
/// file-name order. Same-size edits within one mtime tick are not detected.
pub fn fingerprint(path: &Path) -> Result<String> {
    let meta = fs::metadata(path).at("stat", path)?;
    if !meta.is_dir() {
        return Ok(format!("f:{}:{}", mtime_nanos(&meta), meta.len()));
    }
    let mut out = String::new();
    for entry in WalkDir::new(path).sort_by_file_name() {
        let entry = entry.map_err(io::Error::from).at("walk", path)?;
        if entry.file_type().is_dir() {
            continue;
        }
        let meta = entry
            .metadata()
            .map_err(io::Error::from)
            .at("stat", entry.path())?;
        out.push_str(&format!(
            "{}:{}:{}|",
            entry.path().display(),
            mtime_nanos(&meta),
            meta.len()
        ));
    }
    Ok(out)
}

fn mtime_nanos(meta: &Metadata) -> u128 {
    meta.modified()
        .ok()
        .and_then(|modified| modified.duration_since(UNIX_EPOCH).ok())
        .map_or(0, |elapsed| elapsed.as_nanos())
}
