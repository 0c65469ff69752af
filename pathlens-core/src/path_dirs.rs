use crate::DirectoryRecord;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

/// Builds one record per entry of a PATH-style value, in order.
///
/// Empty entries are dropped. An entry spelled exactly like an earlier one
/// is kept but flagged as a duplicate.
pub fn directories_from_path(value: &OsStr, source_label: &str) -> Vec<DirectoryRecord> {
    let dirs: Vec<PathBuf> = std::env::split_paths(value)
        .filter(|p| !p.as_os_str().is_empty())
        .collect();
    directory_records(dirs, source_label)
}

/// Records for an explicit, ordered list of directories.
pub fn directory_records<I>(dirs: I, source_label: &str) -> Vec<DirectoryRecord>
where
    I: IntoIterator<Item = PathBuf>,
{
    let mut seen = HashSet::new();
    dirs.into_iter()
        .map(|directory| {
            let duplicate = !seen.insert(directory.clone());
            let meta = fs::metadata(&directory).ok().filter(|m| m.is_dir());
            DirectoryRecord {
                exists: meta.is_some(),
                writable: meta.map(|m| !m.permissions().readonly()).unwrap_or(false),
                source_label: source_label.to_string(),
                duplicate,
                executable_names: Vec::new(),
                directory,
            }
        })
        .collect()
}

/// Canonical executable order: case-insensitive, ties broken by exact bytes
/// so the order is total.
pub fn canonical_order(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Sorts into canonical order and drops exact repeats.
pub fn sort_names(names: &mut Vec<String>) {
    names.sort_by(|a, b| canonical_order(a, b));
    names.dedup();
}

#[cfg(unix)]
fn is_executable(meta: &fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    meta.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn is_executable(_meta: &fs::Metadata) -> bool {
    true
}

/// Names of the executable regular files in `dir`, symlinks followed, in
/// canonical order. An unreadable directory yields nothing.
pub fn list_executables(dir: &Path) -> Vec<String> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            log::warn!("{}: cannot list directory: {e}", dir.display());
            return Vec::new();
        }
    };

    let mut names: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            fs::metadata(entry.path())
                .map(|m| m.is_file() && is_executable(&m))
                .unwrap_or(false)
        })
        .filter_map(|entry| match entry.file_name().into_string() {
            Ok(name) => Some(name),
            Err(name) => {
                log::debug!("{}: skipping non-UTF-8 name {name:?}", dir.display());
                None
            }
        })
        .collect();
    sort_names(&mut names);
    names
}
