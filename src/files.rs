//! File discovery and small in-place file edits

use crate::errors::{EhcError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Recursively collects every file under `path` that passes the name filters.
///
/// A file is kept when its name contains every entry of `file_name_substrings`
/// and ends with `file_extension`. `None` (or an empty substring list) skips
/// that filter. Paths are returned sorted so repeated runs concatenate files
/// in the same order.
pub fn get_all_files_in_path<S: AsRef<str>>(
    path: &Path,
    file_name_substrings: Option<&[S]>,
    file_extension: Option<&str>,
) -> Result<Vec<PathBuf>> {
    let mut file_paths = Vec::new();
    let mut pending = vec![path.to_path_buf()];

    while let Some(dir) = pending.pop() {
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            let entry_path = entry.path();

            // Links to directories are neither followed nor listed as files.
            if entry_path.is_dir() {
                if !entry.file_type()?.is_symlink() {
                    pending.push(entry_path);
                }
                continue;
            }

            let name = entry.file_name();
            let name = name.to_string_lossy();

            let substrings_ok = file_name_substrings
                .map_or(true, |subs| subs.iter().all(|s| name.contains(s.as_ref())));
            let extension_ok = file_extension.map_or(true, |ext| name.ends_with(ext));

            if substrings_ok && extension_ok {
                file_paths.push(entry_path);
            }
        }
    }

    file_paths.sort();
    debug!(dir = %path.display(), files = file_paths.len(), "collected files");
    Ok(file_paths)
}

/// Counts the files directly inside `dir` whose names end with `extension`.
pub fn count_files_with_extension(dir: &Path, extension: &str) -> Result<usize> {
    let mut count = 0;
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() && entry.file_name().to_string_lossy().ends_with(extension)
        {
            count += 1;
        }
    }
    Ok(count)
}

/// Sorts the lines of a file alphabetically, rewriting it in place.
pub fn sort_file(file_path: &Path) -> Result<()> {
    let contents = match fs::read_to_string(file_path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(EhcError::FileNotFound {
                path: file_path.to_path_buf(),
            });
        }
        Err(e) => return Err(e.into()),
    };

    // Each line keeps its terminator, so a final line without one sorts as-is.
    let mut lines: Vec<&str> = contents.split_inclusive('\n').collect();
    lines.sort_unstable();
    fs::write(file_path, lines.concat())?;

    debug!(file = %file_path.display(), lines = lines.len(), "sorted file");
    Ok(())
}
