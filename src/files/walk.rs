//! Recursive directory listing.

use std::fs;
use std::path::{Path, PathBuf};

use super::path::PathStyle;
use super::FilesError;

/// Directory names never descended into.
pub const IGNORED_DIRECTORIES: &[&str] = &[".git"];

fn read_dir(path: &Path) -> Result<fs::ReadDir, FilesError> {
    fs::read_dir(path).map_err(|source| FilesError::ReadDir {
        path: path.to_path_buf(),
        source,
    })
}

/// Every file below `root`, as sorted relative paths.
pub fn list_all_files(root: &Path, style: PathStyle) -> Result<Vec<String>, FilesError> {
    let mut files = Vec::new();
    let mut pending: Vec<PathBuf> = vec![PathBuf::new()];

    while let Some(relative) = pending.pop() {
        for entry in read_dir(&root.join(&relative))?.flatten() {
            let name = entry.file_name();
            let Ok(file_type) = entry.file_type() else {
                continue;
            };

            if file_type.is_dir() {
                if !IGNORED_DIRECTORIES.iter().any(|ignored| name == *ignored) {
                    pending.push(relative.join(&name));
                }
            } else if file_type.is_file() || entry.path().is_file() {
                files.push(style.render(&relative.join(&name)));
            }
        }
    }

    files.sort();
    Ok(files)
}

/// The files directly inside `root`, sorted.
pub fn list_root_files(root: &Path) -> Result<Vec<String>, FilesError> {
    let mut files: Vec<String> = read_dir(root)?
        .flatten()
        .filter(|entry| entry.path().is_file())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    files.sort();
    Ok(files)
}
