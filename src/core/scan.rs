//! Directory enumeration: immediate subdirectories of the scan root.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("Directory does not exist: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
    #[error("Failed to read directory {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

/// Fail unless `root` exists and is a directory.
pub fn ensure_root(root: &Path) -> Result<(), ScanError> {
    if !root.exists() {
        return Err(ScanError::NotFound(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(ScanError::NotADirectory(root.to_path_buf()));
    }
    Ok(())
}

/// Names of the directories directly under `root`, in the order the filesystem returns them.
///
/// Symlinks are not followed, so a link to a directory is skipped like any other file.
pub fn list_subdirectories(root: &Path) -> Result<Vec<String>, ScanError> {
    ensure_root(root)?;
    log::info!("Scanning directory {} for subdirectories", root.display());

    let mut names = Vec::new();
    let mut seen = 0usize;
    for entry in WalkDir::new(root).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|source| ScanError::Io {
            path: root.to_path_buf(),
            source,
        })?;
        seen += 1;
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            log::warn!(
                "Skipping {}: name is not valid UTF-8",
                entry.file_name().to_string_lossy()
            );
            continue;
        };
        if !entry.file_type().is_dir() {
            log::info!("Skipping {}: not a directory", name);
            continue;
        }
        names.push(name);
    }
    log::info!("Found {} entries in directory", seen);
    Ok(names)
}
